use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Weak reference to another catalog entity by its natural id.
///
/// The pipeline never dereferences these; the target may not even exist in the
/// store if its own crawl failed. Serialized as the bare integer id.
pub struct EntityRef<T> {
    id: i64,
    _target: PhantomData<fn() -> T>,
}

impl<T> EntityRef<T> {
    pub const fn new(id: i64) -> Self {
        Self {
            id,
            _target: PhantomData,
        }
    }

    pub const fn id(&self) -> i64 {
        self.id
    }
}

// Manual impls so `T` itself needs none of these traits.
impl<T> Clone for EntityRef<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for EntityRef<T> {}

impl<T> PartialEq for EntityRef<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for EntityRef<T> {}

impl<T> Hash for EntityRef<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T> fmt::Debug for EntityRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let target = std::any::type_name::<T>()
            .rsplit("::")
            .next()
            .unwrap_or("?");
        write!(f, "EntityRef<{}>({})", target, self.id)
    }
}

impl<T> Serialize for EntityRef<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.id)
    }
}

impl<'de, T> Deserialize<'de> for EntityRef<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        i64::deserialize(deserializer).map(Self::new)
    }
}
