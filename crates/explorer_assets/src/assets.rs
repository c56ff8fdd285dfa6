use std::{
    fmt,
    hash::{Hash, Hasher},
    marker::PhantomData,
};

use uuid::Uuid;

/// Ticket for an asset that is loading or has loaded.
///
/// Cheap to copy; the type parameter only keeps handles of different asset
/// kinds apart.
pub struct Handle<T> {
    pub id: Uuid,
    marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    pub fn new() -> Self {
        Self::from_id(Uuid::new_v4())
    }

    pub fn from_id(id: Uuid) -> Self {
        Self {
            id,
            marker: PhantomData,
        }
    }
}

impl<T> Default for Handle<T> {
    fn default() -> Self {
        Self::new()
    }
}

// Manual impls so `T` itself needs none of these traits
impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Handle").field(&self.id).finish()
    }
}
