//! Conversion and bound traits shared by the registry, tag-sets and filters.

use std::fmt::Debug;
use std::hash::Hash;

use crate::tag::{Tag, TagId};

/// Anything that names a tag by identity.
///
/// Query and removal operations accept `TagId`, `Tag` and `&Tag` alike.
pub trait IntoTagId {
    fn into_tag_id(self) -> TagId;
}

impl IntoTagId for TagId {
    #[inline]
    fn into_tag_id(self) -> TagId {
        self
    }
}

impl IntoTagId for &TagId {
    #[inline]
    fn into_tag_id(self) -> TagId {
        *self
    }
}

impl IntoTagId for Tag {
    #[inline]
    fn into_tag_id(self) -> TagId {
        self.id()
    }
}

impl IntoTagId for &Tag {
    #[inline]
    fn into_tag_id(self) -> TagId {
        self.id()
    }
}

/// Bounds required of an entity key.
///
/// Blanket-implemented; `bevy::prelude::Entity`, integers and other small
/// `Copy` handles all qualify.
pub trait EntityKey: Copy + Eq + Hash + Ord + Debug + Send + Sync + 'static {}

impl<T> EntityKey for T where T: Copy + Eq + Hash + Ord + Debug + Send + Sync + 'static {}
