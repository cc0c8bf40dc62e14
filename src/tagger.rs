//! Per-entity tag-set views.
//!
//! The registry owns every tag-set; [`Tagger`] and [`TaggerMut`] are borrowed
//! views onto one entity's set. Writes go through the registry so the inverse
//! index and the untagged set are updated with each step.

use crate::filter::TagFilter;
use crate::registry::TagRegistry;
use crate::tag::{Tag, TagId};
use crate::traits::{EntityKey, IntoTagId};

/// Read-only view of one entity's tags.
#[derive(Clone, Copy, Debug)]
pub struct Tagger<'a, E> {
    entity: E,
    tags: &'a [Tag],
}

impl<'a, E: EntityKey> Tagger<'a, E> {
    pub(crate) fn new(entity: E, tags: &'a [Tag]) -> Self {
        Self { entity, tags }
    }

    #[inline]
    pub fn entity(&self) -> E {
        self.entity
    }

    /// Tags in the order they were added.
    #[inline]
    pub fn tags(&self) -> &'a [Tag] {
        self.tags
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Identity containment check.
    pub fn has_tag(&self, tag: impl IntoTagId) -> bool {
        let id = tag.into_tag_id();
        self.tags.iter().any(|t| t.id() == id)
    }

    /// Name containment check. O(tags on entity), exact and case-sensitive.
    pub fn has_tag_named(&self, name: &str) -> bool {
        self.tags.iter().any(|t| t.name() == name)
    }

    /// True if at least one of `tags` is held. False for an empty list.
    pub fn any_match<I>(&self, tags: I) -> bool
    where
        I: IntoIterator,
        I::Item: IntoTagId,
    {
        tags.into_iter().any(|t| self.has_tag(t))
    }

    /// True if every one of `tags` is held. True for an empty list.
    pub fn all_match<I>(&self, tags: I) -> bool
    where
        I: IntoIterator,
        I::Item: IntoTagId,
    {
        tags.into_iter().all(|t| self.has_tag(t))
    }

    /// True if none of `tags` is held. True for an empty list.
    pub fn none_match<I>(&self, tags: I) -> bool
    where
        I: IntoIterator,
        I::Item: IntoTagId,
    {
        !self.any_match(tags)
    }

    /// Start a [`TagFilter`] over this entity.
    pub fn filter(&self) -> TagFilter<'a> {
        TagFilter::new(self.tags)
    }
}

/// Mutable view of one registered entity's tags.
///
/// Obtained from [`TagRegistry::tagger_mut`].
#[derive(Debug)]
pub struct TaggerMut<'a, E: EntityKey> {
    registry: &'a mut TagRegistry<E>,
    entity: E,
}

impl<'a, E: EntityKey> TaggerMut<'a, E> {
    pub(crate) fn new(registry: &'a mut TagRegistry<E>, entity: E) -> Self {
        Self { registry, entity }
    }

    #[inline]
    pub fn entity(&self) -> E {
        self.entity
    }

    /// Reborrow as a read-only view.
    pub fn as_tagger(&self) -> Tagger<'_, E> {
        Tagger::new(self.entity, self.registry.entity_tags(self.entity))
    }

    pub fn has_tag(&self, tag: impl IntoTagId) -> bool {
        self.as_tagger().has_tag(tag)
    }

    /// Add a tag. No-op (returns `false`) if it is already held or blank.
    pub fn add_tag(&mut self, tag: &Tag) -> bool {
        self.registry.register_entity_to_tag(self.entity, tag)
    }

    /// Remove a tag. No-op (returns `false`) if it is not held.
    pub fn remove_tag(&mut self, tag: impl IntoTagId) -> bool {
        self.registry.unregister_entity_from_tag(self.entity, tag)
    }

    /// Remove every tag, one at a time. Returns how many were removed.
    pub fn remove_all_tags(&mut self) -> usize {
        let held: Vec<TagId> = self
            .registry
            .entity_tags(self.entity)
            .iter()
            .map(Tag::id)
            .collect();

        held.into_iter()
            .filter(|&id| self.registry.unregister_entity_from_tag(self.entity, id))
            .count()
    }

    /// Replace the tag-set. See [`TagRegistry::set_entity_tags`].
    pub fn set_tags<'t>(&mut self, tags: impl IntoIterator<Item = &'t Tag>) -> bool {
        self.registry.set_entity_tags(self.entity, tags)
    }
}
