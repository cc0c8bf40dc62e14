//! Multi-entity collection filter.

use std::collections::HashSet;

use crate::registry::TagRegistry;
use crate::traits::{EntityKey, IntoTagId};

/// Narrows a working set of entities against the registry's inverse index.
///
/// Every step intersects or subtracts; nothing is ever added back. Seeded by
/// [`TagRegistry::filter_all`] or [`TagRegistry::filter_entities`].
///
/// ```ignore
/// let targets = registry
///     .filter_all()
///     .with_tag(&enemy)
///     .without_tags([&dead, &invulnerable])
///     .into_matches();
/// ```
#[derive(Clone, Debug)]
#[must_use]
pub struct CollectionFilter<'a, E: EntityKey> {
    registry: &'a TagRegistry<E>,
    matches: HashSet<E>,
}

impl<'a, E: EntityKey> CollectionFilter<'a, E> {
    pub(crate) fn new(registry: &'a TagRegistry<E>, seed: HashSet<E>) -> Self {
        Self {
            registry,
            matches: seed,
        }
    }

    /// Keep entities holding `tag`. An unregistered tag empties the set.
    pub fn with_tag(mut self, tag: impl IntoTagId) -> Self {
        let registry = self.registry;
        match registry.bucket(tag.into_tag_id()) {
            Some(holders) => self.matches.retain(|e| holders.contains(e)),
            None => self.matches.clear(),
        }
        self
    }

    /// Keep entities holding every one of `tags`. An empty list keeps everything.
    pub fn with_tags<I>(self, tags: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoTagId,
    {
        tags.into_iter().fold(self, |f, tag| f.with_tag(tag))
    }

    /// Drop entities holding `tag`.
    pub fn without_tag(mut self, tag: impl IntoTagId) -> Self {
        let registry = self.registry;
        if let Some(holders) = registry.bucket(tag.into_tag_id()) {
            self.matches.retain(|e| !holders.contains(e));
        }
        self
    }

    /// Drop entities holding any of `tags`.
    pub fn without_tags<I>(self, tags: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoTagId,
    {
        tags.into_iter().fold(self, |f, tag| f.without_tag(tag))
    }

    /// Keep entities holding at least one of `tags`.
    ///
    /// An empty list matches nothing and empties the set.
    pub fn with_any_tags<I>(mut self, tags: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoTagId,
    {
        let registry = self.registry;
        let union: HashSet<E> = tags
            .into_iter()
            .filter_map(|tag| registry.bucket(tag.into_tag_id()))
            .flatten()
            .copied()
            .collect();
        self.matches.retain(|e| union.contains(e));
        self
    }

    /// Current working set.
    #[inline]
    pub fn get_matches(&self) -> &HashSet<E> {
        &self.matches
    }

    pub fn into_matches(self) -> HashSet<E> {
        self.matches
    }

    /// Current working set in ascending entity order.
    pub fn sorted_matches(&self) -> Vec<E> {
        let mut sorted: Vec<E> = self.matches.iter().copied().collect();
        sorted.sort_unstable();
        sorted
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag::Tag;

    struct Fixture {
        reg: TagRegistry<u32>,
        cube: Tag,
        sphere: Tag,
        platonic: Tag,
    }

    fn fixture() -> Fixture {
        let mut reg = TagRegistry::new();
        let cube = Tag::new("Cube");
        let sphere = Tag::new("Sphere");
        let platonic = Tag::new("Platonic");
        for tag in [&cube, &sphere, &platonic] {
            reg.register_tag(tag);
        }
        reg.initialize_entity(1, [&cube, &platonic]);
        reg.initialize_entity(2, [&sphere]);
        reg.initialize_entity(3, []);
        Fixture {
            reg,
            cube,
            sphere,
            platonic,
        }
    }

    #[test]
    fn with_tag_intersects() {
        let f = fixture();
        assert_eq!(f.reg.filter_all().with_tag(&f.cube).sorted_matches(), vec![1]);
    }

    #[test]
    fn with_unregistered_tag_is_empty() {
        let f = fixture();
        assert!(f.reg.filter_all().with_tag(&Tag::new("Ghost")).is_empty());
    }

    #[test]
    fn without_tag_subtracts() {
        let f = fixture();
        let matches = f.reg.filter_all().without_tag(&f.platonic).sorted_matches();
        assert_eq!(matches, vec![2, 3]);

        // Unregistered tags subtract nothing
        assert_eq!(f.reg.filter_all().without_tag(&Tag::new("Ghost")).len(), 3);
    }

    #[test]
    fn with_tags_folds() {
        let f = fixture();
        let both = f.reg.filter_all().with_tags([&f.cube, &f.platonic]);
        assert_eq!(both.sorted_matches(), vec![1]);

        let disjoint = f.reg.filter_all().with_tags([&f.cube, &f.sphere]);
        assert!(disjoint.is_empty());
    }

    #[test]
    fn without_tags_folds() {
        let f = fixture();
        let rest = f.reg.filter_all().without_tags([&f.cube, &f.sphere]);
        assert_eq!(rest.sorted_matches(), vec![3]);
    }

    #[test]
    fn with_any_tags_unions_then_intersects() {
        let f = fixture();
        let any = f.reg.filter_all().with_any_tags([&f.cube, &f.sphere]);
        assert_eq!(any.sorted_matches(), vec![1, 2]);

        // Union never widens an already-narrowed set
        let narrowed = f
            .reg
            .filter_entities([2, 3])
            .with_any_tags([&f.cube, &f.sphere]);
        assert_eq!(narrowed.sorted_matches(), vec![2]);
    }

    #[test]
    fn empty_lists() {
        let f = fixture();
        let none: &[Tag] = &[];

        assert_eq!(f.reg.filter_all().with_tags(none).len(), 3);
        assert_eq!(f.reg.filter_all().without_tags(none).len(), 3);
        assert!(f.reg.filter_all().with_any_tags(none).is_empty());
    }

    #[test]
    fn into_matches_returns_working_set() {
        let f = fixture();
        let set = f.reg.filter_all().with_tag(&f.sphere).into_matches();
        assert_eq!(set, HashSet::from([2]));
    }
}
