//! Single-entity tag filter.

use crate::tag::{Tag, TagId};
use crate::traits::IntoTagId;

/// Incremental AND-query against one entity's tags.
///
/// Starts matching; every step can only keep or drop the match. Steps commute,
/// so the order of calls never changes the result.
///
/// ```ignore
/// let hostile = registry
///     .filter_entity(entity)
///     .with_tag(&enemy)
///     .without_tag(&dead)
///     .with_any_tags([&ranged, &melee])
///     .is_match();
/// ```
#[derive(Clone, Copy, Debug)]
#[must_use]
pub struct TagFilter<'a> {
    tags: &'a [Tag],
    matches: bool,
}

impl<'a> TagFilter<'a> {
    /// Filter over an arbitrary tag slice.
    pub fn new(tags: &'a [Tag]) -> Self {
        Self {
            tags,
            matches: true,
        }
    }

    /// A filter that can never match.
    pub(crate) fn unmatched() -> Self {
        Self {
            tags: &[],
            matches: false,
        }
    }

    #[inline]
    fn holds(&self, id: TagId) -> bool {
        self.tags.iter().any(|t| t.id() == id)
    }

    pub fn with_tag(mut self, tag: impl IntoTagId) -> Self {
        self.matches &= self.holds(tag.into_tag_id());
        self
    }

    pub fn with_tags<I>(self, tags: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoTagId,
    {
        tags.into_iter().fold(self, |f, tag| f.with_tag(tag))
    }

    pub fn without_tag(mut self, tag: impl IntoTagId) -> Self {
        self.matches &= !self.holds(tag.into_tag_id());
        self
    }

    pub fn without_tags<I>(self, tags: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoTagId,
    {
        tags.into_iter().fold(self, |f, tag| f.without_tag(tag))
    }

    /// Requires at least one of `tags`. An empty list never matches.
    pub fn with_any_tags<I>(mut self, tags: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoTagId,
    {
        let any = tags.into_iter().any(|t| self.holds(t.into_tag_id()));
        self.matches &= any;
        self
    }

    /// Result so far. Further steps may still be chained.
    #[inline]
    pub fn is_match(&self) -> bool {
        self.matches
    }
}
