//! Bevy integration for the tag registry.
//!
//! Provides:
//! - `TaggerPlugin`: inserts a `TagRegistry<Entity>` resource and keeps it in sync
//! - `Tagged`: component carrying the tags an entity holds
//!
//! # Example
//!
//! ```ignore
//! use bevy::prelude::*;
//! use bevy_tagger::bevy::*;
//! use bevy_tagger::{Tag, TagRegistry};
//!
//! fn main() {
//!     let config = bevy_tagger_config::TagsConfig::from_file("assets/tags.toml").unwrap();
//!     App::new()
//!         .add_plugins(TaggerPlugin::from_config(config))
//!         .add_systems(Update, (spawn_crates, count_red))
//!         .run();
//! }
//!
//! fn spawn_crates(mut commands: Commands, registry: Res<TagRegistry<Entity>>) {
//!     if let Some(red) = registry.lookup_tag_by_name("Red") {
//!         commands.spawn(Tagged::new([red.clone()]));
//!     }
//! }
//!
//! fn count_red(registry: Res<TagRegistry<Entity>>) {
//!     if let Some(red) = registry.lookup_tag_by_name("Red") {
//!         let n = registry.filter_all().with_tag(red).len();
//!         info!("{n} red entities");
//!     }
//! }
//! ```

use bevy::prelude::*;

use bevy_tagger_config::TagsConfig;
use tracing::debug;

use crate::registry::TagRegistry;
use crate::tag::Tag;
use crate::traits::IntoTagId;

// =============================================================================
// Plugin
// =============================================================================

/// Bevy plugin for the tag registry.
///
/// ```ignore
/// App::new().add_plugins(TaggerPlugin::from_config(config))
/// ```
#[derive(Default)]
pub struct TaggerPlugin {
    config: Option<TagsConfig>,
}

impl TaggerPlugin {
    /// Start with an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with the tags declared in a `tags.toml`.
    pub fn from_config(config: TagsConfig) -> Self {
        Self {
            config: Some(config),
        }
    }
}

impl Plugin for TaggerPlugin {
    fn build(&self, app: &mut App) {
        let registry = match &self.config {
            Some(config) => TagRegistry::<Entity>::from_config(config),
            None => TagRegistry::<Entity>::new(),
        };

        app.insert_resource(registry);

        // Removals first so a component removed and re-added in one frame
        // ends up registered.
        app.add_systems(
            PreUpdate,
            (
                unregister_removed_entities,
                strip_unregistered_tags,
                sync_tagged_entities,
            )
                .chain(),
        );
    }
}

// =============================================================================
// Tagged Component
// =============================================================================

/// The tags an entity holds, as host data.
///
/// Spawning, editing or removing this component is mirrored into the
/// `TagRegistry<Entity>` resource during `PreUpdate`. Query the registry, not
/// this component, for filters.
#[derive(Component, Clone, Debug, Default, PartialEq, Eq)]
pub struct Tagged {
    tags: Vec<Tag>,
}

impl Tagged {
    /// Create from a list of tags. Duplicates are dropped, order is kept.
    pub fn new(tags: impl IntoIterator<Item = Tag>) -> Self {
        tags.into_iter().collect()
    }

    /// Builder method: add a tag and return self.
    #[inline]
    pub fn with(mut self, tag: Tag) -> Self {
        self.insert(tag);
        self
    }

    /// Add a tag.
    ///
    /// Returns `true` if the tag was newly inserted.
    pub fn insert(&mut self, tag: Tag) -> bool {
        if self.tags.contains(&tag) {
            return false;
        }
        self.tags.push(tag);
        true
    }

    /// Remove a tag.
    ///
    /// Returns `true` if the tag was present.
    pub fn remove(&mut self, tag: impl IntoTagId) -> bool {
        let id = tag.into_tag_id();
        let before = self.tags.len();
        self.tags.retain(|t| t.id() != id);
        self.tags.len() != before
    }

    #[inline]
    pub fn has(&self, tag: impl IntoTagId) -> bool {
        let id = tag.into_tag_id();
        self.tags.iter().any(|t| t.id() == id)
    }

    #[inline]
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    #[inline]
    pub fn clear(&mut self) {
        self.tags.clear();
    }
}

impl FromIterator<Tag> for Tagged {
    fn from_iter<T: IntoIterator<Item = Tag>>(iter: T) -> Self {
        let mut tagged = Self::default();
        tagged.extend(iter);
        tagged
    }
}

impl Extend<Tag> for Tagged {
    fn extend<T: IntoIterator<Item = Tag>>(&mut self, iter: T) {
        for tag in iter {
            self.insert(tag);
        }
    }
}

// =============================================================================
// Systems
// =============================================================================

/// Unregister entities whose `Tagged` component was removed or despawned.
pub fn unregister_removed_entities(
    mut removed: RemovedComponents<Tagged>,
    mut registry: ResMut<TagRegistry<Entity>>,
) {
    for entity in removed.read() {
        // Spawned and despawned before a sync ever saw it
        if registry.contains_entity(entity) {
            registry.remove_entity(entity);
        }
    }
}

/// Drop tags deleted with `TagRegistry::unregister_tag` from every `Tagged`.
///
/// Runs only after a deletion. The registry already purged these tags, so the
/// edit bypasses change detection.
pub fn strip_unregistered_tags(
    mut query: Query<&mut Tagged>,
    registry: Res<TagRegistry<Entity>>,
    mut seen_removals: Local<u64>,
) {
    if registry.tag_removals() == *seen_removals {
        return;
    }
    *seen_removals = registry.tag_removals();

    for mut tagged in &mut query {
        if tagged.tags.iter().any(|t| registry.is_retired(t)) {
            tagged
                .bypass_change_detection()
                .tags
                .retain(|t| !registry.is_retired(t));
        }
    }
}

/// Register new `Tagged` entities and reconcile edited ones.
///
/// Deleted tags that reappear in a component are dropped, not registered again.
pub fn sync_tagged_entities(
    mut query: Query<(Entity, &mut Tagged), Changed<Tagged>>,
    mut registry: ResMut<TagRegistry<Entity>>,
) {
    for (entity, mut tagged) in &mut query {
        if tagged.tags.iter().any(|t| registry.is_retired(t)) {
            debug!(?entity, "dropping deleted tags from Tagged component");
            tagged
                .bypass_change_detection()
                .tags
                .retain(|t| !registry.is_retired(t));
        }

        if registry.contains_entity(entity) {
            registry.set_entity_tags(entity, tagged.tags());
        } else {
            registry.initialize_entity(entity, tagged.tags());
        }
    }
}

// =============================================================================
// Resource impl for TagRegistry
// =============================================================================

impl Resource for TagRegistry<Entity> {}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tagged_builder() {
        let a = Tag::new("A");
        let b = Tag::new("B");
        let tagged = Tagged::default().with(a.clone()).with(b.clone()).with(a.clone());

        assert_eq!(tagged.len(), 2);
        assert!(tagged.has(&a));
        assert!(tagged.has(&b));
        assert!(!tagged.has(&Tag::new("A")));
    }

    #[test]
    fn tagged_insert_remove() {
        let a = Tag::new("A");
        let mut tagged = Tagged::default();

        assert!(tagged.insert(a.clone()));
        assert!(!tagged.insert(a.clone())); // duplicate
        assert_eq!(tagged.len(), 1);

        assert!(tagged.remove(&a));
        assert!(!tagged.remove(&a)); // already removed
        assert!(tagged.is_empty());
    }

    #[test]
    fn tagged_from_iter_dedups() {
        let a = Tag::new("A");
        let tagged: Tagged = [a.clone(), Tag::new("B"), a].into_iter().collect();
        assert_eq!(tagged.len(), 2);
    }

    #[test]
    fn tagged_clear() {
        let mut tagged = Tagged::new([Tag::new("A"), Tag::new("B")]);
        tagged.clear();
        assert!(tagged.is_empty());
    }
}
