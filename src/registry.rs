//! Tag registry: the bidirectional entity ↔ tag index.

use std::collections::{HashMap, HashSet};

use bevy_tagger_config::{TagsConfig, DEFAULT_MAX_NAME_ATTEMPTS};
use tracing::{debug, error, trace, warn};

use crate::collection::CollectionFilter;
use crate::error::TagError;
use crate::filter::TagFilter;
use crate::search::{self, SearchMode};
use crate::tag::{Tag, TagId};
use crate::tagger::{Tagger, TaggerMut};
use crate::traits::{EntityKey, IntoTagId};

/// Registry of tags and the entities that hold them.
///
/// Maintains three coupled indexes:
/// - forward: entity → ordered, duplicate-free tag-set
/// - inverse: tag → set of entities holding it
/// - untagged: registered entities holding no tag
///
/// Every mutating call leaves all three consistent before it returns.
/// Invalid arguments (blank tags, unknown entities, unknown tags) are logged
/// and ignored; mutators report whether anything changed.
#[derive(Clone, Debug)]
pub struct TagRegistry<E: EntityKey> {
    /// Registered tags, in registration order.
    tags: Vec<Tag>,
    /// Inverse index. Keys are exactly the ids in `tags`, buckets may be empty.
    tagged: HashMap<TagId, HashSet<E>>,
    entities: HashMap<E, Vec<Tag>>,
    untagged: HashSet<E>,
    /// Tags removed by `unregister_tag` and not registered again since.
    retired: HashSet<TagId>,
    /// Bumped on every successful `unregister_tag`.
    tag_removals: u64,
    max_name_attempts: usize,
}

impl<E: EntityKey> Default for TagRegistry<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: EntityKey> TagRegistry<E> {
    pub fn new() -> Self {
        Self {
            tags: Vec::new(),
            tagged: HashMap::new(),
            entities: HashMap::new(),
            untagged: HashSet::new(),
            retired: HashSet::new(),
            tag_removals: 0,
            max_name_attempts: DEFAULT_MAX_NAME_ATTEMPTS,
        }
    }

    /// Cap the number of candidate names [`create_unique_tag`](Self::create_unique_tag) tries.
    ///
    /// Values below 1 are raised to 1.
    pub fn with_max_name_attempts(mut self, attempts: usize) -> Self {
        self.max_name_attempts = attempts.max(1);
        self
    }

    /// Build a registry pre-populated with the tags of a `tags.toml`.
    pub fn from_config(config: &TagsConfig) -> Self {
        let mut registry = Self::new().with_max_name_attempts(config.max_name_attempts);
        for entry in config.entries() {
            registry.register_tag(&Tag::from_entry(entry));
        }
        debug!(tags = registry.tag_count(), "tag registry built from config");
        registry
    }

    // =========================================================================
    // Tags
    // =========================================================================

    /// Register a tag, creating an empty bucket for it.
    ///
    /// Returns `false` (and logs) if the tag is blank or already registered.
    pub fn register_tag(&mut self, tag: &Tag) -> bool {
        if tag.is_blank() {
            warn!(tag = %tag.id(), "refusing to register a tag with a blank name");
            return false;
        }
        if self.tagged.contains_key(&tag.id()) {
            warn!(tag = %tag.name(), id = %tag.id(), "tag is already registered");
            return false;
        }
        self.insert_tag(tag);
        true
    }

    /// Unregister a tag and purge it from every entity that holds it.
    ///
    /// Entities left with no tags move to the untagged set.
    pub fn unregister_tag(&mut self, tag: impl IntoTagId) -> bool {
        let id = tag.into_tag_id();
        let Some(holders) = self.tagged.remove(&id) else {
            warn!(tag = %id, "cannot unregister a tag that is not registered");
            return false;
        };

        for entity in &holders {
            if let Some(set) = self.entities.get_mut(entity) {
                set.retain(|t| t.id() != id);
                if set.is_empty() {
                    self.untagged.insert(*entity);
                }
            }
        }
        self.tags.retain(|t| t.id() != id);
        self.retired.insert(id);
        self.tag_removals += 1;

        debug!(tag = %id, purged = holders.len(), "tag unregistered");
        true
    }

    /// Check if a tag is registered.
    #[inline]
    pub fn contains_tag(&self, tag: impl IntoTagId) -> bool {
        self.tagged.contains_key(&tag.into_tag_id())
    }

    /// Check if a tag was unregistered and has not been registered again.
    ///
    /// Host-side mirrors use this to drop stale copies of deleted tags
    /// instead of re-registering them.
    #[inline]
    pub fn is_retired(&self, tag: impl IntoTagId) -> bool {
        self.retired.contains(&tag.into_tag_id())
    }

    /// Number of successful `unregister_tag` calls so far.
    #[inline]
    pub fn tag_removals(&self) -> u64 {
        self.tag_removals
    }

    /// Registered tag by id.
    pub fn tag(&self, id: TagId) -> Option<&Tag> {
        if !self.tagged.contains_key(&id) {
            return None;
        }
        self.tags.iter().find(|t| t.id() == id)
    }

    /// All registered tags in registration order.
    #[inline]
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    #[inline]
    pub fn tag_count(&self) -> usize {
        self.tags.len()
    }

    /// First registered tag with exactly this name.
    ///
    /// Linear scan; tag counts are small and names are not indexed.
    pub fn lookup_tag_by_name(&self, name: &str) -> Option<&Tag> {
        self.tags.iter().find(|t| t.name() == name)
    }

    /// Create and register a tag whose name is not yet taken.
    ///
    /// Tries `base`, then `base 1`, `base 2`, ... up to the configured number
    /// of attempts.
    pub fn create_unique_tag(&mut self, base: &str) -> Result<Tag, TagError> {
        let base = base.trim();
        if base.is_empty() {
            warn!("refusing to create a tag with a blank name");
            return Err(TagError::BlankName);
        }

        for attempt in 0..self.max_name_attempts {
            let candidate = if attempt == 0 {
                base.to_string()
            } else {
                format!("{base} {attempt}")
            };
            if self.lookup_tag_by_name(&candidate).is_none() {
                let tag = Tag::new(candidate);
                self.insert_tag(&tag);
                return Ok(tag);
            }
        }

        error!(
            base,
            attempts = self.max_name_attempts,
            "tag creation failed: every candidate name is taken"
        );
        Err(TagError::NamesExhausted {
            base: base.to_string(),
            attempts: self.max_name_attempts,
        })
    }

    /// Entities currently holding `tag`. Empty for unregistered tags.
    pub fn tagged_entities(&self, tag: impl IntoTagId) -> impl Iterator<Item = E> + '_ {
        self.tagged
            .get(&tag.into_tag_id())
            .into_iter()
            .flatten()
            .copied()
    }

    #[inline]
    pub(crate) fn bucket(&self, id: TagId) -> Option<&HashSet<E>> {
        self.tagged.get(&id)
    }

    fn insert_tag(&mut self, tag: &Tag) {
        self.retired.remove(&tag.id());
        self.tags.push(tag.clone());
        self.tagged.insert(tag.id(), HashSet::new());
        debug!(tag = %tag.name(), id = %tag.id(), "tag registered");
    }

    /// Register `tag` if needed. `false` only for blank tags.
    fn ensure_tag(&mut self, tag: &Tag) -> bool {
        if self.tagged.contains_key(&tag.id()) {
            return true;
        }
        if tag.is_blank() {
            warn!(tag = %tag.id(), "ignoring tag with a blank name");
            return false;
        }
        self.insert_tag(tag);
        true
    }

    // =========================================================================
    // Entities
    // =========================================================================

    /// Register an entity with its initial tags.
    ///
    /// Unregistered tags are registered on the way. Returns `false` if the
    /// entity was already registered (its tags are left untouched).
    pub fn initialize_entity<'t>(
        &mut self,
        entity: E,
        tags: impl IntoIterator<Item = &'t Tag>,
    ) -> bool {
        if self.entities.contains_key(&entity) {
            warn!(?entity, "entity is already registered");
            return false;
        }

        self.entities.insert(entity, Vec::new());
        self.untagged.insert(entity);
        for tag in tags {
            self.attach(entity, tag);
        }

        trace!(?entity, tags = self.entity_tags(entity).len(), "entity registered");
        true
    }

    /// Unregister an entity, unlinking it from every tag it held.
    pub fn remove_entity(&mut self, entity: E) -> bool {
        let Some(tags) = self.entities.remove(&entity) else {
            warn!(?entity, "cannot remove an entity that is not registered");
            return false;
        };

        for tag in &tags {
            if let Some(bucket) = self.tagged.get_mut(&tag.id()) {
                bucket.remove(&entity);
            }
        }
        self.untagged.remove(&entity);

        trace!(?entity, "entity removed");
        true
    }

    /// Give `entity` the tag `tag`, registering the tag if needed.
    ///
    /// Returns `true` if the tag was newly added.
    pub fn register_entity_to_tag(&mut self, entity: E, tag: &Tag) -> bool {
        if !self.entities.contains_key(&entity) {
            warn!(?entity, tag = %tag.name(), "cannot tag an entity that is not registered");
            return false;
        }
        self.attach(entity, tag)
    }

    /// Take `tag` away from `entity`.
    ///
    /// Returns `true` if the entity held the tag.
    pub fn unregister_entity_from_tag(&mut self, entity: E, tag: impl IntoTagId) -> bool {
        let id = tag.into_tag_id();
        let Some(set) = self.entities.get_mut(&entity) else {
            warn!(?entity, tag = %id, "cannot untag an entity that is not registered");
            return false;
        };
        let Some(pos) = set.iter().position(|t| t.id() == id) else {
            return false;
        };

        set.remove(pos);
        if set.is_empty() {
            self.untagged.insert(entity);
        }
        if let Some(bucket) = self.tagged.get_mut(&id) {
            bucket.remove(&entity);
        }

        trace!(?entity, tag = %id, "tag removed from entity");
        true
    }

    /// Replace an entity's tag-set with `tags`.
    ///
    /// Stale tags are removed first, then missing ones are added in order,
    /// one at a time. Returns `true` if anything changed.
    pub fn set_entity_tags<'t>(
        &mut self,
        entity: E,
        tags: impl IntoIterator<Item = &'t Tag>,
    ) -> bool {
        if !self.entities.contains_key(&entity) {
            warn!(?entity, "cannot set tags of an entity that is not registered");
            return false;
        }

        let wanted: Vec<&Tag> = tags.into_iter().collect();
        let stale: Vec<TagId> = self
            .entity_tags(entity)
            .iter()
            .map(Tag::id)
            .filter(|id| !wanted.iter().any(|t| t.id() == *id))
            .collect();

        let mut changed = false;
        for id in stale {
            changed |= self.unregister_entity_from_tag(entity, id);
        }
        for tag in wanted {
            changed |= self.attach(entity, tag);
        }
        changed
    }

    /// Check if an entity is registered.
    #[inline]
    pub fn contains_entity(&self, entity: E) -> bool {
        self.entities.contains_key(&entity)
    }

    #[inline]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Iterate all registered entities (unordered).
    pub fn entities(&self) -> impl Iterator<Item = E> + '_ {
        self.entities.keys().copied()
    }

    /// Tags held by `entity`, in insertion order. Empty for unregistered entities.
    pub fn entity_tags(&self, entity: E) -> &[Tag] {
        self.entities
            .get(&entity)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Registered entities holding no tags.
    #[inline]
    pub fn untagged(&self) -> &HashSet<E> {
        &self.untagged
    }

    #[inline]
    pub fn is_untagged(&self, entity: E) -> bool {
        self.untagged.contains(&entity)
    }

    /// Read view of one entity's tag-set.
    pub fn tagger(&self, entity: E) -> Option<Tagger<'_, E>> {
        self.entities
            .get_key_value(&entity)
            .map(|(&entity, tags)| Tagger::new(entity, tags))
    }

    /// Write view of one entity's tag-set.
    pub fn tagger_mut(&mut self, entity: E) -> Option<TaggerMut<'_, E>> {
        if !self.entities.contains_key(&entity) {
            return None;
        }
        Some(TaggerMut::new(self, entity))
    }

    /// Add `tag` to an already-registered entity's set and both inverse indexes.
    fn attach(&mut self, entity: E, tag: &Tag) -> bool {
        if !self.ensure_tag(tag) {
            return false;
        }
        let Some(set) = self.entities.get_mut(&entity) else {
            return false;
        };
        if set.contains(tag) {
            return false;
        }

        set.push(tag.clone());
        self.untagged.remove(&entity);
        if let Some(bucket) = self.tagged.get_mut(&tag.id()) {
            bucket.insert(entity);
        }

        trace!(?entity, tag = %tag.name(), "tag added to entity");
        true
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Start a single-entity filter.
    ///
    /// An unregistered entity yields a filter that never matches.
    pub fn filter_entity(&self, entity: E) -> TagFilter<'_> {
        match self.entities.get(&entity) {
            Some(tags) => TagFilter::new(tags),
            None => {
                warn!(?entity, "filtering an entity that is not registered");
                TagFilter::unmatched()
            }
        }
    }

    /// Start a collection filter over every registered entity.
    pub fn filter_all(&self) -> CollectionFilter<'_, E> {
        CollectionFilter::new(self, self.entities.keys().copied().collect())
    }

    /// Start a collection filter over `candidates`.
    ///
    /// Candidates that are not registered are dropped.
    pub fn filter_entities(&self, candidates: impl IntoIterator<Item = E>) -> CollectionFilter<'_, E> {
        let mut dropped = 0usize;
        let seed: HashSet<E> = candidates
            .into_iter()
            .filter(|e| {
                let known = self.entities.contains_key(e);
                if !known {
                    dropped += 1;
                }
                known
            })
            .collect();
        if dropped > 0 {
            debug!(dropped, "unregistered candidates dropped from collection filter");
        }
        CollectionFilter::new(self, seed)
    }

    /// Search registered tags by name. See [`search::search_tags`].
    pub fn search_tags(&self, term: &str, mode: SearchMode) -> Vec<&Tag> {
        search::search_tags(term, &self.tags, mode)
    }

    /// Registered tags ranked by `term`, or alphabetically when `term` is blank.
    pub fn ordered_tags(&self, term: &str) -> Vec<&Tag> {
        search::ordered_tags(term, &self.tags)
    }

    // =========================================================================
    // Lifecycle & diagnostics
    // =========================================================================

    /// Drop every tag and entity. Settings are kept.
    pub fn clear(&mut self) {
        self.tags.clear();
        self.tagged.clear();
        self.entities.clear();
        self.untagged.clear();
        self.retired.clear();
    }

    /// Verify that the three indexes agree with each other.
    ///
    /// Returns a description of the first violation found.
    pub fn check_consistency(&self) -> Result<(), String> {
        if self.tags.len() != self.tagged.len() {
            return Err(format!(
                "{} tags listed but {} buckets present",
                self.tags.len(),
                self.tagged.len()
            ));
        }
        for tag in &self.tags {
            if !self.tagged.contains_key(&tag.id()) {
                return Err(format!("tag '{}' ({}) has no bucket", tag.name(), tag.id()));
            }
            if self.retired.contains(&tag.id()) {
                return Err(format!("tag '{}' ({}) is both registered and retired", tag.name(), tag.id()));
            }
        }

        for (entity, set) in &self.entities {
            if set.is_empty() != self.untagged.contains(entity) {
                return Err(format!(
                    "{:?} holds {} tags but untagged membership is {}",
                    entity,
                    set.len(),
                    self.untagged.contains(entity)
                ));
            }
            for (i, tag) in set.iter().enumerate() {
                if set[..i].contains(tag) {
                    return Err(format!("{:?} holds '{}' twice", entity, tag.name()));
                }
                match self.tagged.get(&tag.id()) {
                    Some(bucket) if bucket.contains(entity) => {}
                    Some(_) => {
                        return Err(format!(
                            "{:?} holds '{}' but is missing from its bucket",
                            entity,
                            tag.name()
                        ));
                    }
                    None => {
                        return Err(format!(
                            "{:?} holds unregistered tag '{}'",
                            entity,
                            tag.name()
                        ));
                    }
                }
            }
        }

        for (id, bucket) in &self.tagged {
            for entity in bucket {
                let holds = self
                    .entities
                    .get(entity)
                    .is_some_and(|set| set.iter().any(|t| t.id() == *id));
                if !holds {
                    return Err(format!("bucket {} lists {:?} which does not hold it", id, entity));
                }
            }
        }

        if let Some(stray) = self.untagged.iter().find(|e| !self.entities.contains_key(*e)) {
            return Err(format!("untagged set lists unregistered {:?}", stray));
        }

        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
