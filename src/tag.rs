//! Tag identity and display attributes.
//!
//! A [`Tag`] is a shared handle: cloning it does not create a new tag, it
//! creates another reference to the same one. Identity comes from the
//! [`TagId`] handed out at construction, never from the name, so two tags
//! called `"Enemy"` are distinct unless a creation path deduplicates them
//! (see `TagRegistry::create_unique_tag`).

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use bevy_tagger_config::{Rgb, TagEntry, DEFAULT_COLOR};

static NEXT_TAG_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique tag identity. This is the key of every registry index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TagId(u64);

impl TagId {
    fn next() -> Self {
        Self(NEXT_TAG_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value (stable for the lifetime of the process only).
    #[inline]
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Display color of a tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TagColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl TagColor {
    pub const MID_GRAY: Self = Self::from_rgb(DEFAULT_COLOR);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn from_rgb(rgb: Rgb) -> Self {
        Self::new(rgb[0], rgb[1], rgb[2])
    }

    pub const fn to_rgb(self) -> Rgb {
        [self.r, self.g, self.b]
    }
}

impl Default for TagColor {
    fn default() -> Self {
        Self::MID_GRAY
    }
}

impl From<Rgb> for TagColor {
    fn from(rgb: Rgb) -> Self {
        Self::from_rgb(rgb)
    }
}

/// Mutable display attributes. Not part of identity, never indexed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TagAttributes {
    pub color: TagColor,
    pub comment: String,
}

struct TagInner {
    id: TagId,
    name: String,
    attributes: RwLock<TagAttributes>,
}

/// A named, colored, commentable label.
///
/// Equality, ordering and hashing use [`TagId`] only.
///
/// ```ignore
/// let cube = Tag::new("Cube");
/// let same = cube.clone();
/// same.set_comment("unit cube");
/// assert_eq!(cube.comment(), "unit cube");
/// assert_ne!(cube, Tag::new("Cube"));
/// ```
#[derive(Clone)]
pub struct Tag {
    inner: Arc<TagInner>,
}

impl Tag {
    /// Create a new tag with default attributes (mid-gray, no comment).
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_attributes(name, TagAttributes::default())
    }

    pub fn with_attributes(name: impl Into<String>, attributes: TagAttributes) -> Self {
        Self {
            inner: Arc::new(TagInner {
                id: TagId::next(),
                name: name.into(),
                attributes: RwLock::new(attributes),
            }),
        }
    }

    /// Create a tag from a validated config entry.
    pub fn from_entry(entry: &TagEntry) -> Self {
        Self::with_attributes(
            entry.name.clone(),
            TagAttributes {
                color: entry.color.into(),
                comment: entry.comment.clone(),
            },
        )
    }

    #[inline]
    pub fn id(&self) -> TagId {
        self.inner.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// True if the name is empty or whitespace. Such tags are rejected by the registry.
    #[inline]
    pub fn is_blank(&self) -> bool {
        self.inner.name.trim().is_empty()
    }

    /// Snapshot of the current display attributes.
    pub fn attributes(&self) -> TagAttributes {
        self.read_attributes().clone()
    }

    pub fn color(&self) -> TagColor {
        self.read_attributes().color
    }

    pub fn set_color(&self, color: TagColor) {
        self.write_attributes(|attrs| attrs.color = color);
    }

    pub fn comment(&self) -> String {
        self.read_attributes().comment.clone()
    }

    pub fn set_comment(&self, comment: impl Into<String>) {
        let comment = comment.into();
        self.write_attributes(|attrs| attrs.comment = comment);
    }

    // Attribute writes cannot leave the struct half-updated, so a poisoned
    // lock still holds usable data.
    fn read_attributes(&self) -> std::sync::RwLockReadGuard<'_, TagAttributes> {
        self.inner
            .attributes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write_attributes(&self, f: impl FnOnce(&mut TagAttributes)) {
        let mut attrs = self
            .inner
            .attributes
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        f(&mut attrs);
    }
}

impl PartialEq for Tag {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Eq for Tag {}

impl Hash for Tag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.id.hash(state);
    }
}

impl PartialOrd for Tag {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Tag {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.inner.id.cmp(&other.inner.id)
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tag")
            .field("id", &self.inner.id)
            .field("name", &self.inner.name)
            .finish()
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inner.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_name_different_identity() {
        let a = Tag::new("Enemy");
        let b = Tag::new("Enemy");

        assert_ne!(a, b);
        assert_ne!(a.id(), b.id());
        assert_eq!(a.name(), b.name());
    }

    #[test]
    fn clones_share_identity_and_attributes() {
        let tag = Tag::new("Cube");
        let alias = tag.clone();

        assert_eq!(tag, alias);

        alias.set_color(TagColor::new(255, 0, 0));
        alias.set_comment("unit cube");

        assert_eq!(tag.color(), TagColor::new(255, 0, 0));
        assert_eq!(tag.comment(), "unit cube");
    }

    #[test]
    fn default_attributes() {
        let tag = Tag::new("Plain");
        assert_eq!(tag.color(), TagColor::new(128, 128, 128));
        assert!(tag.comment().is_empty());
    }

    #[test]
    fn ids_are_monotonic() {
        let first = Tag::new("First");
        let second = Tag::new("Second");
        assert!(first.id() < second.id());
        assert!(first < second);
    }

    #[test]
    fn blank_detection() {
        assert!(Tag::new("").is_blank());
        assert!(Tag::new("  \t").is_blank());
        assert!(!Tag::new(" x ").is_blank());
    }

    #[test]
    fn from_config_entry() {
        let entry = TagEntry {
            name: "Lava".into(),
            color: [200, 40, 0],
            comment: "hot".into(),
        };
        let tag = Tag::from_entry(&entry);

        assert_eq!(tag.name(), "Lava");
        assert_eq!(tag.color().to_rgb(), [200, 40, 0]);
        assert_eq!(tag.comment(), "hot");
    }
}
