//! # Entity Tag Registry (bevy-tagger)
//!
//! Associates entities with any number of flat, named [`Tag`]s and answers
//! membership queries over them.
//!
//! ## Design
//!
//! A [`TagRegistry`] keeps three indexes in lockstep:
//!
//! ```text
//! entities : Entity → [Tag, Tag, ...]     (ordered, no duplicates)
//! tagged   : TagId  → {Entity, ...}       (one bucket per registered tag)
//! untagged : {Entity, ...}                (registered, holding nothing)
//! ```
//!
//! Every mutation updates all three before returning, so a query issued at any
//! point sees a consistent picture.
//!
//! ## Queries
//!
//! ```ignore
//! use bevy_tagger::{Tag, TagRegistry, SearchMode};
//!
//! let mut registry = TagRegistry::<u32>::new();
//! let cube = Tag::new("Cube");
//! let platonic = Tag::new("Platonic");
//! registry.initialize_entity(1, [&cube, &platonic]);
//!
//! // One entity
//! assert!(registry.filter_entity(1).with_tag(&cube).is_match());
//!
//! // Many entities
//! let solids = registry.filter_all().with_any_tags([&cube, &platonic]).into_matches();
//!
//! // Tag names
//! let hits = registry.search_tags("cub", SearchMode::Relevance);
//! ```

pub mod bevy;
pub mod collection;
pub mod error;
pub mod filter;
pub mod registry;
pub mod search;
pub mod tag;
pub mod tagger;
pub mod traits;

pub use collection::CollectionFilter;
pub use error::TagError;
pub use filter::TagFilter;
pub use registry::TagRegistry;
pub use search::{ordered_tags, relevance, search_tags, SearchMode, PREFIX_MARKER};
pub use tag::{Tag, TagAttributes, TagColor, TagId};
pub use tagger::{Tagger, TaggerMut};
pub use traits::{EntityKey, IntoTagId};

pub use bevy_tagger_config::{TagsConfig, TagsConfigError};
