//! Configuration loading for bevy-tagger.
//!
//! Tag definitions live in a `tags.toml` file next to the game assets:
//!
//! ```toml
//! # Upper bound on "Name", "Name 1", "Name 2", ... when generating a free name
//! max_name_attempts = 100
//!
//! # Fallback color for tags that do not specify one
//! default_color = "#808080"
//!
//! [[tags]]
//! name = "Cube"
//! color = "#FF0000"
//! comment = "Unit cube primitives"
//!
//! [[tags]]
//! name = "Sphere"
//! ```
//!
//! The parsed [`TagsConfig`] only describes tags. Turning it into live tags is
//! up to the registry (`TagRegistry::from_config` in `bevy-tagger`).

mod toml_parser;

pub use toml_parser::{
    parse_hex_color, Rgb, TagEntry, TagsConfig, TagsConfigError, DEFAULT_COLOR,
    DEFAULT_MAX_NAME_ATTEMPTS,
};
