//! TOML configuration parser for tags.toml.

use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// RGB triple, one byte per channel.
pub type Rgb = [u8; 3];

/// Mid-gray, used when neither the tag nor the file picks a color.
pub const DEFAULT_COLOR: Rgb = [128, 128, 128];

/// Default cap on candidate names tried by unique-name generation.
pub const DEFAULT_MAX_NAME_ATTEMPTS: usize = 1000;

/// Parsed tags configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagsConfig {
    /// Maximum number of candidate names tried when generating a free tag name
    pub max_name_attempts: usize,
    /// Color applied to tags without an explicit `color`
    pub default_color: Rgb,
    /// Tag definitions in file order
    entries: Vec<TagEntry>,
}

/// A single validated tag definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagEntry {
    pub name: String,
    /// Resolved color (explicit or the file default)
    pub color: Rgb,
    pub comment: String,
}

/// Raw TOML structure.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTagsConfig {
    max_name_attempts: Option<usize>,
    default_color: Option<String>,
    #[serde(default)]
    tags: Vec<RawTag>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTag {
    name: String,
    color: Option<String>,
    #[serde(default)]
    comment: String,
}

impl Default for TagsConfig {
    fn default() -> Self {
        Self {
            max_name_attempts: DEFAULT_MAX_NAME_ATTEMPTS,
            default_color: DEFAULT_COLOR,
            entries: Vec::new(),
        }
    }
}

impl TagsConfig {
    /// Parse from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, TagsConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| TagsConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_str(&content)
    }

    /// Parse from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, TagsConfigError> {
        let raw: RawTagsConfig = toml::from_str(content)?;

        let max_name_attempts = raw.max_name_attempts.unwrap_or(DEFAULT_MAX_NAME_ATTEMPTS);
        if max_name_attempts == 0 {
            return Err(TagsConfigError::Validation(
                "max_name_attempts must be at least 1".into(),
            ));
        }

        let default_color = match raw.default_color.as_deref() {
            None => DEFAULT_COLOR,
            Some(hex) => parse_hex_color(hex).ok_or_else(|| {
                TagsConfigError::Validation(format!("Invalid default_color '{}'", hex))
            })?,
        };

        let entries = Self::validate_tags(raw.tags, default_color)?;

        Ok(Self {
            max_name_attempts,
            default_color,
            entries,
        })
    }

    /// Get all entries in file order.
    pub fn entries(&self) -> impl Iterator<Item = &TagEntry> {
        self.entries.iter()
    }

    /// Look up an entry by exact name.
    pub fn get(&self, name: &str) -> Option<&TagEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Get entry count.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn validate_tags(raw: Vec<RawTag>, default_color: Rgb) -> Result<Vec<TagEntry>, TagsConfigError> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut entries = Vec::with_capacity(raw.len());

        for tag in raw {
            if tag.name.trim().is_empty() {
                return Err(TagsConfigError::Validation("Blank tag name not allowed".into()));
            }
            if tag.name.trim() != tag.name {
                return Err(TagsConfigError::Validation(format!(
                    "Invalid tag name '{}': leading or trailing whitespace",
                    tag.name
                )));
            }
            if !seen.insert(tag.name.clone()) {
                return Err(TagsConfigError::Validation(format!(
                    "Duplicate tag name '{}'",
                    tag.name
                )));
            }

            let color = match tag.color.as_deref() {
                None => default_color,
                Some(hex) => parse_hex_color(hex).ok_or_else(|| {
                    TagsConfigError::Validation(format!(
                        "Invalid color '{}' for tag '{}': expected #RRGGBB",
                        hex, tag.name
                    ))
                })?,
            };

            entries.push(TagEntry {
                name: tag.name,
                color,
                comment: tag.comment,
            });
        }

        Ok(entries)
    }
}

/// Parse `#RRGGBB` (the `#` is optional) into an RGB triple.
pub fn parse_hex_color(hex: &str) -> Option<Rgb> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    // from_str_radix alone would accept a sign
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}

/// Errors during config parsing.
#[derive(Debug, Error)]
pub enum TagsConfigError {
    #[error("IO error: failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}
