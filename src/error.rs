//! Error types.

use thiserror::Error;

/// Failures of tag creation.
///
/// Invalid arguments to registry mutators and queries are not errors: they are
/// logged and reported through `bool`/`Option` results.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagError {
    #[error("tag name must not be blank")]
    BlankName,

    #[error("no free name for tag '{base}' after {attempts} attempts")]
    NamesExhausted { base: String, attempts: usize },
}
