//! Error handling for svd-types.

/// The error that can occur when constructing or validating svd-types values.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// A name did not satisfy the naming restrictions: non-empty, ASCII
    /// alphanumerics, `-`, `_` or `.`, and must not start or end with a
    /// separator.
    #[error("invalid name: {0}")]
    InvalidName(String),
}
