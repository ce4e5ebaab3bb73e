//! Base error type.
//!
//! Sub-crates define their own error enums; `CoreError` covers what `cb-core`
//! itself can reject (invalid run configuration).

use thiserror::Error;

/// Errors raised by `cb-core` validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `cb-core`.
pub type CoreResult<T> = Result<T, CoreError>;
