//! Framework error type.
//!
//! Sub-crates define their own error enums and wrap `UniError` as one
//! variant via `#[from]`.

use thiserror::Error;

/// The top-level error type for `uni-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum UniError {
    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `uni-core`.
pub type UniResult<T> = Result<T, UniError>;
