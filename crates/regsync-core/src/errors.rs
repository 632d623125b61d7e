//! Cross-cutting error types for regsync.
//!
//! Transport and wire errors live in `regsync-client`; the binary converges
//! everything through `anyhow`.

use thiserror::Error;

/// Errors that can be raised by any regsync crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Data failed validation (empty identifier, malformed value).
    #[error("Validation error: {0}")]
    Validation(String),
}
