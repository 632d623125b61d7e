//! Configuration errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A layer could not be read or does not fit the config shape.
    #[error("failed to load regsync configuration: {0}")]
    Load(#[from] figment::Error),

    /// A section the command needs has no usable values.
    #[error("[{section}] is not configured; set {hint}")]
    MissingSection {
        section: &'static str,
        /// Environment variables that fill the section.
        hint: &'static str,
    },

    /// Polling bounds under which a listing can never settle.
    #[error("invalid pacing.{field} = {value}: {reason}")]
    InvalidPacing {
        field: &'static str,
        value: u64,
        reason: String,
    },
}
