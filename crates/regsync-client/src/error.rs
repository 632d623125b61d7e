//! Register client error types.

use regsync_core::CoreError;
use thiserror::Error;

/// Errors that can occur when talking to the document register.
#[derive(Debug, Error)]
pub enum RegisterError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Register API returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the register.
        status: u16,
        /// Error message or response body.
        message: String,
    },

    /// The register rejected the configured credentials for a project.
    #[error("register refused access to project {project} ({status}); check the API credentials")]
    Unauthorized { status: u16, project: String },

    /// The register returned a 429 Too Many Requests response.
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after_secs: u64,
    },

    /// A register payload did not have the expected shape.
    #[error("parse error: {0}")]
    Parse(String),

    /// A descriptor could not be rendered.
    #[error(transparent)]
    Template(#[from] regsync_template::TemplateError),

    /// A payload carried an invalid identifier.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The requested document does not exist in the project.
    #[error("document {document} not found in project {project}")]
    NotFound { project: String, document: String },

    /// A listing never satisfied its completion condition.
    #[error("register did not settle after {attempts} listings ({waited_ms} ms)")]
    PollTimeout { attempts: u32, waited_ms: u128 },

    /// A transfer stopped part-way; earlier uploads stay committed.
    #[error("transfer interrupted at {document_number} after {completed} document(s)")]
    TransferInterrupted {
        completed: usize,
        document_number: String,
        #[source]
        source: Box<RegisterError>,
    },
}

impl From<quick_xml::DeError> for RegisterError {
    fn from(error: quick_xml::DeError) -> Self {
        Self::Parse(error.to_string())
    }
}
