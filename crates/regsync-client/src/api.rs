//! The transport seam between orchestration and the remote register.

use regsync_core::{DocumentId, ProjectId, RegisterSchema, SearchHit};
use regsync_template::DocumentTemplate;
use serde::Serialize;

use crate::error::RegisterError;

/// File content attached to an upload or returned by a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl DocumentFile {
    #[must_use]
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }
}

/// Where an upload lands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadTarget {
    /// A new document in the project register.
    New,
    /// A new version of an existing document. The business key is kept.
    Supersede(DocumentId),
}

/// Outcome of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadReceipt {
    /// Id of the created version, when the register reports it.
    pub document_id: Option<DocumentId>,
    pub filename: String,
}

/// Register operations used by [`Register`](crate::Register).
///
/// Implementations perform exactly one remote round trip per call and hold
/// no caches; caching and pacing live in `Register`.
#[allow(async_fn_in_trait)]
pub trait RegisterApi {
    /// Fetch the project's register schema, already narrowed to mandatory
    /// fields.
    async fn fetch_schema(&self, project: &ProjectId) -> Result<RegisterSchema, RegisterError>;

    /// Run a register search scoped to `query`.
    async fn search(&self, project: &ProjectId, query: &str)
    -> Result<Vec<SearchHit>, RegisterError>;

    /// Download the current file of a document.
    async fn download(
        &self,
        project: &ProjectId,
        document: &DocumentId,
    ) -> Result<DocumentFile, RegisterError>;

    /// Upload a descriptor and file.
    async fn upload(
        &self,
        project: &ProjectId,
        target: &UploadTarget,
        template: &DocumentTemplate,
        file: &DocumentFile,
    ) -> Result<UploadReceipt, RegisterError>;
}
