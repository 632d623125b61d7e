//! Document records.

use serde::{Deserialize, Serialize};

use crate::ids::{DocumentId, EnumRef};

/// One row of a register search, exactly as returned by the remote system.
///
/// Enumerated fields carry display values here; [`DocumentRecord`] carries
/// the resolved ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub document_id: DocumentId,
    pub document_number: String,
    pub document_type: String,
    pub document_status: String,
    pub revision: String,
    pub title: String,
    pub discipline: Option<String>,
    pub filename: Option<String>,
}

/// A normalized register document.
///
/// Serialized with the register's own property names so records can be
/// compared against descriptor fields by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DocumentRecord {
    pub document_id: DocumentId,
    /// Business key, unique per project and stable across projects.
    pub document_number: String,
    /// [`EnumRef::Unresolved`] when the display value is unknown to the schema.
    pub document_type_id: EnumRef,
    pub revision: String,
    /// [`EnumRef::Unresolved`] when the display value is unknown to the schema.
    pub document_status_id: EnumRef,
    pub has_file: bool,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discipline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

impl DocumentRecord {
    /// The stored filename, or `""` when the document has no file.
    #[must_use]
    pub fn filename_or_empty(&self) -> &str {
        self.filename.as_deref().unwrap_or_default()
    }
}
