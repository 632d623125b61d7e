//! Register XML payloads.
//!
//! Wire structs mirror the register's element and attribute names and stay
//! private; the public functions validate them into `regsync-core` types and
//! fail on shapes the rest of the crate cannot use.

use regsync_core::{DocumentId, EnumValue, FieldSchema, ProjectId, RegisterSchema, SearchHit};
use serde::Deserialize;

use crate::error::RegisterError;

const MANDATORY: &str = "MANDATORY";

// ── Schema ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct SchemaPayload {
    #[serde(rename = "@projectId")]
    project_id: String,
    #[serde(rename = "@projectName", default)]
    project_name: String,
    #[serde(rename = "@autoNumberingEnabled", default)]
    auto_numbering_enabled: bool,
    #[serde(rename = "@basicAutoNumberingEnabled", default)]
    basic_auto_numbering_enabled: bool,
    #[serde(rename = "@projectWideAutoNumberingEnabled", default)]
    project_wide_auto_numbering_enabled: bool,
    #[serde(rename = "EntityCreationSchemaFields")]
    fields: EntityCreationSchemaFields,
}

#[derive(Deserialize)]
struct EntityCreationSchemaFields {
    #[serde(rename = "SingleValueSchemaField", default)]
    single: Vec<WireField>,
    #[serde(rename = "MultiValueSchemaField", default)]
    multi: Vec<WireField>,
}

#[derive(Deserialize)]
struct WireField {
    #[serde(rename = "Attributes")]
    attributes: Option<WireAttributes>,
    #[serde(rename = "DataType", default)]
    data_type: String,
    #[serde(rename = "FieldName", default)]
    field_name: String,
    #[serde(rename = "Identifier", default)]
    identifier: String,
    #[serde(rename = "SchemaValues")]
    schema_values: Option<WireSchemaValues>,
}

#[derive(Deserialize)]
struct WireAttributes {
    #[serde(rename = "EntityField")]
    entity_field: Option<WireEntityField>,
}

#[derive(Deserialize)]
struct WireEntityField {
    #[serde(rename = "@MandatoryStatus", default)]
    mandatory_status: String,
}

#[derive(Deserialize)]
struct WireSchemaValues {
    #[serde(rename = "SchemaValue", default)]
    values: Vec<WireSchemaValue>,
}

#[derive(Deserialize)]
struct WireSchemaValue {
    #[serde(rename = "Id")]
    id: Option<String>,
    #[serde(rename = "Value", default)]
    value: String,
}

impl WireField {
    fn is_mandatory(&self) -> bool {
        self.attributes
            .as_ref()
            .and_then(|a| a.entity_field.as_ref())
            .is_some_and(|f| f.mandatory_status == MANDATORY)
    }

    fn into_schema(self) -> FieldSchema {
        FieldSchema {
            identifier: self.identifier.trim().to_string(),
            display_name: self.field_name.trim().to_string(),
            data_type: self.data_type,
            mandatory: true,
            enumerated_values: self
                .schema_values
                .map(|sv| {
                    sv.values
                        .into_iter()
                        .map(|v| EnumValue {
                            id: v.id.map(|id| id.trim().to_string()).filter(|id| !id.is_empty()),
                            value: v.value,
                        })
                        .collect()
                })
                .unwrap_or_default(),
        }
    }
}

/// Parse a register schema payload, keeping only mandatory fields.
///
/// # Errors
///
/// Returns [`RegisterError::Parse`] if the payload is not a register schema
/// and [`RegisterError::Core`] if its project id is empty.
pub fn parse_register_schema(xml: &str) -> Result<RegisterSchema, RegisterError> {
    let payload: SchemaPayload = quick_xml::de::from_str(xml)?;
    let project_id: ProjectId = payload.project_id.parse()?;

    let keep_mandatory = |fields: Vec<WireField>| -> Vec<FieldSchema> {
        fields
            .into_iter()
            .filter(WireField::is_mandatory)
            .map(WireField::into_schema)
            .collect()
    };

    Ok(RegisterSchema {
        project_id,
        project_name: payload.project_name,
        auto_numbering_enabled: payload.auto_numbering_enabled,
        basic_auto_numbering_enabled: payload.basic_auto_numbering_enabled,
        project_wide_auto_numbering_enabled: payload.project_wide_auto_numbering_enabled,
        single_valued: keep_mandatory(payload.fields.single),
        multi_valued: keep_mandatory(payload.fields.multi),
    })
}

// ── Search ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct SearchPayload {
    #[serde(rename = "@TotalResults")]
    total_results: Option<u64>,
    #[serde(rename = "SearchResults")]
    results: Option<WireSearchResults>,
}

#[derive(Deserialize)]
struct WireSearchResults {
    #[serde(rename = "Document", default)]
    documents: Vec<WireDocument>,
}

#[derive(Deserialize)]
struct WireDocument {
    #[serde(rename = "@DocumentId")]
    document_id: Option<String>,
    #[serde(rename = "DocumentNumber")]
    document_number: Option<String>,
    #[serde(rename = "DocumentType")]
    document_type: Option<String>,
    #[serde(rename = "DocumentStatus")]
    document_status: Option<String>,
    #[serde(rename = "Revision")]
    revision: Option<String>,
    #[serde(rename = "Title")]
    title: Option<String>,
    #[serde(rename = "Discipline")]
    discipline: Option<String>,
    #[serde(rename = "Filename")]
    filename: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl TryFrom<WireDocument> for SearchHit {
    type Error = RegisterError;

    fn try_from(doc: WireDocument) -> Result<Self, Self::Error> {
        let document_id: DocumentId = non_empty(doc.document_id)
            .ok_or_else(|| RegisterError::Parse("search result without DocumentId".into()))?
            .parse()?;
        let document_number = non_empty(doc.document_number).ok_or_else(|| {
            RegisterError::Parse(format!("document {document_id} has no DocumentNumber"))
        })?;

        Ok(Self {
            document_id,
            document_number,
            document_type: non_empty(doc.document_type).unwrap_or_default(),
            document_status: non_empty(doc.document_status).unwrap_or_default(),
            revision: non_empty(doc.revision).unwrap_or_default(),
            title: non_empty(doc.title).unwrap_or_default(),
            discipline: non_empty(doc.discipline),
            filename: non_empty(doc.filename),
        })
    }
}

/// Parse a register search payload into raw hits.
///
/// # Errors
///
/// Returns [`RegisterError::Parse`] if the payload is malformed or any
/// result lacks its `DocumentId` or `DocumentNumber`.
pub fn parse_search(xml: &str) -> Result<Vec<SearchHit>, RegisterError> {
    let payload: SearchPayload = quick_xml::de::from_str(xml)?;
    let hits = payload
        .results
        .map(|r| r.documents)
        .unwrap_or_default()
        .into_iter()
        .map(SearchHit::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    if let Some(total) = payload.total_results
        && total > hits.len() as u64
    {
        tracing::warn!(total, returned = hits.len(), "search results are paginated; only the first page is used");
    }
    Ok(hits)
}

// ── Upload ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct UploadPayload {
    #[serde(rename = "@DocumentId")]
    document_id: Option<String>,
}

/// Best-effort extraction of the new document id from an upload response.
pub fn parse_upload_document_id(xml: &str) -> Option<DocumentId> {
    let payload: UploadPayload = quick_xml::de::from_str(xml).ok()?;
    payload.document_id?.parse().ok()
}
