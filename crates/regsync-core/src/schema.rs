//! Register schema model.
//!
//! A [`RegisterSchema`] holds only the mandatory fields of a project's
//! document register, split into single-valued fields (free text, dates,
//! numbers) and multi-valued fields backed by an enumerated lookup table.
//! Narrowing to mandatory fields happens at the wire boundary in
//! `regsync-client`; nothing here mutates a schema after construction.

use serde::{Deserialize, Serialize};

use crate::ids::{EnumRef, ProjectId};

/// One entry of an enumerated field's lookup table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumValue {
    /// Internal id. Some registers omit it for free-form value lists.
    pub id: Option<String>,
    /// Display value shown to users and returned by search.
    pub value: String,
}

impl EnumValue {
    /// The token a document descriptor should carry for this entry: the id
    /// when present, otherwise the display value.
    #[must_use]
    pub fn token(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.value)
    }
}

/// A single mandatory field definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSchema {
    /// Stable key used as the element name in document descriptors.
    pub identifier: String,
    /// Human-readable field label.
    pub display_name: String,
    /// Register data type (e.g. `STRING`, `DATE`, `LONG`).
    pub data_type: String,
    /// Always `true` once filtered at the wire boundary.
    pub mandatory: bool,
    /// Ordered lookup table; empty for single-valued fields.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enumerated_values: Vec<EnumValue>,
}

impl FieldSchema {
    /// Whether the field has both an identifier and a display name.
    #[must_use]
    pub fn is_named(&self) -> bool {
        !self.identifier.is_empty() && !self.display_name.is_empty()
    }
}

/// Project-scoped mandatory-field schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterSchema {
    pub project_id: ProjectId,
    pub project_name: String,
    pub auto_numbering_enabled: bool,
    pub basic_auto_numbering_enabled: bool,
    pub project_wide_auto_numbering_enabled: bool,
    pub single_valued: Vec<FieldSchema>,
    pub multi_valued: Vec<FieldSchema>,
}

impl RegisterSchema {
    /// Look up an enumerated (multi-valued) field by identifier.
    #[must_use]
    pub fn enumerated_field(&self, identifier: &str) -> Option<&FieldSchema> {
        self.multi_valued
            .iter()
            .find(|field| field.identifier == identifier)
    }

    /// Resolve a display value of an enumerated field to its entry.
    ///
    /// Linear lookup over the field's table. A found entry resolves to its
    /// token: the id when present, otherwise the display value. Only a value
    /// with no entry yields [`EnumRef::Unresolved`].
    #[must_use]
    pub fn resolve_enum(&self, identifier: &str, display_value: &str) -> EnumRef {
        self.enumerated_field(identifier)
            .and_then(|field| {
                field
                    .enumerated_values
                    .iter()
                    .find(|entry| entry.value == display_value)
            })
            .map_or(EnumRef::Unresolved, |entry| EnumRef::from_token(entry.token()))
    }

    /// Reverse of [`resolve_enum`](Self::resolve_enum): the display
    /// value for an id token, if the table has it.
    #[must_use]
    pub fn display_value(&self, identifier: &str, token: &str) -> Option<&str> {
        self.enumerated_field(identifier)?
            .enumerated_values
            .iter()
            .find(|entry| entry.token() == token)
            .map(|entry| entry.value.as_str())
    }

    /// Total number of mandatory fields across both groups.
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.single_valued.len() + self.multi_valued.len()
    }
}
