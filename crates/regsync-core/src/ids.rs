//! Identifier newtypes.
//!
//! Project and document identifiers are opaque strings assigned by the
//! remote register (they routinely exceed `u32` and are never used for
//! arithmetic). Enumerated-value references are numeric ids or, for
//! tables without ids, display values.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Borrow the raw identifier.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err(CoreError::Validation(format!("{} must not be empty", $label)));
                }
                if trimmed.contains(char::is_whitespace) || trimmed.contains('/') {
                    return Err(CoreError::Validation(format!(
                        "{} '{trimmed}' contains whitespace or '/'",
                        $label
                    )));
                }
                Ok(Self(trimmed.to_string()))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(
    /// Register project identifier (e.g. `1879048422`).
    ProjectId,
    "project id"
);

string_id!(
    /// Register document identifier, assigned on upload.
    DocumentId,
    "document id"
);

impl From<u64> for DocumentId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

/// Reference to an entry of an enumerated-field lookup table.
///
/// Entries are normally addressed by numeric id. Tables whose entries carry
/// no id are addressed by display value instead. `0` on the wire is reserved
/// for "display value not found in schema"; see [`EnumRef::Unresolved`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "WireEnumRef", into = "WireEnumRef")]
pub enum EnumRef {
    Id(u64),
    /// Display value of an entry that has no id.
    Value(String),
    /// The display value has no entry in the schema.
    #[default]
    Unresolved,
}

impl EnumRef {
    /// Reference for a schema token: numeric tokens become ids.
    #[must_use]
    pub fn from_token(token: &str) -> Self {
        match token.trim().parse::<u64>() {
            Ok(id) if id != 0 => Self::Id(id),
            _ => Self::Value(token.to_string()),
        }
    }

    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        !matches!(self, Self::Unresolved)
    }

    /// The descriptor token for this entry, `None` when unresolved.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        match self {
            Self::Id(id) => Some(id.to_string()),
            Self::Value(value) => Some(value.clone()),
            Self::Unresolved => None,
        }
    }
}

impl fmt::Display for EnumRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Value(value) => f.write_str(value),
            Self::Unresolved => f.write_str("0"),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum WireEnumRef {
    Id(u64),
    Value(String),
}

impl From<WireEnumRef> for EnumRef {
    fn from(wire: WireEnumRef) -> Self {
        match wire {
            WireEnumRef::Id(0) => Self::Unresolved,
            WireEnumRef::Id(id) => Self::Id(id),
            WireEnumRef::Value(value) => Self::Value(value),
        }
    }
}

impl From<EnumRef> for WireEnumRef {
    fn from(value: EnumRef) -> Self {
        match value {
            EnumRef::Id(id) => Self::Id(id),
            EnumRef::Value(value) => Self::Value(value),
            EnumRef::Unresolved => Self::Id(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn project_id_parses_and_trims() {
        let id: ProjectId = " 1879048422 ".parse().unwrap();
        assert_eq!(id.as_str(), "1879048422");
        assert_eq!(id.to_string(), "1879048422");
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("18790 48422")]
    #[case("projects/1")]
    fn project_id_rejects_invalid(#[case] raw: &str) {
        let err = raw.parse::<ProjectId>().unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn document_id_serializes_transparently() {
        let id: DocumentId = "271341877549097225".parse().unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"271341877549097225\"");
    }

    #[test]
    fn unresolved_enum_ref() {
        assert!(!EnumRef::Unresolved.is_resolved());
        assert!(!EnumRef::default().is_resolved());
        assert!(EnumRef::Id(3).is_resolved());
        assert_eq!(EnumRef::Id(42).to_string(), "42");
        assert_eq!(EnumRef::Unresolved.token(), None);
    }

    #[rstest]
    #[case("101", EnumRef::Id(101))]
    #[case("Approved", EnumRef::Value("Approved".into()))]
    #[case("0", EnumRef::Value("0".into()))]
    fn enum_ref_from_token(#[case] token: &str, #[case] expected: EnumRef) {
        assert_eq!(EnumRef::from_token(token), expected);
    }

    #[test]
    fn enum_ref_wire_form() {
        assert_eq!(serde_json::to_string(&EnumRef::Id(7)).unwrap(), "7");
        assert_eq!(serde_json::to_string(&EnumRef::Unresolved).unwrap(), "0");
        assert_eq!(
            serde_json::to_string(&EnumRef::Value("Draft".into())).unwrap(),
            "\"Draft\""
        );
        let back: EnumRef = serde_json::from_str("0").unwrap();
        assert_eq!(back, EnumRef::Unresolved);
        let back: EnumRef = serde_json::from_str("\"Draft\"").unwrap();
        assert_eq!(back, EnumRef::Value("Draft".into()));
    }
}
