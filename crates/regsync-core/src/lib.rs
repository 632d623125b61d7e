//! # regsync-core
//!
//! Core types shared across the regsync crates:
//! - Project, document and enumerated-value identifiers
//! - The per-project register schema (mandatory fields only)
//! - Raw search hits and normalized document records
//! - The process-wide run identifier
//! - Cross-cutting error types

pub mod document;
pub mod errors;
pub mod ids;
pub mod run;
pub mod schema;

pub use document::{DocumentRecord, SearchHit};
pub use errors::CoreError;
pub use ids::{DocumentId, EnumRef, ProjectId};
pub use run::RunId;
pub use schema::{EnumValue, FieldSchema, RegisterSchema};
