//! # regsync-template
//!
//! Document descriptors ("templates") for register uploads.
//!
//! A [`DocumentTemplate`] is an ordered list of `field -> value` pairs under a
//! `Document` root. Templates are produced by [`generate`] from a project's
//! mandatory-field schema, then adjusted with [`merge`] (adopt the values of
//! an existing document) and [`strip`] (drop fields the target endpoint must
//! not receive) before being rendered with [`DocumentTemplate::to_xml`].

mod error;
mod generate;
mod reconcile;
mod template;

pub use error::TemplateError;
pub use generate::{generate, generate_with_rng};
pub use reconcile::{FieldSource, merge, strip};
pub use template::{DocumentTemplate, TemplateField};
