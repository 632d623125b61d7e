//! Random descriptor generation.
//!
//! Values are chosen by identifier convention, not by data type: the
//! register's data types are too coarse (`DocumentNumber` and `Title` are
//! both `STRING`) to produce values it will accept.

use chrono::{Duration, SecondsFormat, Utc};
use rand::Rng;
use rand::seq::IndexedRandom;
use regsync_core::{FieldSchema, RegisterSchema, RunId};

use crate::template::DocumentTemplate;

const BUSINESS_KEY: &str = "DocumentNumber";
const HAS_FILE: &str = "HasFile";
const REVISION: &str = "Revision";

/// Dates are drawn from this many seconds before now.
const PAST_WINDOW_SECS: i64 = 365 * 24 * 60 * 60;

const ADJECTIVES: &[&str] = &[
    "Ergonomic",
    "Rustic",
    "Sleek",
    "Handcrafted",
    "Refined",
    "Practical",
    "Intelligent",
    "Gorgeous",
    "Licensed",
    "Recycled",
];

const MATERIALS: &[&str] = &[
    "Steel", "Wooden", "Concrete", "Granite", "Cotton", "Bronze", "Plastic", "Marble",
];

const PRODUCTS: &[&str] = &[
    "Chair", "Table", "Lamp", "Bench", "Door", "Window", "Railing", "Beam", "Panel", "Column",
];

/// Generate a descriptor for `schema` using the thread-local RNG.
#[must_use]
pub fn generate(schema: &RegisterSchema, run: &RunId) -> DocumentTemplate {
    generate_with_rng(schema, run, &mut rand::rng())
}

/// Generate a descriptor for `schema`, drawing all randomness from `rng`.
///
/// Single-valued fields come first, in schema order, then enumerated fields.
/// Fields without an identifier or display name, enumerated fields with an
/// empty lookup table, and identifiers that are not valid element names are
/// skipped.
pub fn generate_with_rng<R: Rng + ?Sized>(
    schema: &RegisterSchema,
    run: &RunId,
    rng: &mut R,
) -> DocumentTemplate {
    let mut template = DocumentTemplate::new();

    for field in schema.single_valued.iter().filter(|f| f.is_named()) {
        let value = single_value(&field.identifier, run, rng);
        insert(&mut template, field, value);
    }

    for field in schema.multi_valued.iter().filter(|f| f.is_named()) {
        let Some(entry) = field.enumerated_values.choose(rng) else {
            tracing::debug!(field = %field.identifier, "enumerated field has no values, skipping");
            continue;
        };
        insert(&mut template, field, entry.token().to_string());
    }

    template
}

fn insert(template: &mut DocumentTemplate, field: &FieldSchema, value: String) {
    if let Err(error) = template.set(field.identifier.as_str(), value) {
        tracing::warn!(%error, "skipping schema field");
    }
}

fn single_value<R: Rng + ?Sized>(identifier: &str, run: &RunId, rng: &mut R) -> String {
    match identifier {
        BUSINESS_KEY => {
            let uuid = uuid::Builder::from_random_bytes(rng.random()).into_uuid();
            format!("{run}-{uuid}")
        }
        HAS_FILE => "true".to_string(),
        REVISION => rng.random_range(1..=10).to_string(),
        _ if identifier.to_ascii_lowercase().contains("date") => past_timestamp(rng),
        _ => product_name(rng),
    }
}

fn past_timestamp<R: Rng + ?Sized>(rng: &mut R) -> String {
    let offset = Duration::seconds(rng.random_range(1..=PAST_WINDOW_SECS));
    (Utc::now() - offset).to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn product_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    let adjective = pick(ADJECTIVES, rng);
    let material = pick(MATERIALS, rng);
    let product = pick(PRODUCTS, rng);
    format!("{adjective} {material} {product}")
}

fn pick<R: Rng + ?Sized>(words: &[&'static str], rng: &mut R) -> &'static str {
    words.choose(rng).copied().unwrap_or("Generic")
}
