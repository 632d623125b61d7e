//! Reconciling generated descriptors with real documents.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use regsync_core::DocumentRecord;

use crate::template::DocumentTemplate;

/// Named-property lookup used by [`merge`].
///
/// `None` means "not defined"; the template keeps its own value.
pub trait FieldSource {
    fn field(&self, name: &str) -> Option<Cow<'_, str>>;
}

impl FieldSource for DocumentRecord {
    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        match name {
            "DocumentId" => Some(Cow::Borrowed(self.document_id.as_str())),
            "DocumentNumber" => Some(Cow::Borrowed(&self.document_number)),
            "DocumentTypeId" => self.document_type_id.token().map(Cow::Owned),
            "DocumentStatusId" => self.document_status_id.token().map(Cow::Owned),
            "Revision" => Some(Cow::Borrowed(&self.revision)),
            "HasFile" => Some(Cow::Owned(self.has_file.to_string())),
            "Title" => Some(Cow::Borrowed(&self.title)),
            "Discipline" => self.discipline.as_deref().map(Cow::Borrowed),
            "Filename" => self.filename.as_deref().map(Cow::Borrowed),
            _ => None,
        }
    }
}

impl<S: BuildHasher> FieldSource for HashMap<String, String, S> {
    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        self.get(name).map(|v| Cow::Borrowed(v.as_str()))
    }
}

impl FieldSource for BTreeMap<String, String> {
    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        self.get(name).map(|v| Cow::Borrowed(v.as_str()))
    }
}

/// Overwrite every template field that `source` defines.
///
/// Fields `source` does not define keep their generated value; fields only
/// `source` knows about are not added.
#[must_use]
pub fn merge<S: FieldSource + ?Sized>(mut template: DocumentTemplate, source: &S) -> DocumentTemplate {
    let updates: Vec<(String, String)> = template
        .identifiers()
        .filter_map(|name| source.field(name).map(|v| (name.to_string(), v.into_owned())))
        .collect();
    for (name, value) in updates {
        // Names come from the template itself, so replacement cannot fail.
        let _ = template.set(name, value);
    }
    template
}

/// Remove each named field. Absent names are ignored.
#[must_use]
pub fn strip<I>(mut template: DocumentTemplate, names: I) -> DocumentTemplate
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    for name in names {
        template.remove(name.as_ref());
    }
    template
}
