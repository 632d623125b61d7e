use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::error::TemplateError;

const ROOT: &str = "Document";

/// One `<Identifier>value</Identifier>` element of a descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateField {
    pub identifier: String,
    pub value: String,
}

/// Ordered document descriptor.
///
/// Field order is insertion order and is preserved when values are
/// replaced, so rendered descriptors follow the schema's field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentTemplate {
    fields: Vec<TemplateField>,
}

impl DocumentTemplate {
    #[must_use]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Insert a field, or replace its value in place if already present.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::InvalidFieldName`] if `identifier` is not a
    /// valid XML element name.
    pub fn set(
        &mut self,
        identifier: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), TemplateError> {
        let identifier = identifier.into();
        let value = value.into();
        if let Some(field) = self.fields.iter_mut().find(|f| f.identifier == identifier) {
            field.value = value;
            return Ok(());
        }
        if !is_element_name(&identifier) {
            return Err(TemplateError::InvalidFieldName(identifier));
        }
        self.fields.push(TemplateField { identifier, value });
        Ok(())
    }

    #[must_use]
    pub fn get(&self, identifier: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.identifier == identifier)
            .map(|f| f.value.as_str())
    }

    #[must_use]
    pub fn contains(&self, identifier: &str) -> bool {
        self.get(identifier).is_some()
    }

    /// Remove a field, returning its value if it was present.
    pub fn remove(&mut self, identifier: &str) -> Option<String> {
        let idx = self.fields.iter().position(|f| f.identifier == identifier)?;
        Some(self.fields.remove(idx).value)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TemplateField> {
        self.fields.iter()
    }

    /// Field identifiers in order.
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.identifier.as_str())
    }

    /// Render the descriptor as pretty-printed XML.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::Render`] if the XML writer fails.
    pub fn to_xml(&self) -> Result<String, TemplateError> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        if self.fields.is_empty() {
            writer.write_event(Event::Empty(BytesStart::new(ROOT)))?;
        } else {
            writer.write_event(Event::Start(BytesStart::new(ROOT)))?;
            for field in &self.fields {
                let name = field.identifier.as_str();
                writer.write_event(Event::Start(BytesStart::new(name)))?;
                writer.write_event(Event::Text(BytesText::new(&field.value)))?;
                writer.write_event(Event::End(BytesEnd::new(name)))?;
            }
            writer.write_event(Event::End(BytesEnd::new(ROOT)))?;
        }

        let mut xml = String::from_utf8(writer.into_inner())
            .map_err(|err| TemplateError::Render(err.to_string()))?;
        xml.push('\n');
        Ok(xml)
    }
}

impl<'a> IntoIterator for &'a DocumentTemplate {
    type Item = &'a TemplateField;
    type IntoIter = std::slice::Iter<'a, TemplateField>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

fn is_element_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_ascii_alphabetic() || first == '_') {
        return false;
    }
    if name.get(..3).is_some_and(|head| head.eq_ignore_ascii_case("xml")) {
        return false;
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}
