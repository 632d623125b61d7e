use thiserror::Error;

/// Errors raised while building or rendering a document template.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// The identifier cannot be used as an XML element name.
    #[error("invalid field name '{0}'")]
    InvalidFieldName(String),

    /// The descriptor could not be written as XML.
    #[error("failed to render descriptor: {0}")]
    Render(String),
}

impl From<std::io::Error> for TemplateError {
    fn from(error: std::io::Error) -> Self {
        Self::Render(error.to_string())
    }
}
