//! `multipart/mixed` upload bodies.
//!
//! The register expects exactly two parts: the XML document descriptor,
//! then the file content as base64 with its name in an `X-Filename` header.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use regsync_template::DocumentTemplate;

use crate::api::DocumentFile;
use crate::error::RegisterError;

const BOUNDARY_PREFIX: &str = "regsync-boundary";

/// An encoded upload body and its `Content-Type` header value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartBody {
    pub content_type: String,
    pub body: String,
}

/// Build the two-part upload body for `template` and `file`.
///
/// # Errors
///
/// Returns [`RegisterError::Template`] if the descriptor cannot be rendered.
pub fn encode(
    template: &DocumentTemplate,
    file: &DocumentFile,
) -> Result<MultipartBody, RegisterError> {
    let descriptor = template.to_xml()?;
    let content = STANDARD.encode(&file.bytes);
    let boundary = boundary_for(&descriptor, &content);

    let body = format!(
        "--{boundary}\r\n\
         Content-Type: application/xml\r\n\
         \r\n\
         {descriptor}\r\n\
         --{boundary}\r\n\
         Content-Type: application/octet-stream\r\n\
         Content-Transfer-Encoding: base64\r\n\
         X-Filename: {filename}\r\n\
         \r\n\
         {content}\r\n\
         --{boundary}--\r\n",
        filename = sanitize_header(&file.filename),
    );

    Ok(MultipartBody {
        content_type: format!("multipart/mixed; boundary={boundary}"),
        body,
    })
}

/// A boundary that occurs in neither part.
fn boundary_for(descriptor: &str, content: &str) -> String {
    let mut boundary = BOUNDARY_PREFIX.to_string();
    while descriptor.contains(&boundary) || content.contains(&boundary) {
        boundary.push('x');
    }
    boundary
}

fn sanitize_header(value: &str) -> String {
    value.chars().filter(|c| !c.is_control()).collect()
}
