//! Response status mapping for register calls.
//!
//! Every register response passes through [`check_response`] together with
//! the [`Call`] that produced it, so status codes turn into errors that name
//! the project and document involved.

use regsync_core::{DocumentId, ProjectId};
use reqwest::StatusCode;

use crate::error::RegisterError;

/// Wait suggested when a 429 carries no usable `Retry-After`.
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Longest response body kept in [`RegisterError::Api`] messages.
const MAX_ERROR_BODY: usize = 512;

/// The register call a response answers.
#[derive(Debug, Clone, Copy)]
pub enum Call<'a> {
    Schema(&'a ProjectId),
    Search(&'a ProjectId),
    Download(&'a ProjectId, &'a DocumentId),
    Upload(&'a ProjectId),
    Supersede(&'a ProjectId, &'a DocumentId),
}

impl<'a> Call<'a> {
    const fn project(self) -> &'a ProjectId {
        match self {
            Self::Schema(project)
            | Self::Search(project)
            | Self::Upload(project)
            | Self::Download(project, _)
            | Self::Supersede(project, _) => project,
        }
    }

    /// The document a 404 refers to, for calls addressing one.
    const fn document(self) -> Option<&'a DocumentId> {
        match self {
            Self::Download(_, document) | Self::Supersede(_, document) => Some(document),
            Self::Schema(_) | Self::Search(_) | Self::Upload(_) => None,
        }
    }
}

/// Map a register response to an error unless it succeeded.
///
/// - **401/403** → [`RegisterError::Unauthorized`] for the project.
/// - **404** on a call addressing a document → [`RegisterError::NotFound`].
/// - **429** → [`RegisterError::RateLimited`], honouring `Retry-After`
///   seconds (60 s when absent or unparseable).
/// - Any other failure → [`RegisterError::Api`] with the (truncated) body.
pub async fn check_response(
    resp: reqwest::Response,
    call: Call<'_>,
) -> Result<reqwest::Response, RegisterError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let project = call.project();
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(RegisterError::Unauthorized {
            status: status.as_u16(),
            project: project.to_string(),
        }),
        StatusCode::NOT_FOUND if call.document().is_some() => Err(RegisterError::NotFound {
            project: project.to_string(),
            document: call.document().map(ToString::to_string).unwrap_or_default(),
        }),
        StatusCode::TOO_MANY_REQUESTS => {
            let retry_after_secs = retry_after_secs(&resp);
            tracing::warn!(%project, retry_after_secs, "register rate limit hit");
            Err(RegisterError::RateLimited { retry_after_secs })
        }
        _ => {
            let body = resp.text().await.unwrap_or_default();
            Err(RegisterError::Api {
                status: status.as_u16(),
                message: truncate_body(body.trim()),
            })
        }
    }
}

fn retry_after_secs(resp: &reqwest::Response) -> u64 {
    resp.headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_RETRY_AFTER_SECS)
}

/// Register error pages can be whole HTML documents; keep the head.
fn truncate_body(body: &str) -> String {
    match body.char_indices().nth(MAX_ERROR_BODY) {
        Some((cut, _)) => format!("{}…", &body[..cut]),
        None => body.to_string(),
    }
}

/// Extract the filename from a `Content-Disposition` header value.
///
/// Handles `attachment; filename="a.txt"`, unquoted names, and trailing
/// parameters. Returns `None` when no non-empty filename is present.
pub fn content_disposition_filename(value: &str) -> Option<String> {
    value
        .split(';')
        .map(str::trim)
        .find_map(|param| {
            let (key, raw) = param.split_once('=')?;
            key.trim()
                .eq_ignore_ascii_case("filename")
                .then(|| raw.trim().trim_matches('"').to_string())
        })
        .filter(|name| !name.is_empty())
}
