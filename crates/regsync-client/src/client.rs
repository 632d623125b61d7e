//! HTTP implementation of [`RegisterApi`].

use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use regsync_core::{CoreError, DocumentId, ProjectId, RegisterSchema, SearchHit};
use regsync_template::DocumentTemplate;
use reqwest::header::{self, HeaderMap, HeaderValue};

use crate::api::{DocumentFile, RegisterApi, UploadReceipt, UploadTarget};
use crate::error::RegisterError;
use crate::http::{Call, check_response, content_disposition_filename};
use crate::{multipart, wire};

/// Fields requested from every register search.
const RETURN_FIELDS: &str = "title,docno,statusid,doctype,filename,revision,discipline";

/// Connection settings for [`RegisterClient`].
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub username: String,
    pub password: String,
    pub timeout: Duration,
    pub user_agent: String,
}

/// HTTP client for one register API root.
///
/// Credentials are encoded once into a default `Authorization` header.
#[derive(Debug, Clone)]
pub struct RegisterClient {
    http: reqwest::Client,
    base_url: String,
}

impl RegisterClient {
    /// Build a client for `settings.base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`RegisterError::Core`] if the credentials cannot form a
    /// header value and [`RegisterError::Http`] if the client fails to build.
    pub fn new(settings: &ClientSettings) -> Result<Self, RegisterError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            basic_auth(&settings.username, &settings.password)?,
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/xml"));

        let http = reqwest::Client::builder()
            .user_agent(settings.user_agent.as_str())
            .timeout(settings.timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn register_url(&self, project: &ProjectId) -> String {
        format!("{}/projects/{project}/register", self.base_url)
    }

    fn upload_url(&self, project: &ProjectId, target: &UploadTarget) -> String {
        match target {
            UploadTarget::New => self.register_url(project),
            UploadTarget::Supersede(document) => {
                format!("{}/{document}/supersede", self.register_url(project))
            }
        }
    }
}

fn basic_auth(username: &str, password: &str) -> Result<HeaderValue, RegisterError> {
    let token = STANDARD.encode(format!("{username}:{password}"));
    let mut value = HeaderValue::try_from(format!("Basic {token}"))
        .map_err(|e| CoreError::Validation(format!("invalid credentials: {e}")))?;
    value.set_sensitive(true);
    Ok(value)
}

impl RegisterApi for RegisterClient {
    async fn fetch_schema(&self, project: &ProjectId) -> Result<RegisterSchema, RegisterError> {
        let url = format!("{}/schema", self.register_url(project));
        tracing::debug!(%project, "fetching register schema");
        let resp = self.http.get(&url).send().await?;
        let resp = check_response(resp, Call::Schema(project)).await?;
        wire::parse_register_schema(&resp.text().await?)
    }

    async fn search(
        &self,
        project: &ProjectId,
        query: &str,
    ) -> Result<Vec<SearchHit>, RegisterError> {
        let url = format!(
            "{}?return_fields={RETURN_FIELDS}&search_query={}",
            self.register_url(project),
            urlencoding::encode(query)
        );
        tracing::debug!(%project, query, "searching register");
        let resp = self.http.get(&url).send().await?;
        let resp = check_response(resp, Call::Search(project)).await?;
        wire::parse_search(&resp.text().await?)
    }

    async fn download(
        &self,
        project: &ProjectId,
        document: &DocumentId,
    ) -> Result<DocumentFile, RegisterError> {
        let url = format!("{}/{document}", self.register_url(project));
        let resp = self.http.get(&url).send().await?;
        let resp = check_response(resp, Call::Download(project, document)).await?;

        let filename = resp
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(content_disposition_filename)
            .unwrap_or_else(|| document.to_string());
        let bytes = resp.bytes().await?.to_vec();
        tracing::debug!(%project, %document, filename, size = bytes.len(), "downloaded document");
        Ok(DocumentFile { filename, bytes })
    }

    async fn upload(
        &self,
        project: &ProjectId,
        target: &UploadTarget,
        template: &DocumentTemplate,
        file: &DocumentFile,
    ) -> Result<UploadReceipt, RegisterError> {
        let body = multipart::encode(template, file)?;
        let resp = self
            .http
            .post(self.upload_url(project, target))
            .header(header::CONTENT_TYPE, body.content_type)
            .body(body.body)
            .send()
            .await?;
        let call = match target {
            UploadTarget::New => Call::Upload(project),
            UploadTarget::Supersede(document) => Call::Supersede(project, document),
        };
        let resp = check_response(resp, call).await?;
        let text = resp.text().await.unwrap_or_default();

        Ok(UploadReceipt {
            document_id: wire::parse_upload_document_id(&text),
            filename: file.filename.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> ClientSettings {
        ClientSettings {
            base_url: "https://register.example.com/api/".into(),
            username: "poleary".into(),
            password: "secret".into(),
            timeout: Duration::from_secs(5),
            user_agent: "regsync/test".into(),
        }
    }

    #[test]
    fn urls_are_built_from_trimmed_base() {
        let client = RegisterClient::new(&settings()).unwrap();
        let project: ProjectId = "1879048422".parse().unwrap();
        let document: DocumentId = "42".parse().unwrap();

        assert_eq!(
            client.upload_url(&project, &UploadTarget::New),
            "https://register.example.com/api/projects/1879048422/register"
        );
        assert_eq!(
            client.upload_url(&project, &UploadTarget::Supersede(document)),
            "https://register.example.com/api/projects/1879048422/register/42/supersede"
        );
    }

    #[test]
    fn basic_auth_header_is_sensitive() {
        let value = basic_auth("poleary", "secret").unwrap();
        assert!(value.is_sensitive());
        assert_eq!(value.to_str().unwrap(), "Basic cG9sZWFyeTpzZWNyZXQ=");
    }
}
