//! The register context object.

use std::sync::Arc;
use std::time::Duration;

use regsync_core::{DocumentId, ProjectId, RegisterSchema, RunId};
use regsync_template::DocumentTemplate;

use crate::api::{DocumentFile, RegisterApi, UploadReceipt, UploadTarget};
use crate::cache::SchemaCache;
use crate::error::RegisterError;
use crate::poll::PollPolicy;

/// Pacing and scoping for one run.
#[derive(Debug, Clone)]
pub struct RegisterSettings {
    /// Prefix of generated business keys and the default search query.
    pub run: RunId,
    /// Pause after each search before its results are used.
    pub settle: Duration,
    /// Pause after each transferred document.
    pub transfer_pause: Duration,
    pub poll: PollPolicy,
    /// `None` keeps schemas for the life of the `Register`.
    pub schema_ttl: Option<Duration>,
}

impl RegisterSettings {
    /// Settings with no waits, for in-process registers.
    #[must_use]
    pub fn immediate(run: RunId) -> Self {
        Self {
            run,
            settle: Duration::ZERO,
            transfer_pause: Duration::ZERO,
            poll: PollPolicy::immediate(),
            schema_ttl: None,
        }
    }
}

/// A [`RegisterApi`] plus the state the operations share: the schema cache
/// and the run's settings.
pub struct Register<A> {
    api: A,
    schemas: SchemaCache,
    settings: RegisterSettings,
}

impl<A: RegisterApi> Register<A> {
    pub fn new(api: A, settings: RegisterSettings) -> Self {
        Self {
            api,
            schemas: SchemaCache::new(settings.schema_ttl),
            settings,
        }
    }

    pub const fn api(&self) -> &A {
        &self.api
    }

    pub const fn settings(&self) -> &RegisterSettings {
        &self.settings
    }

    pub const fn run(&self) -> &RunId {
        &self.settings.run
    }

    /// The project's mandatory-field schema, fetched on first use.
    ///
    /// # Errors
    ///
    /// Propagates the fetch error on a cache miss.
    pub async fn schema(&self, project: &ProjectId) -> Result<Arc<RegisterSchema>, RegisterError> {
        if let Some(schema) = self.schemas.get(project).await {
            tracing::debug!(%project, "schema cache hit");
            return Ok(schema);
        }
        let schema = self.api.fetch_schema(project).await?;
        tracing::debug!(%project, fields = schema.field_count(), "schema cached");
        Ok(self.schemas.insert(project.clone(), schema).await)
    }

    /// Forget the cached schema for `project`.
    pub async fn invalidate_schema(&self, project: &ProjectId) -> bool {
        self.schemas.invalidate(project).await
    }

    /// A freshly generated descriptor for `project`.
    ///
    /// # Errors
    ///
    /// Propagates schema fetch errors.
    pub async fn generate(&self, project: &ProjectId) -> Result<DocumentTemplate, RegisterError> {
        let schema = self.schema(project).await?;
        Ok(regsync_template::generate(&schema, &self.settings.run))
    }

    /// Upload a new document.
    ///
    /// # Errors
    ///
    /// Returns the transport or API error; nothing is retried.
    pub async fn upload_new(
        &self,
        project: &ProjectId,
        template: &DocumentTemplate,
        file: &DocumentFile,
    ) -> Result<UploadReceipt, RegisterError> {
        let receipt = self
            .api
            .upload(project, &UploadTarget::New, template, file)
            .await?;
        tracing::info!(%project, filename = %file.filename, "uploaded document");
        Ok(receipt)
    }

    /// Upload a new version of `document`.
    ///
    /// # Errors
    ///
    /// Returns the transport or API error; nothing is retried.
    pub async fn supersede(
        &self,
        project: &ProjectId,
        document: &DocumentId,
        template: &DocumentTemplate,
        file: &DocumentFile,
    ) -> Result<UploadReceipt, RegisterError> {
        let target = UploadTarget::Supersede(document.clone());
        let receipt = self.api.upload(project, &target, template, file).await?;
        tracing::info!(%project, %document, filename = %file.filename, "superseded document");
        Ok(receipt)
    }
}
