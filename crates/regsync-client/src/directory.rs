//! Project document listings.

use regsync_core::{DocumentRecord, ProjectId, RegisterSchema, SearchHit};

use crate::api::RegisterApi;
use crate::error::RegisterError;
use crate::poll::poll_until;
use crate::register::Register;

const TYPE_FIELD: &str = "DocumentTypeId";
const STATUS_FIELD: &str = "DocumentStatusId";

/// Normalize a raw search hit against the owning project's schema.
///
/// Enumerated display values missing from the schema resolve to
/// [`EnumRef::Unresolved`](regsync_core::EnumRef::Unresolved).
#[must_use]
pub fn to_record(hit: SearchHit, schema: &RegisterSchema) -> DocumentRecord {
    DocumentRecord {
        document_type_id: schema.resolve_enum(TYPE_FIELD, &hit.document_type),
        document_status_id: schema.resolve_enum(STATUS_FIELD, &hit.document_status),
        has_file: hit.filename.is_some(),
        document_id: hit.document_id,
        document_number: hit.document_number,
        revision: hit.revision,
        title: hit.title,
        discipline: hit.discipline,
        filename: hit.filename,
    }
}

impl<A: RegisterApi> Register<A> {
    /// List the documents of `project` matching `query`.
    ///
    /// `None` searches for the run id, so only this run's documents are
    /// returned. Waits the configured settle period after the search.
    ///
    /// # Errors
    ///
    /// Propagates schema, transport and parse errors.
    pub async fn list_documents(
        &self,
        project: &ProjectId,
        query: Option<&str>,
    ) -> Result<Vec<DocumentRecord>, RegisterError> {
        let query = query.unwrap_or_else(|| self.run().as_str());
        let hits = self.api().search(project, query).await?;
        if !self.settings().settle.is_zero() {
            tokio::time::sleep(self.settings().settle).await;
        }

        let schema = self.schema(project).await?;
        let records: Vec<DocumentRecord> = hits
            .into_iter()
            .map(|hit| to_record(hit, &schema))
            .collect();
        tracing::debug!(%project, query, count = records.len(), "listed documents");
        Ok(records)
    }

    /// Re-list until `ready` accepts the listing, per the poll policy.
    ///
    /// # Errors
    ///
    /// Returns [`RegisterError::PollTimeout`] if the listing never
    /// satisfies `ready`, or the first listing error.
    pub async fn await_documents<P>(
        &self,
        project: &ProjectId,
        query: Option<&str>,
        ready: P,
    ) -> Result<Vec<DocumentRecord>, RegisterError>
    where
        P: Fn(&[DocumentRecord]) -> bool,
    {
        poll_until(
            &self.settings().poll,
            || self.list_documents(project, query),
            |docs: &Vec<DocumentRecord>| ready(docs.as_slice()),
        )
        .await
    }
}
