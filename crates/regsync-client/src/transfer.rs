//! Cross-project document transfer.

use std::collections::HashSet;

use regsync_core::{DocumentRecord, ProjectId, RegisterSchema};
use regsync_template::{generate, merge};
use serde::Serialize;

use crate::api::RegisterApi;
use crate::error::RegisterError;
use crate::register::Register;

/// What a transfer did.
#[derive(Debug, Clone, Serialize)]
pub struct TransferReport {
    pub source: ProjectId,
    pub destination: ProjectId,
    /// Source records that were uploaded, in listing order.
    pub transferred: Vec<DocumentRecord>,
}

impl TransferReport {
    #[must_use]
    pub fn count(&self) -> usize {
        self.transferred.len()
    }
}

/// Source records whose business key does not exist in `destination`.
fn missing_from<'a>(
    source: &'a [DocumentRecord],
    destination: &[DocumentRecord],
) -> Vec<&'a DocumentRecord> {
    let present: HashSet<&str> = destination
        .iter()
        .map(|doc| doc.document_number.as_str())
        .collect();
    source
        .iter()
        .filter(|doc| !present.contains(doc.document_number.as_str()))
        .collect()
}

impl<A: RegisterApi> Register<A> {
    /// Copy this run's documents from `source` that `destination` lacks.
    ///
    /// Each copy gets a freshly generated destination descriptor overlaid
    /// with the source record's fields, so it keeps its business key.
    /// Documents are sent one at a time with the configured pause between
    /// them. Re-running after a completed transfer sends nothing.
    ///
    /// # Errors
    ///
    /// Listing and schema errors propagate as-is. A failed download or
    /// upload stops the transfer with [`RegisterError::TransferInterrupted`];
    /// documents sent before it stay in the destination.
    pub async fn transfer(
        &self,
        source: &ProjectId,
        destination: &ProjectId,
    ) -> Result<TransferReport, RegisterError> {
        let source_docs = self.list_documents(source, None).await?;
        let destination_docs = self.list_documents(destination, None).await?;
        let pending = missing_from(&source_docs, &destination_docs);
        tracing::info!(
            %source,
            %destination,
            pending = pending.len(),
            "transferring documents"
        );

        let schema = self.schema(destination).await?;

        let mut transferred = Vec::with_capacity(pending.len());
        for doc in pending {
            self.transfer_one(source, destination, &schema, doc)
                .await
                .map_err(|err| RegisterError::TransferInterrupted {
                    completed: transferred.len(),
                    document_number: doc.document_number.clone(),
                    source: Box::new(err),
                })?;
            transferred.push(doc.clone());

            let pause = self.settings().transfer_pause;
            if !pause.is_zero() {
                tokio::time::sleep(pause).await;
            }
        }

        Ok(TransferReport {
            source: source.clone(),
            destination: destination.clone(),
            transferred,
        })
    }

    async fn transfer_one(
        &self,
        source: &ProjectId,
        destination: &ProjectId,
        schema: &RegisterSchema,
        doc: &DocumentRecord,
    ) -> Result<(), RegisterError> {
        let file = self.api().download(source, &doc.document_id).await?;
        let template = merge(generate(schema, self.run()), doc);
        self.upload_new(destination, &template, &file).await?;
        tracing::debug!(document_number = %doc.document_number, "transferred");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::InMemoryRegister;
    use crate::register::RegisterSettings;
    use pretty_assertions::assert_eq;
    use regsync_core::{EnumRef, EnumValue, RunId};

    const SRC: &str = "100";
    const DST: &str = "200";

    fn project(id: &str) -> ProjectId {
        id.parse().unwrap()
    }

    fn register() -> Register<InMemoryRegister> {
        let fake = InMemoryRegister::with_projects(&[SRC, DST]);
        Register::new(fake, RegisterSettings::immediate(RunId::generate("t")))
    }

    fn key(register: &Register<InMemoryRegister>, suffix: &str) -> String {
        format!("{}-{suffix}", register.run())
    }

    fn numbers(docs: &[DocumentRecord]) -> Vec<String> {
        let mut numbers: Vec<String> = docs.iter().map(|d| d.document_number.clone()).collect();
        numbers.sort();
        numbers
    }

    fn record(number: &str) -> DocumentRecord {
        DocumentRecord {
            document_id: "1".parse().unwrap(),
            document_number: number.into(),
            document_type_id: EnumRef::Unresolved,
            revision: "1".into(),
            document_status_id: EnumRef::Unresolved,
            has_file: false,
            title: String::new(),
            discipline: None,
            filename: None,
        }
    }

    #[test]
    fn missing_is_a_set_difference_by_number() {
        let source = [record("a"), record("b"), record("c")];
        let destination = [record("b"), record("z")];
        let missing: Vec<&str> = missing_from(&source, &destination)
            .into_iter()
            .map(|d| d.document_number.as_str())
            .collect();
        assert_eq!(missing, ["a", "c"]);
    }

    #[tokio::test]
    async fn copies_only_missing_documents() {
        let register = register();
        let (a, b, c) = (key(&register, "a"), key(&register, "b"), key(&register, "c"));
        register.api().seed_document(SRC, &a, "document.txt");
        register.api().seed_document(SRC, &b, "blank.pdf");
        register.api().seed_document(SRC, &c, "Empty.png");
        register.api().seed_document(DST, &b, "blank.pdf");

        let report = register.transfer(&project(SRC), &project(DST)).await.unwrap();
        assert_eq!(numbers(&report.transferred), [a.clone(), c.clone()]);
        assert_eq!(register.api().upload_count(), 2);
        // one fetch per project, reused for every generated descriptor
        assert_eq!(register.api().schema_fetches(), 2);

        let dst = register.list_documents(&project(DST), None).await.unwrap();
        assert_eq!(numbers(&dst), [a, b, c]);
    }

    #[tokio::test]
    async fn transfer_is_idempotent() {
        let register = register();
        register.api().seed_document(SRC, &key(&register, "a"), "document.txt");

        let first = register.transfer(&project(SRC), &project(DST)).await.unwrap();
        assert_eq!(first.count(), 1);
        let second = register.transfer(&project(SRC), &project(DST)).await.unwrap();
        assert_eq!(second.count(), 0);
        assert_eq!(register.api().upload_count(), 1);
    }

    #[tokio::test]
    async fn copies_carry_source_key_and_file() {
        let register = register();
        let a = key(&register, "a");
        register.api().seed_document(SRC, &a, "document.txt");

        register.transfer(&project(SRC), &project(DST)).await.unwrap();

        let template = register.api().last_template(DST).unwrap();
        assert_eq!(template.get("DocumentNumber"), Some(a.as_str()));
        let dst = register.api().documents(DST);
        assert_eq!(dst[0].filename.as_deref(), Some("document.txt"));
    }

    #[tokio::test]
    async fn copies_keep_status_from_tables_without_ids() {
        let fake = InMemoryRegister::default();
        for id in [SRC, DST] {
            let mut schema = InMemoryRegister::sample_schema(id);
            let status = schema
                .multi_valued
                .iter_mut()
                .find(|f| f.identifier == "DocumentStatusId")
                .unwrap();
            status.enumerated_values = ["Draft", "Approved", "Issued", "Hold", "Void"]
                .into_iter()
                .map(|value| EnumValue {
                    id: None,
                    value: value.into(),
                })
                .collect();
            fake.add_project(schema);
        }
        let register = Register::new(fake, RegisterSettings::immediate(RunId::generate("t")));
        for n in 0..10 {
            register
                .api()
                .seed_document(SRC, &key(&register, &n.to_string()), "document.txt");
        }

        let report = register.transfer(&project(SRC), &project(DST)).await.unwrap();
        assert_eq!(report.count(), 10);
        assert!(
            report
                .transferred
                .iter()
                .all(|d| d.document_status_id == EnumRef::Value("Draft".into()))
        );
        let statuses: Vec<String> = register
            .api()
            .documents(DST)
            .into_iter()
            .map(|d| d.document_status)
            .collect();
        assert_eq!(statuses, vec!["Draft".to_string(); 10]);
    }

    #[tokio::test]
    async fn empty_source_is_a_no_op() {
        let register = register();
        let report = register.transfer(&project(SRC), &project(DST)).await.unwrap();
        assert!(report.transferred.is_empty());
        assert_eq!(register.api().upload_count(), 0);
    }

    #[tokio::test]
    async fn failure_reports_progress() {
        let register = register();
        register.api().seed_document(SRC, &key(&register, "a"), "document.txt");
        register.api().seed_document(SRC, &key(&register, "b"), "blank.pdf");
        register.api().fail_uploads_after(1);

        let err = register
            .transfer(&project(SRC), &project(DST))
            .await
            .unwrap_err();
        // the cause is reported through `source()`, not repeated in the message
        let message = err.to_string();
        assert!(message.ends_with("after 1 document(s)"), "{message}");
        assert!(std::error::Error::source(&err).is_some());
        match err {
            RegisterError::TransferInterrupted {
                completed, source, ..
            } => {
                assert_eq!(completed, 1);
                assert!(matches!(*source, RegisterError::Api { status: 503, .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(register.api().documents(DST).len(), 1);
    }
}
