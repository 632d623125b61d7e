//! The end-to-end register scenario.
//!
//! Uploads the fixtures to the source project, transfers them to the
//! destination project, then supersedes the first source document. Each
//! stage is checked against a business invariant before the next starts.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use regsync_client::{
    DocumentFile, Register, RegisterApi, RegisterError, TransferReport, UploadReceipt,
};
use regsync_config::ScenarioConfig;
use regsync_core::{DocumentRecord, ProjectId};
use regsync_template::{merge, strip};
use serde::Serialize;
use thiserror::Error;

use crate::progress::Progress;

/// Fields the register assigns itself and rejects on supersede.
const SUPERSEDE_STRIPPED: [&str; 1] = ["DocumentNumber"];

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("expected {expected} document(s) in source project, found {actual}")]
    SourceCountMismatch { expected: usize, actual: usize },

    #[error("expected {expected} document(s) in destination project, found {actual}")]
    DestinationCountMismatch { expected: usize, actual: usize },

    #[error("destination document {document_number} has no match in the source project")]
    MissingCrossProjectMatch { document_number: String },

    #[error(
        "superseded document {document_number}: expected one record with filename '{expected}', \
         found {records} record(s) with filename '{actual}'"
    )]
    SupersedeFilenameMismatch {
        document_number: String,
        expected: String,
        actual: String,
        records: usize,
    },

    #[error("no fixtures configured")]
    NoFixtures,

    #[error("failed to read fixture {}", path.display())]
    Fixture {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Register(#[from] RegisterError),
}

/// Inputs of one scenario run.
#[derive(Debug, Clone)]
pub struct ScenarioPlan {
    pub source: ProjectId,
    pub destination: ProjectId,
    /// Uploaded to the source project, in order.
    pub fixtures: Vec<DocumentFile>,
    /// New version of the first source document.
    pub supersede: DocumentFile,
}

impl ScenarioPlan {
    /// Read the configured fixture files.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::NoFixtures`] for an empty fixture list and
    /// [`ScenarioError::Fixture`] for any unreadable file.
    pub async fn load(
        config: &ScenarioConfig,
        source: ProjectId,
        destination: ProjectId,
    ) -> Result<Self, ScenarioError> {
        if config.fixtures.is_empty() {
            return Err(ScenarioError::NoFixtures);
        }
        let dir = Path::new(&config.fixtures_dir);
        let mut fixtures = Vec::with_capacity(config.fixtures.len());
        for name in &config.fixtures {
            fixtures.push(read_fixture(dir, name).await?);
        }
        let supersede = read_fixture(dir, &config.supersede_fixture).await?;

        Ok(Self {
            source,
            destination,
            fixtures,
            supersede,
        })
    }
}

async fn read_fixture(dir: &Path, name: &str) -> Result<DocumentFile, ScenarioError> {
    let path = dir.join(name);
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|source| ScenarioError::Fixture {
            path: path.clone(),
            source,
        })?;
    Ok(DocumentFile::new(name, bytes))
}

#[derive(Debug, Serialize)]
pub struct ScenarioReport {
    pub run_id: String,
    pub uploaded: Vec<UploadReceipt>,
    pub source_documents: Vec<DocumentRecord>,
    pub transfer: TransferReport,
    pub destination_documents: Vec<DocumentRecord>,
    pub superseded: DocumentRecord,
}

/// Run the scenario against `register`.
///
/// # Errors
///
/// Register errors propagate unchanged; each failed check returns its
/// [`ScenarioError`] variant. Nothing is rolled back.
pub async fn run<A: RegisterApi>(
    register: &Register<A>,
    plan: &ScenarioPlan,
    progress: &Progress,
) -> Result<ScenarioReport, ScenarioError> {
    let expected = plan.fixtures.len();
    if expected == 0 {
        return Err(ScenarioError::NoFixtures);
    }

    let mut uploaded = Vec::with_capacity(expected);
    for file in &plan.fixtures {
        progress.step(&format!("uploading {}", file.filename));
        let template = register.generate(&plan.source).await?;
        uploaded.push(register.upload_new(&plan.source, &template, file).await?);
        progress.done(&format!("Uploaded {}", file.filename));
    }

    progress.step("waiting for source project");
    let source_documents = settled(register, &plan.source, None, |docs| docs.len() == expected).await?;
    if source_documents.len() != expected {
        return Err(ScenarioError::SourceCountMismatch {
            expected,
            actual: source_documents.len(),
        });
    }
    progress.done(&format!(
        "All {expected} documents were uploaded to source project {}",
        plan.source
    ));

    progress.step("transferring documents");
    let transfer = register.transfer(&plan.source, &plan.destination).await?;
    progress.done(&format!(
        "Transferred {} document(s) to project {}",
        transfer.count(),
        plan.destination
    ));

    progress.step("waiting for destination project");
    let destination_documents =
        settled(register, &plan.destination, None, |docs| docs.len() == expected).await?;
    if destination_documents.len() != expected {
        return Err(ScenarioError::DestinationCountMismatch {
            expected,
            actual: destination_documents.len(),
        });
    }
    check_cross_project(&source_documents, &destination_documents)?;
    progress.done("All documents were transferred from source project to destination project");

    let superseded = supersede_first(register, plan, &source_documents, progress).await?;
    progress.done("Document was superseded");

    Ok(ScenarioReport {
        run_id: register.run().to_string(),
        uploaded,
        source_documents,
        transfer,
        destination_documents,
        superseded,
    })
}

async fn supersede_first<A: RegisterApi>(
    register: &Register<A>,
    plan: &ScenarioPlan,
    source_documents: &[DocumentRecord],
    progress: &Progress,
) -> Result<DocumentRecord, ScenarioError> {
    let first = source_documents.first().ok_or(ScenarioError::SourceCountMismatch {
        expected: plan.fixtures.len(),
        actual: 0,
    })?;
    progress.step(&format!("superseding {}", first.document_number));

    let template = strip(
        merge(register.generate(&plan.source).await?, first),
        SUPERSEDE_STRIPPED,
    );
    register
        .supersede(&plan.source, &first.document_id, &template, &plan.supersede)
        .await?;

    let expected = plan.supersede.filename.as_str();
    let is_superseded =
        |docs: &[DocumentRecord]| docs.len() == 1 && docs[0].filename_or_empty() == expected;
    let mut records = settled(
        register,
        &plan.source,
        Some(first.document_number.as_str()),
        is_superseded,
    )
    .await?;

    if !is_superseded(records.as_slice()) {
        return Err(ScenarioError::SupersedeFilenameMismatch {
            document_number: first.document_number.clone(),
            expected: expected.to_string(),
            actual: records
                .first()
                .map(|doc| doc.filename_or_empty().to_string())
                .unwrap_or_default(),
            records: records.len(),
        });
    }
    Ok(records.remove(0))
}

/// Every destination business key must exist in the source listing.
fn check_cross_project(
    source: &[DocumentRecord],
    destination: &[DocumentRecord],
) -> Result<(), ScenarioError> {
    let keys: HashSet<&str> = source.iter().map(|d| d.document_number.as_str()).collect();
    match destination
        .iter()
        .find(|d| !keys.contains(d.document_number.as_str()))
    {
        Some(missing) => Err(ScenarioError::MissingCrossProjectMatch {
            document_number: missing.document_number.clone(),
        }),
        None => Ok(()),
    }
}

/// Poll until `ready` holds; after a poll timeout, re-list once so the
/// caller can report what the register actually holds.
async fn settled<A, P>(
    register: &Register<A>,
    project: &ProjectId,
    query: Option<&str>,
    ready: P,
) -> Result<Vec<DocumentRecord>, ScenarioError>
where
    A: RegisterApi,
    P: Fn(&[DocumentRecord]) -> bool,
{
    match register.await_documents(project, query, ready).await {
        Ok(docs) => Ok(docs),
        Err(RegisterError::PollTimeout { attempts, .. }) => {
            tracing::warn!(%project, attempts, "register did not reach expected state");
            Ok(register.list_documents(project, query).await?)
        }
        Err(error) => Err(error.into()),
    }
}
