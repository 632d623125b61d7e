//! In-memory [`RegisterApi`] for tests.
//!
//! Behaves like a small register: searches match on the document number,
//! uploads require a `DocumentNumber` field, supersedes keep the number and
//! mint a new version id. Enumerated descriptor tokens are mapped back to
//! display values through the project's schema, so search results look like
//! the remote system's.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use regsync_core::{DocumentId, EnumValue, FieldSchema, ProjectId, RegisterSchema, SearchHit};
use regsync_template::DocumentTemplate;

use crate::api::{DocumentFile, RegisterApi, UploadReceipt, UploadTarget};
use crate::error::RegisterError;

const FIRST_DOCUMENT_ID: u64 = 271_341_877_549_097_000;

struct StoredDocument {
    hit: SearchHit,
    bytes: Vec<u8>,
    /// Hidden from searches until the search counter passes this value.
    visible_after: usize,
}

struct Project {
    schema: RegisterSchema,
    documents: Vec<StoredDocument>,
    templates: Vec<DocumentTemplate>,
}

#[derive(Default)]
struct State {
    projects: HashMap<ProjectId, Project>,
    next_id: u64,
    schema_fetches: usize,
    searches: usize,
    uploads: usize,
    upload_budget: Option<usize>,
    search_lag: usize,
    /// Supersedes store the new bytes but report the old filename.
    stale_supersede_filename: bool,
}

impl State {
    fn project(&mut self, project: &ProjectId) -> Result<&mut Project, RegisterError> {
        self.projects.get_mut(project).ok_or_else(|| RegisterError::Api {
            status: 404,
            message: format!("unknown project {project}"),
        })
    }

    fn mint_id(&mut self) -> DocumentId {
        self.next_id += 1;
        DocumentId::from(FIRST_DOCUMENT_ID + self.next_id)
    }
}

/// A register held in memory.
#[derive(Default)]
pub struct InMemoryRegister {
    state: Mutex<State>,
}

impl InMemoryRegister {
    /// A register with one empty project per id, each using
    /// [`sample_schema`](Self::sample_schema).
    ///
    /// # Panics
    ///
    /// Panics if an id is not a valid project id.
    #[must_use]
    pub fn with_projects(ids: &[&str]) -> Self {
        let register = Self::default();
        for id in ids {
            register.add_project(Self::sample_schema(id));
        }
        register
    }

    /// A schema with the usual mandatory register fields:
    /// `DocumentNumber`, `Title`, `Revision`, `HasFile` and `DateModified`
    /// single-valued; `DocumentTypeId` (101 Drawing, 102 Report) and
    /// `DocumentStatusId` (1 Draft, 2 Approved) enumerated.
    ///
    /// # Panics
    ///
    /// Panics if `project` is not a valid project id.
    #[must_use]
    pub fn sample_schema(project: &str) -> RegisterSchema {
        let single = |identifier: &str, data_type: &str| FieldSchema {
            identifier: identifier.into(),
            display_name: identifier.into(),
            data_type: data_type.into(),
            mandatory: true,
            enumerated_values: Vec::new(),
        };
        let multi = |identifier: &str, values: &[(&str, &str)]| FieldSchema {
            identifier: identifier.into(),
            display_name: identifier.into(),
            data_type: "LONG".into(),
            mandatory: true,
            enumerated_values: values
                .iter()
                .map(|(id, value)| EnumValue {
                    id: Some((*id).into()),
                    value: (*value).into(),
                })
                .collect(),
        };

        RegisterSchema {
            project_id: project.parse().expect("valid project id"),
            project_name: format!("Project {project}"),
            auto_numbering_enabled: false,
            basic_auto_numbering_enabled: false,
            project_wide_auto_numbering_enabled: false,
            single_valued: vec![
                single("DocumentNumber", "STRING"),
                single("Title", "STRING"),
                single("Revision", "STRING"),
                single("HasFile", "BOOLEAN"),
                single("DateModified", "DATE"),
            ],
            multi_valued: vec![
                multi("DocumentTypeId", &[("101", "Drawing"), ("102", "Report")]),
                multi("DocumentStatusId", &[("1", "Draft"), ("2", "Approved")]),
            ],
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add_project(&self, schema: RegisterSchema) {
        self.lock().projects.insert(
            schema.project_id.clone(),
            Project {
                schema,
                documents: Vec::new(),
                templates: Vec::new(),
            },
        );
    }

    /// Store a Drawing/Draft document directly, bypassing upload.
    ///
    /// # Panics
    ///
    /// Panics if the project does not exist.
    pub fn seed_document(&self, project: &str, number: &str, filename: &str) -> DocumentId {
        let project: ProjectId = project.parse().expect("valid project id");
        let mut state = self.lock();
        let id = state.mint_id();
        let visible_after = state.searches + state.search_lag;
        let stored = StoredDocument {
            hit: SearchHit {
                document_id: id.clone(),
                document_number: number.into(),
                document_type: "Drawing".into(),
                document_status: "Draft".into(),
                revision: "1".into(),
                title: format!("Seeded {number}"),
                discipline: None,
                filename: Some(filename.into()),
            },
            bytes: format!("contents of {filename}").into_bytes(),
            visible_after,
        };
        state
            .project(&project)
            .expect("seeded project exists")
            .documents
            .push(stored);
        id
    }

    /// Documents stored after this call stay out of the next `lag` searches.
    pub fn set_search_lag(&self, lag: usize) {
        self.lock().search_lag = lag;
    }

    /// Let `n` more uploads succeed, then answer 503.
    pub fn fail_uploads_after(&self, n: usize) {
        self.lock().upload_budget = Some(n);
    }

    /// Make supersedes keep reporting the previous filename.
    pub fn keep_filename_on_supersede(&self) {
        self.lock().stale_supersede_filename = true;
    }

    /// Every stored document of `project`, visible or not.
    #[must_use]
    pub fn documents(&self, project: &str) -> Vec<SearchHit> {
        let Ok(project) = project.parse::<ProjectId>() else {
            return Vec::new();
        };
        self.lock()
            .projects
            .get(&project)
            .map(|p| p.documents.iter().map(|d| d.hit.clone()).collect())
            .unwrap_or_default()
    }

    /// The descriptor of the most recent upload to `project`.
    #[must_use]
    pub fn last_template(&self, project: &str) -> Option<DocumentTemplate> {
        let project = project.parse::<ProjectId>().ok()?;
        self.lock().projects.get(&project)?.templates.last().cloned()
    }

    #[must_use]
    pub fn schema_fetches(&self) -> usize {
        self.lock().schema_fetches
    }

    #[must_use]
    pub fn search_count(&self) -> usize {
        self.lock().searches
    }

    #[must_use]
    pub fn upload_count(&self) -> usize {
        self.lock().uploads
    }
}

fn display_or_token(schema: &RegisterSchema, identifier: &str, token: Option<&str>) -> String {
    token
        .map(|t| schema.display_value(identifier, t).unwrap_or(t).to_string())
        .unwrap_or_default()
}

impl RegisterApi for InMemoryRegister {
    async fn fetch_schema(&self, project: &ProjectId) -> Result<RegisterSchema, RegisterError> {
        let mut state = self.lock();
        state.schema_fetches += 1;
        Ok(state.project(project)?.schema.clone())
    }

    async fn search(
        &self,
        project: &ProjectId,
        query: &str,
    ) -> Result<Vec<SearchHit>, RegisterError> {
        let mut state = self.lock();
        state.searches += 1;
        let searches = state.searches;
        let project = state.project(project)?;
        Ok(project
            .documents
            .iter()
            .filter(|d| d.visible_after < searches && d.hit.document_number.contains(query))
            .map(|d| d.hit.clone())
            .collect())
    }

    async fn download(
        &self,
        project: &ProjectId,
        document: &DocumentId,
    ) -> Result<DocumentFile, RegisterError> {
        let mut state = self.lock();
        let stored = state
            .project(project)?
            .documents
            .iter()
            .find(|d| &d.hit.document_id == document)
            .ok_or_else(|| RegisterError::NotFound {
                project: project.to_string(),
                document: document.to_string(),
            })?;
        let filename = stored
            .hit
            .filename
            .clone()
            .unwrap_or_else(|| document.to_string());
        Ok(DocumentFile::new(filename, stored.bytes.clone()))
    }

    async fn upload(
        &self,
        project: &ProjectId,
        target: &UploadTarget,
        template: &DocumentTemplate,
        file: &DocumentFile,
    ) -> Result<UploadReceipt, RegisterError> {
        let mut state = self.lock();
        if let Some(budget) = state.upload_budget {
            if budget == 0 {
                return Err(RegisterError::Api {
                    status: 503,
                    message: "register unavailable".into(),
                });
            }
            state.upload_budget = Some(budget - 1);
        }

        let id = state.mint_id();
        let visible_after = state.searches + state.search_lag;
        let stale_filename = state.stale_supersede_filename;
        let entry = state.project(project)?;
        let schema = &entry.schema;
        let document_type = display_or_token(schema, "DocumentTypeId", template.get("DocumentTypeId"));
        let document_status =
            display_or_token(schema, "DocumentStatusId", template.get("DocumentStatusId"));

        match target {
            UploadTarget::New => {
                let number = template
                    .get("DocumentNumber")
                    .filter(|n| !n.is_empty())
                    .ok_or_else(|| RegisterError::Api {
                        status: 400,
                        message: "DocumentNumber is mandatory".into(),
                    })?;
                let hit = SearchHit {
                    document_id: id.clone(),
                    document_number: number.into(),
                    document_type,
                    document_status,
                    revision: template.get("Revision").unwrap_or("1").into(),
                    title: template.get("Title").unwrap_or_default().into(),
                    discipline: template.get("Discipline").map(str::to_string),
                    filename: Some(file.filename.clone()),
                };
                entry.documents.push(StoredDocument {
                    hit,
                    bytes: file.bytes.clone(),
                    visible_after,
                });
            }
            UploadTarget::Supersede(previous) => {
                let stored = entry
                    .documents
                    .iter_mut()
                    .find(|d| &d.hit.document_id == previous)
                    .ok_or_else(|| RegisterError::NotFound {
                        project: project.to_string(),
                        document: previous.to_string(),
                    })?;
                stored.hit.document_id = id.clone();
                if !stale_filename {
                    stored.hit.filename = Some(file.filename.clone());
                }
                if let Some(revision) = template.get("Revision") {
                    stored.hit.revision = revision.into();
                }
                stored.bytes = file.bytes.clone();
            }
        }

        entry.templates.push(template.clone());
        state.uploads += 1;
        Ok(UploadReceipt {
            document_id: Some(id),
            filename: file.filename.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project() -> ProjectId {
        "1".parse().unwrap()
    }

    #[tokio::test]
    async fn upload_requires_document_number() {
        let fake = InMemoryRegister::with_projects(&["1"]);
        let file = DocumentFile::new("a.txt", b"a".to_vec());
        let err = fake
            .upload(&project(), &UploadTarget::New, &DocumentTemplate::new(), &file)
            .await
            .unwrap_err();
        assert!(matches!(err, RegisterError::Api { status: 400, .. }));
    }

    #[tokio::test]
    async fn upload_maps_tokens_to_display_values() {
        let fake = InMemoryRegister::with_projects(&["1"]);
        let mut template = DocumentTemplate::new();
        template.set("DocumentNumber", "n-1").unwrap();
        template.set("DocumentTypeId", "102").unwrap();
        template.set("DocumentStatusId", "2").unwrap();
        let file = DocumentFile::new("a.txt", b"a".to_vec());

        fake.upload(&project(), &UploadTarget::New, &template, &file)
            .await
            .unwrap();
        let hits = fake.search(&project(), "n-").await.unwrap();
        assert_eq!(hits[0].document_type, "Report");
        assert_eq!(hits[0].document_status, "Approved");
    }

    #[tokio::test]
    async fn supersede_keeps_number_and_replaces_file() {
        let fake = InMemoryRegister::with_projects(&["1"]);
        let original = fake.seed_document("1", "n-1", "document.txt");
        let file = DocumentFile::new("editedDocument.txt", b"v2".to_vec());

        let receipt = fake
            .upload(
                &project(),
                &UploadTarget::Supersede(original.clone()),
                &DocumentTemplate::new(),
                &file,
            )
            .await
            .unwrap();

        let docs = fake.documents("1");
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].document_number, "n-1");
        assert_eq!(docs[0].filename.as_deref(), Some("editedDocument.txt"));
        assert_ne!(Some(original), receipt.document_id);
    }

    #[tokio::test]
    async fn unknown_document_download_is_not_found() {
        let fake = InMemoryRegister::with_projects(&["1"]);
        let err = fake
            .download(&project(), &"9".parse().unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, RegisterError::NotFound { .. }));
    }
}
