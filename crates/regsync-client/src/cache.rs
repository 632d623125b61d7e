//! Per-project schema cache.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use regsync_core::{ProjectId, RegisterSchema};

/// Memoized register schemas keyed by project.
///
/// Entries live until [`invalidate`](Self::invalidate)d, or until `ttl`
/// elapses when one is set. Concurrent misses for the same project are not
/// coalesced: both callers fetch and the last insert wins.
#[derive(Debug, Clone)]
pub struct SchemaCache {
    inner: Cache<ProjectId, Arc<RegisterSchema>>,
}

impl SchemaCache {
    #[must_use]
    pub fn new(ttl: Option<Duration>) -> Self {
        let builder = Cache::builder();
        let inner = match ttl {
            Some(ttl) => builder.time_to_live(ttl).build(),
            None => builder.build(),
        };
        Self { inner }
    }

    /// Cached schema for `project`, if present and not expired.
    pub async fn get(&self, project: &ProjectId) -> Option<Arc<RegisterSchema>> {
        self.inner.get(project).await
    }

    /// Store `schema` for `project` and return the shared handle.
    pub async fn insert(&self, project: ProjectId, schema: RegisterSchema) -> Arc<RegisterSchema> {
        let schema = Arc::new(schema);
        self.inner.insert(project, Arc::clone(&schema)).await;
        schema
    }

    /// Drop the entry for `project`. Returns whether a live one existed.
    pub async fn invalidate(&self, project: &ProjectId) -> bool {
        self.inner.remove(project).await.is_some()
    }

    pub fn clear(&self) {
        self.inner.invalidate_all();
    }

    /// Number of live entries after pending maintenance has run.
    pub async fn len(&self) -> u64 {
        self.inner.run_pending_tasks().await;
        self.inner.entry_count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for SchemaCache {
    fn default() -> Self {
        Self::new(None)
    }
}
