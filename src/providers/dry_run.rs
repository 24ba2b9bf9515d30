use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use log::info;

use crate::error::Result;
use crate::providers::ResourceAccessor;
use crate::resources::{RecordResource, ResourceKind, Selector, WorkerResource};

/// Lists through the wrapped accessor but never deletes.
///
/// Every deletion is logged and reported as successful. Resources it would
/// have deleted are hidden from later listings, so a second policy in the
/// same pass sees the namespace a real pass would leave behind.
pub struct DryRunAccessor<A> {
    inner: A,
    deleted: Mutex<HashSet<(ResourceKind, String)>>,
}

impl<A> DryRunAccessor<A> {
    pub fn new(inner: A) -> Self {
        Self {
            inner,
            deleted: Mutex::default(),
        }
    }

    fn deleted(&self) -> MutexGuard<'_, HashSet<(ResourceKind, String)>> {
        self.deleted.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn forget(&self, kind: ResourceKind, name: &str) {
        self.deleted().insert((kind, name.to_string()));
    }

    fn is_forgotten(&self, kind: ResourceKind, name: &str) -> bool {
        self.deleted().contains(&(kind, name.to_string()))
    }
}

#[async_trait]
impl<A: ResourceAccessor> ResourceAccessor for DryRunAccessor<A> {
    async fn list_records(&self, selector: &Selector) -> Result<Vec<RecordResource>> {
        let mut records = self.inner.list_records(selector).await?;
        records.retain(|r| !self.is_forgotten(ResourceKind::Record, &r.name));
        Ok(records)
    }

    async fn list_workers(&self, selector: &Selector) -> Result<Vec<WorkerResource>> {
        let mut workers = self.inner.list_workers(selector).await?;
        workers.retain(|w| !self.is_forgotten(ResourceKind::Worker, &w.name));
        Ok(workers)
    }

    async fn delete_record(&self, name: &str) -> Result<()> {
        info!("[dry-run] would delete secret {name}");
        self.forget(ResourceKind::Record, name);
        Ok(())
    }

    async fn delete_worker(&self, name: &str) -> Result<()> {
        info!("[dry-run] would delete pod {name}");
        self.forget(ResourceKind::Worker, name);
        Ok(())
    }
}
