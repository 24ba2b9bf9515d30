mod dry_run;
mod kubernetes;
#[cfg(test)]
pub mod memory;

pub use dry_run::DryRunAccessor;
pub use kubernetes::KubernetesAccessor;

use async_trait::async_trait;

use crate::error::Result;
use crate::resources::{RecordResource, Selector, WorkerResource};

/// Access to the two resource kinds a build is made of.
///
/// Implementations are scoped to a single namespace. Deletions must be
/// immediate (no grace period).
#[async_trait]
pub trait ResourceAccessor: Send + Sync {
    /// Lists build records matching `selector`.
    async fn list_records(&self, selector: &Selector) -> Result<Vec<RecordResource>>;

    /// Lists job workers matching `selector`.
    async fn list_workers(&self, selector: &Selector) -> Result<Vec<WorkerResource>>;

    async fn delete_record(&self, name: &str) -> Result<()>;

    async fn delete_worker(&self, name: &str) -> Result<()>;
}

#[async_trait]
impl<A: ResourceAccessor + ?Sized> ResourceAccessor for Box<A> {
    async fn list_records(&self, selector: &Selector) -> Result<Vec<RecordResource>> {
        (**self).list_records(selector).await
    }

    async fn list_workers(&self, selector: &Selector) -> Result<Vec<WorkerResource>> {
        (**self).list_workers(selector).await
    }

    async fn delete_record(&self, name: &str) -> Result<()> {
        (**self).delete_record(name).await
    }

    async fn delete_worker(&self, name: &str) -> Result<()> {
        (**self).delete_worker(name).await
    }
}
