//! Build retention.
//!
//! A build is a set of record resources (secrets) and worker resources (pods)
//! sharing a `build` label. One [`Vacuum::run`] is a single pass: the age
//! policy first, then the count policy against a fresh listing.

mod correlate;
mod delete;
mod policy;
mod report;

pub use correlate::BuildIndex;
pub use delete::delete_build;
pub use policy::{select_expired, select_surplus, MaxAge, MaxBuilds, Selection};
pub use report::{BuildOutcome, PassReport, Policy, PolicyReport, ResourceStatus};

use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::Serialize;

use crate::error::{Result, VacuumError};
use crate::providers::ResourceAccessor;
use crate::resources::{RecordResource, ResourceKind, Selector};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct VacuumOptions {
    pub max_age: MaxAge,
    pub max_builds: MaxBuilds,
    /// Retain workers that are still pending or running.
    pub skip_running_builds: bool,
}

/// The listings one policy evaluates against.
///
/// Each policy acquires its own snapshot, since earlier deletions in the same
/// pass change the store.
struct Snapshot {
    candidates: Vec<RecordResource>,
    index: BuildIndex,
}

impl Snapshot {
    async fn acquire<A>(accessor: &A) -> Result<Self>
    where
        A: ResourceAccessor + ?Sized,
    {
        let build_records = Selector::build_records();
        let everything = Selector::everything();

        let candidates = accessor
            .list_records(&build_records)
            .await
            .map_err(|e| list_error(ResourceKind::Record, &build_records, e))?;
        let records = accessor
            .list_records(&everything)
            .await
            .map_err(|e| list_error(ResourceKind::Record, &everything, e))?;
        let workers = accessor
            .list_workers(&everything)
            .await
            .map_err(|e| list_error(ResourceKind::Worker, &everything, e))?;

        let (record_count, worker_count) = (records.len(), workers.len());
        let index = BuildIndex::new(records, workers);
        debug!(
            "Snapshot: {} candidate records, {record_count} records and {worker_count} pods across {} builds",
            candidates.len(),
            index.builds()
        );

        Ok(Self { candidates, index })
    }
}

fn list_error(kind: ResourceKind, selector: &Selector, source: VacuumError) -> VacuumError {
    VacuumError::List {
        kind,
        selector: selector.to_string(),
        source: Box::new(source),
    }
}

/// Removes expired builds from a namespace.
pub struct Vacuum<A> {
    options: VacuumOptions,
    accessor: A,
}

impl<A: ResourceAccessor> Vacuum<A> {
    pub fn new(options: VacuumOptions, accessor: A) -> Self {
        Self { options, accessor }
    }

    /// Runs one pass: the age policy if enabled, then the count policy if
    /// enabled.
    ///
    /// # Errors
    ///
    /// Fails only when a listing fails. Deletions already issued stay
    /// applied. Individual deletion failures are reported in the
    /// [`PassReport`], never as an error.
    pub async fn run(&self) -> Result<PassReport> {
        let mut report = PassReport {
            options: self.options,
            ..PassReport::default()
        };

        if let MaxAge::Before(cutoff) = self.options.max_age {
            info!("Pruning records older than {cutoff}");
            report.age = Some(self.prune_expired(cutoff).await?);
        }

        let MaxBuilds::AtMost(max) = self.options.max_builds else {
            return Ok(report);
        };

        info!("Pruning records beyond the newest {max}");
        report.count = Some(self.prune_surplus(max).await?);

        Ok(report)
    }

    async fn prune_expired(&self, cutoff: DateTime<Utc>) -> Result<PolicyReport> {
        let snapshot = Snapshot::acquire(&self.accessor).await?;
        let selection = select_expired(&snapshot.candidates, cutoff);
        Ok(self.evict(Policy::Age, &snapshot, selection).await)
    }

    async fn prune_surplus(&self, max: usize) -> Result<PolicyReport> {
        let snapshot = Snapshot::acquire(&self.accessor).await?;
        let selection = select_surplus(&snapshot.candidates, max);
        Ok(self.evict(Policy::Count, &snapshot, selection).await)
    }

    async fn evict(
        &self,
        policy: Policy,
        snapshot: &Snapshot,
        selection: Selection,
    ) -> PolicyReport {
        let mut report = PolicyReport::new(policy, snapshot.candidates.len());
        report.orphans = selection.orphans;

        for build_id in &selection.victims {
            let matched = snapshot.index.correlate(build_id);
            let outcome = delete_build(
                &self.accessor,
                build_id,
                matched,
                self.options.skip_running_builds,
            )
            .await;
            report.builds.push(outcome);
        }

        info!(
            "{policy} policy evicted {} builds ({} deleted, {} skipped, {} failed)",
            report.evicted_builds(),
            report.deleted(),
            report.skipped(),
            report.failed()
        );

        report
    }
}
