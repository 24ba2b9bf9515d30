use log::{debug, info, warn};

use crate::providers::ResourceAccessor;
use crate::resources::ResourceKind;

use super::correlate::Matched;
use super::report::{BuildOutcome, ResourceStatus};

/// Deletes the workers and records of one build, best effort.
///
/// With `skip_running_builds`, workers that are still pending or running are
/// retained. The build's records and its finished workers are deleted
/// regardless. A failed deletion is logged and recorded in the outcome; it
/// never stops the remaining deletions.
pub async fn delete_build<A>(
    accessor: &A,
    build_id: &str,
    matched: Matched<'_>,
    skip_running_builds: bool,
) -> BuildOutcome
where
    A: ResourceAccessor + ?Sized,
{
    let mut outcome = BuildOutcome::new(build_id);

    let mut workers = Vec::with_capacity(matched.workers.len());
    for worker in matched.workers {
        if skip_running_builds && worker.phase.is_active() {
            debug!(
                "Skipping pod {} for build {build_id} because its phase is {}",
                worker.name, worker.phase
            );
            outcome.push(
                ResourceKind::Worker,
                &worker.name,
                ResourceStatus::Skipped {
                    phase: worker.phase,
                },
            );
        } else {
            workers.push(worker.name.as_str());
        }
    }

    let records: Vec<&str> = matched.records.iter().map(|r| r.name.as_str()).collect();

    info!("Deleting build {build_id}: pods {workers:?}, secrets {records:?}");

    for name in workers {
        let status = match accessor.delete_worker(name).await {
            Ok(()) => ResourceStatus::Deleted,
            Err(e) => {
                warn!("Failed to delete pod {name} of build {build_id} (continuing): {e}");
                ResourceStatus::Failed {
                    error: e.to_string(),
                }
            }
        };
        outcome.push(ResourceKind::Worker, name, status);
    }

    for name in records {
        let status = match accessor.delete_record(name).await {
            Ok(()) => ResourceStatus::Deleted,
            Err(e) => {
                warn!("Failed to delete secret {name} of build {build_id} (continuing): {e}");
                ResourceStatus::Failed {
                    error: e.to_string(),
                }
            }
        };
        outcome.push(ResourceKind::Record, name, status);
    }

    outcome
}
