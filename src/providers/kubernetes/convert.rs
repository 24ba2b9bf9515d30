use chrono::{DateTime, Utc};
use k8s_openapi::api::core::v1::{Pod, Secret};
use log::warn;

use crate::resources::{RecordResource, WorkerPhase, WorkerResource};

/// Converts a build `Secret` into a record.
///
/// Objects without a name cannot be deleted and are dropped. A missing
/// creation timestamp is read as the Unix epoch.
pub(super) fn record_from_secret(secret: Secret) -> Option<RecordResource> {
    let meta = secret.metadata;
    let Some(name) = meta.name else {
        warn!("Ignoring secret without a name");
        return None;
    };

    Some(RecordResource {
        name,
        created_at: meta
            .creation_timestamp
            .map_or(DateTime::<Utc>::UNIX_EPOCH, |time| time.0),
        labels: meta.labels.unwrap_or_default(),
    })
}

pub(super) fn worker_from_pod(pod: Pod) -> Option<WorkerResource> {
    let Some(name) = pod.metadata.name else {
        warn!("Ignoring pod without a name");
        return None;
    };

    let phase = pod.status.and_then(|status| status.phase);

    Some(WorkerResource {
        name,
        labels: pod.metadata.labels.unwrap_or_default(),
        phase: WorkerPhase::parse(phase.as_deref()),
    })
}
