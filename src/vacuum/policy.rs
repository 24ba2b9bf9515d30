use std::cmp::Ordering;
use std::collections::HashSet;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::Serialize;

use crate::resources::RecordResource;

/// Age-based retention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "mode", content = "cutoff", rename_all = "lowercase")]
pub enum MaxAge {
    #[default]
    Disabled,
    /// Evict builds created strictly before this instant.
    Before(DateTime<Utc>),
}

/// Count-based retention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "mode", content = "max", rename_all = "snake_case")]
pub enum MaxBuilds {
    #[default]
    Unlimited,
    /// Keep at most this many of the newest builds.
    AtMost(usize),
}

/// Newest first: `a` sorts before `b` when it was created later.
pub fn by_creation(a: &RecordResource, b: &RecordResource) -> Ordering {
    b.created_at.cmp(&a.created_at)
}

/// Build ids chosen for eviction, and the candidates that could not be
/// considered.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Selection {
    /// Distinct build ids, in eviction order.
    pub victims: Vec<String>,
    /// Names of candidate records without a build label.
    pub orphans: Vec<String>,
}

impl Selection {
    fn evict(&mut self, seen: &mut HashSet<String>, build_id: &str) {
        if seen.insert(build_id.to_string()) {
            self.victims.push(build_id.to_string());
        } else {
            debug!("Build {build_id} is already scheduled for eviction");
        }
    }
}

/// Splits candidates into labeled records and orphan names, logging each orphan.
fn partition(candidates: &[RecordResource]) -> (Vec<&RecordResource>, Vec<String>) {
    let mut labeled = Vec::with_capacity(candidates.len());
    let mut orphans = Vec::new();

    for record in candidates {
        if record.build_id().is_some() {
            labeled.push(record);
        } else {
            warn!("Build {:?} has no build ID. Skipping.", record.name);
            orphans.push(record.name.clone());
        }
    }

    (labeled, orphans)
}

/// Selects every build whose record was created strictly before `cutoff`.
pub fn select_expired(candidates: &[RecordResource], cutoff: DateTime<Utc>) -> Selection {
    let (labeled, orphans) = partition(candidates);
    let mut selection = Selection {
        orphans,
        ..Selection::default()
    };
    let mut seen = HashSet::new();

    for record in labeled {
        if cutoff > record.created_at {
            if let Some(build_id) = record.build_id() {
                selection.evict(&mut seen, build_id);
            }
        }
    }

    selection
}

/// Selects every build beyond the `max` most recently created ones.
///
/// Orphans take no slot. Records sharing a creation timestamp keep their
/// listing order, which is not guaranteed to be stable across passes.
pub fn select_surplus(candidates: &[RecordResource], max: usize) -> Selection {
    let (mut labeled, orphans) = partition(candidates);
    let mut selection = Selection {
        orphans,
        ..Selection::default()
    };

    if labeled.len() <= max {
        info!("Skipping vacuum. {} is ≤ max {max}", labeled.len());
        return selection;
    }

    labeled.sort_by(|a, b| by_creation(a, b));

    let mut seen = HashSet::new();
    for record in &labeled[max..] {
        if let Some(build_id) = record.build_id() {
            selection.evict(&mut seen, build_id);
        }
    }

    selection
}
