use serde::Serialize;

use crate::resources::{ResourceKind, WorkerPhase};

use super::VacuumOptions;

/// Which retention policy produced a [`PolicyReport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Policy {
    Age,
    Count,
}

impl std::fmt::Display for Policy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Age => f.write_str("age"),
            Self::Count => f.write_str("count"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ResourceStatus {
    Deleted,
    /// Retained because the worker was still in flight.
    Skipped { phase: WorkerPhase },
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceOutcome {
    pub kind: ResourceKind,
    pub name: String,
    #[serde(flatten)]
    pub status: ResourceStatus,
}

/// Everything the deletion executor did for one build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildOutcome {
    pub build_id: String,
    pub resources: Vec<ResourceOutcome>,
}

impl BuildOutcome {
    pub fn new(build_id: &str) -> Self {
        Self {
            build_id: build_id.to_string(),
            resources: Vec::new(),
        }
    }

    pub fn push(&mut self, kind: ResourceKind, name: &str, status: ResourceStatus) {
        self.resources.push(ResourceOutcome {
            kind,
            name: name.to_string(),
            status,
        });
    }

    pub fn deleted(&self) -> usize {
        self.count(|s| matches!(s, ResourceStatus::Deleted))
    }

    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s, ResourceStatus::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, ResourceStatus::Failed { .. }))
    }

    fn count(&self, predicate: impl Fn(&ResourceStatus) -> bool) -> usize {
        self.resources.iter().filter(|r| predicate(&r.status)).count()
    }
}

/// Result of running one retention policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyReport {
    pub policy: Policy,
    /// Build records the selector returned.
    pub candidates: usize,
    /// Names of candidate records with no build label.
    pub orphans: Vec<String>,
    pub builds: Vec<BuildOutcome>,
}

impl PolicyReport {
    pub fn new(policy: Policy, candidates: usize) -> Self {
        Self {
            policy,
            candidates,
            orphans: Vec::new(),
            builds: Vec::new(),
        }
    }

    pub fn evicted_builds(&self) -> usize {
        self.builds.len()
    }

    pub fn deleted(&self) -> usize {
        self.builds.iter().map(BuildOutcome::deleted).sum()
    }

    pub fn skipped(&self) -> usize {
        self.builds.iter().map(BuildOutcome::skipped).sum()
    }

    pub fn failed(&self) -> usize {
        self.builds.iter().map(BuildOutcome::failed).sum()
    }
}

/// Outcome of one pass. A policy that was disabled has no report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PassReport {
    pub options: VacuumOptions,
    pub age: Option<PolicyReport>,
    pub count: Option<PolicyReport>,
}

impl PassReport {
    pub fn policies(&self) -> impl Iterator<Item = &PolicyReport> {
        self.age.iter().chain(self.count.iter())
    }

    pub fn evicted_builds(&self) -> usize {
        self.policies().map(PolicyReport::evicted_builds).sum()
    }

    pub fn deleted(&self) -> usize {
        self.policies().map(PolicyReport::deleted).sum()
    }

    pub fn skipped(&self) -> usize {
        self.policies().map(PolicyReport::skipped).sum()
    }

    pub fn failed(&self) -> usize {
        self.policies().map(PolicyReport::failed).sum()
    }
}
