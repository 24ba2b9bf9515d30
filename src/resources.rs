use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Label carrying the build identifier on both records and workers.
pub const BUILD_LABEL: &str = "build";

pub type Labels = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    /// Build record, stored as a `Secret`.
    #[serde(rename = "secret")]
    Record,
    /// Job worker, stored as a `Pod`.
    #[serde(rename = "pod")]
    Worker,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Record => f.write_str("secret"),
            Self::Worker => f.write_str("pod"),
        }
    }
}

/// The resource that marks a build's existence and carries its creation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordResource {
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub labels: Labels,
}

impl RecordResource {
    pub fn build_id(&self) -> Option<&str> {
        self.labels.get(BUILD_LABEL).map(String::as_str)
    }
}

/// Lifecycle phase of a worker, mirroring the Kubernetes pod phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerPhase {
    Pending,
    Running,
    Succeeded,
    Failed,
    Unknown,
}

impl WorkerPhase {
    /// Parses a pod phase string. Anything unrecognised is `Unknown`.
    pub fn parse(phase: Option<&str>) -> Self {
        match phase {
            Some("Pending") => Self::Pending,
            Some("Running") => Self::Running,
            Some("Succeeded") => Self::Succeeded,
            Some("Failed") => Self::Failed,
            _ => Self::Unknown,
        }
    }

    /// Whether the worker is still in flight.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Pending | Self::Running)
    }
}

impl fmt::Display for WorkerPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerResource {
    pub name: String,
    pub labels: Labels,
    pub phase: WorkerPhase,
}

impl WorkerResource {
    pub fn build_id(&self) -> Option<&str> {
        self.labels.get(BUILD_LABEL).map(String::as_str)
    }
}

/// A label selector made of `key=value` equality requirements, all of which
/// must hold.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selector {
    requirements: Vec<(String, String)>,
}

impl Selector {
    /// Matches every resource in the namespace.
    pub fn everything() -> Self {
        Self::default()
    }

    /// Matches the records Brigade writes for each build.
    pub fn build_records() -> Self {
        Self::everything()
            .with("component", "build")
            .with("heritage", "brigade")
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.requirements.push((key.into(), value.into()));
        self
    }

    pub fn is_everything(&self) -> bool {
        self.requirements.is_empty()
    }

    #[cfg(test)]
    pub fn matches(&self, labels: &Labels) -> bool {
        self.requirements
            .iter()
            .all(|(key, value)| labels.get(key) == Some(value))
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self
            .requirements
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join(",");
        f.write_str(&rendered)
    }
}

/// Builds a label map from `(key, value)` pairs.
#[cfg(test)]
pub fn labels<const N: usize>(pairs: [(&str, &str); N]) -> Labels {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_records_selector_renders_for_kubernetes() {
        assert_eq!(
            Selector::build_records().to_string(),
            "component=build,heritage=brigade"
        );
        assert_eq!(Selector::everything().to_string(), "");
        assert!(Selector::everything().is_everything());
    }

    #[test]
    fn test_selector_requires_every_label() {
        let selector = Selector::build_records();

        assert!(selector.matches(&labels([
            ("component", "build"),
            ("heritage", "brigade"),
            ("build", "abc"),
        ])));
        assert!(!selector.matches(&labels([("component", "build")])));
        assert!(!selector.matches(&labels([
            ("component", "job"),
            ("heritage", "brigade"),
        ])));
        assert!(Selector::everything().matches(&Labels::new()));
    }

    #[test]
    fn test_worker_phase_parsing() {
        assert_eq!(WorkerPhase::parse(Some("Running")), WorkerPhase::Running);
        assert_eq!(WorkerPhase::parse(Some("Pending")), WorkerPhase::Pending);
        assert_eq!(WorkerPhase::parse(Some("Succeeded")), WorkerPhase::Succeeded);
        assert_eq!(WorkerPhase::parse(Some("Failed")), WorkerPhase::Failed);
        assert_eq!(WorkerPhase::parse(Some("Evicted")), WorkerPhase::Unknown);
        assert_eq!(WorkerPhase::parse(None), WorkerPhase::Unknown);

        assert!(WorkerPhase::Running.is_active());
        assert!(WorkerPhase::Pending.is_active());
        assert!(!WorkerPhase::Succeeded.is_active());
        assert!(!WorkerPhase::Unknown.is_active());
    }

    #[test]
    fn test_build_id_comes_from_build_label() {
        let record = RecordResource {
            name: "brigade-abc".to_string(),
            created_at: Utc::now(),
            labels: labels([("build", "abc")]),
        };
        assert_eq!(record.build_id(), Some("abc"));

        let orphan = RecordResource {
            labels: Labels::new(),
            ..record
        };
        assert_eq!(orphan.build_id(), None);
    }
}
