//! In-memory cluster used by the engine tests.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use kube::core::ErrorResponse;

use crate::error::{Result, VacuumError};
use crate::providers::ResourceAccessor;
use crate::resources::{
    labels, Labels, RecordResource, ResourceKind, Selector, WorkerPhase, WorkerResource,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListRecords(String),
    ListWorkers(String),
    DeleteRecord(String),
    DeleteWorker(String),
}

#[derive(Default)]
struct State {
    records: Vec<RecordResource>,
    workers: Vec<WorkerResource>,
    failing_deletes: HashSet<String>,
    /// Successful listings left before each key starts failing.
    failing_lists: HashMap<String, usize>,
    calls: Vec<Call>,
}

#[derive(Clone, Default)]
pub struct MemoryCluster {
    state: Arc<Mutex<State>>,
}

impl MemoryCluster {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    /// Adds a record the build selector can see.
    pub fn add_record(&self, name: &str, created_at: DateTime<Utc>, build_id: &str) {
        self.add_record_with_labels(
            name,
            created_at,
            labels([
                ("component", "build"),
                ("heritage", "brigade"),
                ("build", build_id),
            ]),
        );
    }

    pub fn add_record_with_labels(&self, name: &str, created_at: DateTime<Utc>, labels: Labels) {
        self.state().records.push(RecordResource {
            name: name.to_string(),
            created_at,
            labels,
        });
    }

    pub fn add_worker(&self, name: &str, build_id: &str, phase: WorkerPhase) {
        self.state().workers.push(WorkerResource {
            name: name.to_string(),
            labels: labels([("build", build_id), ("component", "job")]),
            phase,
        });
    }

    /// Makes every deletion of `name` fail with a transport error.
    pub fn fail_delete(&self, name: &str) {
        self.state().failing_deletes.insert(name.to_string());
    }

    /// Makes listing fail for `kind` when called with `selector`.
    pub fn fail_list(&self, kind: ResourceKind, selector: &Selector) {
        self.fail_list_after(kind, selector, 0);
    }

    /// Lets `successes` listings of `kind` with `selector` through, then fails.
    pub fn fail_list_after(&self, kind: ResourceKind, selector: &Selector, successes: usize) {
        self.state()
            .failing_lists
            .insert(format!("{kind}/{selector}"), successes);
    }

    pub fn record_names(&self) -> Vec<String> {
        self.state().records.iter().map(|r| r.name.clone()).collect()
    }

    pub fn worker_names(&self) -> Vec<String> {
        self.state().workers.iter().map(|w| w.name.clone()).collect()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state().calls.clone()
    }

    fn check_list(state: &mut State, kind: ResourceKind, selector: &Selector) -> Result<()> {
        match state.failing_lists.get_mut(&format!("{kind}/{selector}")) {
            Some(0) => Err(api_error(403, "Forbidden", format!("listing {kind}s refused"))),
            Some(remaining) => {
                *remaining -= 1;
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn check_delete(state: &State, kind: ResourceKind, name: &str, exists: bool) -> Result<()> {
        if state.failing_deletes.contains(name) {
            return Err(api_error(
                503,
                "ServiceUnavailable",
                format!("connection reset deleting {kind} {name}"),
            ));
        }
        if !exists {
            return Err(api_error(404, "NotFound", format!("{kind} {name} not found")));
        }
        Ok(())
    }
}

/// A failure shaped like the ones the API server returns.
fn api_error(code: u16, reason: &str, message: String) -> VacuumError {
    VacuumError::Kube(kube::Error::Api(ErrorResponse {
        status: "Failure".to_string(),
        message,
        reason: reason.to_string(),
        code,
    }))
}

#[async_trait]
impl ResourceAccessor for MemoryCluster {
    async fn list_records(&self, selector: &Selector) -> Result<Vec<RecordResource>> {
        let mut state = self.state();
        state.calls.push(Call::ListRecords(selector.to_string()));
        Self::check_list(&mut state, ResourceKind::Record, selector)?;
        Ok(state
            .records
            .iter()
            .filter(|r| selector.matches(&r.labels))
            .cloned()
            .collect())
    }

    async fn list_workers(&self, selector: &Selector) -> Result<Vec<WorkerResource>> {
        let mut state = self.state();
        state.calls.push(Call::ListWorkers(selector.to_string()));
        Self::check_list(&mut state, ResourceKind::Worker, selector)?;
        Ok(state
            .workers
            .iter()
            .filter(|w| selector.matches(&w.labels))
            .cloned()
            .collect())
    }

    async fn delete_record(&self, name: &str) -> Result<()> {
        let mut state = self.state();
        state.calls.push(Call::DeleteRecord(name.to_string()));
        let exists = state.records.iter().any(|r| r.name == name);
        Self::check_delete(&state, ResourceKind::Record, name, exists)?;
        state.records.retain(|r| r.name != name);
        Ok(())
    }

    async fn delete_worker(&self, name: &str) -> Result<()> {
        let mut state = self.state();
        state.calls.push(Call::DeleteWorker(name.to_string()));
        let exists = state.workers.iter().any(|w| w.name == name);
        Self::check_delete(&state, ResourceKind::Worker, name, exists)?;
        state.workers.retain(|w| w.name != name);
        Ok(())
    }
}
