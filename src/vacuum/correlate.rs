use indexmap::IndexMap;

use crate::resources::{RecordResource, WorkerResource};

/// Resources sharing one build id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Matched<'a> {
    pub workers: &'a [WorkerResource],
    pub records: &'a [RecordResource],
}

/// Index from `build` label value to the resources carrying it.
///
/// Built from unfiltered listings: workers are never covered by the record
/// selector, and a build may own records the selector does not match.
/// Resources without a build label are not indexed.
#[derive(Debug, Default)]
pub struct BuildIndex {
    workers: IndexMap<String, Vec<WorkerResource>>,
    records: IndexMap<String, Vec<RecordResource>>,
}

impl BuildIndex {
    pub fn new(records: Vec<RecordResource>, workers: Vec<WorkerResource>) -> Self {
        let mut index = Self::default();

        for worker in workers {
            if let Some(build_id) = worker.build_id() {
                let build_id = build_id.to_string();
                index.workers.entry(build_id).or_default().push(worker);
            }
        }

        for record in records {
            if let Some(build_id) = record.build_id() {
                let build_id = build_id.to_string();
                index.records.entry(build_id).or_default().push(record);
            }
        }

        index
    }

    pub fn correlate(&self, build_id: &str) -> Matched<'_> {
        Matched {
            workers: self.workers.get(build_id).map_or(&[][..], Vec::as_slice),
            records: self.records.get(build_id).map_or(&[][..], Vec::as_slice),
        }
    }

    /// Number of distinct build ids seen across both kinds.
    pub fn builds(&self) -> usize {
        self.workers
            .keys()
            .chain(self.records.keys().filter(|k| !self.workers.contains_key(*k)))
            .count()
    }
}
