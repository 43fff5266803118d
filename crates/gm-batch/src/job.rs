//! Batch job records: one (query index, target index) pair and its outcome.

use serde::{Deserialize, Serialize};

/// A single matching job: which pair of graphs (by index into the query
/// and target sets) to run C6 on.
#[derive(Debug, Clone, Copy)]
pub struct BatchJob {
    pub query_index: usize,
    pub target_index: usize,
}

/// Stable identifier for a job, used in logs and the manifest.
pub fn pair_id(job: &BatchJob) -> String {
    format!("{}:{}", job.query_index, job.target_index)
}

/// The outcome of one job, written to the manifest. Per spec.md §4.6, a
/// failed job is recorded with a `None` objective and an error message
/// rather than retried.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchJobRecord {
    pub pair_id: String,
    pub query_index: usize,
    pub target_index: usize,
    pub status: String,
    pub objective: Option<f64>,
    pub error: Option<String>,
}

impl BatchJobRecord {
    pub fn ok(job: &BatchJob, objective: f64) -> Self {
        BatchJobRecord {
            pair_id: pair_id(job),
            query_index: job.query_index,
            target_index: job.target_index,
            status: "ok".to_string(),
            objective: Some(objective),
            error: None,
        }
    }

    pub fn failed(job: &BatchJob, error: impl Into<String>) -> Self {
        BatchJobRecord {
            pair_id: pair_id(job),
            query_index: job.query_index,
            target_index: job.target_index,
            status: "error".to_string(),
            objective: None,
            error: Some(error.into()),
        }
    }
}

/// Enumerates every (query, target) pair. If `same_set` is true, only the
/// upper triangle (`query_index < target_index`) is enumerated; the lower
/// triangle is filled in by symmetry at finalization (spec.md §4.7).
pub fn enumerate_pairs(query_count: usize, target_count: usize, same_set: bool) -> Vec<BatchJob> {
    let mut jobs = Vec::new();
    for i in 0..query_count {
        let start = if same_set { i + 1 } else { 0 };
        for k in start..target_count {
            jobs.push(BatchJob {
                query_index: i,
                target_index: k,
            });
        }
    }
    jobs
}
