//! Batch manifest: a JSON summary of one batch run, written alongside the
//! distance matrix.

use crate::job::BatchJobRecord;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::fs::File;
use std::path::Path;

#[derive(Debug, Serialize, Deserialize)]
pub struct BatchManifest {
    pub created_at: DateTime<Utc>,
    pub kind: String,
    pub num_jobs: usize,
    pub success: usize,
    pub failure: usize,
    pub jobs: Vec<BatchJobRecord>,
}

impl BatchManifest {
    pub fn new(kind: impl Into<String>, created_at: DateTime<Utc>, jobs: Vec<BatchJobRecord>) -> Self {
        let success = jobs.iter().filter(|j| j.status == "ok").count();
        let failure = jobs.len() - success;
        BatchManifest {
            created_at,
            kind: kind.into(),
            num_jobs: jobs.len(),
            success,
            failure,
            jobs,
        }
    }
}

pub fn write_batch_manifest(path: &Path, manifest: &BatchManifest) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating manifest directory '{}'", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(manifest).context("serializing batch manifest to JSON")?;
    fs::write(path, json).with_context(|| format!("writing batch manifest '{}'", path.display()))
}

pub fn load_batch_manifest(path: &Path) -> Result<BatchManifest> {
    let file = File::open(path).with_context(|| format!("opening batch manifest '{}'", path.display()))?;
    serde_json::from_reader(file).with_context(|| format!("parsing batch manifest '{}'", path.display()))
}
