use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::PipelineError;
use crate::lifecycle::{JobRecord, JobRegistry, JobStatus};

/// Dashboard-facing view of one job, without its event history.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSummary {
    pub job_id: String,
    pub job_nid: String,
    pub job_type: String,
    pub submitted_by: String,
    pub status: JobStatus,
    pub total_events: usize,
    pub created_at: DateTime<Utc>,
}

impl From<JobRecord> for JobSummary {
    fn from(record: JobRecord) -> Self {
        Self {
            job_id: record.job_id,
            job_nid: record.job_nid,
            job_type: record.job_type,
            submitted_by: record.submitted_by,
            status: record.status,
            total_events: record.events.len(),
            created_at: record.created_at,
        }
    }
}

/// Read-only views over the registry for the dashboard collaborator.
/// Never writes.
pub struct QueryService {
    registry: Arc<JobRegistry>,
}

impl QueryService {
    pub fn new(registry: Arc<JobRegistry>) -> Self {
        Self { registry }
    }

    /// Summaries of all known jobs. Unordered snapshot; callers sort as
    /// needed (the dashboard sorts by `created_at` descending).
    pub async fn list_jobs(&self) -> Vec<JobSummary> {
        self.registry
            .list_all()
            .await
            .into_iter()
            .map(JobSummary::from)
            .collect()
    }

    /// Full record for one job, history included. `NotFound` means the job
    /// does not exist; a job with an empty history is a valid result, not
    /// an error.
    pub async fn get_job_history(&self, nid: &str) -> Result<JobRecord, PipelineError> {
        self.registry.get(nid).await
    }
}
