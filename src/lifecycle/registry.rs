use std::collections::HashMap;

use tokio::sync::RwLock;

use super::event::{EventRecord, JobRecord};
use crate::error::PipelineError;

/// Authoritative in-memory store of job records and their event histories.
///
/// One coarse lock guards the whole map; critical sections are short and
/// never perform I/O. Transitions may arrive out of their natural order —
/// the registry appends whatever arrives, in arrival order, and always
/// overwrites `status` from the most recently applied event. Last-write-wins
/// on status, append-only on history: an ordering race never blocks or
/// rejects a caller.
///
/// Records are never removed; the store grows for the life of the process.
pub struct JobRegistry {
    jobs: RwLock<HashMap<String, JobRecord>>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self {
            jobs: RwLock::new(HashMap::new()),
        }
    }

    /// Insert a new record keyed by its asset NID.
    ///
    /// Re-inserting the same NID with identical initial fields is a no-op
    /// success, so a retried submission is harmless. A NID collision with
    /// different fields is `AlreadyExists`.
    pub async fn create_job(&self, record: JobRecord) -> Result<(), PipelineError> {
        let mut jobs = self.jobs.write().await;
        if let Some(existing) = jobs.get(&record.job_nid) {
            let identical = existing.job_id == record.job_id
                && existing.job_type == record.job_type
                && existing.submitted_by == record.submitted_by
                && existing.gpu_requirement == record.gpu_requirement;
            if identical {
                return Ok(());
            }
            return Err(PipelineError::AlreadyExists(record.job_nid.clone()));
        }
        jobs.insert(record.job_nid.clone(), record);
        Ok(())
    }

    /// Append one committed event and re-derive the job's status from it.
    pub async fn append_event(&self, nid: &str, event: EventRecord) -> Result<(), PipelineError> {
        let mut jobs = self.jobs.write().await;
        let job = jobs
            .get_mut(nid)
            .ok_or_else(|| PipelineError::NotFound(nid.to_string()))?;
        job.status = event.details.status();
        job.events.push(event);
        Ok(())
    }

    /// Snapshot copy of one job.
    pub async fn get(&self, nid: &str) -> Result<JobRecord, PipelineError> {
        self.jobs
            .read()
            .await
            .get(nid)
            .cloned()
            .ok_or_else(|| PipelineError::NotFound(nid.to_string()))
    }

    /// Snapshot copies of all jobs. No ordering guarantee; callers sort.
    pub async fn list_all(&self) -> Vec<JobRecord> {
        self.jobs.read().await.values().cloned().collect()
    }
}

impl Default for JobRegistry {
    fn default() -> Self {
        Self::new()
    }
}
