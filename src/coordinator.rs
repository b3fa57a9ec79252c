use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::committer::{EventCommitter, sha256_hex};
use crate::error::PipelineError;
use crate::lifecycle::{
    CompleteRequest, EventDetails, EventEnvelope, EventRecord, FailRequest, JobMetadata,
    JobRecord, JobRegistry, JobStatus, ProgressRequest, ScheduleRequest, StartRequest,
    SubmitRequest,
};

/// Returned by a successful submission. Presentation URLs are derived by the
/// caller from these raw identifiers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReceipt {
    pub job_id: String,
    pub job_nid: String,
    pub tx_hash: String,
}

/// Returned by every successful non-submit transition.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionReceipt {
    pub job_nid: String,
    pub tx_hash: String,
}

/// Drives jobs through the lifecycle. The only component that writes to the
/// registry.
///
/// Every operation follows the same template: resolve payload defaults,
/// build the event envelope, commit it through the anchoring capability,
/// and only then apply it to the registry. A failed commit leaves the
/// registry untouched, so visible job state never gets ahead of the
/// external ledger.
///
/// Concurrent transitions for the same job are not serialized here; the
/// registry applies them in whatever order their commits land.
pub struct LifecycleCoordinator<C: EventCommitter> {
    committer: C,
    registry: Arc<JobRegistry>,
}

impl<C: EventCommitter> LifecycleCoordinator<C> {
    pub fn new(committer: C, registry: Arc<JobRegistry>) -> Self {
        Self {
            committer,
            registry,
        }
    }

    /// Submit a new job: register it as an asset, commit the `JobSubmitted`
    /// event, then create its registry record with that event as history.
    pub async fn submit(&self, req: SubmitRequest) -> Result<SubmitReceipt, PipelineError> {
        if req.job_id.trim().is_empty() {
            return Err(PipelineError::Validation("jobId must not be empty".into()));
        }

        let timestamp = Utc::now().timestamp();
        let metadata = JobMetadata {
            job_id: req.job_id.clone(),
            job_type: req.job_type.unwrap_or_else(|| "training".to_string()),
            submitted_by: req
                .submitted_by
                .unwrap_or_else(|| "0xDefaultAddress".to_string()),
            gpu_requirement: req.gpu_requirement.unwrap_or_default(),
            estimated_duration: req.estimated_duration.unwrap_or(3600),
            docker_image: req
                .docker_image
                .unwrap_or_else(|| "pytorch/pytorch:2.0-cuda11.7".to_string()),
            input_data_hash: req
                .input_data_hash
                .unwrap_or_else(|| sha256_hex(&serde_json::json!({ "job": req.job_id }))),
            priority: req.priority.unwrap_or_else(|| "medium".to_string()),
            status: JobStatus::Submitted,
            timestamp,
        };

        let nid = self
            .committer
            .register_asset(&metadata)
            .await
            .map_err(PipelineError::RegistrationFailed)?;

        let envelope = EventEnvelope {
            details: EventDetails::JobSubmitted {
                job_id: metadata.job_id.clone(),
                job_type: metadata.job_type.clone(),
                submitted_by: metadata.submitted_by.clone(),
                gpu_requirement: metadata.gpu_requirement.clone(),
                estimated_duration: metadata.estimated_duration,
                priority: metadata.priority.clone(),
            },
            job_nid: None,
            timestamp,
            executor: metadata.submitted_by.clone(),
        };
        let tx_hash = self
            .committer
            .commit_event(&nid, &envelope, "Job submitted to queue")
            .await
            .map_err(PipelineError::CommitFailed)?;

        let record = JobRecord {
            job_id: metadata.job_id.clone(),
            job_nid: nid.clone(),
            job_type: metadata.job_type,
            submitted_by: metadata.submitted_by,
            gpu_requirement: metadata.gpu_requirement,
            status: JobStatus::Submitted,
            events: vec![EventRecord {
                details: envelope.details,
                timestamp,
                tx_hash: tx_hash.clone(),
            }],
            created_at: Utc::now(),
        };
        self.registry.create_job(record).await?;

        Ok(SubmitReceipt {
            job_id: metadata.job_id,
            job_nid: nid,
            tx_hash,
        })
    }

    /// Record that a job was placed on a node by the scheduler.
    pub async fn schedule(
        &self,
        nid: &str,
        req: ScheduleRequest,
    ) -> Result<TransitionReceipt, PipelineError> {
        let scheduled_node = req
            .scheduled_node
            .unwrap_or_else(|| "gpu-node-01".to_string());
        let message = format!("Job scheduled on {scheduled_node}");
        let details = EventDetails::JobScheduled {
            scheduled_node,
            node_specs: req.node_specs.unwrap_or_default(),
            scheduled_time: req.scheduled_time.unwrap_or_else(|| Utc::now().to_rfc3339()),
            queue_position: req.queue_position.unwrap_or(1),
        };
        self.commit_and_apply(nid, details, "scheduler".to_string(), &message)
            .await
    }

    /// Record that execution began on a node.
    pub async fn start(
        &self,
        nid: &str,
        req: StartRequest,
    ) -> Result<TransitionReceipt, PipelineError> {
        let executor_node = req
            .executor_node
            .unwrap_or_else(|| "gpu-node-01".to_string());
        let container_id = req.container_id.unwrap_or_else(|| {
            let digest = sha256_hex(&serde_json::json!({ "nid": nid }));
            format!("docker://{}", &digest[..12])
        });
        let details = EventDetails::JobStarted {
            executor_node: executor_node.clone(),
            actual_start_time: Utc::now().to_rfc3339(),
            container_id,
            gpu_utilization: req.gpu_utilization.unwrap_or_default(),
            process_id: req.process_id.unwrap_or_else(synthetic_pid),
        };
        self.commit_and_apply(nid, details, executor_node, "Job execution started")
            .await
    }

    /// Record a progress checkpoint. Keeps the job in `running`.
    pub async fn progress(
        &self,
        nid: &str,
        req: ProgressRequest,
    ) -> Result<TransitionReceipt, PipelineError> {
        let progress = req.progress.unwrap_or(50.0);
        let message = format!("Progress checkpoint at {progress}%");
        let details = EventDetails::JobProgressUpdate {
            progress,
            current_epoch: req.current_epoch.unwrap_or(15),
            total_epochs: req.total_epochs.unwrap_or(30),
            avg_gpu_utilization: req.avg_gpu_utilization.unwrap_or(92.5),
            memory_usage: req.memory_usage.unwrap_or_else(|| "32GB/40GB".to_string()),
        };
        self.commit_and_apply(nid, details, "monitoring-system".to_string(), &message)
            .await
    }

    /// Record successful completion.
    pub async fn complete(
        &self,
        nid: &str,
        req: CompleteRequest,
    ) -> Result<TransitionReceipt, PipelineError> {
        let total_duration = req.total_duration.unwrap_or(3600);
        let details = EventDetails::JobCompleted {
            completion_status: req
                .completion_status
                .unwrap_or_else(|| "success".to_string()),
            actual_end_time: Utc::now().to_rfc3339(),
            total_duration,
            gpu_hours_used: req
                .gpu_hours_used
                .unwrap_or(total_duration as f64 / 3600.0),
            exit_code: req.exit_code.unwrap_or(0),
            output_artifacts: req.output_artifacts.unwrap_or_default(),
            final_metrics: req
                .final_metrics
                .unwrap_or_else(|| serde_json::json!({"accuracy": 0.945, "loss": 0.032})),
            c2pa_verified: true,
        };
        self.commit_and_apply(
            nid,
            details,
            "gpu-node-01".to_string(),
            "Job completed successfully",
        )
        .await
    }

    /// Record a failure. The event is committed like any other and the job's
    /// status becomes `failed`; whatever partial history preceded the
    /// failure stays in place.
    pub async fn fail(
        &self,
        nid: &str,
        req: FailRequest,
    ) -> Result<TransitionReceipt, PipelineError> {
        let error_code = req.error_code.unwrap_or_else(|| "UNKNOWN_ERROR".to_string());
        let message = format!("Job failed: {error_code}");
        let details = EventDetails::JobFailed {
            failure_time: Utc::now().to_rfc3339(),
            error_code,
            error_message: req
                .error_message
                .unwrap_or_else(|| "Job execution failed".to_string()),
            stack_trace: req
                .stack_trace
                .unwrap_or_else(|| "No stack trace available".to_string()),
            partial_output_nid: req.partial_output_nid,
            retry_attempt: req.retry_attempt.unwrap_or(1),
        };
        self.commit_and_apply(nid, details, "error-handler".to_string(), &message)
            .await
    }

    /// Commit-then-apply for every non-submit transition. The registry is
    /// only touched after the commit succeeded.
    async fn commit_and_apply(
        &self,
        nid: &str,
        details: EventDetails,
        executor: String,
        message: &str,
    ) -> Result<TransitionReceipt, PipelineError> {
        if nid.trim().is_empty() {
            return Err(PipelineError::Validation(
                "asset NID must not be empty".into(),
            ));
        }

        let timestamp = Utc::now().timestamp();
        let envelope = EventEnvelope {
            details,
            job_nid: Some(nid.to_string()),
            timestamp,
            executor,
        };
        let tx_hash = self
            .committer
            .commit_event(nid, &envelope, message)
            .await
            .map_err(PipelineError::CommitFailed)?;

        self.registry
            .append_event(
                nid,
                EventRecord {
                    details: envelope.details,
                    timestamp,
                    tx_hash: tx_hash.clone(),
                },
            )
            .await?;

        Ok(TransitionReceipt {
            job_nid: nid.to_string(),
            tx_hash,
        })
    }
}

// The original pipeline attributed a random pid when the executor did not
// report one.
fn synthetic_pid() -> u32 {
    (Uuid::new_v4().as_u128() % 90_000) as u32 + 10_000
}
