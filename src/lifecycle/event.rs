use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a job.
///
/// Always derived from the most recently applied event, never set directly
/// by callers. `completed` and `failed` are terminal for display purposes
/// only; the registry keeps accepting appends after them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Submitted,
    Scheduled,
    Running,
    Completed,
    Failed,
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Submitted => write!(f, "submitted"),
            JobStatus::Scheduled => write!(f, "scheduled"),
            JobStatus::Running => write!(f, "running"),
            JobStatus::Completed => write!(f, "completed"),
            JobStatus::Failed => write!(f, "failed"),
        }
    }
}

/// GPU resources requested at submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GpuRequirement {
    #[serde(rename = "type")]
    pub gpu_type: String,
    pub count: u32,
    pub memory: String,
}

impl Default for GpuRequirement {
    fn default() -> Self {
        Self {
            gpu_type: "NVIDIA-A100".to_string(),
            count: 1,
            memory: "40GB".to_string(),
        }
    }
}

/// Hardware profile of the node a job was scheduled on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSpecs {
    pub gpu_model: String,
    pub cpu_cores: u32,
    #[serde(rename = "ramGB")]
    pub ram_gb: u32,
}

impl Default for NodeSpecs {
    fn default() -> Self {
        Self {
            gpu_model: "NVIDIA A100 80GB".to_string(),
            cpu_cores: 32,
            ram_gb: 256,
        }
    }
}

/// GPU allocation snapshot reported when a job starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpuUtilization {
    pub allocated: u32,
    pub temperature: Vec<f64>,
}

impl Default for GpuUtilization {
    fn default() -> Self {
        Self {
            allocated: 1,
            temperature: vec![65.0, 66.0],
        }
    }
}

/// Transition-specific payload, tagged by event type.
///
/// Serializes to the flat camelCase shape the anchoring service expects,
/// with the variant name as the `eventType` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "eventType", rename_all_fields = "camelCase")]
pub enum EventDetails {
    JobSubmitted {
        job_id: String,
        job_type: String,
        submitted_by: String,
        gpu_requirement: GpuRequirement,
        estimated_duration: u64,
        priority: String,
    },
    JobScheduled {
        scheduled_node: String,
        node_specs: NodeSpecs,
        scheduled_time: String,
        queue_position: u32,
    },
    JobStarted {
        executor_node: String,
        actual_start_time: String,
        container_id: String,
        gpu_utilization: GpuUtilization,
        process_id: u32,
    },
    JobProgressUpdate {
        progress: f64,
        current_epoch: u32,
        total_epochs: u32,
        avg_gpu_utilization: f64,
        memory_usage: String,
    },
    JobCompleted {
        completion_status: String,
        actual_end_time: String,
        total_duration: u64,
        gpu_hours_used: f64,
        exit_code: i32,
        output_artifacts: Vec<String>,
        final_metrics: serde_json::Value,
        c2pa_verified: bool,
    },
    JobFailed {
        failure_time: String,
        error_code: String,
        error_message: String,
        stack_trace: String,
        partial_output_nid: Option<String>,
        retry_attempt: u32,
    },
}

impl EventDetails {
    /// The `eventType` tag this payload serializes under.
    pub fn event_type(&self) -> &'static str {
        match self {
            EventDetails::JobSubmitted { .. } => "JobSubmitted",
            EventDetails::JobScheduled { .. } => "JobScheduled",
            EventDetails::JobStarted { .. } => "JobStarted",
            EventDetails::JobProgressUpdate { .. } => "JobProgressUpdate",
            EventDetails::JobCompleted { .. } => "JobCompleted",
            EventDetails::JobFailed { .. } => "JobFailed",
        }
    }

    /// The status a job takes once this event is applied. Progress updates
    /// keep a job in `running`.
    pub fn status(&self) -> JobStatus {
        match self {
            EventDetails::JobSubmitted { .. } => JobStatus::Submitted,
            EventDetails::JobScheduled { .. } => JobStatus::Scheduled,
            EventDetails::JobStarted { .. } => JobStatus::Running,
            EventDetails::JobProgressUpdate { .. } => JobStatus::Running,
            EventDetails::JobCompleted { .. } => JobStatus::Completed,
            EventDetails::JobFailed { .. } => JobStatus::Failed,
        }
    }
}

/// The exact payload committed to the anchoring service for one transition.
///
/// Field order is fixed by the struct, so serializing the same logical
/// content always produces the same bytes — the content hash the committer
/// derives from it is reproducible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventEnvelope {
    #[serde(flatten)]
    pub details: EventDetails,
    /// Absent on `JobSubmitted`, whose asset does not exist yet at build time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_nid: Option<String>,
    /// Seconds since epoch, assigned by the coordinator at commit time.
    pub timestamp: i64,
    /// Who performed the transition (submitter, scheduler, executor node...).
    pub executor: String,
}

/// One committed lifecycle transition in a job's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    #[serde(flatten)]
    pub details: EventDetails,
    pub timestamp: i64,
    /// Receipt from the anchoring service, or `"pending"` when the service
    /// accepted the write without returning a token.
    pub tx_hash: String,
}

/// One job and its append-only event history, keyed by asset NID.
///
/// Created exactly once per successful submission; afterwards mutated only
/// by appending events and re-deriving `status`. `created_at` is set at
/// registration and never changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    pub job_id: String,
    pub job_nid: String,
    pub job_type: String,
    pub submitted_by: String,
    pub gpu_requirement: GpuRequirement,
    pub status: JobStatus,
    pub events: Vec<EventRecord>,
    pub created_at: DateTime<Utc>,
}

/// Full job metadata registered as the asset's custom fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobMetadata {
    pub job_id: String,
    pub job_type: String,
    pub submitted_by: String,
    pub gpu_requirement: GpuRequirement,
    pub estimated_duration: u64,
    pub docker_image: String,
    pub input_data_hash: String,
    pub priority: String,
    pub status: JobStatus,
    pub timestamp: i64,
}

/// Inbound payload for submitting a job. Every field except `job_id` is
/// optional; the coordinator fills documented defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubmitRequest {
    pub job_id: String,
    /// Defaults to "training".
    pub job_type: Option<String>,
    /// Defaults to "0xDefaultAddress".
    pub submitted_by: Option<String>,
    /// Defaults to one NVIDIA-A100 with 40GB.
    pub gpu_requirement: Option<GpuRequirement>,
    /// Defaults to 3600 seconds.
    pub estimated_duration: Option<u64>,
    /// Defaults to "pytorch/pytorch:2.0-cuda11.7".
    pub docker_image: Option<String>,
    /// Defaults to the SHA-256 of `{"job": job_id}`.
    pub input_data_hash: Option<String>,
    /// Defaults to "medium".
    pub priority: Option<String>,
}

/// Inbound payload for the scheduled transition.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScheduleRequest {
    /// Defaults to "gpu-node-01".
    pub scheduled_node: Option<String>,
    pub node_specs: Option<NodeSpecs>,
    /// Defaults to the current time in ISO 8601.
    pub scheduled_time: Option<String>,
    /// Defaults to 1.
    pub queue_position: Option<u32>,
}

/// Inbound payload for the started transition.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StartRequest {
    /// Defaults to "gpu-node-01"; also used as the event's executor.
    pub executor_node: Option<String>,
    /// Defaults to `docker://` plus a hash-derived suffix.
    pub container_id: Option<String>,
    pub gpu_utilization: Option<GpuUtilization>,
    /// Defaults to a synthetic pid in 10000..99999.
    pub process_id: Option<u32>,
}

/// Inbound payload for a progress checkpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgressRequest {
    /// Percentage, defaults to 50.
    pub progress: Option<f64>,
    /// Defaults to 15.
    pub current_epoch: Option<u32>,
    /// Defaults to 30.
    pub total_epochs: Option<u32>,
    /// Defaults to 92.5.
    pub avg_gpu_utilization: Option<f64>,
    /// Defaults to "32GB/40GB".
    pub memory_usage: Option<String>,
}

/// Inbound payload for the completed transition.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompleteRequest {
    /// Defaults to "success".
    pub completion_status: Option<String>,
    /// Defaults to 3600 seconds.
    pub total_duration: Option<u64>,
    /// Defaults to total duration divided by 3600.
    pub gpu_hours_used: Option<f64>,
    /// Defaults to 0.
    pub exit_code: Option<i32>,
    pub output_artifacts: Option<Vec<String>>,
    /// Defaults to `{"accuracy": 0.945, "loss": 0.032}`.
    pub final_metrics: Option<serde_json::Value>,
}

/// Inbound payload for the failed transition.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FailRequest {
    /// Defaults to "UNKNOWN_ERROR".
    pub error_code: Option<String>,
    /// Defaults to "Job execution failed".
    pub error_message: Option<String>,
    /// Defaults to "No stack trace available".
    pub stack_trace: Option<String>,
    pub partial_output_nid: Option<String>,
    /// Defaults to 1.
    pub retry_attempt: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_display_is_lowercase() {
        assert_eq!(JobStatus::Submitted.to_string(), "submitted");
        assert_eq!(JobStatus::Running.to_string(), "running");
        assert_eq!(JobStatus::Failed.to_string(), "failed");
    }

    #[test]
    fn event_details_status_mapping() {
        let progress = EventDetails::JobProgressUpdate {
            progress: 75.0,
            current_epoch: 20,
            total_epochs: 30,
            avg_gpu_utilization: 90.0,
            memory_usage: "32GB/40GB".into(),
        };
        assert_eq!(progress.status(), JobStatus::Running);
        assert_eq!(progress.event_type(), "JobProgressUpdate");
    }

    #[test]
    fn scheduled_event_serializes_flat_with_tag() {
        let envelope = EventEnvelope {
            details: EventDetails::JobScheduled {
                scheduled_node: "gpu-node-07".into(),
                node_specs: NodeSpecs::default(),
                scheduled_time: "2026-08-23T10:00:00+00:00".into(),
                queue_position: 2,
            },
            job_nid: Some("bafybeixyz".into()),
            timestamp: 1_766_000_000,
            executor: "scheduler".into(),
        };
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["eventType"], "JobScheduled");
        assert_eq!(value["scheduledNode"], "gpu-node-07");
        assert_eq!(value["nodeSpecs"]["ramGB"], 256);
        assert_eq!(value["queuePosition"], 2);
        assert_eq!(value["jobNid"], "bafybeixyz");
        assert_eq!(value["executor"], "scheduler");
    }

    #[test]
    fn submitted_envelope_omits_nid() {
        let envelope = EventEnvelope {
            details: EventDetails::JobSubmitted {
                job_id: "j1".into(),
                job_type: "training".into(),
                submitted_by: "0xDefaultAddress".into(),
                gpu_requirement: GpuRequirement::default(),
                estimated_duration: 3600,
                priority: "medium".into(),
            },
            job_nid: None,
            timestamp: 1_766_000_000,
            executor: "0xDefaultAddress".into(),
        };
        let value = serde_json::to_value(&envelope).unwrap();
        assert!(value.get("jobNid").is_none());
        assert_eq!(value["gpuRequirement"]["type"], "NVIDIA-A100");
        assert_eq!(value["eventType"], "JobSubmitted");
    }

    #[test]
    fn completed_event_camel_case_fields() {
        let details = EventDetails::JobCompleted {
            completion_status: "success".into(),
            actual_end_time: "2026-08-23T11:00:00+00:00".into(),
            total_duration: 7200,
            gpu_hours_used: 2.0,
            exit_code: 0,
            output_artifacts: vec!["model.pt".into()],
            final_metrics: json!({"accuracy": 0.97}),
            c2pa_verified: true,
        };
        let value = serde_json::to_value(&details).unwrap();
        assert_eq!(value["completionStatus"], "success");
        assert_eq!(value["gpuHoursUsed"], 2.0);
        assert_eq!(value["c2paVerified"], true);
    }

    #[test]
    fn event_record_roundtrip() {
        let record = EventRecord {
            details: EventDetails::JobFailed {
                failure_time: "2026-08-23T11:00:00+00:00".into(),
                error_code: "CUDA_OOM".into(),
                error_message: "out of memory".into(),
                stack_trace: "No stack trace available".into(),
                partial_output_nid: None,
                retry_attempt: 2,
            },
            timestamp: 1_766_000_000,
            tx_hash: "0xabc".into(),
        };
        let json = serde_json::to_string(&record).unwrap();
        let parsed: EventRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
        assert_eq!(parsed.details.status(), JobStatus::Failed);
    }

    #[test]
    fn submit_request_partial_json_uses_defaults() {
        let req: SubmitRequest = serde_json::from_str(r#"{"jobId": "j1"}"#).unwrap();
        assert_eq!(req.job_id, "j1");
        assert!(req.job_type.is_none());
        assert!(req.gpu_requirement.is_none());

        let req: SubmitRequest =
            serde_json::from_str(r#"{"jobId": "j2", "priority": "high"}"#).unwrap();
        assert_eq!(req.priority.as_deref(), Some("high"));
    }

    #[test]
    fn gpu_requirement_default_matches_contract() {
        let gpu = GpuRequirement::default();
        assert_eq!(gpu.gpu_type, "NVIDIA-A100");
        assert_eq!(gpu.count, 1);
        assert_eq!(gpu.memory, "40GB");
    }
}
