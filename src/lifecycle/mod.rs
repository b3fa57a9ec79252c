mod event;
mod registry;

pub use event::{
    CompleteRequest, EventDetails, EventEnvelope, EventRecord, FailRequest, GpuRequirement,
    GpuUtilization, JobMetadata, JobRecord, JobStatus, NodeSpecs, ProgressRequest,
    ScheduleRequest, StartRequest, SubmitRequest,
};
pub use registry::JobRegistry;
