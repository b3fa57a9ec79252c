use chrono::DateTime;
use serde::Serialize;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::lifecycle::{EventEnvelope, JobMetadata};
use crate::numbers::{AssetRegistrationRequest, CommitRequest, NumbersClient, NumbersError};

/// Hex-encoded SHA-256 of a value's JSON serialization.
///
/// Struct field order is fixed, so the same logical content always hashes
/// to the same digest.
pub fn sha256_hex<T: Serialize>(value: &T) -> String {
    let bytes = serde_json::to_vec(value).unwrap_or_default();
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    format!("{:x}", hasher.finalize())
}

/// The anchoring capability: registers job assets and commits lifecycle
/// events against them.
///
/// Two implementations, selected once at startup: [`NumbersCommitter`]
/// performs real HTTP calls and can fail; [`MockCommitter`] synthesizes
/// identifiers and receipts offline and always succeeds.
pub trait EventCommitter {
    /// Register job metadata as an asset, returning its NID.
    async fn register_asset(&self, metadata: &JobMetadata) -> Result<String, NumbersError>;

    /// Durably commit one event payload, returning the receipt token.
    async fn commit_event(
        &self,
        nid: &str,
        envelope: &EventEnvelope,
        message: &str,
    ) -> Result<String, NumbersError>;
}

/// Live committer backed by the Numbers Protocol API.
pub struct NumbersCommitter {
    client: NumbersClient,
    asset_file_url: String,
}

impl NumbersCommitter {
    pub fn new(client: NumbersClient, asset_file_url: String) -> Self {
        Self {
            client,
            asset_file_url,
        }
    }
}

impl EventCommitter for NumbersCommitter {
    async fn register_asset(&self, metadata: &JobMetadata) -> Result<String, NumbersError> {
        let req = AssetRegistrationRequest {
            asset_file: self.asset_file_url.clone(),
            summary: format!("GPU Job: {}", metadata.job_id),
            custom_fields: serde_json::to_value(metadata).unwrap_or_default(),
        };
        let resp = self.client.register_asset(&req).await?;
        // The API responds with `cid`; everything downstream keys on it as
        // the job's NID.
        Ok(resp.cid)
    }

    async fn commit_event(
        &self,
        nid: &str,
        envelope: &EventEnvelope,
        message: &str,
    ) -> Result<String, NumbersError> {
        let created = DateTime::from_timestamp(envelope.timestamp, 0)
            .unwrap_or_default()
            .to_rfc3339();
        let req = CommitRequest {
            encoding_format: "application/json".to_string(),
            asset_cid: nid.to_string(),
            asset_timestamp_created: created,
            asset_creator: envelope.executor.clone(),
            asset_sha256: sha256_hex(envelope),
            summary: format!("Event: {}", envelope.details.event_type()),
            commit_message: message.to_string(),
            custom: serde_json::to_value(envelope).unwrap_or_default(),
        };
        let resp = self.client.commit_event(&req).await?;
        Ok(resp.receipt())
    }
}

/// Offline committer: fabricates NIDs and receipts with no network I/O.
/// Commits never fail here, so the rest of the pipeline can be exercised
/// without external dependencies.
pub struct MockCommitter;

impl EventCommitter for MockCommitter {
    async fn register_asset(&self, metadata: &JobMetadata) -> Result<String, NumbersError> {
        let seed = format!(
            "{}:{}",
            metadata.job_id,
            chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
        );
        let digest = sha256_hex(&seed);
        Ok(format!("bafybei{}", &digest[..45]))
    }

    async fn commit_event(
        &self,
        _nid: &str,
        envelope: &EventEnvelope,
        _message: &str,
    ) -> Result<String, NumbersError> {
        let suffix = Uuid::new_v4().simple().to_string();
        Ok(format!(
            "0xMOCK_TX_{}_{}",
            envelope.details.event_type(),
            &suffix[..8]
        ))
    }
}
