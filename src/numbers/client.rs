use std::time::Duration;

use reqwest::Client;

use super::error::NumbersError;
use super::types::{
    AssetRegistrationRequest, AssetRegistrationResponse, CommitRequest, CommitResponse,
};

pub struct NumbersClient {
    capture_token: String,
    client: Client,
    api_base: String,
    commit_api: String,
}

impl NumbersClient {
    /// Create a client for the given endpoints. Production URLs come from
    /// the config layer; tests point this at a local mock server.
    pub fn new(capture_token: String, api_base: String, commit_api: String) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to build HTTP client");
        Self {
            capture_token,
            client,
            api_base,
            commit_api,
        }
    }

    /// Register a job as an asset, returning the identifier the ledger will
    /// key all subsequent event commits on.
    pub async fn register_asset(
        &self,
        req: &AssetRegistrationRequest,
    ) -> Result<AssetRegistrationResponse, NumbersError> {
        let response = self
            .client
            .post(format!("{}/assets/", self.api_base))
            .header("Authorization", format!("token {}", self.capture_token))
            .header("Content-Type", "application/json")
            .json(req)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(NumbersError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.json::<AssetRegistrationResponse>().await?;
        Ok(body)
    }

    /// Commit one lifecycle event against a registered asset.
    pub async fn commit_event(&self, req: &CommitRequest) -> Result<CommitResponse, NumbersError> {
        let response = self
            .client
            .post(&self.commit_api)
            .header("Authorization", format!("token {}", self.capture_token))
            .header("Content-Type", "application/json")
            .json(req)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(NumbersError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.json::<CommitResponse>().await?;
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(server: &MockServer) -> NumbersClient {
        NumbersClient::new(
            "test-token".into(),
            server.uri(),
            format!("{}/commit", server.uri()),
        )
    }

    fn registration_request() -> AssetRegistrationRequest {
        AssetRegistrationRequest {
            asset_file: "https://picsum.photos/200/300".into(),
            summary: "GPU Job: j1".into(),
            custom_fields: json!({"jobId": "j1"}),
        }
    }

    fn commit_request() -> CommitRequest {
        CommitRequest {
            encoding_format: "application/json".into(),
            asset_cid: "bafybeixyz".into(),
            asset_timestamp_created: "2026-08-23T10:00:00+00:00".into(),
            asset_creator: "scheduler".into(),
            asset_sha256: "deadbeef".into(),
            summary: "Event: JobScheduled".into(),
            commit_message: "Job scheduled on gpu-node-01".into(),
            custom: json!({"eventType": "JobScheduled"}),
        }
    }

    #[tokio::test]
    async fn register_asset_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/assets/"))
            .and(header("Authorization", "token test-token"))
            .and(body_partial_json(json!({"abstract": "GPU Job: j1"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"cid": "bafybeij1"})))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let resp = client.register_asset(&registration_request()).await.unwrap();
        assert_eq!(resp.cid, "bafybeij1");
    }

    #[tokio::test]
    async fn register_asset_non_success_is_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/assets/"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid token"))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let err = client
            .register_asset(&registration_request())
            .await
            .unwrap_err();
        match err {
            NumbersError::ApiError { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "invalid token");
            }
            other => panic!("expected ApiError, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn commit_event_success_with_tx_hash() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/commit"))
            .and(body_partial_json(json!({"assetCid": "bafybeixyz"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"txHash": "0xabc"})))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let resp = client.commit_event(&commit_request()).await.unwrap();
        assert_eq!(resp.receipt(), "0xabc");
    }

    #[tokio::test]
    async fn commit_event_empty_body_resolves_pending() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/commit"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let resp = client.commit_event(&commit_request()).await.unwrap();
        assert_eq!(resp.receipt(), "pending");
    }

    #[tokio::test]
    async fn commit_event_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/commit"))
            .respond_with(ResponseTemplate::new(500).set_body_string("ledger unavailable"))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let err = client.commit_event(&commit_request()).await.unwrap_err();
        assert!(matches!(err, NumbersError::ApiError { status: 500, .. }));
    }
}
