//! Tipos de dados para requisições e respostas da API Numbers Protocol.
//!
//! Todas as structs derivam `Serialize`/`Deserialize` para conversão JSON
//! conforme o formato esperado pelos endpoints `assets/` (registro) e
//! `nit-commit-to-jade` (commit de eventos).

use serde::{Deserialize, Serialize};

/// Corpo da requisição para registrar um job como asset (`POST assets/`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetRegistrationRequest {
    /// URL pública do arquivo associado ao asset.
    pub asset_file: String,
    /// Descrição curta do asset (ex.: "GPU Job: job-123").
    #[serde(rename = "abstract")]
    pub summary: String,
    /// Metadados completos do job, anexados ao asset.
    pub custom_fields: serde_json::Value,
}

/// Resposta do registro de asset.
///
/// A API retorna `cid`; as camadas superiores tratam esse valor como o NID
/// do job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetRegistrationResponse {
    /// Identificador de conteúdo do asset registrado.
    pub cid: String,
}

/// Corpo da requisição de commit de um evento de ciclo de vida.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitRequest {
    /// Formato do payload ("application/json").
    pub encoding_format: String,
    /// NID do asset ao qual o evento pertence.
    pub asset_cid: String,
    /// Timestamp de criação do evento em formato ISO 8601.
    pub asset_timestamp_created: String,
    /// Quem executou a transição (nó, scheduler, sistema de monitoramento).
    pub asset_creator: String,
    /// SHA-256 hex do payload serializado, para verificação externa.
    pub asset_sha256: String,
    /// Descrição curta do evento (ex.: "Event: JobScheduled").
    #[serde(rename = "abstract")]
    pub summary: String,
    /// Mensagem de commit legível por humanos.
    pub commit_message: String,
    /// O payload completo do evento.
    pub custom: serde_json::Value,
}

/// Resposta do endpoint de commit.
///
/// Implantações diferentes do serviço retornam o token do recibo em campos
/// distintos; [`receipt`](CommitResponse::receipt) resolve a precedência.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommitResponse {
    #[serde(rename = "txHash", skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cid: Option<String>,
}

impl CommitResponse {
    /// Resolve o token do recibo: `txHash`, depois `transaction_hash`,
    /// depois `cid`. Quando nenhum está presente o serviço aceitou a
    /// escrita sem token — o sentinela `"pending"` é retornado.
    pub fn receipt(&self) -> String {
        self.tx_hash
            .clone()
            .or_else(|| self.transaction_hash.clone())
            .or_else(|| self.cid.clone())
            .unwrap_or_else(|| "pending".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn registration_request_uses_abstract_field() {
        let req = AssetRegistrationRequest {
            asset_file: "https://example.com/assets/j1".into(),
            summary: "GPU Job: j1".into(),
            custom_fields: json!({"jobId": "j1"}),
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["abstract"], "GPU Job: j1");
        assert_eq!(value["asset_file"], "https://example.com/assets/j1");
        assert!(value.get("summary").is_none());
    }

    #[test]
    fn commit_request_wire_format() {
        let req = CommitRequest {
            encoding_format: "application/json".into(),
            asset_cid: "bafybeixyz".into(),
            asset_timestamp_created: "2026-08-23T10:00:00+00:00".into(),
            asset_creator: "scheduler".into(),
            asset_sha256: "deadbeef".into(),
            summary: "Event: JobScheduled".into(),
            commit_message: "Job scheduled on gpu-node-01".into(),
            custom: json!({"eventType": "JobScheduled"}),
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["encodingFormat"], "application/json");
        assert_eq!(value["assetCid"], "bafybeixyz");
        assert_eq!(value["assetSha256"], "deadbeef");
        assert_eq!(value["abstract"], "Event: JobScheduled");
        assert_eq!(value["commitMessage"], "Job scheduled on gpu-node-01");
        assert_eq!(value["custom"]["eventType"], "JobScheduled");
    }

    #[test]
    fn receipt_prefers_tx_hash() {
        let resp = CommitResponse {
            tx_hash: Some("0xabc".into()),
            transaction_hash: Some("0xdef".into()),
            cid: Some("bafy".into()),
        };
        assert_eq!(resp.receipt(), "0xabc");
    }

    #[test]
    fn receipt_falls_back_to_transaction_hash_then_cid() {
        let resp = CommitResponse {
            tx_hash: None,
            transaction_hash: Some("0xdef".into()),
            cid: Some("bafy".into()),
        };
        assert_eq!(resp.receipt(), "0xdef");

        let resp = CommitResponse {
            tx_hash: None,
            transaction_hash: None,
            cid: Some("bafy".into()),
        };
        assert_eq!(resp.receipt(), "bafy");
    }

    #[test]
    fn receipt_pending_sentinel_when_empty() {
        let resp = CommitResponse::default();
        assert_eq!(resp.receipt(), "pending");
    }

    #[test]
    fn commit_response_deserialize_from_api_format() {
        let api_json = r#"{"txHash": "0x123", "extra_field": "ignored"}"#;
        let resp: CommitResponse = serde_json::from_str(api_json).unwrap();
        assert_eq!(resp.receipt(), "0x123");
    }
}
