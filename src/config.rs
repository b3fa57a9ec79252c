//! Configuração do ComputeProof carregada a partir de `computeproof.toml`.
//!
//! A struct [`ComputeProofConfig`] contém todos os parâmetros configuráveis.
//! Valores não presentes no arquivo usam defaults sensíveis. As variáveis de
//! ambiente `CAPTURE_TOKEN`, `MOCK_NUMBERS_API` e `ASSET_FILE_BASE_URL` têm
//! precedência sobre o arquivo.

use anyhow::Result;
use serde::Deserialize;
use std::path::Path;

/// Configuração de nível superior carregada de `computeproof.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ComputeProofConfig {
    /// Token de captura da API Numbers Protocol.
    #[serde(default)]
    pub capture_token: String,

    /// URL base da API de registro de assets.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// URL do endpoint de commit de eventos.
    #[serde(default = "default_commit_api")]
    pub commit_api: String,

    /// URL pública usada como asset_file no registro.
    #[serde(default = "default_asset_file_url")]
    pub asset_file_url: String,

    /// Quando `true`, nenhuma chamada de rede é feita: NIDs e recibos são
    /// sintetizados localmente.
    #[serde(default)]
    pub mock_numbers_api: bool,
}

// Valor padrão da API de registro.
fn default_api_base() -> String {
    "https://api.numbersprotocol.io/api/v3".to_string()
}

// Valor padrão do endpoint de commit.
fn default_commit_api() -> String {
    "https://us-central1-numbers-protocol-api.cloudfunctions.net/nit-commit-to-jade".to_string()
}

// Valor padrão do asset_file: imagem pública de demonstração.
fn default_asset_file_url() -> String {
    "https://picsum.photos/200/300".to_string()
}

impl Default for ComputeProofConfig {
    fn default() -> Self {
        Self {
            capture_token: String::new(),
            api_base: default_api_base(),
            commit_api: default_commit_api(),
            asset_file_url: default_asset_file_url(),
            mock_numbers_api: false,
        }
    }
}

impl ComputeProofConfig {
    /// Carrega a configuração de `computeproof.toml` no diretório atual.
    /// Usa valores padrão se o arquivo não existir.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("computeproof.toml"))
    }

    /// Carrega a configuração do caminho fornecido, aplicando as variáveis
    /// de ambiente por cima.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            toml::from_str::<ComputeProofConfig>(&contents)?
        } else {
            Self::default()
        };

        // Variáveis de ambiente têm precedência sobre o arquivo.
        if let Ok(token) = std::env::var("CAPTURE_TOKEN")
            && !token.is_empty()
        {
            config.capture_token = token;
        }
        if let Ok(mock) = std::env::var("MOCK_NUMBERS_API") {
            config.mock_numbers_api = mock == "true";
        }
        if let Ok(url) = std::env::var("ASSET_FILE_BASE_URL")
            && !url.is_empty()
        {
            config.asset_file_url = url;
        }

        Ok(config)
    }

    /// Token mascarado para exibição: apenas os 4 últimos caracteres.
    pub fn masked_token(&self) -> String {
        if self.capture_token.is_empty() {
            "NOT SET".to_string()
        } else {
            let tail: String = self
                .capture_token
                .chars()
                .rev()
                .take(4)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect();
            format!("***{tail}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_values() {
        let config = ComputeProofConfig::default();
        assert!(config.capture_token.is_empty());
        assert_eq!(config.api_base, "https://api.numbersprotocol.io/api/v3");
        assert!(!config.mock_numbers_api);
    }

    #[test]
    fn deserialize_partial_toml() {
        let toml_str = r#"
            capture_token = "cap-test-123"
            mock_numbers_api = true
        "#;
        let config: ComputeProofConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.capture_token, "cap-test-123");
        assert!(config.mock_numbers_api);
        assert_eq!(config.api_base, "https://api.numbersprotocol.io/api/v3");
        assert_eq!(config.asset_file_url, "https://picsum.photos/200/300");
    }

    #[test]
    fn load_from_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("computeproof.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, r#"asset_file_url = "https://example.com/assets""#).unwrap();

        let config = ComputeProofConfig::load_from(&path).unwrap();
        // ASSET_FILE_BASE_URL pode sobrescrever em ambientes que a definem.
        if std::env::var("ASSET_FILE_BASE_URL").is_err() {
            assert_eq!(config.asset_file_url, "https://example.com/assets");
        }
        assert_eq!(config.commit_api, default_commit_api());
    }

    #[test]
    fn load_from_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ComputeProofConfig::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.api_base, default_api_base());
    }

    #[test]
    fn masked_token_shows_last_four() {
        let config = ComputeProofConfig {
            capture_token: "abcdef123456".into(),
            ..Default::default()
        };
        assert_eq!(config.masked_token(), "***3456");

        let empty = ComputeProofConfig::default();
        assert_eq!(empty.masked_token(), "NOT SET");
    }
}
