//! Tipos de erro para o cliente da API Numbers Protocol.
//!
//! Define [`NumbersError`] com variantes para timeout, erros da API e erros
//! de rede. Usa `thiserror` para derivar `Display` e `Error` automaticamente
//! a partir dos atributos `#[error(...)]`.

use thiserror::Error;

/// Erros que podem ocorrer ao interagir com a API do Numbers Protocol.
///
/// As variantes cobrem os três cenários mais comuns de falha:
/// - [`Timeout`](NumbersError::Timeout) — a chamada excedeu o prazo limite
/// - [`ApiError`](NumbersError::ApiError) — qualquer erro HTTP (4xx/5xx)
/// - [`Network`](NumbersError::Network) — falha na camada de rede
#[derive(Debug, Error)]
pub enum NumbersError {
    /// A chamada não respondeu dentro do prazo configurado no cliente.
    #[error("request timed out")]
    Timeout,

    /// Erro retornado pela API (ex.: 401 token inválido, 500 erro interno).
    /// Contém o código de status HTTP e a mensagem de erro do corpo da resposta.
    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    /// Falha de rede subjacente (DNS, conexão recusada).
    /// Encapsula o erro original do `reqwest`.
    #[error("network error: {0}")]
    Network(reqwest::Error),
}

// Timeouts do reqwest viram a variante dedicada para que a camada superior
// possa distingui-los de outras falhas de rede.
impl From<reqwest::Error> for NumbersError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            NumbersError::Timeout
        } else {
            NumbersError::Network(err)
        }
    }
}
