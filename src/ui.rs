//! Interface de terminal do ComputeProof — spinners e saída colorida.
//!
//! Usa as crates `indicatif` para spinners de progresso e `console` para
//! estilização com cores. As URLs de exploração/verificação são uma questão
//! de apresentação e por isso vivem aqui, não no núcleo do pipeline.

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::lifecycle::{JobRecord, JobStatus};
use crate::query::JobSummary;

/// Monta a URL do explorador de blocos para um recibo de commit.
pub fn explorer_url(tx_hash: &str) -> String {
    format!("https://mainnet.num.network/tx/{tx_hash}")
}

/// Monta a URL do perfil público do asset de um job.
pub fn asset_url(nid: &str) -> String {
    format!("https://verify.numbersprotocol.io/asset-profile/{nid}")
}

/// Indicador visual de progresso para o ciclo de vida de um job no terminal.
pub struct PipelineProgress {
    // Barra de progresso/spinner do indicatif.
    pb: ProgressBar,
    // Estilo verde para commits bem-sucedidos.
    green: Style,
    // Estilo vermelho para falhas.
    red: Style,
    // Estilo ciano para identificadores.
    cyan: Style,
}

impl PipelineProgress {
    /// Inicia o spinner com a descrição do job.
    pub fn start(description: &str) -> Self {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .expect("invalid template"),
        );
        pb.set_message(description.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));

        Self {
            pb,
            green: Style::new().green().bold(),
            red: Style::new().red().bold(),
            cyan: Style::new().cyan(),
        }
    }

    /// Exibe um evento ancorado com seu recibo e a URL do explorador.
    pub fn event_committed(&self, event_type: &str, tx_hash: &str) {
        self.pb.println(format!(
            "  {} {event_type} committed, TX: {}",
            self.green.apply_to("✓"),
            self.cyan.apply_to(tx_hash)
        ));
        self.pb.println(format!("    {}", explorer_url(tx_hash)));
    }

    /// Exibe uma falha do pipeline.
    pub fn failed(&self, context: &str, error: &dyn std::error::Error) {
        self.pb.println(format!(
            "  {} {context}: {error}",
            self.red.apply_to("✗")
        ));
    }

    /// Finaliza o spinner.
    pub fn finish(&self) {
        self.pb.finish_and_clear();
    }

    /// Imprime o histórico completo de um job formatado em JSON.
    pub fn print_history(&self, record: &JobRecord) {
        let status_style = match record.status {
            JobStatus::Completed => &self.green,
            JobStatus::Failed => &self.red,
            _ => &self.cyan,
        };
        println!();
        println!(
            "{}",
            status_style.apply_to(format!(
                "─── Job {} ({} events, {}) ───",
                record.job_id,
                record.events.len(),
                record.status
            ))
        );
        println!(
            "{}",
            serde_json::to_string_pretty(record).unwrap_or_default()
        );
        println!("Asset profile: {}", asset_url(&record.job_nid));
    }
}

/// Imprime a lista de jobs conhecidos, mais recentes primeiro.
pub fn print_job_list(mut summaries: Vec<JobSummary>) {
    summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    println!("{} job(s):", summaries.len());
    for s in summaries {
        println!(
            "  {} [{}] {} — {} events",
            s.job_id, s.status, s.job_nid, s.total_events
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explorer_url_format() {
        assert_eq!(
            explorer_url("0xabc"),
            "https://mainnet.num.network/tx/0xabc"
        );
    }

    #[test]
    fn asset_url_format() {
        assert_eq!(
            asset_url("bafybeixyz"),
            "https://verify.numbersprotocol.io/asset-profile/bafybeixyz"
        );
    }
}
