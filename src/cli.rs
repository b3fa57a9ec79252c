//! Interface de linha de comando do ComputeProof baseada em clap.
//!
//! Define a struct [`Cli`] com subcomandos [`Command`] (submit, demo, status)
//! e a flag global `--mock`.

use clap::{Parser, Subcommand};

/// ComputeProof — pipeline de recibos de jobs GPU ancorados em blockchain.
#[derive(Debug, Parser)]
#[command(name = "computeproof", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Força o modo mock (sem chamadas de rede) nesta sessão.
    #[arg(long, global = true, default_value_t = false)]
    pub mock: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Submete um job GPU e ancora o evento JobSubmitted.
    Submit {
        /// Identificador do job fornecido pelo chamador.
        job_id: String,

        /// Tipo do job (ex.: training, inference).
        #[arg(long)]
        job_type: Option<String>,

        /// Endereço de quem submete.
        #[arg(long)]
        submitted_by: Option<String>,

        /// Prioridade (low, medium, high).
        #[arg(long)]
        priority: Option<String>,
    },

    /// Executa a demonstração embutida: um job percorre todo o ciclo de
    /// vida em modo mock.
    Demo,

    /// Mostra a configuração ativa.
    Status,
}
