mod cli;
mod committer;
mod config;
mod coordinator;
mod error;
mod lifecycle;
mod numbers;
mod query;
mod ui;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Command};
use committer::{EventCommitter, MockCommitter, NumbersCommitter};
use config::ComputeProofConfig;
use coordinator::LifecycleCoordinator;
use lifecycle::{
    CompleteRequest, JobRegistry, ProgressRequest, ScheduleRequest, StartRequest, SubmitRequest,
};
use numbers::NumbersClient;
use query::QueryService;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = ComputeProofConfig::load()?;
    if cli.mock {
        config.mock_numbers_api = true;
    }

    match cli.command {
        Command::Status => {
            println!("ComputeProof configuration:");
            println!("  MOCK_NUMBERS_API: {}", config.mock_numbers_api);
            println!("  CAPTURE_TOKEN: {}", config.masked_token());
            println!("  API_BASE: {}", config.api_base);
            println!("  COMMIT_API: {}", config.commit_api);
            println!("  ASSET_FILE_URL: {}", config.asset_file_url);
        }

        Command::Demo => {
            // The demo never touches the network, regardless of config.
            let registry = Arc::new(JobRegistry::new());
            let coordinator = LifecycleCoordinator::new(MockCommitter, Arc::clone(&registry));
            let query = QueryService::new(Arc::clone(&registry));
            run_demo(&coordinator, &query).await?;
        }

        Command::Submit {
            job_id,
            job_type,
            submitted_by,
            priority,
        } => {
            let req = SubmitRequest {
                job_id,
                job_type,
                submitted_by,
                priority,
                ..Default::default()
            };
            let registry = Arc::new(JobRegistry::new());
            if config.mock_numbers_api {
                let coordinator = LifecycleCoordinator::new(MockCommitter, registry);
                run_submit(&coordinator, req).await?;
            } else {
                let client = NumbersClient::new(
                    config.capture_token.clone(),
                    config.api_base.clone(),
                    config.commit_api.clone(),
                );
                let committer = NumbersCommitter::new(client, config.asset_file_url.clone());
                let coordinator = LifecycleCoordinator::new(committer, registry);
                run_submit(&coordinator, req).await?;
            }
        }
    }

    Ok(())
}

/// Submit one job and print its receipt with the presentation URLs.
async fn run_submit<C: EventCommitter>(
    coordinator: &LifecycleCoordinator<C>,
    req: SubmitRequest,
) -> Result<()> {
    let progress = ui::PipelineProgress::start(&format!("Submitting job {}", req.job_id));
    match coordinator.submit(req).await {
        Ok(receipt) => {
            progress.event_committed("JobSubmitted", &receipt.tx_hash);
            progress.finish();
            println!("Job NID: {}", receipt.job_nid);
            println!("Asset profile: {}", ui::asset_url(&receipt.job_nid));
            Ok(())
        }
        Err(err) => {
            progress.failed("submission", &err);
            progress.finish();
            Err(err.into())
        }
    }
}

/// Walk one job through the whole lifecycle in mock mode and print the
/// anchored history at the end.
async fn run_demo<C: EventCommitter>(
    coordinator: &LifecycleCoordinator<C>,
    query: &QueryService,
) -> Result<()> {
    let progress = ui::PipelineProgress::start("Running lifecycle demo");

    let receipt = coordinator
        .submit(SubmitRequest {
            job_id: "demo-job-001".into(),
            job_type: Some("training".into()),
            ..Default::default()
        })
        .await?;
    progress.event_committed("JobSubmitted", &receipt.tx_hash);
    let nid = receipt.job_nid;

    let r = coordinator
        .schedule(
            &nid,
            ScheduleRequest {
                scheduled_node: Some("gpu-node-07".into()),
                ..Default::default()
            },
        )
        .await?;
    progress.event_committed("JobScheduled", &r.tx_hash);

    let r = coordinator.start(&nid, StartRequest::default()).await?;
    progress.event_committed("JobStarted", &r.tx_hash);

    let r = coordinator
        .progress(
            &nid,
            ProgressRequest {
                progress: Some(50.0),
                ..Default::default()
            },
        )
        .await?;
    progress.event_committed("JobProgressUpdate", &r.tx_hash);

    let r = coordinator
        .complete(&nid, CompleteRequest::default())
        .await?;
    progress.event_committed("JobCompleted", &r.tx_hash);

    let record = query.get_job_history(&nid).await?;
    progress.finish();
    progress.print_history(&record);
    ui::print_job_list(query.list_jobs().await);

    Ok(())
}
