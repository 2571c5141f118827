use std::{path::PathBuf, sync::Arc};

use anyhow::{bail, Context, Result};
use clap::Parser;
use client_core::{DocumentIngestion, FileIntakeController, HttpIngestionClient, LoggingIngestion};
use shared::{
    accept::{Rejection, RejectionReason},
    domain::FileCandidate,
    protocol::IngestionReceipt,
};

#[derive(Parser, Debug)]
#[command(name = "dars_upload", about = "Submit a DARS report from the command line")]
struct Args {
    /// Ingestion server base URL. Without it, the submission is only logged.
    #[arg(long)]
    server_url: Option<String>,
    /// Files offered to the intake slot; only the first accepted one is submitted.
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();
    let args = Args::parse();

    let ingestion: Arc<dyn DocumentIngestion> = match args.server_url.as_deref() {
        Some(url) => Arc::new(
            HttpIngestionClient::new(url).with_context(|| format!("invalid server url {url}"))?,
        ),
        None => Arc::new(LoggingIngestion),
    };

    let receipt = submit_files(ingestion.as_ref(), &args.files).await?;
    println!("{}", serde_json::to_string_pretty(&receipt)?);
    Ok(())
}

async fn submit_files(
    ingestion: &dyn DocumentIngestion,
    files: &[PathBuf],
) -> Result<IngestionReceipt> {
    let candidates: Vec<FileCandidate> = files.iter().filter_map(FileCandidate::from_path).collect();

    let mut intake = FileIntakeController::default();
    intake.on_picker_selection(candidates);
    for rejection in intake.last_rejections() {
        eprintln!("skipped {}", describe_rejection(rejection));
    }

    let Some(file) = intake.submit() else {
        bail!(
            "no acceptable {} file among {} argument(s)",
            intake.filter().label,
            files.len()
        );
    };

    let name = file.name.clone();
    tracing::debug!(file = %name, mime_type = %file.mime_type, "submitting accepted file");
    ingestion
        .ingest(file)
        .await
        .with_context(|| format!("failed to submit {name}"))
}

fn describe_rejection(rejection: &Rejection) -> String {
    match rejection.reason {
        RejectionReason::FileInvalidType => format!("{}: not an accepted file type", rejection.name),
        RejectionReason::TooManyFiles { limit } => {
            format!("{}: only {limit} file may be submitted", rejection.name)
        }
    }
}
