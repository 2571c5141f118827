//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread};

use client_core::{DocumentIngestion, HttpIngestionClient, IngestionError, LoggingIngestion};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorCategory, UiErrorContext, UiEvent};

/// Which collaborator submitted documents are handed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestionTarget {
    Local,
    Server { server_url: String },
}

impl IngestionTarget {
    pub fn from_server_url(server_url: Option<&str>) -> Self {
        match server_url.map(str::trim).filter(|url| !url.is_empty()) {
            Some(url) => Self::Server {
                server_url: url.to_string(),
            },
            None => Self::Local,
        }
    }

    pub fn build(&self) -> Result<Arc<dyn DocumentIngestion>, IngestionError> {
        let ingestion: Arc<dyn DocumentIngestion> = match self {
            Self::Local => Arc::new(LoggingIngestion),
            Self::Server { server_url } => Arc::new(HttpIngestionClient::new(server_url)?),
        };
        Ok(ingestion)
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Local => "local log".to_string(),
            Self::Server { server_url } => server_url.clone(),
        }
    }
}

pub fn launch(cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>, target: IngestionTarget) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::new(
                    UiErrorCategory::Io,
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        let ingestion = match target.build() {
            Ok(ingestion) => ingestion,
            Err(err) => {
                tracing::error!(ingestion = %target.describe(), "failed to configure ingestion: {err}");
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_ingestion(
                    UiErrorContext::BackendStartup,
                    &err,
                )));
                return;
            }
        };
        tracing::info!(ingestion = %target.describe(), "backend worker ready");
        let _ = ui_tx.try_send(UiEvent::Info(format!(
            "Ready; submissions go to {}",
            target.describe()
        )));

        runtime.block_on(async move {
            while let Ok(cmd) = cmd_rx.recv() {
                handle_command(ingestion.as_ref(), cmd, &ui_tx).await;
            }
            tracing::debug!("ui command queue closed; backend worker exiting");
        });
    });
}

pub async fn handle_command(
    ingestion: &dyn DocumentIngestion,
    cmd: BackendCommand,
    ui_tx: &Sender<UiEvent>,
) {
    match cmd {
        BackendCommand::Ingest { file } => {
            let name = file.name.clone();
            match ingestion.ingest(file).await {
                Ok(receipt) => {
                    let _ = ui_tx.try_send(UiEvent::Ingested(receipt));
                }
                Err(err) => {
                    tracing::error!(file = %name, "document hand-off failed: {err}");
                    let _ = ui_tx.try_send(UiEvent::Error(UiError::from_ingestion(
                        UiErrorContext::Ingest,
                        &err,
                    )));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;
    use shared::domain::{FileCandidate, SelectedFile};


    #[test]
    fn blank_server_url_falls_back_to_local_target() {
        assert_eq!(IngestionTarget::from_server_url(None), IngestionTarget::Local);
        assert_eq!(
            IngestionTarget::from_server_url(Some("   ")),
            IngestionTarget::Local
        );
        assert_eq!(
            IngestionTarget::from_server_url(Some(" http://127.0.0.1:8000 ")),
            IngestionTarget::Server {
                server_url: "http://127.0.0.1:8000".to_string()
            }
        );
    }

    #[test]
    fn malformed_server_url_fails_to_build() {
        let target = IngestionTarget::Server {
            server_url: "::not a url::".to_string(),
        };
        assert!(target.build().is_err());
    }

    #[test]
    fn launched_worker_announces_its_target() {
        let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(1);
        let (ui_tx, ui_rx) = bounded(4);
        drop(cmd_tx);

        launch(cmd_rx, ui_tx, IngestionTarget::Local);

        match ui_rx.recv_timeout(std::time::Duration::from_secs(5)) {
            Ok(UiEvent::Info(message)) => {
                assert_eq!(message, "Ready; submissions go to local log")
            }
            Ok(_) => panic!("expected a ready message"),
            Err(err) => panic!("worker sent nothing: {err}"),
        }
    }

    #[test]
    fn worker_with_bad_server_url_reports_startup_error() {
        let (_cmd_tx, cmd_rx) = bounded::<BackendCommand>(1);
        let (ui_tx, ui_rx) = bounded(4);

        launch(
            cmd_rx,
            ui_tx,
            IngestionTarget::Server {
                server_url: "::not a url::".to_string(),
            },
        );

        match ui_rx.recv_timeout(std::time::Duration::from_secs(5)) {
            Ok(UiEvent::Error(err)) => {
                assert_eq!(err.context(), UiErrorContext::BackendStartup);
                assert_eq!(err.category(), UiErrorCategory::Validation);
            }
            Ok(_) => panic!("expected a startup error"),
            Err(err) => panic!("worker sent nothing: {err}"),
        }
    }

    #[tokio::test]
    async fn ingest_command_reports_receipt() {
        let (ui_tx, ui_rx) = bounded(4);
        let file = SelectedFile::from(FileCandidate::from_bytes(
            "transcript.pdf",
            None,
            b"%PDF-1.7".to_vec(),
        ));

        handle_command(&LoggingIngestion, BackendCommand::Ingest { file }, &ui_tx).await;

        match ui_rx.try_recv().expect("event") {
            UiEvent::Ingested(receipt) => {
                assert_eq!(receipt.filename, "transcript.pdf");
                assert_eq!(receipt.size_bytes, 8);
            }
            _ => panic!("expected an ingestion receipt"),
        }
    }

    #[tokio::test]
    async fn failed_ingest_reports_io_error() {
        let (ui_tx, ui_rx) = bounded(4);
        let file = SelectedFile::from(
            FileCandidate::from_path("/nonexistent/coursematch/report.pdf").expect("candidate"),
        );

        handle_command(&LoggingIngestion, BackendCommand::Ingest { file }, &ui_tx).await;

        match ui_rx.try_recv().expect("event") {
            UiEvent::Error(err) => {
                assert_eq!(err.category(), UiErrorCategory::Io);
                assert_eq!(err.context(), UiErrorContext::Ingest);
            }
            _ => panic!("expected an error event"),
        }
    }
}
