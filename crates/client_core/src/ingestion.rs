//! Hand-off of a submitted document to a document-ingestion collaborator.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{header::CONTENT_TYPE, Client, StatusCode};
use shared::{
    domain::{FileContent, SelectedFile, SubmissionId},
    error::ApiError,
    protocol::{IngestionReceipt, UploadQuery},
};
use thiserror::Error;
use tracing::{info, warn};
use url::Url;

pub const UPLOAD_PATH: &str = "dars/upload";

#[derive(Debug, Error)]
pub enum IngestionError {
    #[error("failed to read {name}: {source}")]
    Read {
        name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid ingestion server url: {0}")]
    InvalidServerUrl(#[from] url::ParseError),
    #[error("ingestion transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("ingestion server rejected document ({status}): {}", .error.message)]
    Rejected { status: StatusCode, error: ApiError },
    #[error("ingestion server returned unexpected status {0}")]
    UnexpectedStatus(StatusCode),
}

/// The sole point where a selected document leaves the client.
#[async_trait]
pub trait DocumentIngestion: Send + Sync {
    async fn ingest(&self, file: SelectedFile) -> Result<IngestionReceipt, IngestionError>;
}

/// Loads the bytes behind a selected file.
pub async fn read_content(file: &SelectedFile) -> Result<Vec<u8>, IngestionError> {
    match &file.content {
        FileContent::Bytes(bytes) => Ok(bytes.to_vec()),
        FileContent::Path(path) => tokio::fs::read(path)
            .await
            .map_err(|source| IngestionError::Read {
                name: file.name.clone(),
                source,
            }),
    }
}

/// Records the hand-off locally without contacting any service.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingIngestion;

#[async_trait]
impl DocumentIngestion for LoggingIngestion {
    async fn ingest(&self, file: SelectedFile) -> Result<IngestionReceipt, IngestionError> {
        let bytes = read_content(&file).await?;
        let receipt = IngestionReceipt {
            submission_id: SubmissionId::new(),
            filename: file.name,
            mime_type: file.mime_type,
            size_bytes: bytes.len() as u64,
            received_at: Utc::now(),
        };
        info!(
            submission_id = %receipt.submission_id,
            file = %receipt.filename,
            size_bytes = receipt.size_bytes,
            "uploading file"
        );
        Ok(receipt)
    }
}

/// Posts the raw document bytes to `{server}/dars/upload`.
#[derive(Debug, Clone)]
pub struct HttpIngestionClient {
    http: Client,
    endpoint: Url,
}

impl HttpIngestionClient {
    pub fn new(server_url: &str) -> Result<Self, IngestionError> {
        Self::with_client(Client::new(), server_url)
    }

    pub fn with_client(http: Client, server_url: &str) -> Result<Self, IngestionError> {
        let mut base = Url::parse(server_url.trim())?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let endpoint = base.join(UPLOAD_PATH)?;
        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl DocumentIngestion for HttpIngestionClient {
    async fn ingest(&self, file: SelectedFile) -> Result<IngestionReceipt, IngestionError> {
        let bytes = read_content(&file).await?;
        let size_bytes = bytes.len();
        let query = UploadQuery {
            filename: Some(file.name.clone()),
            mime_type: Some(file.mime_type.clone()),
        };

        let response = self
            .http
            .post(self.endpoint.clone())
            .query(&query)
            .header(CONTENT_TYPE, file.mime_type.as_str())
            .body(bytes)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let receipt: IngestionReceipt = response.json().await?;
            info!(
                submission_id = %receipt.submission_id,
                file = %receipt.filename,
                size_bytes,
                "document accepted by ingestion server"
            );
            return Ok(receipt);
        }

        match response.json::<ApiError>().await {
            Ok(error) => {
                warn!(%status, file = %file.name, message = %error.message, "ingestion server rejected document");
                Err(IngestionError::Rejected { status, error })
            }
            Err(_) => Err(IngestionError::UnexpectedStatus(status)),
        }
    }
}

#[cfg(test)]
#[path = "tests/ingestion_tests.rs"]
mod tests;
