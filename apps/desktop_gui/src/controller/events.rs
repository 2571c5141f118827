//! UI/backend events and error modeling for desktop GUI controller.

use client_core::IngestionError;
use shared::{error::ErrorCode, protocol::IngestionReceipt};

pub enum UiEvent {
    Info(String),
    Ingested(IngestionReceipt),
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Validation,
    Io,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Ingest,
    General,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn new(
        category: UiErrorCategory,
        context: UiErrorContext,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            context,
            message: message.into(),
        }
    }

    pub fn from_ingestion(context: UiErrorContext, err: &IngestionError) -> Self {
        let category = match err {
            IngestionError::Read { .. } => UiErrorCategory::Io,
            IngestionError::InvalidServerUrl(_) => UiErrorCategory::Validation,
            IngestionError::Transport(_) | IngestionError::UnexpectedStatus(_) => {
                UiErrorCategory::Transport
            }
            IngestionError::Rejected { error, .. } => match error.code {
                ErrorCode::Validation
                | ErrorCode::UnsupportedMediaType
                | ErrorCode::PayloadTooLarge => UiErrorCategory::Validation,
                ErrorCode::Internal => UiErrorCategory::Unknown,
            },
        };

        Self::new(category, context, err.to_string())
    }

    /// Whether selecting and submitting the document again could succeed
    /// without the user changing anything.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.category,
            UiErrorCategory::Transport | UiErrorCategory::Unknown
        )
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status_line(&self) -> String {
        let prefix = match self.context {
            UiErrorContext::BackendStartup => "Upload service unavailable",
            UiErrorContext::Ingest => "Upload failed",
            UiErrorContext::General => "Error",
        };
        if self.is_retryable() && self.context == UiErrorContext::Ingest {
            format!("{prefix}: {}. Select the file again to retry.", self.message)
        } else {
            format!("{prefix}: {}", self.message)
        }
    }
}
