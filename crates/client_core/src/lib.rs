//! Client-side DARS intake: the single-slot file intake controller and the
//! collaborators a submitted document is handed off to.

pub mod ingestion;
pub mod intake;

pub use ingestion::{
    read_content, DocumentIngestion, HttpIngestionClient, IngestionError, LoggingIngestion,
};
pub use intake::{FileIntakeController, IntakeState, Prompt};
pub use reqwest::StatusCode;
