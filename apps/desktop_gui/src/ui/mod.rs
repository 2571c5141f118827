//! UI layer for the desktop uploader: the app shell and drag-and-drop input translation.

pub mod app;
pub mod drop_input;

pub use app::{DarsUploadApp, StartupConfig};
