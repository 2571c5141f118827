//! Backend commands queued from UI to backend worker.

use shared::domain::SelectedFile;

pub enum BackendCommand {
    Ingest { file: SelectedFile },
}
