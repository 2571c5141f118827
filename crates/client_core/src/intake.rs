//! Single-slot intake for a dropped or picked document.
//!
//! The controller is owned by the UI event loop and performs no I/O. It holds
//! at most one [`SelectedFile`]; the newest accepted file always replaces the
//! previous one, and [`FileIntakeController::submit`] empties the slot.

use std::fmt;

use shared::{
    accept::{AcceptFilter, FilterOutcome, Rejection},
    domain::{FileCandidate, HoverItem, SelectedFile},
};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntakeState {
    Idle,
    DragActive,
    FileSelected,
}

/// Placeholder text shown inside the drop target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    FileSelected { name: String },
    DropHere { label: String },
    Idle { label: String },
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileSelected { name } => write!(f, "File selected: {name}"),
            Self::DropHere { label } => write!(f, "Drop the {label} file here..."),
            Self::Idle { label } => write!(
                f,
                "Drag and drop your DARS {label} here, or click to select a file"
            ),
        }
    }
}

#[derive(Debug, Default)]
pub struct FileIntakeController {
    filter: AcceptFilter,
    selected: Option<SelectedFile>,
    drag_active: bool,
    last_rejections: Vec<Rejection>,
}

impl FileIntakeController {
    pub fn new(filter: AcceptFilter) -> Self {
        Self {
            filter,
            selected: None,
            drag_active: false,
            last_rejections: Vec::new(),
        }
    }

    pub fn filter(&self) -> &AcceptFilter {
        &self.filter
    }

    pub fn state(&self) -> IntakeState {
        if self.selected.is_some() {
            IntakeState::FileSelected
        } else if self.drag_active {
            IntakeState::DragActive
        } else {
            IntakeState::Idle
        }
    }

    pub fn selected(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    pub fn is_drag_active(&self) -> bool {
        self.drag_active
    }

    /// Submit is only offered while a file is held.
    pub fn can_submit(&self) -> bool {
        self.selected.is_some()
    }

    /// Rejections from the most recent batch that had any. Cleared by the next
    /// accepted file or by submit.
    pub fn last_rejections(&self) -> &[Rejection] {
        &self.last_rejections
    }

    pub fn prompt(&self) -> Prompt {
        let label = self.filter.label.clone();
        match (&self.selected, self.drag_active) {
            (Some(file), _) => Prompt::FileSelected {
                name: file.name.clone(),
            },
            (None, true) => Prompt::DropHere { label },
            (None, false) => Prompt::Idle { label },
        }
    }

    pub fn on_drag_enter(&mut self, items: &[HoverItem]) -> IntakeState {
        self.drag_active = self.filter.is_compatible_hover(items);
        debug!(
            items = items.len(),
            compatible = self.drag_active,
            "drag entered drop target"
        );
        self.state()
    }

    pub fn on_drag_leave(&mut self) -> IntakeState {
        if self.drag_active {
            debug!("drag left drop target");
        }
        self.drag_active = false;
        self.state()
    }

    pub fn on_drop(&mut self, candidates: Vec<FileCandidate>) -> IntakeState {
        self.drag_active = false;
        self.offer(candidates)
    }

    pub fn on_picker_selection(&mut self, candidates: Vec<FileCandidate>) -> IntakeState {
        self.offer(candidates)
    }

    /// Stores the first candidate, replacing whatever was held. Any further
    /// candidates are ignored.
    pub fn on_files_accepted(&mut self, candidates: Vec<FileCandidate>) {
        let extra = candidates.len().saturating_sub(1);
        let Some(first) = candidates.into_iter().next() else {
            return;
        };
        if extra > 0 {
            debug!(ignored = extra, "ignoring accepted files beyond the first");
        }

        let file = SelectedFile::from(first);
        match &self.selected {
            Some(previous) => debug!(
                previous = %previous.name,
                file = %file.name,
                "replacing selected file"
            ),
            None => debug!(file = %file.name, "file selected"),
        }
        self.selected = Some(file);
        self.drag_active = false;
        self.last_rejections.clear();
    }

    /// Rejected candidates are never stored; the held file stays as it was.
    pub fn on_rejected(&mut self, rejected: Vec<Rejection>) {
        for rejection in &rejected {
            warn!(file = %rejection.name, reason = ?rejection.reason, "file rejected by accept filter");
        }
        self.drag_active = false;
        if !rejected.is_empty() {
            self.last_rejections = rejected;
        }
    }

    /// Empties the slot and hands back the held file for ingestion.
    ///
    /// Returns `None` and leaves the state untouched when nothing is held.
    pub fn submit(&mut self) -> Option<SelectedFile> {
        let file = self.selected.take()?;
        self.last_rejections.clear();
        info!(file = %file.name, mime_type = %file.mime_type, "submitting selected file");
        Some(file)
    }

    fn offer(&mut self, candidates: Vec<FileCandidate>) -> IntakeState {
        let FilterOutcome { accepted, rejected } = self.filter.evaluate(candidates);
        self.on_files_accepted(accepted);
        self.on_rejected(rejected);
        self.state()
    }
}

#[cfg(test)]
#[path = "tests/intake_tests.rs"]
mod tests;
