use std::{
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubmissionId(pub Uuid);

impl SubmissionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SubmissionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

/// Where the bytes of a dropped or picked file live.
///
/// Native drops and dialog picks only carry a path; web drops carry the bytes
/// directly. Neither form is read until the file is handed off.
#[derive(Clone, PartialEq, Eq)]
pub enum FileContent {
    Bytes(Arc<[u8]>),
    Path(PathBuf),
}

impl FileContent {
    pub fn in_memory(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self::Bytes(bytes.into())
    }

    /// Byte length when it is known without touching the filesystem.
    pub fn known_len(&self) -> Option<u64> {
        match self {
            Self::Bytes(bytes) => Some(bytes.len() as u64),
            Self::Path(_) => None,
        }
    }
}

impl fmt::Debug for FileContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bytes(bytes) => write!(f, "Bytes({} bytes)", bytes.len()),
            Self::Path(path) => f.debug_tuple("Path").field(path).finish(),
        }
    }
}

/// A file offered by a drop or a picker, before the accept filter has run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidate {
    pub name: String,
    pub mime_type: Option<String>,
    pub content: FileContent,
}

impl FileCandidate {
    pub fn from_bytes(
        name: impl Into<String>,
        mime_type: Option<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        Self {
            name: name.into(),
            mime_type: normalize_mime(mime_type),
            content: FileContent::in_memory(bytes),
        }
    }

    /// Builds a candidate from a filesystem path. Returns `None` when the path
    /// has no usable file name.
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();
        let name = path.file_name()?.to_str()?.to_string();
        Some(Self {
            name,
            mime_type: None,
            content: FileContent::Path(path.to_path_buf()),
        })
    }

    pub fn with_mime(mut self, mime_type: Option<String>) -> Self {
        self.mime_type = normalize_mime(mime_type);
        self
    }

    /// Declared MIME type, falling back to a guess from the file extension.
    pub fn effective_mime(&self) -> Option<String> {
        self.mime_type
            .clone()
            .or_else(|| guess_mime(&self.name))
    }
}

/// Metadata visible while a file is still being dragged over a drop target.
///
/// Platforms differ in what they expose mid-drag; either field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HoverItem {
    pub name: Option<String>,
    pub mime_type: Option<String>,
}

impl HoverItem {
    pub fn new(name: Option<String>, mime_type: Option<String>) -> Self {
        Self {
            name,
            mime_type: normalize_mime(mime_type),
        }
    }

    pub fn is_opaque(&self) -> bool {
        self.name.is_none() && self.mime_type.is_none()
    }
}

/// The single file held by the intake slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub mime_type: String,
    pub content: FileContent,
}

impl From<FileCandidate> for SelectedFile {
    fn from(candidate: FileCandidate) -> Self {
        let mime_type = candidate
            .effective_mime()
            .unwrap_or_else(|| "application/octet-stream".to_string());
        Self {
            name: candidate.name,
            mime_type,
            content: candidate.content,
        }
    }
}

pub fn guess_mime(name: &str) -> Option<String> {
    mime_guess::from_path(name).first_raw().map(str::to_string)
}

fn normalize_mime(mime_type: Option<String>) -> Option<String> {
    mime_type
        .map(|mime| mime.trim().to_ascii_lowercase())
        .filter(|mime| !mime.is_empty())
}
