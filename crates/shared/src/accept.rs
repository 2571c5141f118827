//! Accept filter: which files a single upload slot takes, and how many.

use serde::{Deserialize, Serialize};

use crate::domain::{FileCandidate, HoverItem};

/// One accepted document type: a MIME pattern plus the extensions that imply it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptRule {
    pub mime_pattern: String,
    pub extensions: Vec<String>,
}

impl AcceptRule {
    pub fn new(mime_pattern: impl Into<String>, extensions: &[&str]) -> Self {
        Self {
            mime_pattern: mime_pattern.into().to_ascii_lowercase(),
            extensions: extensions
                .iter()
                .map(|ext| normalize_extension(ext))
                .collect(),
        }
    }

    pub fn matches_mime(&self, mime_type: &str) -> bool {
        let mime_type = mime_type.trim().to_ascii_lowercase();
        match self.mime_pattern.strip_suffix("/*") {
            Some(top_level) => mime_type
                .split_once('/')
                .is_some_and(|(kind, _)| kind == top_level),
            None => mime_type == self.mime_pattern,
        }
    }

    pub fn matches_name(&self, name: &str) -> bool {
        extension_of(name).is_some_and(|ext| self.extensions.iter().any(|known| *known == ext))
    }

    /// A file matches when either its MIME type or its extension is accepted.
    pub fn matches(&self, name: &str, mime_type: Option<&str>) -> bool {
        mime_type.is_some_and(|mime| self.matches_mime(mime)) || self.matches_name(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "kebab-case")]
pub enum RejectionReason {
    FileInvalidType,
    TooManyFiles { limit: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    pub name: String,
    pub reason: RejectionReason,
}

/// Candidates split into those the slot may take and those it must drop.
///
/// `accepted` preserves the order the candidates were offered in.
#[derive(Debug, Default)]
pub struct FilterOutcome {
    pub accepted: Vec<FileCandidate>,
    pub rejected: Vec<Rejection>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptFilter {
    pub label: String,
    pub rules: Vec<AcceptRule>,
    pub max_files: usize,
}

impl Default for AcceptFilter {
    fn default() -> Self {
        Self::pdf_only()
    }
}

impl AcceptFilter {
    pub fn pdf_only() -> Self {
        Self {
            label: "PDF".to_string(),
            rules: vec![AcceptRule::new("application/pdf", &[".pdf"])],
            max_files: 1,
        }
    }

    pub fn accepts(&self, name: &str, mime_type: Option<&str>) -> bool {
        self.rules.iter().any(|rule| rule.matches(name, mime_type))
    }

    pub fn accepts_candidate(&self, candidate: &FileCandidate) -> bool {
        let mime_type = candidate.effective_mime();
        self.accepts(&candidate.name, mime_type.as_deref())
    }

    /// Whether a file still in flight could be dropped here.
    ///
    /// Items with no visible metadata count as compatible since they can only
    /// be judged once dropped.
    pub fn is_compatible_hover(&self, items: &[HoverItem]) -> bool {
        items.iter().any(|item| {
            item.is_opaque()
                || self.accepts(item.name.as_deref().unwrap_or_default(), item.mime_type.as_deref())
        })
    }

    /// Runs the type check on every candidate, then keeps at most `max_files`
    /// of the survivors in offer order.
    pub fn evaluate(&self, candidates: Vec<FileCandidate>) -> FilterOutcome {
        let mut outcome = FilterOutcome::default();
        for candidate in candidates {
            if !self.accepts_candidate(&candidate) {
                outcome.rejected.push(Rejection {
                    name: candidate.name,
                    reason: RejectionReason::FileInvalidType,
                });
            } else if outcome.accepted.len() >= self.max_files {
                outcome.rejected.push(Rejection {
                    name: candidate.name,
                    reason: RejectionReason::TooManyFiles {
                        limit: self.max_files,
                    },
                });
            } else {
                outcome.accepted.push(candidate);
            }
        }
        outcome
    }

    /// Extensions without the leading dot, as native file dialogs expect them.
    pub fn dialog_extensions(&self) -> Vec<String> {
        self.rules
            .iter()
            .flat_map(|rule| rule.extensions.iter())
            .map(|ext| ext.trim_start_matches('.').to_string())
            .collect()
    }
}

fn normalize_extension(ext: &str) -> String {
    let ext = ext.trim().to_ascii_lowercase();
    if ext.starts_with('.') {
        ext
    } else {
        format!(".{ext}")
    }
}

fn extension_of(name: &str) -> Option<String> {
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(format!(".{}", ext.to_ascii_lowercase()))
}
