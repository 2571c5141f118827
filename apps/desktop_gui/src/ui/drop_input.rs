//! Translation of egui's raw drag-and-drop input into intake candidates.

use std::{fs, path::Path};

use shared::domain::{FileCandidate, FileContent, HoverItem, SelectedFile};

pub fn hover_items(hovered: &[egui::HoveredFile]) -> Vec<HoverItem> {
    hovered
        .iter()
        .map(|file| {
            HoverItem::new(
                file.path.as_deref().and_then(file_name_of),
                Some(file.mime.clone()),
            )
        })
        .collect()
}

/// Dropped entries with neither bytes nor a path cannot be read later and are
/// skipped.
pub fn dropped_candidates(dropped: &[egui::DroppedFile]) -> Vec<FileCandidate> {
    dropped.iter().filter_map(candidate_from_dropped).collect()
}

fn candidate_from_dropped(file: &egui::DroppedFile) -> Option<FileCandidate> {
    let mime_type = Some(file.mime.clone());
    if let Some(bytes) = &file.bytes {
        let name = if file.name.is_empty() {
            file.path.as_deref().and_then(file_name_of)?
        } else {
            file.name.clone()
        };
        return Some(FileCandidate::from_bytes(name, mime_type, bytes.clone()));
    }

    let path = file.path.as_ref()?;
    Some(FileCandidate::from_path(path)?.with_mime(mime_type))
}

fn file_name_of(path: &Path) -> Option<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
}

pub fn selected_size_text(file: &SelectedFile) -> Option<String> {
    let bytes = file.content.known_len().or_else(|| match &file.content {
        FileContent::Path(path) => fs::metadata(path).ok().map(|meta| meta.len()),
        FileContent::Bytes(_) => None,
    })?;
    Some(human_readable_bytes(bytes))
}

pub fn human_readable_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes < KB {
        return format!("{bytes} B");
    }
    if bytes < MB {
        return format_scaled_unit(bytes, KB, "KB");
    }
    if bytes < GB {
        return format_scaled_unit(bytes, MB, "MB");
    }
    format_scaled_unit(bytes, GB, "GB")
}

fn format_scaled_unit(bytes: u64, unit_size: u64, unit_label: &str) -> String {
    let value = bytes as f64 / unit_size as f64;
    let value_text = format!("{value:.1}");
    let compact_value = value_text.strip_suffix(".0").unwrap_or(&value_text);
    format!("{compact_value} {unit_label}")
}
