//! Local input files: metadata capture and video-only selection.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

const FALLBACK_MIME: &str = "application/octet-stream";

/// Extension → MIME type for the container formats the service accepts.
const VIDEO_TYPES: &[(&str, &str)] = &[
    ("mp4", "video/mp4"),
    ("m4v", "video/x-m4v"),
    ("mkv", "video/x-matroska"),
    ("webm", "video/webm"),
    ("mov", "video/quicktime"),
    ("avi", "video/x-msvideo"),
    ("wmv", "video/x-ms-wmv"),
    ("flv", "video/x-flv"),
    ("mpg", "video/mpeg"),
    ("mpeg", "video/mpeg"),
    ("ts", "video/mp2t"),
    ("3gp", "video/3gpp"),
    ("ogv", "video/ogg"),
];

/// A file selected for conversion. Immutable once selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Display and upload name (last path component).
    pub name: String,
    pub size_bytes: u64,
    pub mime_type: String,
}

impl SourceFile {
    /// Reads size from filesystem metadata and guesses the MIME type from the extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let meta = std::fs::metadata(path)
            .with_context(|| format!("read metadata: {}", path.display()))?;
        if !meta.is_file() {
            anyhow::bail!("not a regular file: {}", path.display());
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self {
            path: path.to_path_buf(),
            mime_type: guess_mime_type(&name).to_string(),
            name,
            size_bytes: meta.len(),
        })
    }

    pub fn is_video(&self) -> bool {
        self.mime_type.starts_with("video/")
    }
}

/// MIME type for a filename, by extension (case-insensitive).
pub fn guess_mime_type(name: &str) -> &'static str {
    let ext = match Path::new(name).extension().and_then(|e| e.to_str()) {
        Some(e) => e.to_ascii_lowercase(),
        None => return FALLBACK_MIME,
    };
    VIDEO_TYPES
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, mime)| *mime)
        .unwrap_or(FALLBACK_MIME)
}

/// Result of filtering a user selection down to video files.
#[derive(Debug, Default)]
pub struct Selection {
    /// Accepted files, in the order given.
    pub files: Vec<SourceFile>,
    /// Paths dropped because they are not video files.
    pub skipped: Vec<PathBuf>,
}

/// Builds the batch input from `paths`, keeping only `video/*` files.
/// Fails if any path cannot be read.
pub fn select_videos(paths: &[PathBuf]) -> Result<Selection> {
    let mut selection = Selection::default();
    for path in paths {
        let file = SourceFile::from_path(path)?;
        if file.is_video() {
            selection.files.push(file);
        } else {
            tracing::debug!(path = %path.display(), mime = %file.mime_type, "skipping non-video file");
            selection.skipped.push(path.clone());
        }
    }
    Ok(selection)
}
