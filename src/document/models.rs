// src/document/models.rs
use serde::Serialize;
use std::path::Path;

/// Source formats the reader knows how to turn into plain text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Text,
    Pdf,
    Docx,
}

impl DocumentFormat {
    /// Picks the format from the file extension; anything unknown is read as text.
    pub fn from_path(path: &Path) -> Self {
        match extension(path).as_deref() {
            Some("pdf") => DocumentFormat::Pdf,
            Some("docx") => DocumentFormat::Docx,
            _ => DocumentFormat::Text,
        }
    }

    /// Whether a directory entry should be picked up in batch mode.
    pub fn is_supported(path: &Path) -> bool {
        matches!(extension(path).as_deref(), Some("txt" | "pdf" | "docx"))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentFormat::Text => "text",
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Docx => "docx",
        }
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase())
}
