// src/document/reader.rs
use crate::document::docx;
use crate::document::models::DocumentFormat;
use crate::utils::error::ReadError;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

// Debug dumps written next to outputs; never treated as resumes on a rerun
const TRACE_SUFFIX: &str = "_trace";

/// Reads a resume and returns its plain text, dispatching on the file extension.
pub async fn read_document(path: &Path) -> Result<String, ReadError> {
    let format = DocumentFormat::from_path(path);
    tracing::info!("Reading {} document: {}", format.as_str(), path.display());

    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(ReadError::NotFound(path.display().to_string()));
        }
        Err(e) => return Err(ReadError::Io(e)),
    };

    let text = match format {
        DocumentFormat::Text => String::from_utf8(bytes)?,
        DocumentFormat::Pdf => pdf_extract::extract_text_from_mem(&bytes).map_err(|e| {
            ReadError::Pdf(format!("'{}': {}", path.display(), e))
        })?,
        DocumentFormat::Docx => docx::extract_docx_text(&bytes)?,
    };

    tracing::debug!("Extracted {} bytes of text from {}", text.len(), path.display());
    Ok(text)
}

/// Resolves the input argument to the list of documents to process.
/// A file is returned as is; a directory yields its supported entries sorted by name.
pub async fn collect_documents(input: &Path) -> Result<Vec<PathBuf>, ReadError> {
    let metadata = match tokio::fs::metadata(input).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(ReadError::NotFound(input.display().to_string()));
        }
        Err(e) => return Err(ReadError::Io(e)),
    };

    if !metadata.is_dir() {
        return Ok(vec![input.to_path_buf()]);
    }

    let mut documents = Vec::new();
    let mut entries = tokio::fs::read_dir(input).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if !entry.file_type().await?.is_file() {
            continue;
        }

        let is_trace = path
            .file_stem()
            .and_then(|s| s.to_str())
            .map_or(false, |s| s.ends_with(TRACE_SUFFIX));
        if DocumentFormat::is_supported(&path) && !is_trace {
            documents.push(path);
        } else {
            tracing::warn!("Skipping unsupported file: {}", path.display());
        }
    }

    documents.sort();
    tracing::info!("Found {} documents in {}", documents.len(), input.display());
    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::docx::tests::{build_docx, wrap_body};

    #[test]
    fn test_read_plain_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.txt");
        std::fs::write(&path, "Jane Smith\r\nSkills\r\n- Rust\r\n").unwrap();

        let text = tokio_test::block_on(read_document(&path)).unwrap();
        assert_eq!(text, "Jane Smith\r\nSkills\r\n- Rust\r\n");
    }

    #[test]
    fn test_read_docx_dispatch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.docx");
        let body = wrap_body("<w:p><w:r><w:t>Skills</w:t></w:r></w:p><w:p><w:r><w:t>Rust</w:t></w:r></w:p>");
        std::fs::write(&path, build_docx(&[("word/document.xml", body)])).unwrap();

        let text = tokio_test::block_on(read_document(&path)).unwrap();
        assert_eq!(text, "Skills\nRust");
    }

    #[test]
    fn test_missing_document() {
        let dir = tempfile::tempdir().unwrap();
        let result = tokio_test::block_on(read_document(&dir.path().join("absent.txt")));
        assert!(matches!(result, Err(ReadError::NotFound(_))));
    }

    #[test]
    fn test_invalid_utf8_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("binary.txt");
        std::fs::write(&path, [0xff, 0xfe, 0x00, 0x41]).unwrap();

        let result = tokio_test::block_on(read_document(&path));
        assert!(matches!(result, Err(ReadError::Utf8(_))));
    }

    #[test]
    fn test_broken_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"not really a pdf").unwrap();

        let result = tokio_test::block_on(read_document(&path));
        assert!(matches!(result, Err(ReadError::Pdf(_))));
    }

    #[test]
    fn test_collect_documents_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.pdf", "a.txt", "c.docx", "notes.md", "a_trace.txt"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested.txt")).unwrap();

        let found = tokio_test::block_on(collect_documents(dir.path())).unwrap();
        let names: Vec<String> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.txt", "b.pdf", "c.docx"]);
    }

    #[test]
    fn test_collect_single_file_and_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cv.txt");
        std::fs::write(&path, b"x").unwrap();

        assert_eq!(tokio_test::block_on(collect_documents(&path)).unwrap(), vec![path.clone()]);
        assert!(matches!(
            tokio_test::block_on(collect_documents(&dir.path().join("nope"))),
            Err(ReadError::NotFound(_))
        ));
    }
}
