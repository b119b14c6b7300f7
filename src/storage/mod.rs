// src/storage/mod.rs
use std::fs;
use std::path::{Path, PathBuf};
use crate::document::DocumentFormat;
use crate::extractors::ParsedResume;
use crate::utils::error::StorageError;
use serde::Serialize;

const OUTPUT_SUFFIX: &str = "_parsed";

pub struct StorageManager {
    base_dir: PathBuf,
}

impl StorageManager {
    /// Creates a new StorageManager with the specified base directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        // Create the base directory if it doesn't exist
        if !base_path.as_os_str().is_empty() && !base_path.exists() {
            fs::create_dir_all(&base_path)
                .map_err(StorageError::IoError)?;
        }

        Ok(Self { base_dir: base_path })
    }

    /// `<base_dir>/<stem>_parsed.json` for a given source document
    pub fn output_path_for(&self, source: &Path) -> PathBuf {
        self.base_dir.join(format!("{}{}.json", file_stem(source), OUTPUT_SUFFIX))
    }

    /// `<base_dir>/<stem>_trace.txt` for a given source document
    pub fn trace_path_for(&self, source: &Path) -> PathBuf {
        self.base_dir.join(format!("{}_trace.txt", file_stem(source)))
    }

    /// Writes the record as JSON indented by four spaces
    pub fn save_record(&self, record: &ParsedResume, file_path: &Path) -> Result<PathBuf, StorageError> {
        ensure_parent(file_path)?;

        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        record
            .serialize(&mut serializer)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;

        fs::write(file_path, &buf)
            .map_err(StorageError::IoError)?;

        tracing::info!("Saved parsed resume to {}", file_path.display());

        Ok(file_path.to_path_buf())
    }

    /// Saves metadata about the record next to it, as `<json stem>_meta.json`
    pub fn save_record_metadata(
        &self,
        record: &ParsedResume,
        source: &Path,
        record_path: &Path,
    ) -> Result<PathBuf, StorageError> {
        let file_path = record_path.with_file_name(format!("{}_meta.json", file_stem(record_path)));
        ensure_parent(&file_path)?;

        let section_lengths: serde_json::Map<String, serde_json::Value> = record
            .sections
            .iter()
            .map(|(name, content)| (name.to_string(), content.len().into()))
            .collect();

        let metadata = serde_json::json!({
            "source": source.display().to_string(),
            "format": DocumentFormat::from_path(source),
            "output": record_path.display().to_string(),
            "sections": record.sections.names(),
            "section_lengths": section_lengths,
            "has_name": record.personal_info.name.as_deref().map_or(false, |n| !n.is_empty()),
            "has_email": record.personal_info.email.is_some(),
            "has_phone": record.personal_info.phone.is_some(),
            "extraction_timestamp": chrono::Utc::now().to_rfc3339(),
        });

        let metadata_str = serde_json::to_string_pretty(&metadata)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;

        fs::write(&file_path, metadata_str)
            .map_err(StorageError::IoError)?;

        tracing::info!("Saved metadata to {}", file_path.display());

        Ok(file_path)
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "resume".to_string())
}

fn ensure_parent(file_path: &Path) -> Result<(), StorageError> {
    match file_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
            fs::create_dir_all(parent).map_err(StorageError::IoError)
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::{parse_resume, SectionExtractor};

    fn sample_record() -> ParsedResume {
        let text = "Jane Smith\njane@smith.io\n\nEducation\nB.S. in X\n\nSkills\n- Rust";
        parse_resume(text, &SectionExtractor::default()).unwrap()
    }

    #[test]
    fn test_output_paths() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageManager::new(dir.path().join("out")).unwrap();
        assert!(dir.path().join("out").is_dir());
        assert_eq!(
            storage.output_path_for(Path::new("cvs/jane.pdf")),
            dir.path().join("out").join("jane_parsed.json")
        );
        assert_eq!(
            storage.trace_path_for(Path::new("cvs/jane.pdf")),
            dir.path().join("out").join("jane_trace.txt")
        );
    }

    #[test]
    fn test_save_record_writes_four_space_json() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageManager::new(dir.path().join("nested")).unwrap();
        let path = storage.output_path_for(Path::new("jane.txt"));

        let written = storage.save_record(&sample_record(), &path).unwrap();
        let raw = fs::read_to_string(&written).unwrap();

        assert!(raw.starts_with("{\n    \"personal_info\": {\n        \"email\""));
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["personal_info"]["name"], "Jane Smith");
        assert_eq!(value["personal_info"]["phone"], serde_json::Value::Null);
        assert_eq!(value["sections"]["Education"], "B.S. in X");
        assert_eq!(value["sections"]["Skills"], "- Rust");
    }

    #[test]
    fn test_save_record_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageManager::new(dir.path()).unwrap();
        let record = sample_record();
        let record_path = storage.output_path_for(Path::new("jane.docx"));
        storage.save_record(&record, &record_path).unwrap();

        let meta_path = storage
            .save_record_metadata(&record, Path::new("jane.docx"), &record_path)
            .unwrap();
        assert_eq!(meta_path, dir.path().join("jane_parsed_meta.json"));

        let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(meta_path).unwrap()).unwrap();
        assert_eq!(value["format"], "docx");
        assert_eq!(value["sections"], serde_json::json!(["Education", "Skills"]));
        assert_eq!(value["section_lengths"]["Skills"], 6);
        assert_eq!(value["has_email"], true);
        assert_eq!(value["has_phone"], false);
        assert!(value["extraction_timestamp"].is_string());
        assert_eq!(value["has_name"], true);
    }

    #[test]
    fn test_metadata_blank_name_is_not_counted() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageManager::new(dir.path()).unwrap();
        let record = parse_resume("\nJane Smith\nSkills\n- Rust", &SectionExtractor::default()).unwrap();
        let record_path = storage.output_path_for(Path::new("jane.txt"));
        storage.save_record(&record, &record_path).unwrap();

        let meta_path = storage
            .save_record_metadata(&record, Path::new("jane.txt"), &record_path)
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(meta_path).unwrap()).unwrap();
        assert_eq!(value["has_name"], false);

        let saved: serde_json::Value = serde_json::from_str(&fs::read_to_string(record_path).unwrap()).unwrap();
        assert_eq!(saved["personal_info"]["name"], "");
    }
}
