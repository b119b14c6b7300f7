// src/extractors/mod.rs
pub mod personal;
pub mod section;

use crate::utils::error::ExtractError;
use serde::Serialize;

// Re-export key extraction types for convenience
#[allow(unused_imports)]
pub use personal::{extract_personal_info, PersonalInfo};
#[allow(unused_imports)]
pub use section::{KeywordGroup, KeywordGroups, SectionExtractor, SectionMap, SectionName};

/// Everything extracted from one resume.
#[derive(Debug, Clone, Serialize)]
pub struct ParsedResume {
    pub personal_info: PersonalInfo,
    pub sections: SectionMap,
}

/// Runs personal info extraction and section segmentation over one document's text.
/// Empty text (no bytes at all) is a terminal failure for the document; no partial record is produced.
pub fn parse_resume(text: &str, extractor: &SectionExtractor) -> Result<ParsedResume, ExtractError> {
    if text.is_empty() {
        return Err(ExtractError::EmptyText);
    }

    let personal_info = extract_personal_info(text);
    let sections = extractor.segment(text);
    if sections.is_empty() {
        tracing::warn!("No section headings recognized in document");
    }

    Ok(ParsedResume { personal_info, sections })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_resume_combines_both_parts() {
        let text = "Alex Kim\nalex@kim.dev\n\nSkills\n- Rust\n- Kotlin";
        let record = parse_resume(text, &SectionExtractor::default()).unwrap();

        assert_eq!(record.personal_info.name.as_deref(), Some("Alex Kim"));
        assert_eq!(record.personal_info.email.as_deref(), Some("alex@kim.dev"));
        assert_eq!(record.sections.get(SectionName::Skills), Some("- Rust\n- Kotlin"));

        let json = serde_json::to_value(&record).unwrap();
        let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 2);
        assert!(json.get("personal_info").is_some());
        assert_eq!(json["sections"]["Skills"], "- Rust\n- Kotlin");
    }

    #[test]
    fn test_parse_resume_rejects_empty_text() {
        let extractor = SectionExtractor::default();
        assert!(matches!(parse_resume("", &extractor), Err(ExtractError::EmptyText)));
    }

    #[test]
    fn test_parse_resume_whitespace_only_text_yields_record() {
        let record = parse_resume("   \n  ", &SectionExtractor::default()).unwrap();

        assert!(record.sections.is_empty());
        assert_eq!(record.personal_info.name.as_deref(), Some(""));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["sections"], serde_json::json!({}));
        assert_eq!(json["personal_info"]["name"], "");
    }

    #[test]
    fn test_parse_resume_without_headings_is_valid() {
        let record = parse_resume("Pat Lee\nSome notes", &SectionExtractor::default()).unwrap();
        assert!(record.sections.is_empty());
        assert_eq!(record.personal_info.name.as_deref(), Some("Pat Lee"));
    }
}
