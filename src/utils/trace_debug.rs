// src/utils/trace_debug.rs
use std::fs::File;
use std::io::Write;
use std::path::Path;
use crate::extractors::section::{SectionExtractor, TracedLine};
use crate::utils::error::AppError;

/// Renders traced lines as `  12 | HEAD Skills      | Skills:`.
pub fn render_trace(lines: &[TracedLine]) -> String {
    let mut out = String::new();
    for line in lines {
        out.push_str(&format!("{:>4} | {:<20} | {}\n", line.number, line.class.to_string(), line.text));
    }
    out
}

/// Saves a per-line classification dump of `text` for debugging heading detection.
pub fn create_debug_trace(text: &str, extractor: &SectionExtractor, filename: &Path) -> Result<(), AppError> {
    let (sections, traced) = extractor.trace(text);

    let mut file = File::create(filename)?;
    file.write_all(render_trace(&traced).as_bytes())?;

    let summary = sections
        .iter()
        .map(|(name, content)| format!("{} ({} bytes)", name, content.len()))
        .collect::<Vec<_>>()
        .join(", ");
    writeln!(file, "\n# sections: {}", if summary.is_empty() { "none" } else { summary.as_str() })?;

    tracing::info!("Saved debug trace to {}", filename.display());
    Ok(())
}
