// src/main.rs
mod utils;
mod document;
mod extractors;
mod storage;

use std::path::{Path, PathBuf};
use clap::Parser;
use utils::AppError;
use extractors::section::{KeywordGroups, SectionExtractor};
use storage::StorageManager;

const KEYWORDS_ENV: &str = "RESUME_KEYWORDS";

/// Command Line Interface for the resume section parser
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Resume file (.txt, .pdf, .docx) or a directory of resumes
    input: PathBuf,

    /// Output JSON file (single input file only)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Directory for derived outputs (defaults to the input's directory)
    #[arg(short = 'd', long)]
    output_dir: Option<PathBuf>,

    /// JSON keyword table replacing the built-in one (falls back to RESUME_KEYWORDS)
    #[arg(short, long)]
    keywords: Option<PathBuf>,

    /// Also write a metadata sidecar next to each output
    #[arg(short, long)]
    metadata: bool,

    /// Debug mode - save a per-line classification trace for each document
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI Arguments
    let args = Args::parse();
    tracing::info!("Starting processing for args: {:?}", args);

    // 3. Build the keyword table once, from file or built-in defaults
    let groups = load_keyword_groups(args.keywords.as_deref())?;
    tracing::info!("Keyword table has {} section groups", groups.groups().len());
    let section_extractor = SectionExtractor::new(groups);

    // 4. Resolve the documents to process
    let documents = document::collect_documents(&args.input).await?;
    if args.output.is_some() && (documents.len() != 1 || args.input.is_dir()) {
        return Err(AppError::Config("--output can only be used with a single input file".to_string()));
    }

    if documents.is_empty() {
        return Err(AppError::Config(format!("No supported documents found in {}", args.input.display())));
    }

    // 5. Process each document independently
    let mut success_count = 0;
    let mut failure_count = 0;

    for path in &documents {
        match process_document(path, &args, &section_extractor).await {
            Ok(output) => {
                tracing::info!("Parsed {} -> {}", path.display(), output.display());
                success_count += 1;
            }
            Err(e) => {
                tracing::error!("Failed to process {}: {}", path.display(), e);
                failure_count += 1;
            }
        }
    }

    tracing::info!("Processing finished. Success: {}, Failures: {}", success_count, failure_count);

    if success_count == 0 && failure_count > 0 {
        return Err(AppError::Processing(format!("Failed to parse any of {} documents", failure_count)));
    }

    Ok(())
}

/// Reads, parses and stores one resume. Returns the path of the written JSON.
async fn process_document(
    path: &Path,
    args: &Args,
    section_extractor: &SectionExtractor,
) -> Result<PathBuf, AppError> {
    let text = document::read_document(path).await?;

    let record = extractors::parse_resume(&text, section_extractor)?;
    tracing::info!(
        "Extracted {} sections from {}: {:?}",
        record.sections.len(),
        path.display(),
        record.sections.names()
    );

    let storage = match (&args.output, &args.output_dir) {
        (Some(output), _) => StorageManager::new(output.parent().unwrap_or_else(|| Path::new("")))?,
        (None, Some(dir)) => StorageManager::new(dir)?,
        (None, None) => StorageManager::new(path.parent().unwrap_or_else(|| Path::new("")))?,
    };

    if args.debug {
        let trace_path = storage.trace_path_for(path);
        if let Err(e) = utils::trace_debug::create_debug_trace(&text, section_extractor, &trace_path) {
            tracing::warn!("Failed to create debug trace: {}", e);
        }
    }

    let output_path = match &args.output {
        Some(output) => output.clone(),
        None => storage.output_path_for(path),
    };
    let written = storage.save_record(&record, &output_path)?;

    if args.metadata {
        match storage.save_record_metadata(&record, path, &written) {
            Ok(meta) => tracing::info!("Saved metadata to: {}", meta.display()),
            Err(e) => tracing::error!("Failed to save metadata: {}", e),
        }
    }

    Ok(written)
}

/// Loads the keyword table from `--keywords`, then `RESUME_KEYWORDS`, else the built-in table.
fn load_keyword_groups(flag: Option<&Path>) -> Result<KeywordGroups, AppError> {
    let source = match flag {
        Some(path) => Some(path.to_path_buf()),
        None => std::env::var(KEYWORDS_ENV).ok().filter(|v| !v.is_empty()).map(PathBuf::from),
    };

    match source {
        Some(path) => {
            tracing::info!("Loading keyword table from {}", path.display());
            let json = std::fs::read_to_string(&path).map_err(|e| {
                AppError::Config(format!("Cannot read keyword table '{}': {}", path.display(), e))
            })?;
            Ok(KeywordGroups::from_json(&json)?)
        }
        None => {
            tracing::debug!("Using built-in keyword table");
            Ok(KeywordGroups::default())
        }
    }
}
