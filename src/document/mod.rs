// src/document/mod.rs
pub mod docx;
pub mod models;
pub mod reader;

pub use models::DocumentFormat;
pub use reader::{collect_documents, read_document};
