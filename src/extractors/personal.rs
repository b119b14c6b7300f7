// src/extractors/personal.rs
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

// --- Regex Patterns (Lazy Static) ---
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z|a-z]{2,}\b")
        .expect("Failed to compile EMAIL_RE")
});

// Loose North American layout: (555) 123-4567, 555.123.4567, 5551234567 ...
static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}")
        .expect("Failed to compile PHONE_RE")
});

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PersonalInfo {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub name: Option<String>,
}

/// Pulls contact details out of the raw text. Email and phone are the first match, or absent.
/// The name is simply the first line of the document, trimmed, and may be empty.
pub fn extract_personal_info(text: &str) -> PersonalInfo {
    let email = EMAIL_RE.find(text).map(|m| m.as_str().to_string());
    let phone = PHONE_RE.find(text).map(|m| m.as_str().to_string());

    let first_line = text.split('\n').next().unwrap_or_default().trim();
    let name = Some(first_line.to_string());

    tracing::debug!(
        "Personal info: name={:?}, email={}, phone={}",
        first_line,
        email.is_some(),
        phone.is_some()
    );

    PersonalInfo { email, phone, name }
}
