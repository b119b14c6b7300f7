// src/extractors/section.rs

// --- Imports ---
use crate::utils::error::ExtractError;
use regex::Regex;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::Deserialize;
use std::fmt;

// --- Constants ---
// Lines with at most this many words are considered short enough to be a heading
const MAX_HEADING_WORDS: usize = 10;

// Characters that may sit between a heading keyword and the rest of the line
const REMAINDER_SEPARATORS: &str = r"[:\s\-]*";

// --- Data Structures ---

/// Canonical names every recognized heading is mapped onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum SectionName {
    Summary,
    Experience,
    Education,
    Skills,
    Projects,
    Certifications,
    Awards,
    Publications,
}

impl SectionName {
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionName::Summary => "Summary",
            SectionName::Experience => "Experience",
            SectionName::Education => "Education",
            SectionName::Skills => "Skills",
            SectionName::Projects => "Projects",
            SectionName::Certifications => "Certifications",
            SectionName::Awards => "Awards",
            SectionName::Publications => "Publications",
        }
    }
}

impl fmt::Display for SectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SectionName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A set of lowercase keywords that all resolve to one canonical section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct KeywordGroup {
    pub section: SectionName,
    pub keywords: Vec<String>,
}

impl KeywordGroup {
    pub fn new(section: SectionName, keywords: &[&str]) -> Self {
        Self {
            section,
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }
}

/// Result of a successful heading detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadingMatch<'a> {
    pub section: SectionName,
    pub keyword: &'a str,
}

/// The ordered keyword table used for heading detection.
/// Earlier groups win when a line mentions keywords from several groups.
#[derive(Debug, Clone)]
pub struct KeywordGroups {
    groups: Vec<KeywordGroup>,
    remainder_re: Regex,
}

impl KeywordGroups {
    /// Builds the table and the remainder pattern spanning every keyword of every group.
    pub fn new(groups: Vec<KeywordGroup>) -> Result<Self, ExtractError> {
        if groups.is_empty() {
            return Err(ExtractError::InvalidKeywords("keyword table has no groups".to_string()));
        }

        let mut groups = groups;
        for group in groups.iter_mut() {
            if group.keywords.is_empty() {
                return Err(ExtractError::InvalidKeywords(format!("group '{}' has no keywords", group.section)));
            }
            for keyword in group.keywords.iter_mut() {
                let normalized = keyword.trim().to_lowercase();
                if normalized.is_empty() {
                    return Err(ExtractError::InvalidKeywords(format!("group '{}' contains an empty keyword", group.section)));
                }
                *keyword = normalized;
            }
        }

        // Longest keywords first so the alternation prefers "work experience" over "experience".
        // A declaration-order alternation would stop at "educational" and leave "History"
        // from "Educational History"; longest-first strips the whole phrase.
        let mut alternatives: Vec<&str> = groups
            .iter()
            .flat_map(|g| g.keywords.iter().map(String::as_str))
            .collect();
        alternatives.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        alternatives.dedup();

        let pattern = format!(
            r"(?i)\b(?:{})\b{}",
            alternatives.iter().map(|k| regex::escape(k)).collect::<Vec<_>>().join("|"),
            REMAINDER_SEPARATORS
        );
        let remainder_re = Regex::new(&pattern).map_err(|e| ExtractError::RegexError(e.to_string()))?;

        tracing::debug!("Keyword table ready: {} groups, {} keywords", groups.len(), alternatives.len());
        Ok(Self { groups, remainder_re })
    }

    /// Parses a JSON keyword table: `[{"section": "Skills", "keywords": ["skills"]}, ...]`.
    pub fn from_json(json: &str) -> Result<Self, ExtractError> {
        let groups: Vec<KeywordGroup> = serde_json::from_str(json)
            .map_err(|e| ExtractError::InvalidKeywords(e.to_string()))?;
        Self::new(groups)
    }

    pub fn groups(&self) -> &[KeywordGroup] {
        &self.groups
    }

    /// Decides whether `line` (trailing whitespace already trimmed) is a section heading.
    /// First group/keyword pair that both occurs in the line and passes the shape check wins.
    pub fn detect_heading(&self, line: &str) -> Option<HeadingMatch<'_>> {
        let lowered = line.to_lowercase();

        for group in &self.groups {
            for keyword in &group.keywords {
                if lowered.contains(keyword.as_str()) && looks_like_heading(line, &lowered, keyword) {
                    tracing::trace!("Heading '{}' matched keyword '{}' -> {}", line, keyword, group.section);
                    return Some(HeadingMatch { section: group.section, keyword: keyword.as_str() });
                }
            }
        }

        None
    }

    /// Text left on a heading line once everything up to the first whole-word keyword
    /// (from any group) and its trailing separators is removed.
    pub fn heading_remainder<'l>(&self, line: &'l str) -> &'l str {
        match self.remainder_re.find(line) {
            Some(m) => line[m.end()..].trim(),
            None => line.trim(),
        }
    }
}

impl Default for KeywordGroups {
    fn default() -> Self {
        Self::new(default_keyword_groups()).expect("Failed to compile built-in keyword table")
    }
}

/// The built-in keyword table, in matching order.
pub fn default_keyword_groups() -> Vec<KeywordGroup> {
    vec![
        KeywordGroup::new(SectionName::Summary, &["summary", "profile", "objective"]),
        KeywordGroup::new(
            SectionName::Experience,
            &["experience", "professional experience", "work experience", "work history", "employment"],
        ),
        KeywordGroup::new(
            SectionName::Education,
            &["education", "educational", "educational history", "degree", "school", "institution", "university", "college"],
        ),
        KeywordGroup::new(SectionName::Skills, &["skills", "competencies", "ability", "abilities"]),
        KeywordGroup::new(SectionName::Projects, &["projects", "portfolio"]),
        KeywordGroup::new(SectionName::Certifications, &["certifications", "certificates", "license", "licenses"]),
        KeywordGroup::new(SectionName::Awards, &["award", "awards", "honors", "achievements"]),
        KeywordGroup::new(SectionName::Publications, &["publications"]),
    ]
}

fn looks_like_heading(line: &str, lowered: &str, keyword: &str) -> bool {
    line.split_whitespace().count() <= MAX_HEADING_WORDS
        || is_upper_case(line)
        || line.trim().ends_with(':')
        || lowered.starts_with(keyword)
}

// At least one cased character and no lowercase ones
fn is_upper_case(line: &str) -> bool {
    line.chars().any(char::is_uppercase) && !line.chars().any(char::is_lowercase)
}

/// Splits on every universal newline boundary. A trailing terminator does not produce an extra line.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, ch)) = chars.next() {
        let is_break = matches!(
            ch,
            '\n' | '\r' | '\u{0b}' | '\u{0c}' | '\u{1c}' | '\u{1d}' | '\u{1e}' | '\u{85}' | '\u{2028}' | '\u{2029}'
        );
        if !is_break {
            continue;
        }

        lines.push(&text[start..idx]);
        let mut next_start = idx + ch.len_utf8();
        if ch == '\r' {
            if let Some(&(lf_idx, '\n')) = chars.peek() {
                chars.next();
                next_start = lf_idx + 1;
            }
        }
        start = next_start;
    }

    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines
}

/// Canonical section name -> merged content, in first-occurrence order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionMap {
    entries: Vec<(SectionName, String)>,
}

impl SectionMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: SectionName) -> Option<&str> {
        self.entries.iter().find(|(n, _)| *n == name).map(|(_, c)| c.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SectionName, &str)> {
        self.entries.iter().map(|(n, c)| (*n, c.as_str()))
    }

    pub fn names(&self) -> Vec<SectionName> {
        self.entries.iter().map(|(n, _)| *n).collect()
    }

    /// Appends a non-empty block to a section, creating it on first use.
    fn append(&mut self, name: SectionName, block: String) {
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) if !existing.is_empty() => {
                let merged = format!("{}\n{}", existing.trim_end(), block);
                *existing = merged;
            }
            Some((_, existing)) => *existing = block,
            None => self.entries.push((name, block)),
        }
    }
}

impl Serialize for SectionMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, content) in &self.entries {
            map.serialize_entry(name.as_str(), content)?;
        }
        map.end()
    }
}

/// How a single input line was handled during segmentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass {
    Blank,
    Heading(SectionName),
    Body,
    /// Content seen before any heading, discarded.
    Orphan,
}

impl fmt::Display for LineClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineClass::Blank => f.write_str("BLANK"),
            LineClass::Heading(name) => write!(f, "HEAD {}", name),
            LineClass::Body => f.write_str("BODY"),
            LineClass::Orphan => f.write_str("ORPHAN"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracedLine {
    pub number: usize,
    pub class: LineClass,
    pub text: String,
}

// Line-by-line state machine: no active section until the first heading
struct Segmenter<'g> {
    groups: &'g KeywordGroups,
    sections: SectionMap,
    active: Option<SectionName>,
    buffer: Vec<String>,
}

impl<'g> Segmenter<'g> {
    fn new(groups: &'g KeywordGroups) -> Self {
        Self {
            groups,
            sections: SectionMap::new(),
            active: None,
            buffer: Vec::new(),
        }
    }

    fn feed(&mut self, raw: &str) -> LineClass {
        let cleaned = raw.trim_end();

        if cleaned.trim().is_empty() {
            if self.active.is_some() {
                self.buffer.push(String::new());
            }
            return LineClass::Blank;
        }

        let groups = self.groups;
        if let Some(heading) = groups.detect_heading(cleaned) {
            tracing::debug!("Heading '{}' via keyword '{}' -> {}", cleaned, heading.keyword, heading.section);
            self.flush();
            self.active = Some(heading.section);

            let remainder = groups.heading_remainder(cleaned);
            if !remainder.is_empty() {
                tracing::trace!("Keeping heading remainder '{}' under {}", remainder, heading.section);
                self.buffer.push(remainder.to_string());
            }
            return LineClass::Heading(heading.section);
        }

        if self.active.is_some() {
            self.buffer.push(cleaned.to_string());
            LineClass::Body
        } else {
            LineClass::Orphan
        }
    }

    fn flush(&mut self) {
        let lines = std::mem::take(&mut self.buffer);
        let Some(name) = self.active else {
            return;
        };

        let block = lines.join("\n").trim().to_string();
        if block.is_empty() {
            tracing::debug!("Discarding empty block for {}", name);
            return;
        }

        tracing::debug!("Flushing {} bytes into {}", block.len(), name);
        self.sections.append(name, block);
    }

    fn finish(mut self) -> SectionMap {
        self.flush();
        self.sections
    }
}

// --- Main Extractor Structure ---
pub struct SectionExtractor {
    groups: KeywordGroups,
}

impl SectionExtractor {
    pub fn new(groups: KeywordGroups) -> Self {
        Self { groups }
    }

    /// Splits free-form text into canonical sections, merging repeated headings.
    pub fn segment(&self, text: &str) -> SectionMap {
        let mut segmenter = Segmenter::new(&self.groups);
        for line in split_lines(text) {
            segmenter.feed(line);
        }

        let sections = segmenter.finish();
        tracing::info!("Segmented text into {} sections", sections.len());
        sections
    }

    /// Same walk as `segment`, recording how every line was classified.
    pub fn trace(&self, text: &str) -> (SectionMap, Vec<TracedLine>) {
        let mut segmenter = Segmenter::new(&self.groups);
        let traced: Vec<TracedLine> = split_lines(text)
            .into_iter()
            .enumerate()
            .map(|(idx, line)| TracedLine {
                number: idx + 1,
                class: segmenter.feed(line),
                text: line.trim_end().to_string(),
            })
            .collect();

        (segmenter.finish(), traced)
    }
}

impl Default for SectionExtractor {
    fn default() -> Self {
        Self::new(KeywordGroups::default())
    }
}
