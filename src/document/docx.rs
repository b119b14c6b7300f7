// src/document/docx.rs
use crate::utils::error::ReadError;
use roxmltree::{Document, Node};
use std::io::{Cursor, Read, Seek};
use zip::result::ZipError;
use zip::ZipArchive;

const WORD_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const BODY_PART: &str = "word/document.xml";

/// Extracts plain text from a DOCX container. Header parts come first, then one line
/// per body paragraph, then footer parts; header and footer lines skip empty paragraphs.
pub fn extract_docx_text(bytes: &[u8]) -> Result<String, ReadError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ReadError::Docx(format!("not a valid DOCX archive: {}", e)))?;

    let body = read_part(&mut archive, BODY_PART)?
        .ok_or_else(|| ReadError::Docx(format!("missing {}", BODY_PART)))?;

    let mut lines = part_lines(&mut archive, "word/header")?;
    let body_lines = paragraphs(&body)?;
    tracing::debug!("DOCX body yielded {} paragraphs", body_lines.len());
    lines.extend(body_lines);
    lines.extend(part_lines(&mut archive, "word/footer")?);

    Ok(lines.join("\n"))
}

// Non-empty paragraphs of every `<prefix>*.xml` part, parts in name order
fn part_lines<R: Read + Seek>(archive: &mut ZipArchive<R>, prefix: &str) -> Result<Vec<String>, ReadError> {
    let mut parts: Vec<String> = archive
        .file_names()
        .filter(|name| name.starts_with(prefix) && name.ends_with(".xml"))
        .map(String::from)
        .collect();
    parts.sort();

    let mut lines = Vec::new();
    for part in parts {
        if let Some(xml) = read_part(archive, &part)? {
            lines.extend(paragraphs(&xml)?.into_iter().filter(|p| !p.trim().is_empty()));
        }
    }
    Ok(lines)
}

fn read_part<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> Result<Option<String>, ReadError> {
    let mut file = match archive.by_name(name) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(ReadError::Docx(format!("cannot open {}: {}", name, e))),
    };

    let mut xml = String::new();
    file.read_to_string(&mut xml)?;
    Ok(Some(xml))
}

fn is_word(node: &Node, name: &str) -> bool {
    node.is_element() && node.tag_name().name() == name && node.tag_name().namespace() == Some(WORD_NS)
}

/// Text of every `w:p` in document order. Tables are walked like any other content.
fn paragraphs(xml: &str) -> Result<Vec<String>, ReadError> {
    let doc = Document::parse(xml).map_err(|e| ReadError::Docx(format!("malformed part XML: {}", e)))?;

    Ok(doc
        .descendants()
        .filter(|n| is_word(n, "p"))
        .map(paragraph_text)
        .collect())
}

fn paragraph_text(paragraph: Node) -> String {
    let mut text = String::new();

    for node in paragraph.descendants().filter(|n| n.is_element()) {
        // Nested paragraphs (text boxes) are emitted on their own
        let owner = node.ancestors().skip(1).find(|a| is_word(a, "p"));
        if owner.map(|o| o.id()) != Some(paragraph.id()) {
            continue;
        }

        let in_run = node.parent_element().map_or(false, |p| is_word(&p, "r"));
        if is_word(&node, "t") {
            text.push_str(node.text().unwrap_or_default());
        } else if in_run && is_word(&node, "tab") {
            text.push('\t');
        } else if in_run && (is_word(&node, "br") || is_word(&node, "cr")) {
            text.push('\n');
        }
    }

    text
}
