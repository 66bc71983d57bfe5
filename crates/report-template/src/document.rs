use std::path::Path;

use report_core::ReportRecord;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("failed to read template {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// One text-bearing unit of a template.
///
/// A paragraph holds a raw line. A table row holds the `|`-separated
/// segments of a raw line, so each cell can be filled independently;
/// joining the segments back with `|` reproduces the line byte for byte.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Paragraph(String),
    TableRow(Vec<String>),
}

/// A parsed template. Parsing is lossless: `parse(text).to_text() == text`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    blocks: Vec<Block>,
}

impl Document {
    pub fn parse(text: &str) -> Self {
        let blocks = text
            .split('\n')
            .map(|line| {
                if line.trim_start().starts_with('|') {
                    Block::TableRow(line.split('|').map(str::to_string).collect())
                } else {
                    Block::Paragraph(line.to_string())
                }
            })
            .collect();
        Self { blocks }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, TemplateError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| TemplateError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self::parse(&text))
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn to_text(&self) -> String {
        let lines: Vec<String> = self
            .blocks
            .iter()
            .map(|block| match block {
                Block::Paragraph(line) => line.clone(),
                Block::TableRow(segments) => segments.join("|"),
            })
            .collect();
        lines.join("\n")
    }

    /// Produce a filled copy: every `{{FIELD_NAME}}` token whose name maps
    /// in `record` is replaced by the value's text, in every paragraph and
    /// every table cell. Tokens with no record entry are left verbatim.
    /// `self` is unchanged.
    pub fn fill(&self, record: &ReportRecord) -> Document {
        let blocks = self
            .blocks
            .iter()
            .map(|block| match block {
                Block::Paragraph(line) => Block::Paragraph(fill_text(line, record)),
                Block::TableRow(segments) => Block::TableRow(
                    segments.iter().map(|cell| fill_text(cell, record)).collect(),
                ),
            })
            .collect();
        Document { blocks }
    }
}

/// A placeholder name is non-empty ASCII upper-snake-case. Anything else
/// between doubled braces is ordinary text; template matching is literal.
fn is_placeholder_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

fn fill_text(text: &str, record: &ReportRecord) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 2..];
        match tail.find("}}") {
            Some(end) if is_placeholder_name(&tail[..end]) => {
                let name = &tail[..end];
                match record.get(name) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push_str("{{");
                        out.push_str(name);
                        out.push_str("}}");
                    }
                }
                rest = &tail[end + 2..];
            }
            _ => {
                out.push_str("{{");
                rest = tail;
            }
        }
    }

    out.push_str(rest);
    out
}
