//! Report reading and section extraction

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{Error, Result};

const BOM: char = '\u{feff}';

/// Marker lines delimiting the parsed section (both exclusive)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionBounds {
    pub start: String,
    pub end: String,
}

impl Default for SectionBounds {
    fn default() -> Self {
        Self {
            start: "Mapping Information".to_string(),
            end: "Extended Rules".to_string(),
        }
    }
}

/// A trimmed report line with its 1-based line number in the file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionLine<'a> {
    pub number: usize,
    pub text: &'a str,
}

/// Read a report, replacing invalid UTF-8 and dropping a leading BOM.
///
/// # Errors
///
/// Returns [`Error::Io`] when the file cannot be read.
pub fn read_report(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| Error::io(path.display().to_string(), e))?;
    let text = String::from_utf8_lossy(&bytes);
    if text.contains(char::REPLACEMENT_CHARACTER) {
        warn!(path = %path.display(), "Report is not valid UTF-8; invalid bytes replaced");
    }
    Ok(text.strip_prefix(BOM).unwrap_or(&text).to_string())
}

/// Collect the trimmed lines strictly between the start and end markers.
///
/// Lines before the first start marker are ignored, as is an end marker
/// seen before it. Without a closing marker every remaining line is kept.
#[must_use]
pub fn extract_section<'a>(text: &'a str, bounds: &SectionBounds) -> Vec<SectionLine<'a>> {
    let mut section = Vec::new();
    let mut in_section = false;
    let mut closed = false;

    for (index, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed == bounds.start {
            in_section = true;
            continue;
        }
        if in_section && trimmed == bounds.end {
            closed = true;
            break;
        }
        if in_section {
            section.push(SectionLine {
                number: index + 1,
                text: trimmed,
            });
        }
    }

    if !in_section {
        warn!(start = %bounds.start, "Section start marker not found");
    } else if !closed {
        debug!(end = %bounds.end, "Section end marker not found; section runs to end of report");
    }
    debug!(line_count = section.len(), "Extracted report section");
    section
}
