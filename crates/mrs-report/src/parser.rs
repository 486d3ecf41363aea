//! Mapping line parser
//!
//! Two line shapes are recognized, tried in order:
//!
//! * a segment header such as `Segment N1:2*`, which opens a new group;
//! * an arrow line such as `N102* -----> Party* Name:1`, which adds a field
//!   mapping to the open group. The leading input token may be omitted, in
//!   which case it is carried forward from the previous mapping.
//!
//! Inbound and outbound reports differ only in their header grammar and in
//! how the carry-forward treats an empty previous input.

use std::sync::LazyLock;

use mrs_ir::{Direction, FieldMapping, MappingGroup, split_occurrence};
use regex::Regex;
use tracing::{debug, trace};

use crate::section::SectionLine;
use crate::{Error, Result};

static INBOUND_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:Element|Segment)\s+(\w+)(?::(\d+))?\*").expect("inbound header pattern")
});

static OUTBOUND_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Element ([\w:]+)\*").expect("outbound header pattern"));

static MAPPING_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:(\w+(?::\d+)?)\*\s+)?----->\s+([\w:]+)\*\s+([\w\d:-]+)")
        .expect("mapping line pattern")
});

/// Parser for the mapping section of one report
#[derive(Debug, Clone, Copy)]
pub struct ReportParser {
    direction: Direction,
    strict: bool,
}

impl ReportParser {
    /// Create a lenient parser for the given direction
    #[must_use]
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            strict: false,
        }
    }

    /// Fail on unrecognized lines instead of skipping them
    #[must_use]
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Parse section lines into mapping groups.
    ///
    /// # Errors
    ///
    /// In strict mode, returns [`Error::MalformedLine`] for a non-blank line
    /// that is neither a header nor a mapping, and [`Error::OrphanMapping`]
    /// for a mapping line seen before the first header. Lenient parsing never
    /// fails.
    pub fn parse(&self, lines: &[SectionLine<'_>]) -> Result<Vec<MappingGroup>> {
        let mut groups: Vec<MappingGroup> = Vec::new();
        let mut skipped = 0usize;

        for line in lines {
            if line.text.trim().is_empty() {
                continue;
            }

            if let Some(segment) = self.header(line.text) {
                trace!(line = line.number, %segment, "Segment header");
                groups.push(MappingGroup::new(segment));
                continue;
            }

            let Some(caps) = MAPPING_LINE.captures(line.text) else {
                if self.strict {
                    return Err(Error::MalformedLine {
                        line: line.number,
                        text: line.text.to_string(),
                    });
                }
                trace!(line = line.number, text = line.text, "Skipping unrecognized line");
                skipped += 1;
                continue;
            };

            let Some(group) = groups.last_mut() else {
                if self.strict {
                    return Err(Error::OrphanMapping {
                        line: line.number,
                        text: line.text.to_string(),
                    });
                }
                trace!(line = line.number, "Skipping mapping line before any header");
                skipped += 1;
                continue;
            };

            let (input, input_occurrence) = match caps.get(1) {
                Some(token) => split_occurrence(token.as_str().trim()),
                None => self.carry_forward(group),
            };
            let output_segment = caps[2].trim().to_string();
            let (output_element, output_occurrence) = split_occurrence(caps[3].trim());

            group.push(FieldMapping {
                input,
                input_occurrence,
                output_element,
                output_segment,
                output_occurrence,
            });
        }

        debug!(
            direction = %self.direction,
            groups = groups.len(),
            mappings = groups.iter().map(|g| g.mappings.len()).sum::<usize>(),
            skipped,
            "Parsed mapping section"
        );
        Ok(groups)
    }

    fn header(&self, text: &str) -> Option<String> {
        match self.direction {
            Direction::Inbound => INBOUND_HEADER.captures(text).map(|caps| {
                let mut segment = caps[1].to_string();
                if let Some(occurrence) = caps.get(2) {
                    segment.push(':');
                    segment.push_str(occurrence.as_str());
                }
                segment
            }),
            Direction::Outbound => OUTBOUND_HEADER
                .captures(text)
                .map(|caps| caps[1].to_string()),
        }
    }

    /// Input id and occurrence for a mapping line without an input token.
    ///
    /// Inbound reports copy the previous mapping unconditionally; outbound
    /// reports copy it only when its input id is non-empty.
    fn carry_forward(&self, group: &MappingGroup) -> (String, Option<String>) {
        let previous = match self.direction {
            Direction::Inbound => group.last_mapping(),
            Direction::Outbound => group.last_mapping().filter(|m| !m.input.is_empty()),
        };
        previous
            .map(|m| (m.input.clone(), m.input_occurrence.clone()))
            .unwrap_or_default()
    }
}

fn number_lines<'a>(lines: &[&'a str]) -> Vec<SectionLine<'a>> {
    lines
        .iter()
        .copied()
        .enumerate()
        .map(|(index, text)| SectionLine {
            number: index + 1,
            text,
        })
        .collect()
}

fn parse_lenient(direction: Direction, lines: &[&str]) -> Vec<MappingGroup> {
    ReportParser::new(direction)
        .parse(&number_lines(lines))
        .unwrap_or_default()
}

/// Parse inbound report lines, skipping anything unrecognized
#[must_use]
pub fn parse_inbound(lines: &[&str]) -> Vec<MappingGroup> {
    parse_lenient(Direction::Inbound, lines)
}

/// Parse outbound report lines, skipping anything unrecognized
#[must_use]
pub fn parse_outbound(lines: &[&str]) -> Vec<MappingGroup> {
    parse_lenient(Direction::Outbound, lines)
}
