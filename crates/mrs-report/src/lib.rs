#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # mrs-report
//!
//! Reader and line parser for mapping reports.
//!
//! A mapping report is a loosely formatted text export of the mapping tool.
//! Only its `Mapping Information` section is parsed: segment headers open a
//! group, arrow lines add field mappings to the open group.
//!
//! ## Example Usage
//!
//! ```rust
//! use mrs_report::parse_inbound;
//!
//! let groups = parse_inbound(&["Segment ABC:1*", "IN1:2* -----> OUT1* EL5-3"]);
//! assert_eq!(groups[0].segment, "ABC:1");
//! assert_eq!(groups[0].mappings[0].input, "IN1");
//! ```

pub mod parser;
pub mod section;

pub use parser::{ReportParser, parse_inbound, parse_outbound};
pub use section::{SectionBounds, SectionLine, extract_section, read_report};

use thiserror::Error;

/// Errors that can occur while reading or parsing a report
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error reading '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed mapping line {line}: '{text}'")]
    MalformedLine { line: usize, text: String },

    #[error("Mapping line {line} appears before any segment header: '{text}'")]
    OrphanMapping { line: usize, text: String },
}

impl Error {
    /// Build an I/O error with the path being read.
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
