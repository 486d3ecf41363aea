#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # mrs-adapter-csv
//!
//! CSV output of a reconciled mapping table.
//!
//! ## Example Usage
//!
//! ```rust
//! use mrs_adapter_csv::CsvWriter;
//! use mrs_ir::{ReconciledRow, TransformationLogic};
//!
//! let mut row = ReconciledRow::new(TransformationLogic::DirectMapping);
//! row.source_element = "BEG03".into();
//!
//! let mut output = Vec::new();
//! CsvWriter::new().write_rows(&mut output, &[row]).unwrap();
//! let text = String::from_utf8(output).unwrap();
//! assert!(text.starts_with("Major Section,"));
//! ```

pub mod writer;

pub use writer::CsvWriter;

use thiserror::Error;

/// Errors that can occur while writing CSV output
#[derive(Error, Debug)]
pub enum Error {
    #[error("CSV write error: {0}")]
    Write(String),

    #[error("IO error writing '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
