#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # mrs-pipeline
//!
//! Orchestration of mapping requirement sheet generation.
//!
//! A run discovers report/mapper pairs below a directory and processes each
//! pair on its own: detect the direction from the report name, parse the
//! report, walk the mapper, reconcile, optionally translate extended rules,
//! and write the table next to the report. A failing pair is logged and
//! recorded in the [`BatchSummary`]; the run continues with the next pair.

pub mod config;
pub mod discovery;
pub mod pair_log;
pub mod pipeline;
pub mod table;

pub use config::{OutputFormat, PipelineConfig};
pub use discovery::{FilePair, discover_pairs};
pub use pair_log::{DEFAULT_PAIR_LOG, PAIR_SPAN, PairLogLayer};
pub use pipeline::{BatchSummary, PairOutcome, PairResult, Pipeline};
pub use table::{PairContext, PairTable, build_table};

use thiserror::Error;

/// Errors that can occur while processing file pairs
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Mode(#[from] mrs_ir::Error),

    #[error(transparent)]
    Report(#[from] mrs_report::Error),

    #[error(transparent)]
    Schema(#[from] mrs_schema::Error),

    #[error(transparent)]
    Translate(#[from] mrs_translate::Error),

    #[error(transparent)]
    Csv(#[from] mrs_adapter_csv::Error),

    #[error(transparent)]
    Xlsx(#[from] mrs_adapter_xlsx::Error),

    #[error("No mapper XML found next to '{report}'")]
    MissingMapper { report: String },

    #[error("Cannot use path '{0}': not valid UTF-8 or has no file name")]
    InvalidPath(String),

    #[error("Discovery error: {0}")]
    Discovery(String),

    #[error("Config error in '{path}': {message}")]
    Config { path: String, message: String },

    #[error("Failed to process '{path}': {source}")]
    Pair {
        path: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Attach the report path of the pair being processed.
    pub fn pair(path: impl Into<String>, source: Error) -> Self {
        Self::Pair {
            path: path.into(),
            source: Box::new(source),
        }
    }

    /// Build a configuration error for the given file.
    pub fn config(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
