#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # mrs-ir
//!
//! Shared model for the mapping requirement sheet generator.
//!
//! This crate holds the types every other stage exchanges: mapping groups
//! recovered from the text report, segment descriptors flattened from the
//! mapper XML, collected extended rules, and the reconciled rows that end up
//! in the output table. It also owns the two small pure helpers the stages
//! agree on: identifier normalization and direction detection.
//!
//! ## Example Usage
//!
//! ```rust
//! use mrs_ir::{Direction, detect, ids_match};
//!
//! let detected = detect("PO_850_IN.txt").unwrap();
//! assert_eq!(detected.direction, Direction::Inbound);
//! assert_eq!(detected.transaction_type.as_deref(), Some("850"));
//!
//! assert!(ids_match("BEG01*", "_attr_BEG01"));
//! ```

/// Direction and transaction-type detection from report file names.
pub mod direction;
/// Identifier normalization used by every cross-source comparison.
pub mod ident;
/// Mapping groups and field mappings parsed from the text report.
pub mod mapping;
/// Reconciled output rows and the fixed column set.
pub mod row;
/// Extended (custom logic) rules collected from the mapper.
pub mod rules;
/// Flattened segment and element descriptors.
pub mod schema;

pub use direction::{Detected, Direction, detect};
pub use ident::{ids_match, normalize};
pub use mapping::{FieldMapping, MappingGroup, split_occurrence};
pub use row::{COLUMNS, PROCESSED, ReconciledRow, TransformationLogic};
pub use rules::{ExtendedRule, ExtendedRules, RuleKind};
pub use schema::{ElementDescriptor, Requirement, SegmentDescriptor, capitalize};

use thiserror::Error;

/// Errors that can occur when working with the shared model
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Cannot determine direction from file name '{file_name}': expected an _IN or _OUT marker")]
    ModeUndetectable { file_name: String },
}

impl Error {
    /// Build a mode-undetectable error for the given file name.
    pub fn mode_undetectable(file_name: impl Into<String>) -> Self {
        Self::ModeUndetectable {
            file_name: file_name.into(),
        }
    }
}

/// Crate-local result type for model operations.
pub type Result<T> = std::result::Result<T, Error>;
