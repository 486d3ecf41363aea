#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # mrs-adapter-xlsx
//!
//! Spreadsheet output of a reconciled mapping table: one worksheet, a bold
//! header row, text cells for text, number cells for lengths and blank cells
//! for absent values.

pub mod writer;

pub use writer::{DEFAULT_SHEET_NAME, XlsxWriter};

use thiserror::Error;

/// Errors that can occur while writing spreadsheet output
#[derive(Error, Debug)]
pub enum Error {
    #[error("Spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("Table has {0} rows, more than a worksheet holds")]
    TooManyRows(usize),
}

pub type Result<T> = std::result::Result<T, Error>;
