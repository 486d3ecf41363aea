//! Worksheet writer

use std::path::Path;

use mrs_ir::{COLUMNS, ReconciledRow};
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use tracing::debug;

use crate::{Error, Result};

pub const DEFAULT_SHEET_NAME: &str = "MappingSpec";

/// Zero-based indexes into [`COLUMNS`] that get special treatment
mod cols {
    pub const SOURCE_MIN_LENGTH: u16 = 5;
    pub const SOURCE_MAX_LENGTH: u16 = 6;
    pub const TARGET_MIN_LENGTH: u16 = 12;
    pub const TARGET_MAX_LENGTH: u16 = 13;
    pub const RAW_LOGIC: u16 = 16;
    pub const GENERATED_LOGIC: u16 = 17;
}

/// Writer for mapping tables
#[derive(Debug, Clone)]
pub struct XlsxWriter {
    sheet_name: String,
}

impl XlsxWriter {
    #[must_use]
    pub fn new() -> Self {
        Self {
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
        }
    }

    /// Set the worksheet name
    #[must_use]
    pub fn with_sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = name.into();
        self
    }

    /// Build a workbook holding the table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Xlsx`] for invalid sheet names or oversized cells, and
    /// [`Error::TooManyRows`] when the table does not fit a worksheet.
    pub fn build(&self, rows: &[ReconciledRow]) -> Result<Workbook> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name(&self.sheet_name)?;

        let header = Format::new().set_bold();
        for (col, title) in (0u16..).zip(COLUMNS) {
            sheet.write_string_with_format(0, col, title, &header)?;
        }
        sheet.set_freeze_panes(1, 0)?;
        sheet.set_column_width(cols::RAW_LOGIC, 60)?;
        sheet.set_column_width(cols::GENERATED_LOGIC, 60)?;

        for (index, row) in rows.iter().enumerate() {
            let excel_row = u32::try_from(index + 1).map_err(|_| Error::TooManyRows(rows.len()))?;
            write_row(sheet, excel_row, row)?;
        }

        debug!(sheet = %self.sheet_name, rows = rows.len(), "Built worksheet");
        Ok(workbook)
    }

    /// Write the table to `path`; the file appears only once fully built.
    ///
    /// # Errors
    ///
    /// See [`XlsxWriter::build`]; saving failures are [`Error::Xlsx`].
    pub fn write_file(&self, path: impl AsRef<Path>, rows: &[ReconciledRow]) -> Result<()> {
        let mut workbook = self.build(rows)?;
        workbook.save(path.as_ref())?;
        Ok(())
    }

    /// Render the table as XLSX bytes.
    ///
    /// # Errors
    ///
    /// See [`XlsxWriter::build`].
    pub fn to_buffer(&self, rows: &[ReconciledRow]) -> Result<Vec<u8>> {
        let mut workbook = self.build(rows)?;
        Ok(workbook.save_to_buffer()?)
    }
}

impl Default for XlsxWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn write_row(sheet: &mut Worksheet, excel_row: u32, row: &ReconciledRow) -> Result<()> {
    for (col, value) in (0u16..).zip(row.to_record()) {
        if value.is_empty() {
            continue;
        }
        if is_numeric(col) {
            if let Ok(number) = value.parse::<u32>() {
                sheet.write_number(excel_row, col, f64::from(number))?;
                continue;
            }
        }
        sheet.write_string(excel_row, col, &value)?;
    }
    Ok(())
}

fn is_numeric(col: u16) -> bool {
    matches!(
        col,
        cols::SOURCE_MIN_LENGTH | cols::SOURCE_MAX_LENGTH | cols::TARGET_MIN_LENGTH | cols::TARGET_MAX_LENGTH
    )
}
