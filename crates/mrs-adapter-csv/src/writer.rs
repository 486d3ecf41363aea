//! CSV writer

use std::io::Write;
use std::path::Path;

use mrs_ir::{COLUMNS, ReconciledRow};
use tracing::{debug, trace};

use crate::{Error, Result};

/// Writer for mapping tables
#[derive(Debug, Clone)]
pub struct CsvWriter {
    has_header: bool,
    delimiter: u8,
}

impl CsvWriter {
    /// Create a comma-separated writer with a header row
    #[must_use]
    pub fn new() -> Self {
        Self {
            has_header: true,
            delimiter: b',',
        }
    }

    /// Configure header writing
    #[must_use]
    pub fn has_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    /// Set delimiter byte
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Write rows, in column order, to `writer`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Write`] if a record cannot be written.
    pub fn write_rows<W: Write>(&self, writer: W, rows: &[ReconciledRow]) -> Result<()> {
        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(writer);

        if self.has_header {
            csv_writer
                .write_record(COLUMNS)
                .map_err(|e| Error::Write(e.to_string()))?;
        }

        for row in rows {
            let record = row.to_record();
            csv_writer
                .write_record(&record)
                .map_err(|e| Error::Write(e.to_string()))?;
            trace!(?record, "Wrote CSV row");
        }

        csv_writer
            .flush()
            .map_err(|e| Error::Write(e.to_string()))?;
        debug!(record_count = rows.len(), "Finished writing CSV");
        Ok(())
    }

    /// Render the whole table, then write it to `path` in one go.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Write`] for encoding failures and [`Error::Io`] if the
    /// file cannot be written.
    pub fn write_file(&self, path: impl AsRef<Path>, rows: &[ReconciledRow]) -> Result<()> {
        let path = path.as_ref();
        let mut buffer = Vec::new();
        self.write_rows(&mut buffer, rows)?;
        std::fs::write(path, buffer).map_err(|source| Error::Io {
            path: path.display().to_string(),
            source,
        })
    }
}

impl Default for CsvWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mrs_ir::{RuleKind, TransformationLogic};

    fn rows() -> Vec<ReconciledRow> {
        let mut direct = ReconciledRow::new(TransformationLogic::DirectMapping);
        direct.major_section = "BEG".into();
        direct.source_element = "BEG03".into();
        direct.source_max_length = Some(22);

        let mut rule = ReconciledRow::extended(RuleKind::Inline, "if (a, b) {\n  x = \"y\";\n}");
        rule.generated_logic = Some("tmp.x = 'y';".into());
        rule.processed = true;
        vec![direct, rule]
    }

    #[test]
    fn writes_header_and_rows() {
        let mut output = Vec::new();
        CsvWriter::new().write_rows(&mut output, &rows()).unwrap();
        let text = String::from_utf8(output).unwrap();

        let mut reader = csv::Reader::from_reader(text.as_bytes());
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.len(), COLUMNS.len());
        assert_eq!(&headers[0], "Major Section");

        let records: Vec<_> = reader.records().map(std::result::Result::unwrap).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(&records[0][1], "BEG03");
        assert_eq!(&records[0][5], "");
        assert_eq!(&records[0][6], "22");
        assert_eq!(&records[0][14], "Direct Mapping");
        assert_eq!(&records[1][15], "inline");
        assert_eq!(&records[1][16], "if (a, b) {\n  x = \"y\";\n}");
        assert_eq!(&records[1][18], "YES");
    }

    #[test]
    fn custom_delimiter_without_header() {
        let mut output = Vec::new();
        CsvWriter::new()
            .has_header(false)
            .with_delimiter(b';')
            .write_rows(&mut output, &rows()[..1])
            .unwrap();
        let text = String::from_utf8(output).unwrap();
        assert!(text.starts_with("BEG;BEG03;"));
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn write_file_creates_table() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("out.csv");
        CsvWriter::new().write_file(&path, &rows())?;
        let text = std::fs::read_to_string(&path)?;
        assert!(text.starts_with("Major Section,Source XML Node/Element"));
        Ok(())
    }
}
