//! Building the reconciled table of one pair

use std::path::{Path, PathBuf};

use mrs_ir::{Direction, detect};
use mrs_mapping::{Reconciler, Reconciliation};
use mrs_report::{ReportParser, extract_section, read_report};
use mrs_schema::{Mapper, read_mapper};
use tracing::info;

use crate::config::PipelineConfig;
use crate::discovery::FilePair;
use crate::{Error, Result};

/// Paths and detected mode of one pair, threaded through every stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairContext {
    pub report: PathBuf,
    pub mapper: PathBuf,
    pub direction: Direction,
    pub transaction_type: Option<String>,
}

impl PairContext {
    /// Detect the direction from the report's file name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Mode`] when the name carries no direction marker.
    pub fn new(report: impl Into<PathBuf>, mapper: impl Into<PathBuf>) -> Result<Self> {
        let report = report.into();
        let file_name = report
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| Error::InvalidPath(report.display().to_string()))?;
        let detected = detect(file_name)?;
        Ok(Self {
            direction: detected.direction,
            transaction_type: detected.transaction_type,
            mapper: mapper.into(),
            report,
        })
    }

    fn directory(&self) -> &Path {
        self.report.parent().unwrap_or_else(|| Path::new(""))
    }

    /// `<report dir>/<stem without prefix><suffix>.<ext>`
    #[must_use]
    pub fn output_path(&self, config: &PipelineConfig) -> PathBuf {
        let stem = self
            .report
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let base = if config.strip_prefix.is_empty() {
            stem
        } else {
            stem.replace(&config.strip_prefix, "")
        };
        self.directory().join(format!(
            "{base}{}.{}",
            config.output_suffix,
            config.output_format.extension()
        ))
    }

    /// Where extracted variable declarations are written
    #[must_use]
    pub fn variables_path(&self, config: &PipelineConfig) -> PathBuf {
        self.directory().join(&config.translation.variables_file)
    }
}

/// A pair's context and its reconciled table
#[derive(Debug, Clone)]
pub struct PairTable {
    pub context: PairContext,
    pub reconciliation: Reconciliation,
}

/// Detect, parse, walk and reconcile one pair. Nothing is written.
///
/// # Errors
///
/// Returns [`Error::MissingMapper`] for a pair without mapper, or the first
/// detection, report, or mapper error.
pub fn build_table(pair: &FilePair, config: &PipelineConfig) -> Result<PairTable> {
    let mapper_path = pair.mapper.as_ref().ok_or_else(|| Error::MissingMapper {
        report: pair.report.display().to_string(),
    })?;
    let context = PairContext::new(&pair.report, mapper_path)?;
    info!(
        report = %context.report.display(),
        mapper = %context.mapper.display(),
        direction = %context.direction,
        transaction = context.transaction_type.as_deref().unwrap_or("-"),
        "Processing pair"
    );

    let text = read_report(&context.report)?;
    let lines = extract_section(&text, &config.section);
    let groups = ReportParser::new(context.direction)
        .strict(config.strict)
        .parse(&lines)?;
    info!(groups = groups.len(), "Parsed mapping groups");

    let xml = read_mapper(&context.mapper)?;
    let mapper = Mapper::parse(&xml)?;
    let schema = mapper.schema(context.direction)?;
    let rules = mapper.extended_rules(context.direction)?;
    info!(
        input_segments = schema.input.len(),
        output_segments = schema.output.len(),
        rules = rules.len(),
        "Walked mapper"
    );

    let reconciliation = Reconciler::new(&schema.input, &schema.output).reconcile(&groups, &rules);
    Ok(PairTable {
        context,
        reconciliation,
    })
}
