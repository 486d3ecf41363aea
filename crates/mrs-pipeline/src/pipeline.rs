//! Pipeline orchestration
//!
//! [`Pipeline`] processes discovered pairs one after another: build the
//! reconciled table, translate its extended rules when a translator is
//! attached, then write the table next to the report.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use mrs_adapter_csv::CsvWriter;
use mrs_adapter_xlsx::XlsxWriter;
use mrs_ir::{Direction, ReconciledRow};
use mrs_mapping::ReconcileStats;
use mrs_translate::{
    AnnotateOptions, AnnotationStats, ChatTranslator, OpenAiClient, RuleTranslator, annotate,
};
use serde::Serialize;
use tracing::{Instrument, error, info, info_span};

use crate::config::{OutputFormat, PipelineConfig};
use crate::discovery::{FilePair, discover_pairs};
use crate::pair_log::PAIR_SPAN;
use crate::table::{PairTable, build_table};
use crate::{Error, Result};

/// What one successfully processed pair produced
#[derive(Debug, Clone, Serialize)]
pub struct PairOutcome {
    pub report: PathBuf,
    pub output: PathBuf,
    pub direction: Direction,
    pub transaction_type: Option<String>,
    pub stats: ReconcileStats,
    /// `None` when translation did not run
    pub translation: Option<AnnotationStats>,
}

/// Result of processing a single pair
#[derive(Debug, Clone, Serialize)]
pub struct PairResult {
    /// Report path
    pub report: PathBuf,
    /// Written table, if processing succeeded
    pub output: Option<PathBuf>,
    /// Number of rows written
    pub rows: usize,
    /// Error message if failed
    pub error: Option<String>,
    /// Processing duration
    pub duration: Duration,
}

impl PairResult {
    #[must_use]
    pub fn success(&self) -> bool {
        self.error.is_none()
    }
}

/// Result of processing every pair below a directory
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchSummary {
    /// Results for individual pairs, in discovery order
    pub results: Vec<PairResult>,
    pub processed: usize,
    pub successful: usize,
    pub failed: usize,
    /// Rows written across all successful pairs
    pub rows: usize,
    pub total_duration: Duration,
}

impl BatchSummary {
    fn record(&mut self, result: PairResult) {
        self.processed += 1;
        if result.success() {
            self.successful += 1;
            self.rows += result.rows;
        } else {
            self.failed += 1;
        }
        self.results.push(result);
    }
}

/// Main pipeline for generating mapping requirement sheets
#[derive(Debug)]
pub struct Pipeline<T = ChatTranslator<OpenAiClient>> {
    config: PipelineConfig,
    translator: Option<T>,
}

impl Pipeline {
    /// Create a pipeline without translator
    #[must_use]
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            translator: None,
        }
    }
}

impl<T: RuleTranslator> Pipeline<T> {
    /// Attach the translator used for extended rules
    #[must_use]
    pub fn with_translator<U: RuleTranslator>(self, translator: U) -> Pipeline<U> {
        Pipeline {
            config: self.config,
            translator: Some(translator),
        }
    }

    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Whether extended rules will be sent for translation
    #[must_use]
    pub fn translates(&self) -> bool {
        self.translator.is_some() && self.config.translation.enabled
    }

    /// Discover and process every pair below `dir`.
    ///
    /// # Errors
    ///
    /// Only discovery errors abort the run; pair failures are recorded in
    /// the returned summary.
    pub async fn run(&self, dir: impl AsRef<Path>) -> Result<BatchSummary> {
        let start = Instant::now();
        let pairs = discover_pairs(dir.as_ref())?;
        info!(dir = %dir.as_ref().display(), pairs = pairs.len(), "Starting run");

        let mut summary = BatchSummary::default();
        for pair in &pairs {
            let pair_start = Instant::now();
            let result = match self.process_pair(pair).await {
                Ok(outcome) => PairResult {
                    report: outcome.report,
                    output: Some(outcome.output),
                    rows: outcome.stats.total(),
                    error: None,
                    duration: pair_start.elapsed(),
                },
                Err(e) => PairResult {
                    report: pair.report.clone(),
                    output: None,
                    rows: 0,
                    error: Some(e.to_string()),
                    duration: pair_start.elapsed(),
                },
            };
            summary.record(result);
        }
        summary.total_duration = start.elapsed();

        info!(
            processed = summary.processed,
            successful = summary.successful,
            failed = summary.failed,
            rows = summary.rows,
            "Run finished"
        );
        Ok(summary)
    }

    /// Build, translate and write the table of one pair.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Pair`] wrapping the first failure. Translation
    /// failures are recorded in the rows and do not fail the pair.
    pub async fn process_pair(&self, pair: &FilePair) -> Result<PairOutcome> {
        let span = info_span!(PAIR_SPAN, report = %pair.report.display());
        self.process(pair)
            .instrument(span.clone())
            .await
            .map_err(|e| {
                span.in_scope(|| error!(error = %e, "Pair failed"));
                Error::pair(pair.report.display().to_string(), e)
            })
    }

    async fn process(&self, pair: &FilePair) -> Result<PairOutcome> {
        let PairTable {
            context,
            mut reconciliation,
        } = build_table(pair, &self.config)?;

        let translation = match &self.translator {
            Some(translator) if self.config.translation.enabled => {
                let options = AnnotateOptions {
                    variable_sample_size: self.config.translation.variable_sample_size,
                    variables_path: Some(context.variables_path(&self.config)),
                };
                Some(annotate(&mut reconciliation.rows, translator, &options).await)
            }
            _ => None,
        };

        let output = context.output_path(&self.config);
        self.write_table(&output, &reconciliation.rows)?;
        info!(
            output = %output.display(),
            rows = reconciliation.rows.len(),
            "Wrote mapping requirement sheet"
        );

        Ok(PairOutcome {
            report: context.report,
            output,
            direction: context.direction,
            transaction_type: context.transaction_type,
            stats: reconciliation.stats,
            translation,
        })
    }

    fn write_table(&self, path: &Path, rows: &[ReconciledRow]) -> Result<()> {
        match self.config.output_format {
            OutputFormat::Csv => {
                let delimiter = self
                    .config
                    .csv_delimiter_byte()
                    .map_err(|message| Error::config("csv_delimiter", message))?;
                CsvWriter::new()
                    .with_delimiter(delimiter)
                    .write_file(path, rows)?;
            }
            OutputFormat::Xlsx => {
                XlsxWriter::new()
                    .with_sheet_name(self.config.sheet_name.as_str())
                    .write_file(path, rows)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(rows: usize, error: Option<&str>) -> PairResult {
        PairResult {
            report: PathBuf::from("r.txt"),
            output: error.is_none().then(|| PathBuf::from("r.csv")),
            rows,
            error: error.map(str::to_string),
            duration: Duration::ZERO,
        }
    }

    #[test]
    fn summary_counts_rows_of_successful_pairs_only() {
        let mut summary = BatchSummary::default();
        summary.record(result(11, None));
        summary.record(result(0, Some("No mapper XML found next to 'r.txt'")));
        summary.record(result(6, None));

        assert_eq!(summary.processed, 3);
        assert_eq!(summary.successful, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.rows, 17);
        assert!(!summary.results[1].success());
    }

    #[test]
    fn translation_requires_translator_and_flag() {
        let pipeline = Pipeline::new(PipelineConfig::default());
        assert!(!pipeline.translates());
    }

    #[tokio::test]
    async fn missing_directory_aborts_run() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = Pipeline::new(PipelineConfig::default());
        let err = pipeline.run(dir.path().join("absent")).await.unwrap_err();
        assert!(matches!(err, Error::Discovery(_)));
    }

    #[tokio::test]
    async fn pair_errors_carry_report_path() {
        let pipeline = Pipeline::new(PipelineConfig::default());
        let pair = FilePair {
            report: PathBuf::from("/nowhere/PO_850_IN.txt"),
            mapper: None,
        };
        let err = pipeline.process_pair(&pair).await.unwrap_err();
        match err {
            Error::Pair { path, source } => {
                assert_eq!(path, "/nowhere/PO_850_IN.txt");
                assert!(matches!(*source, Error::MissingMapper { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
