//! Filling the generated-logic column of a reconciled table

use std::path::PathBuf;

use mrs_ir::{ReconciledRow, RuleKind, TransformationLogic};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::translator::{RuleRequest, RuleTranslator};
use crate::{Error, Result};

/// Text written for pre-session rows, which are never sent to the model
pub const PRESESSION_NOTE: &str = "// Pre-session logic handled separately";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotateOptions {
    /// Number of leading rules sampled for variable declarations (default: 10)
    pub variable_sample_size: usize,
    /// Where the extracted declarations are written; `None` skips extraction
    pub variables_path: Option<PathBuf>,
}

impl Default for AnnotateOptions {
    fn default() -> Self {
        Self {
            variable_sample_size: 10,
            variables_path: None,
        }
    }
}

/// Outcome counters of one annotation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AnnotationStats {
    /// Rows eligible for translation
    pub selected: usize,
    pub translated: usize,
    pub presession: usize,
    /// Rows the model answered for with empty code; left untouched
    pub empty: usize,
    pub failed: usize,
}

/// Whether a row still needs generated logic
fn is_eligible(row: &ReconciledRow) -> bool {
    row.logic == TransformationLogic::ExtendedRule
        && row.raw_logic.is_some()
        && row.needs_generation()
        && !row.processed
}

/// Translate every eligible row in place, one request at a time.
///
/// Variable declarations for the first sampled rules are extracted and
/// written to [`AnnotateOptions::variables_path`] before translation; a
/// failure there is logged and ignored. Per-row failures are recorded in the
/// row's generated-logic cell and never abort the pass.
pub async fn annotate<T: RuleTranslator>(
    rows: &mut [ReconciledRow],
    translator: &T,
    options: &AnnotateOptions,
) -> AnnotationStats {
    let selected: Vec<usize> = rows
        .iter()
        .enumerate()
        .filter(|(_, row)| is_eligible(row))
        .map(|(index, _)| index)
        .collect();

    let mut stats = AnnotationStats {
        selected: selected.len(),
        ..AnnotationStats::default()
    };
    info!(rows = selected.len(), "Translating extended rules");

    if selected.is_empty() {
        return stats;
    }

    if let Some(path) = &options.variables_path {
        let sample: Vec<String> = selected
            .iter()
            .filter_map(|&index| rows[index].raw_logic.as_deref())
            .map(|raw| raw.trim().to_string())
            .take(options.variable_sample_size)
            .collect();
        if let Err(e) = write_declarations(translator, &sample, path).await {
            warn!(path = %path.display(), error = %e, "Variable declaration extraction failed");
        }
    }

    for index in selected {
        let row = &mut rows[index];

        if row.execution_type == Some(RuleKind::PreSession) {
            row.generated_logic = Some(PRESESSION_NOTE.to_string());
            row.processed = true;
            stats.presession += 1;
            debug!(row = index, "Pre-session rule left for separate handling");
            continue;
        }

        let request = RuleRequest {
            input_field: row.source_element.clone(),
            output_field: row.target_element.clone(),
            input_description: row.source_description.clone(),
            raw_logic: row.raw_logic.as_deref().unwrap_or_default().trim().to_string(),
        };

        match translator.translate(&request).await {
            Ok(code) if code.is_empty() => {
                debug!(row = index, "Model returned no code");
                stats.empty += 1;
            }
            Ok(code) => {
                row.generated_logic = Some(code);
                row.processed = true;
                stats.translated += 1;
                debug!(row = index, execution_type = ?row.execution_type, "Rule translated");
            }
            Err(e) => {
                warn!(row = index, error = %e, "Rule translation failed");
                row.generated_logic = Some(failure_note(&e));
                stats.failed += 1;
            }
        }
    }

    info!(
        translated = stats.translated,
        presession = stats.presession,
        empty = stats.empty,
        failed = stats.failed,
        "Rule translation finished"
    );
    stats
}

async fn write_declarations<T: RuleTranslator>(
    translator: &T,
    sample: &[String],
    path: &std::path::Path,
) -> Result<()> {
    let declarations = translator.declare_variables(sample).await?;
    std::fs::write(path, &declarations).map_err(|e| Error::io(path.display().to_string(), e))?;
    info!(
        path = %path.display(),
        declarations = declarations.lines().count(),
        "Wrote variable declarations"
    );
    Ok(())
}

/// Cell text recording why a row has no generated logic
fn failure_note(error: &Error) -> String {
    match error {
        Error::Response { message, raw } => {
            format!("// Error parsing response: {message}\n// Raw: {raw}")
        }
        other => format!("// API error: {other}"),
    }
}
