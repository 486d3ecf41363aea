//! Reconciled rows of the output table

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::RuleKind;

/// Output columns, in order
pub const COLUMNS: [&str; 19] = [
    "Major Section",
    "Source XML Node/Element",
    "Source Field Description",
    "Mandatory/Optional (M/C)",
    "Source Data Type",
    "Source Min Length",
    "Source Max Length",
    "Target Segment",
    "Target Element",
    "Target Description",
    "Target Mandatory/Optional (M/C)",
    "Target Data Type",
    "Target Min Length",
    "Target Max Length",
    "Transformation Logic",
    "Execution Type",
    "Extracted Logic (Raw)",
    "Generated Logic",
    "Is Processed",
];

/// Marker written to the processed column
pub const PROCESSED: &str = "YES";

/// How a target value is produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransformationLogic {
    #[serde(rename = "Direct Mapping")]
    DirectMapping,
    #[serde(rename = "Extended Rule")]
    ExtendedRule,
}

impl TransformationLogic {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DirectMapping => "Direct Mapping",
            Self::ExtendedRule => "Extended Rule",
        }
    }
}

impl fmt::Display for TransformationLogic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of the mapping requirement sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciledRow {
    pub major_section: String,
    pub source_element: String,
    pub source_description: String,
    pub source_requirement: String,
    pub source_data_type: String,
    pub source_min_length: Option<usize>,
    pub source_max_length: Option<usize>,
    pub target_segment: String,
    pub target_element: String,
    pub target_description: String,
    pub target_requirement: String,
    pub target_data_type: String,
    pub target_min_length: Option<usize>,
    pub target_max_length: Option<usize>,
    pub logic: TransformationLogic,
    pub execution_type: Option<RuleKind>,
    pub raw_logic: Option<String>,
    pub generated_logic: Option<String>,
    pub processed: bool,
}

impl ReconciledRow {
    /// An otherwise empty row with the given transformation logic
    #[must_use]
    pub fn new(logic: TransformationLogic) -> Self {
        Self {
            major_section: String::new(),
            source_element: String::new(),
            source_description: String::new(),
            source_requirement: String::new(),
            source_data_type: String::new(),
            source_min_length: None,
            source_max_length: None,
            target_segment: String::new(),
            target_element: String::new(),
            target_description: String::new(),
            target_requirement: String::new(),
            target_data_type: String::new(),
            target_min_length: None,
            target_max_length: None,
            logic,
            execution_type: None,
            raw_logic: None,
            generated_logic: None,
            processed: false,
        }
    }

    /// An extended-rule row carrying raw logic
    #[must_use]
    pub fn extended(kind: RuleKind, raw_logic: impl Into<String>) -> Self {
        Self {
            execution_type: Some(kind),
            raw_logic: Some(raw_logic.into()),
            ..Self::new(TransformationLogic::ExtendedRule)
        }
    }

    /// Whether the generated-logic cell is still empty
    #[must_use]
    pub fn needs_generation(&self) -> bool {
        self.generated_logic
            .as_deref()
            .is_none_or(|logic| logic.trim().is_empty())
    }

    /// Cell values in [`COLUMNS`] order, absent values as empty strings
    #[must_use]
    pub fn to_record(&self) -> Vec<String> {
        fn number(value: Option<usize>) -> String {
            value.map(|v| v.to_string()).unwrap_or_default()
        }

        vec![
            self.major_section.clone(),
            self.source_element.clone(),
            self.source_description.clone(),
            self.source_requirement.clone(),
            self.source_data_type.clone(),
            number(self.source_min_length),
            number(self.source_max_length),
            self.target_segment.clone(),
            self.target_element.clone(),
            self.target_description.clone(),
            self.target_requirement.clone(),
            self.target_data_type.clone(),
            number(self.target_min_length),
            number(self.target_max_length),
            self.logic.as_str().to_string(),
            self.execution_type
                .map(|kind| kind.as_str().to_string())
                .unwrap_or_default(),
            self.raw_logic.clone().unwrap_or_default(),
            self.generated_logic.clone().unwrap_or_default(),
            if self.processed { PROCESSED.to_string() } else { String::new() },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_has_one_cell_per_column() {
        let row = ReconciledRow::new(TransformationLogic::DirectMapping);
        assert_eq!(row.to_record().len(), COLUMNS.len());
    }

    #[test]
    fn record_renders_absent_values_as_empty() {
        let mut row = ReconciledRow::extended(RuleKind::OnBegin, "count = 0;");
        row.target_min_length = Some(3);
        let record = row.to_record();

        assert_eq!(record[5], "");
        assert_eq!(record[12], "3");
        assert_eq!(record[14], "Extended Rule");
        assert_eq!(record[15], "onBegin");
        assert_eq!(record[16], "count = 0;");
        assert_eq!(record[18], "");
    }

    #[test]
    fn processed_rows_render_marker() {
        let mut row = ReconciledRow::extended(RuleKind::PreSession, "init();");
        row.processed = true;
        assert_eq!(row.to_record()[18], PROCESSED);
    }

    #[test]
    fn blank_generated_logic_still_needs_generation() {
        let mut row = ReconciledRow::extended(RuleKind::Inline, "x");
        assert!(row.needs_generation());
        row.generated_logic = Some("  ".into());
        assert!(row.needs_generation());
        row.generated_logic = Some("tmp.x = 1;".into());
        assert!(!row.needs_generation());
    }
}
