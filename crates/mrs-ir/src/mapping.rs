//! Mapping groups recovered from the text report

use serde::{Deserialize, Serialize};

/// A segment header from the report and the field mappings under it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingGroup {
    /// Segment (EDI) or element group (XML) key, with `:occurrence` when the
    /// header carried one
    pub segment: String,
    /// Output segment of the most recent mapping in this group
    pub output_segment: String,
    /// Field mappings in report order
    pub mappings: Vec<FieldMapping>,
}

impl MappingGroup {
    /// Start an empty group for a header line
    pub fn new(segment: impl Into<String>) -> Self {
        Self {
            segment: segment.into(),
            ..Default::default()
        }
    }

    /// Append a mapping and remember its output segment
    pub fn push(&mut self, mapping: FieldMapping) {
        self.output_segment.clone_from(&mapping.output_segment);
        self.mappings.push(mapping);
    }

    /// The mapping appended last, if any
    #[must_use]
    pub fn last_mapping(&self) -> Option<&FieldMapping> {
        self.mappings.last()
    }
}

/// One arrow line of the report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMapping {
    pub input: String,
    pub input_occurrence: Option<String>,
    pub output_element: String,
    pub output_segment: String,
    pub output_occurrence: Option<String>,
}

impl FieldMapping {
    /// Input element id with its occurrence suffix, e.g. `N101:2`
    #[must_use]
    pub fn input_id(&self) -> String {
        with_occurrence(&self.input, self.input_occurrence.as_deref())
    }

    /// Output element id with its occurrence suffix
    #[must_use]
    pub fn output_id(&self) -> String {
        with_occurrence(&self.output_element, self.output_occurrence.as_deref())
    }
}

fn with_occurrence(id: &str, occurrence: Option<&str>) -> String {
    match occurrence {
        Some(occ) if !occ.is_empty() => format!("{id}:{occ}"),
        _ => id.to_string(),
    }
}

/// Split a `name[:occurrence]` token into its id and non-empty occurrence.
///
/// Only the first two `:`-separated parts are significant; anything after a
/// second colon is ignored.
#[must_use]
pub fn split_occurrence(token: &str) -> (String, Option<String>) {
    let mut parts = token.split(':');
    let id = parts.next().unwrap_or_default().to_string();
    let occurrence = parts
        .next()
        .filter(|occ| !occ.is_empty())
        .map(str::to_string);
    (id, occurrence)
}
