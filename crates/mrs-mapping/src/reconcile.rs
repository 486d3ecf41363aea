//! Row building

use mrs_ir::{
    ElementDescriptor, ExtendedRule, ExtendedRules, FieldMapping, MappingGroup, ReconciledRow,
    RuleKind, SegmentDescriptor, TransformationLogic,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::lookup::find_element;

/// Counters describing one reconciliation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileStats {
    pub direct: usize,
    pub session: usize,
    pub input_rules: usize,
    pub output_rules: usize,
    /// Source or target lookups that found no schema element
    pub lookup_misses: usize,
}

impl ReconcileStats {
    #[must_use]
    pub fn total(&self) -> usize {
        self.direct + self.session + self.input_rules + self.output_rules
    }
}

/// Rows in table order, with their counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Reconciliation {
    pub rows: Vec<ReconciledRow>,
    pub stats: ReconcileStats,
}

/// Joins report mappings against the two sides of a mapper schema
#[derive(Debug, Clone, Copy)]
pub struct Reconciler<'a> {
    input: &'a [SegmentDescriptor],
    output: &'a [SegmentDescriptor],
}

impl<'a> Reconciler<'a> {
    #[must_use]
    pub fn new(input: &'a [SegmentDescriptor], output: &'a [SegmentDescriptor]) -> Self {
        Self { input, output }
    }

    /// Build the table: direct mappings, then session rules, then input-side
    /// rules, then output-side rules.
    #[must_use]
    pub fn reconcile(&self, groups: &[MappingGroup], rules: &ExtendedRules) -> Reconciliation {
        let mut result = Reconciliation::default();

        for group in groups {
            for mapping in &group.mappings {
                let row = self.direct_row(group, mapping, &mut result.stats);
                result.rows.push(row);
                result.stats.direct += 1;
            }
        }

        for (kind, text) in [
            (RuleKind::PreSession, &rules.pre_session),
            (RuleKind::PostSession, &rules.post_session),
        ] {
            let text = text.trim();
            if !text.is_empty() {
                result.rows.push(ReconciledRow::extended(kind, text));
                result.stats.session += 1;
            }
        }

        for rule in &rules.input {
            result.rows.push(input_rule_row(rule));
            result.stats.input_rules += 1;
        }

        for rule in &rules.output {
            result.rows.push(output_rule_row(rule));
            result.stats.output_rules += 1;
        }

        info!(
            direct = result.stats.direct,
            session = result.stats.session,
            input_rules = result.stats.input_rules,
            output_rules = result.stats.output_rules,
            lookup_misses = result.stats.lookup_misses,
            "Reconciled mapping table"
        );
        result
    }

    fn direct_row(
        &self,
        group: &MappingGroup,
        mapping: &FieldMapping,
        stats: &mut ReconcileStats,
    ) -> ReconciledRow {
        let input_id = mapping.input_id();
        let output_id = mapping.output_id();

        let source = find_element(self.input, &group.segment, &input_id);
        if source.is_none() {
            debug!(segment = %group.segment, element = %input_id, "No source element in schema");
            stats.lookup_misses += 1;
        }
        let target = find_element(self.output, &mapping.output_segment, &output_id);
        if target.is_none() {
            debug!(segment = %mapping.output_segment, element = %output_id, "No target element in schema");
            stats.lookup_misses += 1;
        }

        let source = Metadata::from(source);
        let target = Metadata::from(target);

        ReconciledRow {
            major_section: group.segment.clone(),
            source_element: input_id,
            source_description: source.description,
            source_requirement: source.requirement,
            source_data_type: source.data_type,
            source_min_length: source.min_length,
            source_max_length: source.max_length,
            target_segment: mapping.output_segment.clone(),
            target_element: output_id,
            target_description: target.description,
            target_requirement: target.requirement,
            target_data_type: target.data_type,
            target_min_length: target.min_length,
            target_max_length: target.max_length,
            ..ReconciledRow::new(TransformationLogic::DirectMapping)
        }
    }
}

/// Element metadata as it lands in the table; all empty on a lookup miss
#[derive(Default)]
struct Metadata {
    description: String,
    requirement: String,
    data_type: String,
    min_length: Option<usize>,
    max_length: Option<usize>,
}

impl From<Option<&ElementDescriptor>> for Metadata {
    fn from(element: Option<&ElementDescriptor>) -> Self {
        element.map_or_else(Self::default, |element| Self {
            description: element.description.clone(),
            requirement: element.requirement.as_code().to_string(),
            data_type: element.data_type.clone(),
            min_length: Some(element.min_length),
            max_length: Some(element.max_length),
        })
    }
}

fn input_rule_row(rule: &ExtendedRule) -> ReconciledRow {
    let (section, element) = rule.context_parts();
    ReconciledRow {
        major_section: section.to_string(),
        source_element: element.to_string(),
        source_data_type: rule.data_type.clone(),
        ..ReconciledRow::extended(rule.kind, rule.rule.as_str())
    }
}

fn output_rule_row(rule: &ExtendedRule) -> ReconciledRow {
    let (segment, element) = rule.context_parts();
    ReconciledRow {
        target_segment: segment.to_string(),
        target_element: element.to_string(),
        target_data_type: rule.data_type.clone(),
        ..ReconciledRow::extended(rule.kind, rule.rule.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mrs_ir::Requirement;

    fn element(id: &str, description: &str, requirement: Requirement, max: usize) -> ElementDescriptor {
        ElementDescriptor {
            element_id: format!("{id}*"),
            description: description.to_string(),
            requirement,
            min_length: 1,
            max_length: max,
            data_type: "String".to_string(),
            format: None,
        }
    }

    fn schema() -> (Vec<SegmentDescriptor>, Vec<SegmentDescriptor>) {
        let input = vec![SegmentDescriptor {
            segment: "BEG".into(),
            tag: "BEG*".into(),
            elements: vec![element("BEG03", "PO Number", Requirement::Mandatory, 22)],
            ..Default::default()
        }];
        let output = vec![SegmentDescriptor {
            segment: "Header".into(),
            tag: "Header*".into(),
            elements: vec![element("_attr_PONumber", "Order number", Requirement::Conditional, 35)],
            ..Default::default()
        }];
        (input, output)
    }

    fn group(segment: &str, mappings: &[(&str, &str, &str)]) -> MappingGroup {
        let mut group = MappingGroup::new(segment);
        for (input, output_segment, output_element) in mappings {
            group.push(FieldMapping {
                input: (*input).to_string(),
                output_segment: (*output_segment).to_string(),
                output_element: (*output_element).to_string(),
                ..Default::default()
            });
        }
        group
    }

    #[test]
    fn direct_row_carries_both_sides_metadata() {
        let (input, output) = schema();
        let groups = vec![group("BEG", &[("BEG03", "Header", "PONumber")])];
        let result = Reconciler::new(&input, &output).reconcile(&groups, &ExtendedRules::default());

        assert_eq!(result.rows.len(), 1);
        let row = &result.rows[0];
        assert_eq!(row.major_section, "BEG");
        assert_eq!(row.source_element, "BEG03");
        assert_eq!(row.source_description, "PO Number");
        assert_eq!(row.source_requirement, "M");
        assert_eq!(row.source_max_length, Some(22));
        assert_eq!(row.target_segment, "Header");
        assert_eq!(row.target_element, "PONumber");
        assert_eq!(row.target_description, "Order number");
        assert_eq!(row.target_requirement, "C");
        assert_eq!(row.target_max_length, Some(35));
        assert_eq!(row.logic, TransformationLogic::DirectMapping);
        assert_eq!(row.execution_type, None);
        assert_eq!(result.stats.lookup_misses, 0);
    }

    #[test]
    fn lookup_miss_leaves_cells_empty() {
        let (input, output) = schema();
        let groups = vec![group("BEG", &[("BEG99", "Header", "PONumber")])];
        let result = Reconciler::new(&input, &output).reconcile(&groups, &ExtendedRules::default());

        let row = &result.rows[0];
        assert_eq!(row.source_description, "");
        assert_eq!(row.source_requirement, "");
        assert_eq!(row.source_min_length, None);
        assert_eq!(row.target_description, "Order number");
        assert_eq!(result.stats.lookup_misses, 1);
    }

    #[test]
    fn occurrences_are_part_of_the_ids() {
        let groups = vec![MappingGroup {
            segment: "N1:2".into(),
            output_segment: "Party".into(),
            mappings: vec![FieldMapping {
                input: "N102".into(),
                input_occurrence: Some("3".into()),
                output_element: "Name".into(),
                output_segment: "Party".into(),
                output_occurrence: Some("1".into()),
            }],
        }];
        let result = Reconciler::new(&[], &[]).reconcile(&groups, &ExtendedRules::default());
        assert_eq!(result.rows[0].source_element, "N102:3");
        assert_eq!(result.rows[0].target_element, "Name:1");
        assert_eq!(result.rows[0].major_section, "N1:2");
    }

    #[test]
    fn rule_rows_follow_direct_rows_in_bucket_order() {
        let rules = ExtendedRules {
            pre_session: "init();".into(),
            post_session: "   ".into(),
            input: vec![
                ExtendedRule::new(RuleKind::Inline, "N1.N102", "a = 1;", "String").unwrap(),
                ExtendedRule::new(RuleKind::OnBegin, "N1", "b = 2;", "").unwrap(),
            ],
            output: vec![ExtendedRule::new(RuleKind::OnEnd, "Header.Total", "c = 3;", "Number").unwrap()],
        };
        let groups = vec![group("BEG", &[("BEG03", "Header", "PONumber")])];
        let result = Reconciler::new(&[], &[]).reconcile(&groups, &rules);

        let kinds: Vec<_> = result.rows.iter().map(|r| r.execution_type).collect();
        assert_eq!(
            kinds,
            vec![
                None,
                Some(RuleKind::PreSession),
                Some(RuleKind::Inline),
                Some(RuleKind::OnBegin),
                Some(RuleKind::OnEnd),
            ]
        );

        let pre = &result.rows[1];
        assert_eq!(pre.raw_logic.as_deref(), Some("init();"));
        assert_eq!(pre.major_section, "");

        let inline = &result.rows[2];
        assert_eq!(inline.major_section, "N1");
        assert_eq!(inline.source_element, "N102");
        assert_eq!(inline.source_data_type, "String");
        assert_eq!(inline.logic, TransformationLogic::ExtendedRule);

        let on_begin = &result.rows[3];
        assert_eq!(on_begin.major_section, "N1");
        assert_eq!(on_begin.source_element, "");

        let on_end = &result.rows[4];
        assert_eq!(on_end.target_segment, "Header");
        assert_eq!(on_end.target_element, "Total");
        assert_eq!(on_end.target_data_type, "Number");
        assert_eq!(on_end.major_section, "");

        assert_eq!(result.stats.total(), 5);
        assert_eq!(result.stats.session, 1);
    }

    #[test]
    fn empty_inputs_give_empty_table() {
        let result = Reconciler::new(&[], &[]).reconcile(&[], &ExtendedRules::default());
        assert!(result.rows.is_empty());
        assert_eq!(result.stats, ReconcileStats::default());
    }
}
