//! Integration test: report + mapper fixtures through reconciliation

use std::path::PathBuf;

use mrs_ir::{Direction, RuleKind, TransformationLogic, detect};
use mrs_mapping::{Reconciler, Reconciliation};
use mrs_report::{ReportParser, SectionBounds, extract_section, read_report};
use mrs_schema::{Mapper, read_mapper};

fn repo_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../..")
}

fn reconcile_fixture(report: &str, mapper: &str) -> anyhow::Result<Reconciliation> {
    let root = repo_root();
    let report_path = root.join(report);
    let file_name = report_path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();
    let direction = detect(file_name)?.direction;

    let text = read_report(&report_path)?;
    let lines = extract_section(&text, &SectionBounds::default());
    let groups = ReportParser::new(direction).parse(&lines)?;

    let xml = read_mapper(root.join(mapper))?;
    let mapper = Mapper::parse(&xml)?;
    let schema = mapper.schema(direction)?;
    let rules = mapper.extended_rules(direction)?;

    Ok(Reconciler::new(&schema.input, &schema.output).reconcile(&groups, &rules))
}

#[test]
fn inbound_purchase_order() -> anyhow::Result<()> {
    let result = reconcile_fixture("testdata/inbound/PO_850_IN.txt", "testdata/inbound/PO_850_IN.xml")?;

    assert_eq!(result.stats.direct, 6);
    assert_eq!(result.stats.session, 2);
    assert_eq!(result.stats.input_rules, 2);
    assert_eq!(result.stats.output_rules, 1);
    assert_eq!(result.stats.lookup_misses, 4);
    assert_eq!(result.rows.len(), 11);

    let first = &result.rows[0];
    assert_eq!(first.major_section, "BEG");
    assert_eq!(first.source_element, "BEG03");
    assert_eq!(first.source_description, "Purchase Order Number");
    assert_eq!(first.source_data_type, "An");
    assert_eq!(first.source_max_length, Some(22));
    assert_eq!(first.target_element, "PONumber");
    assert_eq!(first.target_description, "Customer order number");
    assert_eq!(first.target_requirement, "M");

    let carried = &result.rows[3];
    assert_eq!(carried.source_element, "N102");
    assert_eq!(carried.target_element, "DisplayName");
    assert_eq!(carried.major_section, "N1:2");

    assert_eq!(result.rows[4].source_element, "N104:1");
    assert_eq!(result.rows[4].target_element, "Id:2");
    assert_eq!(result.rows[5].target_element, "Reference");

    assert_eq!(result.rows[6].execution_type, Some(RuleKind::PreSession));
    assert_eq!(result.rows[7].execution_type, Some(RuleKind::PostSession));
    assert_eq!(result.rows[9].source_element, "BEG05");
    assert_eq!(result.rows[10].target_segment, "Order");
    assert!(
        result.rows[6..]
            .iter()
            .all(|row| row.logic == TransformationLogic::ExtendedRule)
    );
    Ok(())
}

#[test]
fn outbound_invoice() -> anyhow::Result<()> {
    let result = reconcile_fixture(
        "testdata/outbound/PTFFormat_INVOICE_OUT_810.txt",
        "testdata/outbound/INVOICE_OUT_810.xml",
    )?;

    assert_eq!(result.stats.direct, 4);
    assert_eq!(result.stats.lookup_misses, 0);
    assert_eq!(result.rows.len(), 6);

    let carried = &result.rows[3];
    assert_eq!(carried.source_element, "Quantity");
    assert_eq!(carried.source_data_type, "Number");
    assert_eq!(carried.target_segment, "IT1");
    assert_eq!(carried.target_element, "IT103");
    assert_eq!(carried.target_min_length, Some(2));

    let inline = &result.rows[4];
    assert_eq!(inline.major_section, "Lines");
    assert_eq!(inline.source_element, "Quantity");
    assert_eq!(inline.raw_logic.as_deref(), Some("IT102 = number(Quantity);"));

    let on_begin = &result.rows[5];
    assert_eq!(on_begin.target_segment, "IT1");
    assert_eq!(on_begin.execution_type, Some(RuleKind::OnBegin));
    Ok(())
}

#[test]
fn strict_parse_rejects_inbound_commentary() {
    let text = read_report(repo_root().join("testdata/inbound/PO_850_IN.txt")).unwrap();
    let lines = extract_section(&text, &SectionBounds::default());
    let err = ReportParser::new(Direction::Inbound)
        .strict(true)
        .parse(&lines)
        .unwrap_err();
    assert!(matches!(err, mrs_report::Error::MalformedLine { line: 16, .. }));
}
