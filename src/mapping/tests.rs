//! Credential mapping tests

use super::*;

#[test]
fn test_empty_mapping() {
    assert_eq!(
        parse_mapping("", MappingFormat::Auto).unwrap_err(),
        ParseError::EmptyMapping
    );
    assert_eq!(
        parse_mapping(" \n\r\n  \t", MappingFormat::Freeform).unwrap_err(),
        ParseError::EmptyMapping
    );
}

#[test]
fn test_only_malformed_lines() {
    assert_eq!(
        parse_mapping("badline\nanother bad line\n", MappingFormat::Freeform).unwrap_err(),
        ParseError::NoValidRecords
    );
    assert_eq!(
        parse_mapping("filename,password\n,\n", MappingFormat::Tabular).unwrap_err(),
        ParseError::NoValidRecords
    );
}

#[test]
fn test_last_definition_wins() {
    let table = parse_mapping("a.pdf;p1\nb.pdf;q\na.pdf;p2\n", MappingFormat::Freeform).unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table.password("a.pdf"), Some("p2"));

    // The redefined entry keeps its first position
    let names: Vec<&str> = table.records().iter().map(|r| r.filename.as_str()).collect();
    assert_eq!(names, vec!["a.pdf", "b.pdf"]);
}

#[test]
fn test_full_width_equivalence() {
    let full = "a.pdf；p1\nb.pdf，p2\n";
    let half = "a.pdf;p1\nb.pdf,p2\n";

    for format in [MappingFormat::Freeform, MappingFormat::Tabular, MappingFormat::Auto] {
        let full_table = parse_mapping(full, format).unwrap();
        let half_table = parse_mapping(half, format).unwrap();
        assert_eq!(full_table.records(), half_table.records(), "format {format:?}");
    }
}

#[test]
fn test_trailing_semicolons_stripped() {
    let table = parse_mapping("filename,password\na.pdf;;,pw1\nb.pdf;,pw2;\n", MappingFormat::Tabular)
        .unwrap();
    assert_eq!(table.password("a.pdf"), Some("pw1"));
    assert_eq!(table.password("b.pdf"), Some("pw2"));
}

#[test]
fn test_malformed_line_with_valid_line() {
    let report = parse_mapping_report("badline\nreport.pdf;hunter2\n", MappingFormat::Auto).unwrap();
    assert_eq!(report.format, MappingFormat::Freeform);
    assert_eq!(report.table.len(), 1);
    assert_eq!(report.table.password("report.pdf"), Some("hunter2"));
    assert_eq!(report.rejected.len(), 1);
    assert_eq!(report.rejected[0].content, "badline");
}

#[test]
fn test_mixed_delimiters_across_lines() {
    let table = parse_mapping(
        "a.pdf;one\nb.pdf,two\nc.pdf\tthree\nd.pdf|four\n",
        MappingFormat::Freeform,
    )
    .unwrap();
    assert_eq!(table.len(), 4);
    assert_eq!(table.password("c.pdf"), Some("three"));
    assert_eq!(table.password("d.pdf"), Some("four"));
}

#[test]
fn test_auto_detects_header() {
    let report = parse_mapping_report(
        "檔名，密碼\r\nreport.pdf，hunter2\r\nnotes.pdf，abc123\r\n",
        MappingFormat::Auto,
    )
    .unwrap();
    assert_eq!(report.format, MappingFormat::Tabular);
    assert_eq!(report.table.len(), 2);
    assert_eq!(report.table.password("notes.pdf"), Some("abc123"));
}

#[test]
fn test_headerless_tabular_is_positional() {
    let table = parse_mapping("report.pdf;hunter2;\nnotes.pdf;abc123;\n", MappingFormat::Tabular)
        .unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table.password("report.pdf"), Some("hunter2"));
}

#[test]
fn test_keys_are_case_sensitive() {
    let table = parse_mapping("A.pdf;upper\na.pdf;lower\n", MappingFormat::Freeform).unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table.password("A.pdf"), Some("upper"));
    assert_eq!(table.password("a.pdf"), Some("lower"));
}

#[test]
fn test_format_for_path() {
    assert_eq!(
        MappingFormat::Auto.for_path(Path::new("map.CSV")),
        MappingFormat::Tabular
    );
    assert_eq!(
        MappingFormat::Auto.for_path(Path::new("map.txt")),
        MappingFormat::Auto
    );
    assert_eq!(
        MappingFormat::Freeform.for_path(Path::new("map.csv")),
        MappingFormat::Freeform
    );
}

#[test]
fn test_table_insert_reports_replaced_password() {
    let mut table = CredentialTable::new();
    assert_eq!(table.insert(CredentialRecord::new("a.pdf", "one")), None);
    assert_eq!(
        table.insert(CredentialRecord::new("a.pdf", "two")),
        Some("one".to_string())
    );
    assert!(table.contains("a.pdf"));
    assert!(!table.contains("b.pdf"));
}

#[test]
fn test_auto_keeps_record_named_like_a_label() {
    let table = parse_mapping("file;pw1\nb.pdf;pw2\n", MappingFormat::Auto).unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table.password("file"), Some("pw1"));
}
