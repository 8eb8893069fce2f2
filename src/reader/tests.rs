use super::*;
use std::io::Write;
use tempfile::NamedTempFile;

const TAB_QMS: &str = "TimesExp\tTempAK\t18.00\t28.00\tPhotodiode\n\
0\t10.0\t1.0e-10\t2.0e-10\t1.0e-12\n\
60\t12.0\t1.5e-10\t2.5e-10\t1.1e-12\n\
120\t14.0\t1.2e-10\t2.2e-10\t1.0e-12\n";

const SPACE_QMS: &str = "
  TimesExp   18.00    44.00

  0     1.0   3.0
  1     2.0   4.0
";

#[test]
fn test_tab_separated_parsing() {
    let table = QmsTable::parse(TAB_QMS).unwrap();

    assert_eq!(table.delimiter(), Delimiter::Tab);
    assert_eq!(table.headers().len(), 5);
    assert_eq!(table.n_rows(), 3);
    assert_eq!(table.column("TimesExp").unwrap(), &[0.0, 60.0, 120.0]);
    assert_eq!(table.column("Photodiode").unwrap()[1], 1.1e-12);
}

#[test]
fn test_whitespace_separated_parsing() {
    let table = QmsTable::parse(SPACE_QMS).unwrap();

    assert_eq!(table.delimiter(), Delimiter::Whitespace);
    assert_eq!(table.headers(), &["TimesExp", "18.00", "44.00"]);
    assert_eq!(table.column("44.00").unwrap(), &[3.0, 4.0]);
}

#[test]
fn test_non_numeric_fields_become_nan() {
    let table = QmsTable::parse("t\ta\n0\tx\n1\t2\n").unwrap();
    let a = table.column("a").unwrap();

    assert!(a[0].is_nan());
    assert_eq!(a[1], 2.0);
}

#[test]
fn test_ragged_rows_skipped() {
    let table = QmsTable::parse("t a b\n0 1 2\n1 1\n2 3 4\n").unwrap();

    assert_eq!(table.n_rows(), 2);
    assert_eq!(table.skipped_rows(), 1);
    assert_eq!(table.column("t").unwrap(), &[0.0, 2.0]);
}

#[test]
fn test_empty_leading_field_keeps_alignment() {
    let table = QmsTable::parse("TimesExp\t18.00\t28.00\n0\t1\t2\n\t1\t2\n2\t1\t2\n").unwrap();

    assert_eq!(table.n_rows(), 3);
    assert_eq!(table.skipped_rows(), 0);
    let time = table.column("TimesExp").unwrap();
    assert!(time[1].is_nan());
    assert_eq!(time[2], 2.0);
    assert_eq!(table.column("28.00").unwrap(), &[2.0, 2.0, 2.0]);
}

#[test]
fn test_header_adjusted_to_data_width() {
    let short = QmsTable::parse("t a\n0 1 2\n").unwrap();
    assert_eq!(short.headers(), &["t", "a", "col_2"]);

    let long = QmsTable::parse("t a b c\n0 1\n").unwrap();
    assert_eq!(long.headers(), &["t", "a"]);
    assert!(!long.contains("b"));
}

#[test]
fn test_empty_and_header_only_files() {
    assert!(matches!(QmsTable::parse("  \n\n"), Err(ReaderError::Empty)));
    assert!(matches!(QmsTable::parse("t a\n"), Err(ReaderError::NoData)));
}

#[test]
fn test_missing_column() {
    let table = QmsTable::parse(TAB_QMS).unwrap();
    match table.column("32.00") {
        Err(ReaderError::ColumnNotFound(label)) => assert_eq!(label, "32.00"),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_mass_label_detection() {
    let table = QmsTable::parse(TAB_QMS).unwrap();
    assert_eq!(table.mass_labels(), vec!["18.00", "28.00"]);
}

#[test]
fn test_invalid_utf8_is_tolerated() {
    let mut bytes = b"t\ta\xff\n0\t1\n1\t2\n".to_vec();
    bytes.push(b'\n');
    let table = QmsTable::from_reader(bytes.as_slice()).unwrap();

    assert_eq!(table.n_rows(), 2);
    assert_eq!(table.headers()[0], "t");
}

#[test]
fn test_read_from_disk() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(TAB_QMS.as_bytes()).unwrap();

    let table = read_qms_file(file.path()).unwrap();
    assert_eq!(table.n_rows(), 3);
}

#[test]
fn test_missing_file() {
    let err = read_qms_file("/definitely/not/here.txt").unwrap_err();
    assert!(matches!(err, ReaderError::FileNotFound(_)));
}

#[test]
fn test_select_channels_skips_missing_masses() {
    let table = QmsTable::parse(TAB_QMS).unwrap();
    let masses = vec!["18.00".to_string(), "32.00".to_string(), "28.00".to_string()];
    let request = ChannelRequest {
        time_key: "TimesExp",
        temp_key: Some("TempAK"),
        masses: &masses,
        photon_key: Some("Photodiode"),
    };

    let set = table.select(&request).unwrap();

    assert_eq!(set.masses.len(), 2);
    assert_eq!(set.masses[0].label, "18.00");
    assert_eq!(set.masses[1].label, "28.00");
    assert_eq!(set.missing, vec!["32.00".to_string()]);
    assert_eq!(set.temperature_k.as_deref(), Some(&[10.0, 12.0, 14.0][..]));
    assert!(set.photon_current.is_some());
    assert!(set.mass("28.00").is_some());

    let series = set.series(&set.masses[0].values).unwrap();
    assert_eq!(series.len(), 3);
}

#[test]
fn test_select_requires_time_axis() {
    let table = QmsTable::parse(TAB_QMS).unwrap();
    let request = ChannelRequest {
        time_key: "Time",
        temp_key: None,
        masses: &[],
        photon_key: None,
    };

    assert!(matches!(
        table.select(&request),
        Err(ReaderError::ColumnNotFound(_))
    ));
}

#[test]
fn test_missing_photon_column_recorded() {
    let table = QmsTable::parse(TAB_QMS).unwrap();
    let request = ChannelRequest {
        time_key: "TimesExp",
        temp_key: None,
        masses: &[],
        photon_key: Some("Lamp"),
    };

    let set = table.select(&request).unwrap();
    assert!(set.photon_current.is_none());
    assert_eq!(set.missing, vec!["Lamp".to_string()]);
}

#[test]
fn test_summary() {
    let table = QmsTable::parse(TAB_QMS).unwrap();
    let summary = table.summary("TimesExp");

    assert_eq!(summary.rows, 3);
    assert_eq!(summary.time_range, Some((0.0, 120.0)));
    assert_eq!(summary.mass_labels, vec!["18.00", "28.00"]);

    let text = summary.to_string();
    assert!(text.contains("Time range: 0.0 - 120.0 sec (0.00 - 2.00 min)"));
    assert!(text.contains("Mass channels: 18.00, 28.00"));

    assert_eq!(table.summary("missing").time_range, None);
}
