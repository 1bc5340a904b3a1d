use quoted_csv::dialect::PLACEHOLDER;
use quoted_csv::{
    parse, parse_with_options, CsvOptions, Error, LineJoin, LineTerminator, OpenMode, Reader,
    TrimOption,
};
use std::io::Write;

#[test]
fn test_separator_inside_escape_run() {
    let fields = parse("\"Smith, John\",42", true).unwrap();
    println!("Unescaped: {:?}", fields);
    assert_eq!(fields, vec!["Smith, John", "42"]);

    let raw = parse("\"Smith, John\",42", false).unwrap();
    assert_eq!(raw, vec!["\"Smith, John\"", "42"]);
}

#[test]
fn test_doubled_escape_is_literal() {
    let fields = parse("\"say \"\"hi\"\"\",x", true).unwrap();
    assert_eq!(fields, vec!["say \"hi\"", "x"]);
}

#[test]
fn test_runs_in_field_order() {
    let fields = parse("\"a\",b,\"c,d\",\"e\"", true).unwrap();
    assert_eq!(fields, vec!["a", "b", "c,d", "e"]);
}

#[test]
fn test_partially_escaped_field() {
    // the run is restored in place and the escapes removed around it
    let fields = parse("x\"y,z\"w,2", true).unwrap();
    assert_eq!(fields, vec!["xy,zw", "2"]);
}

#[test]
fn test_unbalanced_escape_is_left_alone() {
    let fields = parse("a,\"b,c", true).unwrap();
    assert_eq!(fields, vec!["a", "\"b", "c"]);
}

#[test]
fn test_empty_fields() {
    assert_eq!(parse("", true).unwrap(), vec![""]);
    assert_eq!(parse(",,", true).unwrap(), vec!["", "", ""]);
    assert_eq!(parse("\"\",a", true).unwrap(), vec!["", "a"]);
}

#[test]
fn test_whitespace_trimming() {
    assert_eq!(parse("  a ,\tb", true).unwrap(), vec!["a", "b"]);
    // unescaped content is trimmed again
    assert_eq!(parse("\" padded \"", true).unwrap(), vec!["padded"]);
    assert_eq!(parse("\" padded \"", false).unwrap(), vec!["\" padded \""]);

    let keep = CsvOptions::new().with_trim(TrimOption::None);
    assert_eq!(
        parse_with_options(" a ,\" b \"", true, keep).unwrap(),
        vec![" a ", " b "]
    );

    let leading = CsvOptions::new().with_trim(TrimOption::Leading);
    assert_eq!(
        parse_with_options(" a , b ", true, leading).unwrap(),
        vec!["a ", "b "]
    );
}

#[test]
fn test_placeholder_in_input_is_rejected() {
    let line = format!("a{},b", PLACEHOLDER);
    assert_eq!(
        parse(&line, true).unwrap_err(),
        Error::ParseIntegrity {
            placeholders: 1,
            replacements: 0,
        }
    );
}

#[test]
fn test_invalid_dialects() {
    let cases = vec![
        CsvOptions::new().with_separator('"'),
        CsvOptions::new().with_separator('\n'),
        CsvOptions::new().with_escape('\r'),
        CsvOptions::new().with_escape('\u{FDD0}'),
    ];
    for options in cases {
        assert!(
            matches!(options.validate(), Err(Error::InvalidOptions(_))),
            "{:?}",
            options
        );
    }
}

#[test]
fn test_crlf_and_missing_final_terminator() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "a,b\r\n\r\n\"c\r\nd\",e").unwrap();
    file.flush().unwrap();

    let mut reader = Reader::new(file.path(), OpenMode::Open, false).unwrap();
    assert_eq!(reader.record_count(), 2);
    assert_eq!(reader.read_raw(1).unwrap().as_deref(), Some("\"cd\",e"));

    let options = CsvOptions::new().with_line_join(LineJoin::PreserveBreak);
    let mut reader = Reader::with_options(file.path(), OpenMode::Open, false, options).unwrap();
    let record = reader.read_data_record(1, true).unwrap().unwrap();
    assert_eq!(record.values(), &["c\nd", "e"]);
}

#[test]
fn test_options_from_json() {
    let options: CsvOptions = serde_json::from_str(
        r#"{"separator":";","trim":"trailing","terminator":"cr_lf","line_join":"preserve_break"}"#,
    )
    .unwrap();
    assert_eq!(options.separator, ';');
    assert_eq!(options.escape, '"');
    assert_eq!(options.trim, TrimOption::Trailing);
    assert_eq!(options.terminator, LineTerminator::CrLf);
    assert_eq!(options.line_join, LineJoin::PreserveBreak);

    let mode: OpenMode = serde_json::from_str(r#""open_or_create""#).unwrap();
    assert_eq!(mode, OpenMode::OpenOrCreate);
}
