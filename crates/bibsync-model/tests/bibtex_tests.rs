//! Integration tests for BibTeX reading and writing.

use bibsync_model::{BibtexFormat, Error, ImportPreferences, Record, RecordFormat, RecordSet, value};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;

fn format() -> BibtexFormat {
    BibtexFormat::default()
}

#[test]
fn test_parse_single_entry() {
    let db = format()
        .parse(
            r#"@Article{Smith2020,
  author = {Jane Smith},
  title  = "A {GPU} Study",
  year   = 2020
}"#,
        )
        .unwrap();

    assert_eq!(db.len(), 1);
    let record = &db.records()[0];
    assert_eq!(record.entry_type(), "article");
    assert_eq!(record.citation_key(), Some("Smith2020"));
    assert_eq!(record.field("author"), Some("Jane Smith"));
    assert_eq!(record.field("title"), Some("A {GPU} Study"));
    assert_eq!(record.field("year"), Some("2020"));
}

#[test]
fn test_parse_ignores_free_text_and_keeps_comments() {
    let db = format()
        .parse(
            "Contact me at someone@example.com\n\
             @comment{jabref-meta: databaseType:bibtex;}\n\
             @misc{a, note = {n}}\n",
        )
        .unwrap();

    assert_eq!(db.len(), 1);
    assert_eq!(db.records()[0].citation_key(), Some("a"));
    assert_eq!(db.comments(), ["jabref-meta: databaseType:bibtex;".to_string()]);
}

#[test]
fn test_comments_survive_rewrite() {
    let db = format()
        .parse(
            "@Article{a, title={T}}\n\
             @Comment{jabref-meta: databaseType:bibtex;}\n\
             @comment(free text)\n",
        )
        .unwrap();

    let text = format().write(&db);

    assert!(text.contains("@Comment{jabref-meta: databaseType:bibtex;}"), "{text}");
    assert_eq!(format().parse(&text).unwrap(), db);
}

#[rstest]
#[case("@misc{k, note = {Issue #3# fixed}}", "Issue #3# fixed")]
#[case("@misc{k, note = {see #jan# here}}", "see #jan# here")]
#[case("@misc{k, note = \"C# in depth\"}", "C# in depth")]
fn test_literal_hash_is_not_a_macro(#[case] input: &str, #[case] shown: &str) {
    let db = format().parse(input).unwrap();
    let note = db.records()[0].field("note").unwrap();
    assert_eq!(value::value_parts(note).len(), 1);
    assert_eq!(value::display(note), shown);

    let text = format().write(&db);
    assert!(text.contains(&format!("note = {{{shown}}}")), "{text}");
    assert_eq!(format().parse(&text).unwrap(), db);
}

#[test]
fn test_macro_next_to_literal_hash_round_trips() {
    let db = format()
        .parse("@misc{k, note = {No.~#} # num # {#}}")
        .unwrap();

    let text = format().write(&db);

    assert!(text.contains("note = {No.~#} # num # {#}"), "{text}");
    assert_eq!(format().parse(&text).unwrap(), db);
}

#[test]
fn test_parse_string_and_preamble() {
    let db = format()
        .parse(
            "@String{acm = {ACM Press}}\n\
             @Preamble{{\\newcommand{\\noop}[1]{}}}\n\
             @book{b, publisher = acm, month = jan # {~1}}\n",
        )
        .unwrap();

    assert_eq!(db.strings().get("acm").map(String::as_str), Some("ACM Press"));
    assert_eq!(db.preamble(), Some("\\newcommand{\\noop}[1]{}"));
    let record = db.find_by_key("b").unwrap();
    assert_eq!(record.field("publisher"), Some("#acm#"));
    assert_eq!(record.field("month"), Some("#jan#~1"));
}

#[test]
fn test_parse_parenthesized_entry() {
    let db = format().parse("@misc(p, title = {T})").unwrap();
    assert_eq!(db.find_by_key("p").and_then(|r| r.field("title")), Some("T"));
}

#[test]
fn test_parse_entry_without_key() {
    let db = format().parse("@misc{, title = {Keyless}}").unwrap();
    assert_eq!(db.records()[0].citation_key(), None);
}

#[rstest]
#[case("@misc{a, title = {unterminated}")]
#[case("@misc{a, title = {open")]
#[case("@misc{a, title")]
fn test_parse_truncated_input_fails(#[case] input: &str) {
    assert!(format().parse(input).is_err());
}

#[test]
fn test_parse_error_reports_line() {
    let err = format()
        .parse("@misc{a,\n  title = {ok},\n  = {missing name}\n}")
        .unwrap_err();

    match err {
        Error::Parse { line, .. } => assert_eq!(line, 3),
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn test_reformatting_does_not_register_as_change() {
    let compact = "@article{k, year = 2020, title = {A   long\n   title}, keywords = {b,a ,c}}";
    let reformatted = "@Article{k,\n  Title = \"A long title\",\n  keywords = {b, a, c},\n  YEAR = {2020},\n}\n";

    let a = format().parse(compact).unwrap();
    let b = format().parse(reformatted).unwrap();

    assert_eq!(a, b);
}

#[test]
fn test_custom_keyword_separator() {
    let prefs = ImportPreferences {
        keyword_separator: ';',
        ..Default::default()
    };
    let db = BibtexFormat::new(prefs)
        .parse("@misc{k, keywords = {x;y ; z}}")
        .unwrap();

    assert_eq!(db.records()[0].field("keywords"), Some("x; y; z"));
}

#[test]
fn test_write_is_canonical() {
    let mut db: RecordSet = [Record::new("article")
        .with_key("Smith2020")
        .with_field("year", "2020")
        .with_field("title", "A Study")
        .with_field("month", "#jan#")]
    .into_iter()
    .collect();
    db.set_string("acm", "ACM Press");

    let text = format().write(&db);

    assert_eq!(
        text,
        "@String{acm = {ACM Press}}\n\
         \n\
         @Article{Smith2020,\n  month = jan,\n  title = {A Study},\n  year = {2020},\n}\n"
    );
}

#[test]
fn test_write_empty_database() {
    assert_eq!(format().write(&RecordSet::empty()), "");
}

#[test]
fn test_written_output_parses_back() {
    let original = format()
        .parse(
            "@Preamble{{Intro}}\n\
             @String{jan = {January}}\n\
             @inproceedings{p1, booktitle = {Proc. } # jan, author = {A and B}}\n\
             @misc{m2, note = {C# in depth}}\n",
        )
        .unwrap();

    let reparsed = format().parse(&format().write(&original)).unwrap();

    assert_eq!(reparsed, original);
}

fn arb_record() -> impl Strategy<Value = Record> {
    (
        "[a-z]{3,8}".prop_filter("reserved block type", |t| {
            !matches!(t.as_str(), "comment" | "string" | "preamble")
        }),
        "[A-Za-z][A-Za-z0-9]{0,8}",
        prop::collection::btree_map("[a-z]{2,8}", "[A-Za-z0-9][A-Za-z0-9 .:]{0,20}", 0..5),
    )
        .prop_map(|(entry_type, key, fields)| {
            fields
                .into_iter()
                .fold(Record::new(&entry_type).with_key(&key), |record, (k, v)| {
                    record.with_field(&k, &v)
                })
        })
}

proptest! {
    #[test]
    fn prop_serialization_never_registers_a_change(records in prop::collection::vec(arb_record(), 0..6)) {
        let db: RecordSet = records.into_iter().collect();
        let reparsed = format().parse(&format().write(&db)).unwrap();
        prop_assert_eq!(reparsed, db);
    }
}
