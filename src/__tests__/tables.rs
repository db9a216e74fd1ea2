use super::{parse_source, quater_strings, try_parse, with_c_parser, C_GRAMMAR};
use crate::{Grammar, Lr1Parser, SemanticAnalyzer};

const PROGRAMS: [&str; 4] = [
    "int a; int b = 1; a = b + 2;",
    "int a = 0; int b; b = a++;",
    "int a; if (a) { a = a - 1; } else { ++a; }",
    "int i; int s; for (i = 0; i; i = i - 1) { s = s + i; }",
];

fn translate(parser: &Lr1Parser, source: &str) -> Vec<String> {
    let mut root = parse_source(parser, source);
    let mut analyzer = SemanticAnalyzer::new();
    analyzer.analyze(&mut root).unwrap();
    quater_strings(&root)
}

#[test]
fn saved_and_loaded_tables_drive_identical_decisions() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tables.txt");

    let expected: Vec<Vec<String>> = with_c_parser(|parser| {
        parser.save_tables(&path).unwrap();
        PROGRAMS
            .iter()
            .map(|source| translate(parser, source))
            .collect()
    });

    let grammar = Grammar::from_text(C_GRAMMAR).unwrap();
    let cached = Lr1Parser::from_cache(grammar, &path).unwrap();

    for (source, quaters) in PROGRAMS.iter().zip(expected) {
        assert_eq!(translate(&cached, source), quaters);
    }
}

#[test]
fn table_serialization_round_trips_byte_for_byte() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first.txt");
    let second = dir.path().join("second.txt");

    with_c_parser(|parser| parser.save_tables(&first).unwrap());

    let grammar = Grammar::from_text(C_GRAMMAR).unwrap();
    let reloaded = Lr1Parser::from_cache(grammar, &first).unwrap();
    reloaded.save_tables(&second).unwrap();

    assert_eq!(
        std::fs::read_to_string(&first).unwrap(),
        std::fs::read_to_string(&second).unwrap()
    );
}

#[test]
fn syntax_error_reports_the_offending_symbol() {
    let err = with_c_parser(|parser| try_parse(parser, "int a; a = ;")).unwrap_err();
    assert!(err.to_string().contains("T_SEMICOLON"));
}

#[test]
fn stray_token_kinds_have_no_table_entry() {
    // `return` lexes fine but the demo grammar declares no such terminal.
    assert!(with_c_parser(|parser| try_parse(parser, "return 0;")).is_err());
}

#[test]
fn missing_cache_file_is_an_error() {
    let grammar = Grammar::from_text(C_GRAMMAR).unwrap();
    let missing = std::path::Path::new("no-such-cache-file.txt");
    assert!(Lr1Parser::from_cache(grammar, missing).is_err());
}
