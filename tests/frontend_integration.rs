//! End-to-end tests: source text through lexer, grammar and predictive parser

use ktfront::ktfront::config::Loader;
use ktfront::ktfront::grammar::{CompiledGrammar, ConflictPolicy, GrammarError, GrammarOptions};
use ktfront::ktfront::parser::ParseError;
use ktfront::ktfront::processor::{Frontend, ProcessingError, ProcessingSpec};
use rstest::rstest;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

fn sample_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("samples")
        .join(name)
}

fn spec(format: &str) -> ProcessingSpec {
    ProcessingSpec::from_string(format).unwrap()
}

#[rstest]
#[case::empty("")]
#[case::declaration("val x: Int")]
#[case::initialized("var y: Double = 2.5")]
#[case::visibility("private val n: Int = -(1 + 2) * 3")]
#[case::array_field("class C { val z: Array<Int> }")]
#[case::function("fun f(a: Int, b: Char): Int { return a }")]
#[case::while_loop("fun g() { while (x < 3) { x = x + 1 } }")]
#[case::if_else("fun h() { if (true) { p(1, 'c') } else { q() } }")]
#[case::comments("/* header */ val x: Int // trailing")]
fn accepts_valid_sources(#[case] source: &str) {
    let frontend = Frontend::bundled().unwrap();
    let output = frontend.run(source).unwrap();
    let significant = output.tokens.iter().filter(|t| t.is_significant()).count();
    assert_eq!(output.derivation.tokens_consumed, significant);
}

#[rstest]
#[case::missing_colon("val x Int", Some("Int"), 1, 7)]
#[case::unfinished_params("fun f( { }", Some("{"), 1, 8)]
#[case::anonymous_class("class { }", Some("{"), 1, 7)]
#[case::adjacent_literals("val x: Int = 1 2", Some("2"), 1, 16)]
#[case::class_without_body("class C", None, 1, 8)]
fn rejects_invalid_sources(
    #[case] source: &str,
    #[case] found: Option<&str>,
    #[case] line: usize,
    #[case] column: usize,
) {
    let frontend = Frontend::bundled().unwrap();
    match frontend.run(source) {
        Err(ProcessingError::Parse(ParseError::Syntax(error))) => {
            assert_eq!(error.found.as_deref(), found);
            assert_eq!((error.line, error.column), (line, column));
            assert!(!error.expected.is_empty());
        }
        other => panic!("expected a syntax error, got {:?}", other),
    }
}

#[test]
fn counter_sample_from_disk() {
    let frontend = Frontend::bundled().unwrap();
    let output = frontend
        .process_file(sample_path("counter.kt"), &spec("token-simple"))
        .unwrap();
    assert_eq!(output.lines().count(), 82);

    let derivation = frontend
        .process_file(sample_path("counter.kt"), &spec("derivation-simple"))
        .unwrap();
    assert_eq!(derivation.lines().count(), 184);
}

#[test]
fn missing_brace_sample_reports_position() {
    let frontend = Frontend::bundled().unwrap();
    let err = frontend
        .process_file(sample_path("missing_brace.kt"), &spec("derivation-simple"))
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "syntax error at line 3, column 16: unexpected '{', expected )"
    );
}

#[test]
fn token_stream_snapshot() {
    let frontend = Frontend::bundled().unwrap();
    let output = frontend
        .process_source("val x: Int = 42 // answer", &spec("token-simple"))
        .unwrap();
    insta::assert_snapshot!(output, @r###"
    [1,1] Value 'val'
    [5,1] Identifier 'x'
    [6,1] Extends ':'
    [8,1] Int 'Int'
    [12,1] Equal '='
    [14,1] IntConstant '42'
    "###);
}

#[test]
fn declaration_tree() {
    let frontend = Frontend::bundled().unwrap();
    let output = frontend
        .process_source("val x: Int", &spec("tree-treeviz"))
        .unwrap();
    let expected = [
        "└─ Program",
        "  ├─ Declaration",
        "  │ ├─ Visibility",
        "  │ │ └─ EPSILON",
        "  │ └─ DeclarationBody",
        "  │   └─ VarDecl",
        "  │     ├─ Mutability",
        "  │     │ └─ val: val",
        "  │     ├─ id: x",
        "  │     ├─ :: :",
        "  │     ├─ Type",
        "  │     │ └─ Int: Int",
        "  │     └─ Initializer",
        "  └─ Program",
    ];
    assert_eq!(output.lines().collect::<Vec<_>>(), expected);
}

#[test]
fn custom_grammar_through_config() {
    let mut grammar_file = tempfile::Builder::new()
        .suffix(".grammar")
        .tempfile()
        .unwrap();
    writeln!(grammar_file, "# balanced pairs\nS -> a S b | EPSILON").unwrap();

    let config = Loader::new()
        .set_override("grammar.path", grammar_file.path().to_string_lossy().as_ref())
        .unwrap()
        .build()
        .unwrap();
    let frontend = Frontend::from_config(&config).unwrap();

    let output = frontend
        .process_source("a b", &spec("derivation-simple"))
        .unwrap();
    assert_eq!(output, "0: S -> a S b\n1: S -> EPSILON\n");
}

#[test]
fn strict_end_of_input_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let grammar_path = dir.path().join("balanced.grammar");
    fs::write(&grammar_path, "S -> a S b | EPSILON\n").unwrap();
    let config_path = dir.path().join("ktfront.toml");
    fs::write(
        &config_path,
        format!(
            "[grammar]\npath = {:?}\n\n[parser]\nstrict_end_of_input = true\n",
            grammar_path.to_string_lossy()
        ),
    )
    .unwrap();

    let lenient = Loader::new()
        .set_override("grammar.path", grammar_path.to_string_lossy().as_ref())
        .unwrap()
        .build()
        .unwrap();
    let output = Frontend::from_config(&lenient).unwrap().run("a").unwrap();
    assert_eq!(output.derivation.rule_numbers(), vec![0]);

    let strict = Loader::new().with_file(&config_path).build().unwrap();
    assert!(matches!(
        Frontend::from_config(&strict).unwrap().run("a"),
        Err(ProcessingError::Parse(ParseError::Syntax(_)))
    ));
}

#[test]
fn missing_grammar_file_is_reported() {
    let config = Loader::new()
        .set_override("grammar.path", "does/not/exist.grammar")
        .unwrap()
        .build()
        .unwrap();
    assert!(matches!(
        Frontend::from_config(&config),
        Err(ProcessingError::Grammar(GrammarError::Io { .. }))
    ));
}

#[test_log::test]
fn conflicts_follow_policy() {
    let text = "S -> a | a b";
    let err = CompiledGrammar::compile(text, &GrammarOptions::default()).unwrap_err();
    match err {
        GrammarError::Conflict {
            nonterminal,
            lookahead,
            existing,
            replacement,
        } => {
            assert_eq!((nonterminal.as_str(), lookahead.as_str()), ("S", "a"));
            assert_eq!((existing, replacement), (0, 1));
        }
        other => panic!("expected a conflict, got {:?}", other),
    }

    let options = GrammarOptions {
        conflict_policy: ConflictPolicy::LastWriteWins,
        ..GrammarOptions::default()
    };
    let grammar = CompiledGrammar::compile(text, &options).unwrap();
    assert_eq!(grammar.table().overwrites().len(), 1);
    let (s, a) = (grammar.symbol("S").unwrap(), grammar.symbol("a").unwrap());
    assert_eq!(grammar.table().get(s, a), Some(1));
}
