extern crate earley_forest;

use earley_forest::{
    parse::grammar::{rule, term, GrammarBuilder, ProductionSymbol},
    ParseJob, ParseJobRunner,
};

fn word(text: &str) -> ProductionSymbol<String> {
    term(String::from(text))
}

fn parse(runner: &ParseJobRunner, text: &str) -> Vec<String> {
    runner
        .parse(ParseJob::from_text(String::from(text)))
        .unwrap()
        .iter()
        .map(|derivation| format!("{}", derivation))
        .collect()
}

#[test]
fn test_lexer_policy() {
    //setup
    let mut builder = GrammarBuilder::new();
    builder.from("GREETING").to(vec![word("hello"), word("world")]);
    let runner = ParseJobRunner::build(builder).unwrap();

    //exercise
    let trees = parse(&runner, "  Hello\n\tWORLD ");

    //verify
    assert_eq!(trees, vec!["GREETING(hello, world)"]);
}

#[test]
fn test_nullable_rules() {
    //setup
    let mut builder = GrammarBuilder::new();
    builder
        .from("DECL")
        .to(vec![rule("MODS"), word("fn"), word("id"), rule("ARGS")]);
    builder.from("MODS").epsilon().to(vec![word("pub")]);
    builder
        .from("ARGS")
        .epsilon()
        .to(vec![word("("), word(")")]);
    let runner = ParseJobRunner::build(builder).unwrap();

    //exercise
    let bare = parse(&runner, "fn id");
    let full = parse(&runner, "pub fn id ( )");

    //verify
    assert_eq!(bare, vec!["DECL(MODS(), fn, id, ARGS())"]);
    assert_eq!(full, vec!["DECL(MODS(pub), fn, id, ARGS((, )))"]);
}

#[test]
fn test_nullable_start_accepts_empty_input() {
    //setup
    let mut builder = GrammarBuilder::new();
    builder
        .from("LIST")
        .epsilon()
        .to(vec![word("x"), rule("LIST")]);
    let runner = ParseJobRunner::build(builder).unwrap();

    //exercise
    let empty = parse(&runner, "");
    let two = parse(&runner, "x x");

    //verify
    assert_eq!(empty, vec!["LIST()"]);
    assert_eq!(two, vec!["LIST(x, LIST(x, LIST()))"]);
}

#[test]
fn test_unit_cycle_terminates() {
    //setup
    let mut builder = GrammarBuilder::new();
    builder.from("A").to(vec![rule("B")]).to(vec![word("x")]);
    builder.from("B").to(vec![rule("A")]);
    let runner = ParseJobRunner::build(builder).unwrap();

    //exercise
    let trees = parse(&runner, "x");

    //verify
    assert_eq!(trees, vec!["A(x)", "A(B(A(x)))"]);
}

#[test]
fn test_other_start_rule() {
    //setup
    let mut builder = GrammarBuilder::new();
    builder
        .from("SENTENCE")
        .to(vec![rule("NOUN"), rule("VERB")]);
    builder.from("NOUN").to(vec![word("mary")]).to(vec![word("john")]);
    builder.from("VERB").to(vec![word("runs")]);
    let grammar = builder.build().unwrap();

    //exercise
    let runner = ParseJobRunner::with_start(grammar, "NOUN").unwrap();
    let noun = parse(&runner, "John");
    let sentence = runner.recognize(ParseJob::from_text(String::from("john runs")));

    //verify
    assert_eq!(noun, vec!["NOUN(john)"]);
    assert_eq!(
        format!("{}", sentence.err().unwrap()),
        "Failed to parse input: Input rejected by rule 'NOUN'"
    );
}

#[test]
fn test_pretty_print() {
    //setup
    let mut builder = GrammarBuilder::new();
    builder
        .from("SENTENCE")
        .to(vec![rule("NOUN"), rule("VERB")]);
    builder.from("NOUN").to(vec![word("mary")]);
    builder.from("VERB").to(vec![word("runs")]);
    let runner = ParseJobRunner::build(builder).unwrap();

    //exercise
    let forest = runner
        .parse(ParseJob::from_text(String::from("mary runs")))
        .unwrap();

    //verify
    assert_eq!(
        forest[0].to_pretty_string(),
        "└── root
    └── $accept -> SENTENCE .       [0-2]
        └── SENTENCE -> NOUN VERB .      [0-2]
            ├── NOUN  -> mary .           [0-1]
            └── VERB  -> runs .           [1-2]
"
    );
}
