use earley_forest::parse::grammar::{rule, term, GrammarBuilder};

pub fn by_name(name: &str) -> Option<GrammarBuilder<String>> {
    match name {
        "expr" => Some(expr()),
        "arith" => Some(arith()),
        "sentence" => Some(sentence()),
        _ => None,
    }
}

fn words(builder: &mut GrammarBuilder<String>, lhs: &str, terminals: &[&str]) {
    let mut alternatives = builder.from(lhs);
    for terminal in terminals {
        alternatives.to(vec![term(String::from(*terminal))]);
    }
}

/// Binary expressions over `a` with no precedence, so every grouping is a derivation.
fn expr() -> GrammarBuilder<String> {
    let mut builder = GrammarBuilder::new();
    builder
        .from("EXPR")
        .to(vec![rule("SYM")])
        .to(vec![rule("EXPR"), rule("OP"), rule("EXPR")]);
    words(&mut builder, "OP", &["+", "*"]);
    words(&mut builder, "SYM", &["a"]);
    builder
}

fn arith() -> GrammarBuilder<String> {
    let mut builder = GrammarBuilder::new();
    builder
        .from("SUM")
        .to(vec![rule("SUM"), term(String::from("+")), rule("PRODUCT")])
        .to(vec![rule("SUM"), term(String::from("-")), rule("PRODUCT")])
        .to(vec![rule("PRODUCT")]);
    builder
        .from("PRODUCT")
        .to(vec![rule("PRODUCT"), term(String::from("*")), rule("FACTOR")])
        .to(vec![rule("PRODUCT"), term(String::from("/")), rule("FACTOR")])
        .to(vec![rule("FACTOR")]);
    builder
        .from("FACTOR")
        .to(vec![term(String::from("(")), rule("SUM"), term(String::from(")"))])
        .to(vec![rule("NUMBER")]);
    words(&mut builder, "NUMBER", &["num"]);
    builder
}

fn sentence() -> GrammarBuilder<String> {
    let mut builder = GrammarBuilder::new();
    builder
        .from("SENTENCE")
        .to(vec![rule("NOUN"), rule("VERB"), rule("ADVERBS")]);
    builder
        .from("ADVERBS")
        .epsilon()
        .to(vec![rule("ADVERB"), rule("ADVERBS")]);
    words(&mut builder, "NOUN", &["mary", "john", "dogs"]);
    words(&mut builder, "VERB", &["runs", "sleeps", "run", "sleep"]);
    words(&mut builder, "ADVERB", &["quickly", "quietly", "often"]);
    builder
}

#[cfg(test)]
mod tests {
    use earley_forest::{ParseJob, ParseJobRunner};

    use super::*;

    fn runner(name: &str) -> ParseJobRunner {
        ParseJobRunner::build(by_name(name).unwrap()).unwrap()
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
    fn unknown_grammar() {
        //exercise
        let builder = by_name("lisp");

        //verify
        assert!(builder.is_none());
    }

    #[test]
    fn expr_is_ambiguous() {
        //setup
        let runner = runner("expr");

        //exercise
        let trees = parse(&runner, "a + a * a");

        //verify
        assert_eq!(runner.start(), "EXPR");
        assert_eq!(trees.len(), 2);
    }

    #[test]
    fn arith_is_unambiguous() {
        //setup
        let runner = runner("arith");

        //exercise
        let trees = parse(&runner, "num + num * ( num - num )");

        //verify
        assert_eq!(
            trees,
            vec![
                "SUM(SUM(PRODUCT(FACTOR(NUMBER(num)))), +, PRODUCT(PRODUCT(FACTOR(NUMBER(num))), *, \
                 FACTOR((, SUM(SUM(PRODUCT(FACTOR(NUMBER(num)))), -, PRODUCT(FACTOR(NUMBER(num)))), ))))"
            ]
        );
    }

    #[test]
    fn sentence_with_optional_adverbs() {
        //setup
        let runner = runner("sentence");

        //exercise
        let bare = parse(&runner, "Mary runs");
        let adverbs = parse(&runner, "dogs sleep quietly often");

        //verify
        assert_eq!(bare, vec!["SENTENCE(NOUN(mary), VERB(runs), ADVERBS())"]);
        assert_eq!(
            adverbs,
            vec![
                "SENTENCE(NOUN(dogs), VERB(sleep), \
                 ADVERBS(ADVERB(quietly), ADVERBS(ADVERB(often), ADVERBS())))"
            ]
        );
    }
}
