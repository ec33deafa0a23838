#[macro_use]
extern crate log;
extern crate stopwatch;

pub use crate::core::{data, lex, parse};

use {
    crate::core::{
        lex::Lexer,
        parse::{
            forest::Derivation,
            grammar::{self, Grammar, GrammarBuilder, RuleId},
            Parse, Parser,
        },
    },
    std::{error, fmt},
};

mod core;

pub struct ParseJob {
    text: String,
}

impl ParseJob {
    pub fn from_text(text: String) -> Self {
        ParseJob { text }
    }
}

/// Tokenizes, recognizes and decomposes inputs against one grammar and start rule.
///
/// A runner holds no per-parse state, so a single instance may serve any number of
/// threads.
pub struct ParseJobRunner {
    grammar: Grammar<String>,
    start: RuleId,
    lexer: Box<dyn Lexer<String>>,
    parser: Box<dyn Parser<String>>,
}

impl ParseJobRunner {
    pub fn new(grammar: Grammar<String>) -> Self {
        let start = grammar.start();
        ParseJobRunner {
            grammar,
            start,
            lexer: lex::def_lexer(),
            parser: parse::def_parser(),
        }
    }

    pub fn build(builder: GrammarBuilder<String>) -> Result<ParseJobRunner, BuildError> {
        Ok(ParseJobRunner::new(builder.build()?))
    }

    pub fn with_start(grammar: Grammar<String>, start: &str) -> Result<ParseJobRunner, BuildError> {
        let id = match grammar.rule_id(start) {
            Some(id) => id,
            None => return Err(BuildError::UnknownStartErr(String::from(start))),
        };

        let mut runner = ParseJobRunner::new(grammar);
        runner.start = id;
        Ok(runner)
    }

    pub fn grammar(&self) -> &Grammar<String> {
        &self.grammar
    }

    pub fn start(&self) -> &str {
        self.grammar.name(self.start)
    }

    pub fn recognize(&self, job: ParseJob) -> Result<Parse<String>, ParseError> {
        let tokens = self.lexer.lex(&job.text);
        Ok(self.parser.recognize(&self.grammar, self.start, tokens)?)
    }

    pub fn parse(&self, job: ParseJob) -> Result<Vec<Derivation<String>>, ParseError> {
        let parse = self.recognize(job)?;
        let forest = self.parser.build_forest(&parse);

        info!(
            "Found {} derivation(s) of '{}' over {} tokens",
            forest.len(),
            self.start(),
            parse.chart().len() - 1
        );
        Ok(forest)
    }
}

#[derive(Debug)]
pub enum BuildError {
    GrammarErr(grammar::BuildError),
    UnknownStartErr(String),
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            BuildError::GrammarErr(ref err) => write!(f, "Failed to build grammar: {}", err),
            BuildError::UnknownStartErr(ref start) => {
                write!(f, "Start rule '{}' is not defined by the grammar", start)
            }
        }
    }
}

impl error::Error for BuildError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            BuildError::GrammarErr(ref err) => Some(err),
            BuildError::UnknownStartErr(_) => None,
        }
    }
}

impl From<grammar::BuildError> for BuildError {
    fn from(err: grammar::BuildError) -> BuildError {
        BuildError::GrammarErr(err)
    }
}

#[derive(Debug)]
pub enum ParseError {
    ParseErr(parse::Error),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ParseError::ParseErr(ref err) => write!(f, "Failed to parse input: {}", err),
        }
    }
}

impl error::Error for ParseError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            ParseError::ParseErr(ref err) => Some(err),
        }
    }
}

impl From<parse::Error> for ParseError {
    fn from(err: parse::Error) -> ParseError {
        ParseError::ParseErr(err)
    }
}
