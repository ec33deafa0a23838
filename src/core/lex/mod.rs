use crate::core::data::Data;

pub trait Lexer<T: Data>: 'static + Send + Sync {
    fn lex(&self, input: &str) -> Vec<T>;
}

pub fn def_lexer() -> Box<dyn Lexer<String>> {
    Box::new(WhitespaceLexer)
}

/// Lowercases the input and splits it on runs of whitespace; every word is a token.
pub struct WhitespaceLexer;

impl Lexer<String> for WhitespaceLexer {
    fn lex(&self, input: &str) -> Vec<String> {
        let tokens: Vec<String> = input
            .to_lowercase()
            .split_whitespace()
            .map(String::from)
            .collect();

        trace!("Lexed {} tokens", tokens.len());
        tokens
    }
}
