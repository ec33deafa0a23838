pub mod data;
pub mod lex;
pub mod parse;
