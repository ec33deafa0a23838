use std::{fmt, hash::Hash};

pub mod tree;

/// Values that can stand as terminals of a grammar and as input tokens.
pub trait Data: PartialEq + Eq + Hash + Clone + fmt::Debug {
    fn to_string(&self) -> String;
}

impl Data for usize {
    fn to_string(&self) -> String {
        format!("{}", self)
    }
}

impl Data for char {
    fn to_string(&self) -> String {
        format!("{}", self)
    }
}

impl Data for String {
    fn to_string(&self) -> String {
        self.clone()
    }
}

impl<'a> Data for &'a str {
    fn to_string(&self) -> String {
        String::from(*self)
    }
}
