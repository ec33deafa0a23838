use {
    crate::core::{
        data::Data,
        parse::{
            chart::{Chart, State},
            forest::Derivation,
            grammar::{Grammar, RuleId},
        },
    },
    std::{error, fmt},
};

pub mod chart;
mod earley;
pub mod forest;
pub mod grammar;

pub use self::earley::EarleyParser;

pub trait Parser<T: Data>: Send + Sync {
    /// Fills a chart for `tokens` and returns it with the accepting state, or
    /// `Error::RejectedErr` if `start` does not derive the tokens.
    fn recognize<'g>(
        &self,
        grammar: &'g Grammar<T>,
        start: RuleId,
        tokens: Vec<T>,
    ) -> Result<Parse<'g, T>, Error>;

    /// Every derivation of the accepting state of `parse`.
    fn build_forest<'g>(&self, parse: &Parse<'g, T>) -> Vec<Derivation<'g, T>>;
}

pub fn def_parser<T: Data>() -> Box<dyn Parser<T>> {
    Box::new(EarleyParser)
}

/// A successful recognition: the finished chart and where its accepting state sits.
pub struct Parse<'g, T: 'g> {
    grammar: &'g Grammar<T>,
    chart: Chart<'g, T>,
    accept: usize,
}

impl<'g, T: Data> Parse<'g, T> {
    fn new(grammar: &'g Grammar<T>, chart: Chart<'g, T>, accept: usize) -> Self {
        Parse {
            grammar,
            chart,
            accept,
        }
    }

    pub fn grammar(&self) -> &'g Grammar<T> {
        self.grammar
    }

    pub fn chart(&self) -> &Chart<'g, T> {
        &self.chart
    }

    /// The completed wrapper state spanning the whole input.
    pub fn accepting(&self) -> &State<'g, T> {
        self.chart.last().state(self.accept)
    }
}

#[derive(Debug)]
pub enum Error {
    RejectedErr(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::RejectedErr(ref start) => write!(f, "Input rejected by rule '{}'", start),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        None
    }
}
