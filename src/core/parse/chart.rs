use {
    crate::core::{
        data::Data,
        parse::grammar::{Grammar, Production, RuleId, Symbol},
    },
    std::{
        collections::HashSet,
        hash::{Hash, Hasher},
    },
};

const ACCEPT_NAME: &str = "$accept";

/// Left-hand side of a state: a grammar rule, or the synthetic wrapper around the
/// start rule whose completion means the input is accepted.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Lhs {
    Accept,
    Rule(RuleId),
}

impl Lhs {
    pub fn name<'g, T: Data>(&self, grammar: &'g Grammar<T>) -> &'g str {
        match *self {
            Lhs::Accept => ACCEPT_NAME,
            Lhs::Rule(id) => grammar.name(id),
        }
    }
}

/// An Earley item: `production` of `lhs`, matched up to `dot`, starting at column `start`.
///
/// Equality and hashing ignore `end`; states are only ever compared within one column.
#[derive(Debug)]
pub struct State<'g, T: 'g> {
    lhs: Lhs,
    production: &'g Production<T>,
    dot: usize,
    start: usize,
    end: usize,
}

impl<'g, T: Data> State<'g, T> {
    pub fn new(lhs: Lhs, production: &'g Production<T>, dot: usize, start: usize) -> Self {
        State {
            lhs,
            production,
            dot,
            start,
            end: start,
        }
    }

    pub fn lhs(&self) -> Lhs {
        self.lhs
    }

    pub fn production(&self) -> &'g Production<T> {
        self.production
    }

    pub fn dot(&self) -> usize {
        self.dot
    }

    pub fn start(&self) -> usize {
        self.start
    }

    /// The column holding this state. Only meaningful once the state is in a column.
    pub fn end(&self) -> usize {
        self.end
    }

    pub fn is_complete(&self) -> bool {
        self.dot >= self.production.len()
    }

    pub fn next_symbol(&self) -> Option<&'g Symbol<T>> {
        self.production.symbol(self.dot)
    }

    pub fn advance(&self) -> Self {
        State::new(self.lhs, self.production, self.dot + 1, self.start)
    }

    /// The same item with its dot moved back to `dot`.
    pub fn with_dot(&self, dot: usize) -> Self {
        State::new(self.lhs, self.production, dot, self.start)
    }

    /// Whether both states cover the same span of input.
    pub fn same_span(&self, other: &State<'g, T>) -> bool {
        self.start == other.start && self.end == other.end
    }

    pub fn describe(&self, grammar: &Grammar<T>) -> String {
        let mut terms: Vec<String> = self
            .production
            .symbols()
            .iter()
            .map(|symbol| grammar.symbol_string(symbol))
            .collect();
        terms.insert(self.dot, ".".to_string());

        format!(
            "{:<5} -> {:<16} [{}-{}]",
            self.lhs.name(grammar),
            terms.join(" "),
            self.start,
            self.end
        )
    }
}

impl<'g, T> Clone for State<'g, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'g, T> Copy for State<'g, T> {}

impl<'g, T: Data> PartialEq for State<'g, T> {
    fn eq(&self, other: &State<'g, T>) -> bool {
        self.lhs == other.lhs
            && self.dot == other.dot
            && self.start == other.start
            && *self.production == *other.production
    }
}

impl<'g, T: Data> Eq for State<'g, T> {}

impl<'g, T: Data> Hash for State<'g, T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.lhs.hash(state);
        self.production.hash(state);
        self.dot.hash(state);
        self.start.hash(state);
    }
}

/// The states ending at one input position, in insertion order and without duplicates.
pub struct Column<'g, T: 'g> {
    index: usize,
    token: Option<T>,
    states: Vec<State<'g, T>>,
    unique: HashSet<State<'g, T>>,
}

impl<'g, T: Data> Column<'g, T> {
    fn new(index: usize, token: Option<T>) -> Self {
        Column {
            index,
            token,
            states: Vec::new(),
            unique: HashSet::new(),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// The token consumed to reach this column; `None` for column 0.
    pub fn token(&self) -> Option<&T> {
        self.token.as_ref()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn state(&self, index: usize) -> &State<'g, T> {
        &self.states[index]
    }

    pub fn states(&self) -> &[State<'g, T>] {
        &self.states
    }

    /// Enumerates the states from `index` up to the current end of the column.
    pub fn enum_from<'c>(
        &'c self,
        index: usize,
    ) -> impl Iterator<Item = (usize, &'c State<'g, T>)> + 'c {
        self.states.iter().enumerate().skip(index)
    }

    pub fn contains(&self, state: &State<'g, T>) -> bool {
        self.unique.contains(state)
    }

    /// Appends `state` unless an equal state is already present; returns whether it was added.
    pub fn add(&mut self, mut state: State<'g, T>) -> bool {
        if self.unique.contains(&state) {
            return false;
        }

        state.end = self.index;
        self.unique.insert(state);
        self.states.push(state);
        true
    }

    pub fn describe(&self, grammar: &Grammar<T>, completed: bool) -> String {
        let token = match &self.token {
            None => String::new(),
            Some(token) => token.to_string(),
        };

        let mut out = format!("[{}] {}\n{}\n", self.index, token, "=".repeat(35));
        for state in &self.states {
            if completed && !state.is_complete() {
                continue;
            }
            out.push_str(&state.describe(grammar));
            out.push('\n');
        }
        out
    }
}

/// One column per input position, column 0 sitting before the first token.
pub struct Chart<'g, T: 'g> {
    columns: Vec<Column<'g, T>>,
}

impl<'g, T: Data> Chart<'g, T> {
    pub fn new(tokens: Vec<T>) -> Self {
        let mut columns = Vec::with_capacity(tokens.len() + 1);
        columns.push(Column::new(0, None));
        for (i, token) in tokens.into_iter().enumerate() {
            columns.push(Column::new(i + 1, Some(token)));
        }

        Chart { columns }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column(&self, i: usize) -> &Column<'g, T> {
        &self.columns[i]
    }

    pub fn column_mut(&mut self, i: usize) -> &mut Column<'g, T> {
        &mut self.columns[i]
    }

    pub fn columns(&self) -> &[Column<'g, T>] {
        &self.columns
    }

    pub fn last(&self) -> &Column<'g, T> {
        &self.columns[self.columns.len() - 1]
    }

    /// The tokens the chart was built over, in input order.
    pub fn tokens(&self) -> Vec<&T> {
        self.columns.iter().filter_map(Column::token).collect()
    }
}
