use {
    crate::core::data::Data,
    std::{
        collections::{HashMap, HashSet},
        error, fmt,
    },
};

/// Handle to a rule in its grammar's rule arena.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct RuleId(usize);

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Symbol<T> {
    Terminal(T),
    Rule(RuleId),
}

/// One alternative of a rule. Compared and hashed by its symbols.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Production<T> {
    symbols: Vec<Symbol<T>>,
}

impl<T> Production<T> {
    pub fn new(symbols: Vec<Symbol<T>>) -> Self {
        Production { symbols }
    }

    pub fn symbols(&self) -> &[Symbol<T>] {
        &self.symbols
    }

    pub fn symbol(&self, index: usize) -> Option<&Symbol<T>> {
        self.symbols.get(index)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

#[derive(Debug)]
pub struct Rule<T> {
    name: String,
    productions: Vec<Production<T>>,
}

impl<T> Rule<T> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn productions(&self) -> &[Production<T>] {
        &self.productions
    }
}

/// An immutable context-free grammar.
///
/// Rules live in an arena and refer to each other through `RuleId`s, so cyclic and
/// self-referential grammars need no shared ownership.
#[derive(Debug)]
pub struct Grammar<T> {
    rules: Vec<Rule<T>>,
    ids: HashMap<String, RuleId>,
    augmented: Vec<Production<T>>,
    nullable: HashSet<RuleId>,
    start: RuleId,
}

impl<T: Data> Grammar<T> {
    pub fn rule_id(&self, name: &str) -> Option<RuleId> {
        self.ids.get(name).cloned()
    }

    pub fn rule(&self, id: RuleId) -> &Rule<T> {
        &self.rules[id.0]
    }

    pub fn name(&self, id: RuleId) -> &str {
        self.rule(id).name()
    }

    pub fn rules(&self) -> &[Rule<T>] {
        &self.rules
    }

    pub fn start(&self) -> RuleId {
        self.start
    }

    /// Whether the rule derives the empty string.
    pub fn is_nullable(&self, id: RuleId) -> bool {
        self.nullable.contains(&id)
    }

    /// The one-symbol production `[id]` used to wrap a start rule during recognition.
    pub fn augmented(&self, id: RuleId) -> &Production<T> {
        &self.augmented[id.0]
    }

    pub fn symbol_string(&self, symbol: &Symbol<T>) -> String {
        match symbol {
            Symbol::Terminal(terminal) => terminal.to_string(),
            Symbol::Rule(id) => self.name(*id).to_string(),
        }
    }

    pub fn production_string(&self, production: &Production<T>) -> String {
        production
            .symbols()
            .iter()
            .map(|symbol| self.symbol_string(symbol))
            .collect::<Vec<String>>()
            .join(" ")
    }
}

/// Right-hand-side symbol as written before rule names are resolved.
#[derive(Clone, PartialEq, Debug)]
pub enum ProductionSymbol<T> {
    Terminal(T),
    Rule(String),
}

pub fn term<T>(terminal: T) -> ProductionSymbol<T> {
    ProductionSymbol::Terminal(terminal)
}

pub fn rule<T>(name: &str) -> ProductionSymbol<T> {
    ProductionSymbol::Rule(name.to_string())
}

pub struct GrammarBuilder<T> {
    rules: Vec<(String, Vec<Vec<ProductionSymbol<T>>>)>,
    ids: HashMap<String, usize>,
    start: Option<String>,
}

impl<T: Data> GrammarBuilder<T> {
    pub fn new() -> Self {
        GrammarBuilder {
            rules: Vec::new(),
            ids: HashMap::new(),
            start: None,
        }
    }

    /// Declares `lhs` (if needed) and returns a builder for its alternatives.
    ///
    /// The first rule ever declared becomes the start rule unless `mark_start` says
    /// otherwise.
    pub fn from(&mut self, lhs: &str) -> NonTerminalBuilder<T> {
        self.declare(lhs);
        self.try_mark_start(lhs);
        NonTerminalBuilder::new(self, lhs)
    }

    pub fn mark_start(&mut self, name: &str) {
        self.start = Some(name.to_string());
    }

    fn try_mark_start(&mut self, name: &str) {
        if self.start.is_some() {
            return;
        }

        self.start = Some(name.to_string());
    }

    fn declare(&mut self, lhs: &str) -> usize {
        if let Some(index) = self.ids.get(lhs) {
            return *index;
        }

        let index = self.rules.len();
        self.rules.push((lhs.to_string(), Vec::new()));
        self.ids.insert(lhs.to_string(), index);
        index
    }

    fn add_production(&mut self, lhs: &str, rhs: Vec<ProductionSymbol<T>>) {
        let index = self.declare(lhs);
        self.rules[index].1.push(rhs);
    }

    pub fn build(self) -> Result<Grammar<T>, BuildError> {
        let start_name = match self.start {
            None => return Err(BuildError::EmptyGrammarErr),
            Some(name) => name,
        };

        let start = match self.ids.get(&start_name) {
            None => return Err(BuildError::UndefinedStartErr(start_name)),
            Some(index) => RuleId(*index),
        };

        let ids: HashMap<String, RuleId> = self
            .ids
            .into_iter()
            .map(|(name, index)| (name, RuleId(index)))
            .collect();

        let mut rules: Vec<Rule<T>> = Vec::with_capacity(self.rules.len());
        for (name, alternatives) in self.rules {
            let mut productions = Vec::with_capacity(alternatives.len());
            for rhs in alternatives {
                let symbols = rhs
                    .into_iter()
                    .map(|symbol| resolve(&ids, symbol))
                    .collect::<Result<Vec<Symbol<T>>, BuildError>>()?;
                productions.push(Production::new(symbols));
            }
            rules.push(Rule { name, productions });
        }

        let augmented = (0..rules.len())
            .map(|index| Production::new(vec![Symbol::Rule(RuleId(index))]))
            .collect();
        let nullable = build_nullable(&rules);

        Ok(Grammar {
            rules,
            ids,
            augmented,
            nullable,
            start,
        })
    }
}

impl<T: Data> Default for GrammarBuilder<T> {
    fn default() -> Self {
        GrammarBuilder::new()
    }
}

fn resolve<T>(
    ids: &HashMap<String, RuleId>,
    symbol: ProductionSymbol<T>,
) -> Result<Symbol<T>, BuildError> {
    match symbol {
        ProductionSymbol::Terminal(terminal) => Ok(Symbol::Terminal(terminal)),
        ProductionSymbol::Rule(name) => match ids.get(&name) {
            Some(id) => Ok(Symbol::Rule(*id)),
            None => Err(BuildError::UndefinedRuleErr(name)),
        },
    }
}

fn build_nullable<T>(rules: &[Rule<T>]) -> HashSet<RuleId> {
    let mut nullable: HashSet<RuleId> = HashSet::new();
    let mut prods_by_rhs: HashMap<RuleId, Vec<(RuleId, &Production<T>)>> = HashMap::new();
    let mut work_stack: Vec<RuleId> = Vec::new();

    for (index, rule) in rules.iter().enumerate() {
        let lhs = RuleId(index);
        for prod in &rule.productions {
            for symbol in prod.symbols() {
                if let Symbol::Rule(id) = symbol {
                    prods_by_rhs
                        .entry(*id)
                        .or_insert_with(Vec::new)
                        .push((lhs, prod));
                }
            }

            if prod.is_empty() && nullable.insert(lhs) {
                work_stack.push(lhs);
            }
        }
    }

    while let Some(work_symbol) = work_stack.pop() {
        if let Some(prods) = prods_by_rhs.get(&work_symbol) {
            for (lhs, prod) in prods {
                if nullable.contains(lhs) {
                    continue;
                }

                let all_nullable = prod.symbols().iter().all(|symbol| match symbol {
                    Symbol::Terminal(_) => false,
                    Symbol::Rule(id) => nullable.contains(id),
                });

                if all_nullable {
                    nullable.insert(*lhs);
                    work_stack.push(*lhs);
                }
            }
        }
    }

    nullable
}

pub struct NonTerminalBuilder<'builder, T> {
    grammar_builder: &'builder mut GrammarBuilder<T>,
    lhs: String,
}

impl<'builder, T: Data> NonTerminalBuilder<'builder, T> {
    fn new(grammar_builder: &'builder mut GrammarBuilder<T>, lhs: &str) -> Self {
        Self {
            grammar_builder,
            lhs: lhs.to_string(),
        }
    }

    pub fn to(&mut self, rhs: Vec<ProductionSymbol<T>>) -> &mut Self {
        self.grammar_builder.add_production(&self.lhs, rhs);
        self
    }

    pub fn epsilon(&mut self) -> &mut Self {
        self.grammar_builder.add_production(&self.lhs, Vec::new());
        self
    }
}

#[derive(Debug)]
pub enum BuildError {
    EmptyGrammarErr,
    UndefinedRuleErr(String),
    UndefinedStartErr(String),
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            BuildError::EmptyGrammarErr => write!(f, "Grammar declares no rules"),
            BuildError::UndefinedRuleErr(ref name) => {
                write!(f, "Rule '{}' is referenced but never declared", name)
            }
            BuildError::UndefinedStartErr(ref name) => {
                write!(f, "Start rule '{}' is never declared", name)
            }
        }
    }
}

impl error::Error for BuildError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expr_builder() -> GrammarBuilder<&'static str> {
        let mut builder = GrammarBuilder::new();
        builder
            .from("EXPR")
            .to(vec![rule("SYM")])
            .to(vec![rule("EXPR"), rule("OP"), rule("EXPR")]);
        builder.from("OP").to(vec![term("+")]).to(vec![term("*")]);
        builder.from("SYM").to(vec![term("a")]);
        builder
    }

    #[test]
    fn build_resolves_forward_and_self_references() {
        //setup
        let builder = expr_builder();

        //exercise
        let grammar = builder.build().unwrap();

        //verify
        let expr = grammar.rule_id("EXPR").unwrap();
        let op = grammar.rule_id("OP").unwrap();
        let sym = grammar.rule_id("SYM").unwrap();

        assert_eq!(grammar.start(), expr);
        assert_eq!(grammar.rules().len(), 3);
        let binary: Vec<Symbol<&str>> =
            vec![Symbol::Rule(expr), Symbol::Rule(op), Symbol::Rule(expr)];
        let unit: Vec<Symbol<&str>> = vec![Symbol::Rule(sym)];
        let wrapper: Vec<Symbol<&str>> = vec![Symbol::Rule(op)];

        assert_eq!(grammar.rule(expr).productions()[1].symbols().to_vec(), binary);
        assert_eq!(grammar.rule(expr).productions()[0].symbols().to_vec(), unit);
        assert_eq!(grammar.augmented(op).symbols().to_vec(), wrapper);
        assert_eq!(
            grammar.production_string(&grammar.rule(expr).productions()[1]),
            "EXPR OP EXPR"
        );
    }

    #[test]
    fn repeated_from_appends_alternatives() {
        //setup
        let mut builder: GrammarBuilder<&'static str> = GrammarBuilder::new();
        builder.from("A").to(vec![term("x")]);
        builder.from("B").to(vec![term("y")]);
        builder.from("A").to(vec![rule("B")]);

        //exercise
        let grammar = builder.build().unwrap();

        //verify
        let a = grammar.rule_id("A").unwrap();
        assert_eq!(grammar.start(), a);
        assert_eq!(grammar.rule(a).productions().len(), 2);
    }

    #[test]
    fn mark_start_overrides_first_rule() {
        //setup
        let mut builder = expr_builder();
        builder.mark_start("OP");

        //exercise
        let grammar = builder.build().unwrap();

        //verify
        assert_eq!(grammar.name(grammar.start()), "OP");
    }

    #[test]
    fn identical_alternatives_are_equal_across_rules() {
        //setup
        let mut builder: GrammarBuilder<&'static str> = GrammarBuilder::new();
        builder.from("A").to(vec![term("x"), term("y")]);
        builder.from("B").to(vec![term("x"), term("y")]);

        //exercise
        let grammar = builder.build().unwrap();

        //verify
        let a = grammar.rule_id("A").unwrap();
        let b = grammar.rule_id("B").unwrap();
        assert_eq!(
            grammar.rule(a).productions()[0],
            grammar.rule(b).productions()[0]
        );
    }

    #[test]
    fn nullable_rules() {
        //setup
        let mut builder: GrammarBuilder<&'static str> = GrammarBuilder::new();
        builder.from("S").to(vec![rule("A"), term("x")]);
        builder.from("A").to(vec![rule("B"), rule("B")]);
        builder.from("B").epsilon().to(vec![term("y")]);
        builder.from("C").to(vec![rule("C"), rule("B")]);

        //exercise
        let grammar = builder.build().unwrap();

        //verify
        assert!(!grammar.is_nullable(grammar.rule_id("S").unwrap()));
        assert!(grammar.is_nullable(grammar.rule_id("A").unwrap()));
        assert!(grammar.is_nullable(grammar.rule_id("B").unwrap()));
        assert!(!grammar.is_nullable(grammar.rule_id("C").unwrap()));
    }

    #[test]
    fn undefined_rule() {
        //setup
        let mut builder: GrammarBuilder<&'static str> = GrammarBuilder::new();
        builder.from("S").to(vec![rule("A"), term("x")]);

        //exercise
        let res = builder.build();

        //verify
        assert_eq!(
            format!("{}", res.err().unwrap()),
            "Rule 'A' is referenced but never declared"
        );
    }

    #[test]
    fn undefined_start() {
        //setup
        let mut builder = expr_builder();
        builder.mark_start("TERM");

        //exercise
        let res = builder.build();

        //verify
        assert_eq!(
            format!("{}", res.err().unwrap()),
            "Start rule 'TERM' is never declared"
        );
    }

    #[test]
    fn empty_grammar() {
        //setup
        let builder: GrammarBuilder<&'static str> = GrammarBuilder::new();

        //exercise
        let res = builder.build();

        //verify
        assert_eq!(format!("{}", res.err().unwrap()), "Grammar declares no rules");
    }
}
