//! Reconstruction of every derivation behind an accepted chart.
//!
//! Each derivation is materialized as its own tree. Wherever a symbol of a production
//! can be justified by more than one completed state, the tree built so far is
//! duplicated once per candidate and every copy is expanded independently, so a
//! grammar with `k` independently ambiguous spots yields the product of their choices.
//!
//! A production is walked from its last symbol back to its first. A terminal steps one
//! column to the left; a rule reference is justified by a completed state of that rule
//! ending in the current column, and is only accepted if the item with the dot just
//! before the reference exists in the column where the candidate starts. That check
//! makes consecutive sub-derivations tile the parent's span exactly, and forces the
//! leftmost one to begin where the parent begins.
//!
//! Expansion terminates on left-recursive and cyclic grammars because every candidate
//! either covers a strictly smaller span than the state it justifies, or covers the
//! same span without already labelling the node being extended or one of its ancestors.

use {
    crate::core::{
        data::{
            tree::{NodeId, Tree},
            Data,
        },
        parse::{
            chart::{Chart, Lhs, State},
            grammar::{Grammar, RuleId, Symbol},
            Parse,
        },
    },
    std::fmt,
    stopwatch::Stopwatch,
};

#[derive(Debug)]
pub enum Label<'g, T: 'g> {
    Root,
    State(State<'g, T>),
}

impl<'g, T: Data> Label<'g, T> {
    pub fn state(&self) -> Option<&State<'g, T>> {
        match self {
            Label::Root => None,
            Label::State(state) => Some(state),
        }
    }
}

impl<'g, T> Clone for Label<'g, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'g, T> Copy for Label<'g, T> {}

type Branch<'g, T> = Tree<Label<'g, T>>;

pub fn build_forest<'g, T: Data>(parse: &Parse<'g, T>) -> Vec<Derivation<'g, T>> {
    let sw = Stopwatch::start_new();

    let accepting = *parse.accepting();
    let mut tree: Branch<'g, T> = Tree::new(Label::Root);
    let root = tree.root();
    let node = tree.add(root, Label::State(accepting));

    let builder = ForestBuilder {
        chart: parse.chart(),
    };
    let trees = builder.expand(tree, node, &accepting);

    if trees.is_empty() {
        panic!("Failed to decompose accepting state of recognized input");
    }

    debug!(
        "Building {} derivation(s) took {}ms",
        trees.len(),
        sw.elapsed_ms()
    );

    trees
        .into_iter()
        .map(|tree| Derivation {
            grammar: parse.grammar(),
            tree,
        })
        .collect()
}

struct ForestBuilder<'c, 'g: 'c, T: 'g> {
    chart: &'c Chart<'g, T>,
}

impl<'c, 'g: 'c, T: Data> ForestBuilder<'c, 'g, T> {
    /// All completions of `tree` in which `node`, labelled `state`, is fully expanded.
    fn expand(
        &self,
        tree: Branch<'g, T>,
        node: NodeId,
        state: &State<'g, T>,
    ) -> Vec<Branch<'g, T>> {
        self.decompose(tree, node, state, state.production().len(), state.end())
    }

    /// Justifies the symbols of `state` before `dot`, the last of which ends at column `end`.
    fn decompose(
        &self,
        tree: Branch<'g, T>,
        node: NodeId,
        state: &State<'g, T>,
        dot: usize,
        end: usize,
    ) -> Vec<Branch<'g, T>> {
        if dot == 0 {
            return vec![tree];
        }

        let predecessor = state.with_dot(dot - 1);
        let column = self.chart.column(end);

        match &state.production().symbols()[dot - 1] {
            Symbol::Terminal(terminal) => {
                if end > 0
                    && column.token() == Some(terminal)
                    && self.chart.column(end - 1).contains(&predecessor)
                {
                    self.decompose(tree, node, state, dot - 1, end - 1)
                } else {
                    Vec::new()
                }
            }
            Symbol::Rule(rule) => {
                let mut forest = Vec::new();

                for candidate in column.states() {
                    if !self.justifies(candidate, *rule, &predecessor)
                        || closes_cycle(&tree, node, state, candidate)
                    {
                        continue;
                    }

                    let (mut branch, image) = tree.dup(node);
                    let child = branch.prepend(image, Label::State(*candidate));

                    for expanded in self.expand(branch, child, candidate) {
                        forest.extend(self.decompose(
                            expanded,
                            image,
                            state,
                            dot - 1,
                            candidate.start(),
                        ));
                    }
                }

                forest
            }
        }
    }

    fn justifies(
        &self,
        candidate: &State<'g, T>,
        rule: RuleId,
        predecessor: &State<'g, T>,
    ) -> bool {
        candidate.is_complete()
            && candidate.lhs() == Lhs::Rule(rule)
            && self.chart.column(candidate.start()).contains(predecessor)
    }
}

fn closes_cycle<'g, T: Data>(
    tree: &Branch<'g, T>,
    node: NodeId,
    state: &State<'g, T>,
    candidate: &State<'g, T>,
) -> bool {
    if !candidate.same_span(state) {
        return false;
    }

    tree.lineage(node)
        .any(|ancestor| match tree.value(ancestor) {
            Label::Root => false,
            Label::State(labelled) => labelled == candidate && labelled.same_span(candidate),
        })
}

/// One complete derivation of an accepted input.
///
/// The root is a marker whose single child is the accepting wrapper state; every
/// other node is a completed state whose children justify its rule references, left
/// to right. Terminals are implicit leaves read from the productions.
pub struct Derivation<'g, T: 'g> {
    grammar: &'g Grammar<T>,
    tree: Tree<Label<'g, T>>,
}

impl<'g, T: Data> Derivation<'g, T> {
    pub fn tree(&self) -> &Tree<Label<'g, T>> {
        &self.tree
    }

    pub fn accepting(&self) -> &State<'g, T> {
        let top = self.tree.children(self.tree.root())[0];
        match self.tree.value(top) {
            Label::Root => panic!("Derivation is missing its accepting state"),
            Label::State(state) => state,
        }
    }

    /// The terminals at the leaves, left to right.
    pub fn terminals(&self) -> Vec<&'g T> {
        let mut terminals = Vec::new();
        self.collect_terminals(self.tree.root(), &mut terminals);
        terminals
    }

    pub fn to_pretty_string(&self) -> String {
        self.tree.render(&|label| match label {
            Label::Root => "root".to_string(),
            Label::State(state) => state.describe(self.grammar),
        })
    }

    pub fn print(&self) {
        print!("{}", self.to_pretty_string());
    }

    fn collect_terminals(&self, node: NodeId, terminals: &mut Vec<&'g T>) {
        let state = match *self.tree.value(node) {
            Label::Root => {
                for child in self.tree.children(node) {
                    self.collect_terminals(*child, terminals);
                }
                return;
            }
            Label::State(state) => state,
        };

        let mut children = self.tree.children(node).iter();
        for symbol in state.production().symbols() {
            match symbol {
                Symbol::Terminal(terminal) => terminals.push(terminal),
                Symbol::Rule(_) => {
                    if let Some(child) = children.next() {
                        self.collect_terminals(*child, terminals);
                    }
                }
            }
        }
    }

    fn write_node(&self, node: NodeId, f: &mut fmt::Formatter) -> fmt::Result {
        let state = match *self.tree.value(node) {
            Label::Root => {
                for child in self.tree.children(node) {
                    self.write_node(*child, f)?;
                }
                return Ok(());
            }
            Label::State(state) => state,
        };

        let wrapped = state.lhs() != Lhs::Accept;
        if wrapped {
            write!(f, "{}(", state.lhs().name(self.grammar))?;
        }

        let mut children = self.tree.children(node).iter();
        for (i, symbol) in state.production().symbols().iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match symbol {
                Symbol::Terminal(terminal) => write!(f, "{}", terminal.to_string())?,
                Symbol::Rule(_) => {
                    if let Some(child) = children.next() {
                        self.write_node(*child, f)?;
                    }
                }
            }
        }

        if wrapped {
            write!(f, ")")?;
        }
        Ok(())
    }
}

impl<'g, T: Data> fmt::Display for Derivation<'g, T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.write_node(self.tree.root(), f)
    }
}
