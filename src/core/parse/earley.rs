use {
    crate::core::{
        data::Data,
        parse::{
            self,
            chart::{Chart, Lhs, State},
            forest::{self, Derivation},
            grammar::{Grammar, RuleId, Symbol},
            Parse, Parser,
        },
    },
    stopwatch::Stopwatch,
};

pub struct EarleyParser;

impl<T: Data> Parser<T> for EarleyParser {
    fn recognize<'g>(
        &self,
        grammar: &'g Grammar<T>,
        start: RuleId,
        tokens: Vec<T>,
    ) -> Result<Parse<'g, T>, parse::Error> {
        let sw = Stopwatch::start_new();

        let mut chart: Chart<'g, T> = Chart::new(tokens);
        chart
            .column_mut(0)
            .add(State::new(Lhs::Accept, grammar.augmented(start), 0, 0));

        for i in 0..chart.len() {
            // Predict and complete append to column i while it is being walked.
            let mut k = 0;
            while k < chart.column(i).len() {
                let state = *chart.column(i).state(k);
                match state.next_symbol() {
                    None => complete_op(&state, i, grammar, &mut chart),
                    Some(Symbol::Rule(rule)) => predict_op(&state, i, *rule, grammar, &mut chart),
                    Some(Symbol::Terminal(terminal)) => {
                        if i + 1 < chart.len() {
                            scan_op(&state, i + 1, terminal, grammar, &mut chart);
                        }
                    }
                }
                k += 1;
            }

            debug!("\n{}", chart.column(i).describe(grammar, true));
        }

        debug!(
            "Filling recognition chart took {}ms for {} tokens",
            sw.elapsed_ms(),
            chart.len() - 1
        );

        match accepting_index(&chart) {
            Some(accept) => Ok(Parse::new(grammar, chart, accept)),
            None => Err(parse::Error::RejectedErr(grammar.name(start).to_string())),
        }
    }

    fn build_forest<'g>(&self, parse: &Parse<'g, T>) -> Vec<Derivation<'g, T>> {
        forest::build_forest(parse)
    }
}

fn predict_op<'g, T: Data>(
    state: &State<'g, T>,
    i: usize,
    rule: RuleId,
    grammar: &'g Grammar<T>,
    chart: &mut Chart<'g, T>,
) {
    let column = chart.column_mut(i);

    for prod in grammar.rule(rule).productions() {
        let predicted = State::new(Lhs::Rule(rule), prod, 0, i);
        if column.add(predicted) {
            trace!("Predicted {}", predicted.describe(grammar));
        }
    }

    // A nullable rule may already have completed in this column, before `state` started
    // waiting on it.
    if grammar.is_nullable(rule) {
        let advanced = state.advance();
        if column.add(advanced) {
            trace!("Skipped nullable {}", advanced.describe(grammar));
        }
    }
}

fn scan_op<'g, T: Data>(
    state: &State<'g, T>,
    next: usize,
    terminal: &T,
    grammar: &'g Grammar<T>,
    chart: &mut Chart<'g, T>,
) {
    let column = chart.column_mut(next);

    if column.token() != Some(terminal) {
        return;
    }

    let scanned = state.advance();
    if column.add(scanned) {
        trace!("Scanned {}", scanned.describe(grammar));
    }
}

fn complete_op<'g, T: Data>(
    state: &State<'g, T>,
    i: usize,
    grammar: &'g Grammar<T>,
    chart: &mut Chart<'g, T>,
) {
    let rule = match state.lhs() {
        Lhs::Accept => return,
        Lhs::Rule(rule) => rule,
    };

    let origin = state.start();
    let mut k = 0;
    while k < chart.column(origin).len() {
        let waiting = *chart.column(origin).state(k);
        if let Some(Symbol::Rule(next)) = waiting.next_symbol() {
            if *next == rule {
                let completed = waiting.advance();
                if chart.column_mut(i).add(completed) {
                    trace!("Completed {}", completed.describe(grammar));
                }
            }
        }
        k += 1;
    }
}

fn accepting_index<'g, T: Data>(chart: &Chart<'g, T>) -> Option<usize> {
    chart.last().states().iter().position(|state| {
        state.lhs() == Lhs::Accept && state.is_complete() && state.start() == 0
    })
}
