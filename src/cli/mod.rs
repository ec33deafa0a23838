#[macro_use]
mod logger;
mod configuration;
mod grammars;

use {
    clap::{App, ArgMatches},
    earley_forest::{parse::forest::Derivation, BuildError, ParseJob, ParseJobRunner},
    std::{
        io::{self, Read},
        path::Path,
        process,
    },
    stopwatch::Stopwatch,
};

use self::configuration::Configuration;

pub fn run() {
    let yaml = load_yaml!("cli.yml");
    let matches = App::from_yaml(yaml).get_matches();

    catch_fatal!(
        {
            execute(&matches);
        },
        {
            process::exit(1);
        }
    );
}

fn execute(matches: &ArgMatches) {
    let mut config = match matches.value_of("config") {
        Some(path) => match configuration::read_configuration(Path::new(path)) {
            Ok(config) => config,
            Err(err) => logger::fatal(&format!("Error loading configuration {}: {}", path, err)),
        },
        None => Configuration::default(),
    };
    config.apply_matches(matches);

    logger::init(
        config.logfile.as_ref().map(String::as_str),
        config.loglevel.as_ref().map(String::as_str),
    );

    let runner = match build_runner(&config) {
        Ok(runner) => runner,
        Err(err) => logger::fatal(&format!(
            "Error loading grammar '{}': {}",
            &config.grammar, err
        )),
    };

    let input = read_input(matches, &mut io::stdin());

    let mut sw = Stopwatch::new();
    sw.start();

    match runner.parse(ParseJob::from_text(input.clone())) {
        Ok(forest) => {
            sw.stop();
            if matches.is_present("count") {
                println!("{}", forest.len());
            } else {
                print_forest(&forest, config.pretty);
            }

            logger::accept(&format!(
                "{}ms : '{}' derives '{}' in {} way(s)",
                sw.elapsed_ms(),
                runner.start(),
                input.trim(),
                forest.len()
            ));
        }
        Err(err) => {
            logger::reject(&format!("{}", err));
            process::exit(1);
        }
    }
}

fn build_runner(config: &Configuration) -> Result<ParseJobRunner, BuildError> {
    let builder = match grammars::by_name(&config.grammar) {
        Some(builder) => builder,
        None => logger::fatal(&format!("Unknown grammar '{}'", &config.grammar)),
    };

    match config.start {
        None => ParseJobRunner::build(builder),
        Some(ref start) => ParseJobRunner::with_start(builder.build()?, start),
    }
}

/// The positional input if given, otherwise everything readable from `source`.
///
/// Blank input is passed through untouched, since a grammar with a nullable start rule
/// accepts it.
fn read_input(matches: &ArgMatches, source: &mut dyn Read) -> String {
    if let Some(input) = matches.value_of("INPUT") {
        return String::from(input);
    }

    let mut input = String::new();
    if let Err(err) = source.read_to_string(&mut input) {
        logger::fatal(&format!("Failed to read input from stdin: {}", err));
    }
    input
}

fn print_forest(forest: &[Derivation<String>], pretty: bool) {
    for derivation in forest {
        if pretty {
            derivation.print();
        } else {
            println!("{}", derivation);
        }
    }
}
