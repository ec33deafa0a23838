#[macro_use]
extern crate clap;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;
extern crate earley_forest;

mod cli;

fn main() {
    cli::run();
}
