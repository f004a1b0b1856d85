//! The two traits the CLI dispatch is built on

use clap::ArgMatches;

use crate::errors::FilmResult;

/// One fully parsed CLI invocation, ready to run
pub trait Command {
    fn execute(&self) -> FilmResult<()>;
}

/// Turns parsed arguments into the command for the chosen subcommand
pub trait CommandFactory {
    fn create_command(&self, args: &ArgMatches) -> FilmResult<Box<dyn Command>>;
}
