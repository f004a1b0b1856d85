use std::process::ExitCode;
use log::error;

use filmkit::commands::{cli, CommandFactory, FilmkitCommandFactory};
use filmkit::utils::logger::{Logger, DEFAULT_LOG_FILE};
use filmkit::FilmResult;

fn run(args: &clap::ArgMatches) -> FilmResult<()> {
    FilmkitCommandFactory::new()
        .create_command(args)?
        .execute()
}

fn main() -> ExitCode {
    let args = cli().get_matches();

    if let Err(e) = Logger::init_global_logger(DEFAULT_LOG_FILE, args.get_flag("verbose")) {
        eprintln!("Could not open {}: {}", DEFAULT_LOG_FILE, e);
        return ExitCode::FAILURE;
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
