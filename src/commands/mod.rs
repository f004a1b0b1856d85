//! CLI command implementations
//!
//! This module contains implementations of the commands
//! supported by the CLI application using the Command pattern.

pub mod command_traits;
pub mod inspect_command;
pub mod profile_command;

pub use command_traits::{Command, CommandFactory};
pub use inspect_command::InspectCommand;
pub use profile_command::ProfileCommand;

use clap::{Arg, ArgAction, ArgMatches, Command as ClapCommand};
use crate::errors::{FilmError, FilmResult};

/// Command line definition shared by the binary and the tests
pub fn cli() -> ClapCommand {
    ClapCommand::new("filmkit")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Beam spot profiles from scanned radiochromic film")
        .arg(
            Arg::new("input")
                .help("Input TIFF film scan")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("center")
                .long("center")
                .help("Beam centre in pixels as 'X,Y'")
                .value_name("X,Y")
                .required(false),
        )
        .arg(
            Arg::new("width")
                .long("width")
                .help("Crop width in pixels (default: full image width)")
                .value_name("PIXELS")
                .required(false),
        )
        .arg(
            Arg::new("height")
                .long("height")
                .help("Crop height in pixels (default: full image height)")
                .value_name("PIXELS")
                .required(false),
        )
        .arg(
            Arg::new("interactive")
                .short('i')
                .long("interactive")
                .help("Prompt for centre, width and height")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("channel")
                .long("channel")
                .help("Colour channel to analyse")
                .value_name("CHANNEL")
                .value_parser(["red", "green", "blue"])
                .required(false),
        )
        .arg(
            Arg::new("dpi")
                .long("dpi")
                .help("Scan resolution in pixels per inch, replacing the file's value")
                .value_name("DPI")
                .required(false),
        )
        .arg(
            Arg::new("output-dir")
                .short('o')
                .long("output-dir")
                .help("Directory for the figures")
                .value_name("DIR")
                .required(false),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("TOML file overriding the default settings")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("title")
                .long("title")
                .help("Figure title (default: '<prefix> <file stem>')")
                .value_name("TEXT")
                .required(false),
        )
        .arg(
            Arg::new("overview")
                .long("overview")
                .help("Also write an 8-bit overview of the whole scan")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-plots")
                .long("no-plots")
                .help("Run the analysis without writing figures")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("inspect")
                .long("inspect")
                .help("Print the scan's TIFF structure and metadata only")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose output")
                .action(ArgAction::SetTrue),
        )
}

/// Factory for creating command instances based on CLI arguments
pub struct FilmkitCommandFactory;

impl FilmkitCommandFactory {
    /// Create a new factory instance
    pub fn new() -> Self {
        FilmkitCommandFactory
    }
}

impl Default for FilmkitCommandFactory {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads the required input path
pub(crate) fn input_file(args: &ArgMatches) -> FilmResult<String> {
    args.get_one::<String>("input")
        .cloned()
        .ok_or_else(|| FilmError::GenericError("Missing input file".to_string()))
}

impl CommandFactory for FilmkitCommandFactory {
    fn create_command(&self, args: &ArgMatches) -> FilmResult<Box<dyn Command>> {
        if args.get_flag("inspect") {
            Ok(Box::new(InspectCommand::new(args)?))
        } else {
            // Default to the profile analysis
            Ok(Box::new(ProfileCommand::new(args)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_channel_is_rejected_by_the_parser() {
        assert!(cli().try_get_matches_from(["filmkit", "scan.tif", "--channel", "alpha"]).is_err());
    }

    #[test]
    fn input_file_is_required() {
        assert!(cli().try_get_matches_from(["filmkit"]).is_err());

        let matches = cli().try_get_matches_from(["filmkit", "scan.tif", "--inspect"]).unwrap();
        assert_eq!(input_file(&matches).unwrap(), "scan.tif");
        assert!(FilmkitCommandFactory::new().create_command(&matches).is_ok());
    }
}
