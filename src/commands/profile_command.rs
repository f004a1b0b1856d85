//! Beam profile command
//!
//! Loads the scan, builds the crop request from the defaults, command line
//! and optional prompts, runs the analysis and writes the figures.

use clap::ArgMatches;
use log::{debug, info, warn};
use std::io;
use std::path::PathBuf;

use crate::api::FilmKit;
use crate::commands::command_traits::Command;
use crate::errors::{FilmError, FilmResult};
use crate::loader::Channel;
use crate::overrides::{self, Overrides};

/// Command running the profile analysis
pub struct ProfileCommand {
    /// Path to the input file
    input_file: String,
    /// Overrides given on the command line
    overrides: Overrides,
    /// Whether to prompt for overrides
    interactive: bool,
    /// Channel requested on the command line
    channel: Option<Channel>,
    /// Resolution in pixels per inch replacing the file's value
    dpi: Option<f64>,
    /// Directory the figures are written to
    output_dir: PathBuf,
    /// Optional configuration file
    config_path: Option<String>,
    /// Figure title replacing the default
    title: Option<String>,
    /// Whether to write the full-scan overview
    overview: bool,
    /// Whether to skip writing figures
    no_plots: bool,
}

impl ProfileCommand {
    /// Create a new profile command
    ///
    /// Invalid centre or size values are reported and replaced by the
    /// defaults, like answers to the interactive prompts.
    pub fn new(args: &ArgMatches) -> FilmResult<Self> {
        let input_file = super::input_file(args)?;

        let mut cli_overrides = Overrides::default();
        if let Some(center) = args.get_one::<String>("center") {
            match overrides::parse_center(center) {
                Ok((x, y)) => {
                    cli_overrides.center_x = Some(x);
                    cli_overrides.center_y = Some(y);
                },
                Err(e) => warn!("Invalid --center ({}), using the default centre", e),
            }
        }
        if let Some(width) = args.get_one::<String>("width") {
            cli_overrides.width = overrides::or_default("--width", overrides::parse_size(width));
        }
        if let Some(height) = args.get_one::<String>("height") {
            cli_overrides.height = overrides::or_default("--height", overrides::parse_size(height));
        }

        let channel = args.get_one::<String>("channel")
            .map(|c| c.parse::<Channel>())
            .transpose()?;

        let dpi = match args.get_one::<String>("dpi") {
            Some(value) => Some(value.trim().parse::<f64>()
                .map_err(|e| FilmError::InvalidMetadata(format!("--dpi '{}': {}", value, e)))?),
            None => None,
        };

        let output_dir = args.get_one::<String>("output-dir")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(ProfileCommand {
            input_file,
            overrides: cli_overrides,
            interactive: args.get_flag("interactive"),
            channel,
            dpi,
            output_dir,
            config_path: args.get_one::<String>("config").cloned(),
            title: args.get_one::<String>("title").cloned(),
            overview: args.get_flag("overview"),
            no_plots: args.get_flag("no-plots"),
        })
    }

    /// Prompts on the terminal; answers replace command line values
    fn collect_overrides(&self) -> FilmResult<Overrides> {
        if !self.interactive {
            return Ok(self.overrides);
        }

        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut output = io::stdout();
        let prompted = overrides::prompt_overrides(&mut input, &mut output)?;

        let (center_x, center_y) = if prompted.center_x.is_some() {
            (prompted.center_x, prompted.center_y)
        } else {
            (self.overrides.center_x, self.overrides.center_y)
        };

        Ok(Overrides {
            center_x,
            center_y,
            width: prompted.width.or(self.overrides.width),
            height: prompted.height.or(self.overrides.height),
        })
    }
}

impl Command for ProfileCommand {
    fn execute(&self) -> FilmResult<()> {
        info!("Analysing file: {}", self.input_file);

        let kit = FilmKit::new(self.config_path.as_deref())?;
        let mut image = kit.load(&self.input_file)?;
        info!("Loaded {}x{} scan with {} plane(s)", image.width(), image.height(), image.plane_count());

        if let Some(dpi) = self.dpi {
            info!("Using {} dpi instead of the recorded resolution", dpi);
            image.metadata.resolution_x = Some(dpi);
        }

        if self.interactive {
            // Shown before the prompts so the centre can be read off it
            let center = kit.crop_request(&image, &self.overrides).center;
            let paths = kit.preview_overview(&image, self.channel, center, &self.input_file, &self.output_dir)?;
            println!("Overview of the scan: {}", paths.overview.display());
        }

        let overrides = self.collect_overrides()?;
        debug!("Overrides: {:?}", overrides);

        let analysis = kit.analyze(&image, &overrides, self.channel)?;
        info!("Crop bounds: {}", analysis.bounds);
        info!("Region: {}x{} pixels, {:.4} mm per pixel",
              analysis.region.width(), analysis.region.height(), analysis.scale.mm_per_pixel());
        info!("Profiles: {} columns, {} rows", analysis.profiles.y_sum.len(), analysis.profiles.x_sum.len());

        if self.no_plots {
            info!("Skipping figures");
            return Ok(());
        }

        let title = self.title.clone().unwrap_or_else(|| kit.default_title(&self.input_file));
        kit.render(&analysis, &self.input_file, &self.output_dir, &title)?;

        if self.overview {
            let center = kit.crop_request(&image, &overrides).center;
            kit.render_overview(&image, &analysis, center, &self.input_file, &self.output_dir)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::cli;

    fn command(args: &[&str]) -> ProfileCommand {
        let matches = cli().try_get_matches_from(args).unwrap();
        ProfileCommand::new(&matches).unwrap()
    }

    #[test]
    fn command_line_values_become_overrides() {
        let cmd = command(&["filmkit", "scan.tif", "--center", "(120, 80)", "--width", "64",
                            "--channel", "green", "--dpi", "150", "-o", "out"]);

        assert_eq!(cmd.input_file, "scan.tif");
        assert_eq!(cmd.overrides, Overrides { width: Some(64), ..Overrides::with_center(120, 80) });
        assert_eq!(cmd.channel, Some(Channel::Green));
        assert_eq!(cmd.dpi, Some(150.0));
        assert_eq!(cmd.output_dir, PathBuf::from("out"));
        assert!(!cmd.interactive);
    }

    #[test]
    fn invalid_sizes_fall_back_to_defaults() {
        let cmd = command(&["filmkit", "scan.tif", "--center", "12", "--height=-3", "--width", "abc"]);
        assert!(cmd.overrides.is_empty());
    }

    #[test]
    fn unparsable_dpi_is_an_error() {
        let matches = cli().try_get_matches_from(["filmkit", "scan.tif", "--dpi", "fine"]).unwrap();
        assert!(matches!(ProfileCommand::new(&matches), Err(FilmError::InvalidMetadata(_))));
    }

    #[test]
    fn defaults_without_options() {
        let cmd = command(&["filmkit", "scan.tif"]);
        assert_eq!(cmd.overrides, Overrides::default());
        assert_eq!(cmd.output_dir, PathBuf::from("."));
        assert!(cmd.channel.is_none() && cmd.dpi.is_none() && cmd.title.is_none());
        assert!(!cmd.overview && !cmd.no_plots);
    }
}
