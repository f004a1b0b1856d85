//! Film scan inspection command
//!
//! Prints the TIFF structure and the film metadata the analysis relies
//! on, without decoding any pixels.

use clap::ArgMatches;
use log::{debug, info, warn};

use crate::analysis::scale_factor;
use crate::commands::command_traits::Command;
use crate::errors::FilmResult;
use crate::loader::{FilmLoader, LoaderStrategyFactory};
use crate::tiff::ifd::IFD;
use crate::tiff::types::TIFF;

/// Command for inspecting a film scan
pub struct InspectCommand {
    /// Path to the input file
    input_file: String,
    /// Whether to list every tag
    verbose: bool,
}

impl InspectCommand {
    /// Create a new inspect command
    pub fn new(args: &ArgMatches) -> FilmResult<Self> {
        Ok(InspectCommand {
            input_file: super::input_file(args)?,
            verbose: args.get_flag("verbose"),
        })
    }

    /// Shows the format and number of IFDs
    fn display_tiff_summary(&self, tiff: &TIFF) {
        info!("TIFF Analysis Results:");
        info!("  Format: {}", if tiff.is_big_tiff { "BigTIFF" } else { "TIFF" });
        info!("  Byte order: {}", tiff.byte_order.name());
        info!("  Number of IFDs: {}", tiff.ifd_count());
    }

    /// Shows offset, size and subfile type of one IFD
    fn display_ifd_summary(&self, ifd: &IFD) {
        info!("IFD #{} (offset: {})", ifd.number, ifd.offset);
        info!("  Number of entries: {}", ifd.entry_count());

        match ifd.get_dimensions() {
            Some((width, height)) => info!("  Dimensions: {}x{}", width, height),
            None => info!("  Dimensions: Not available"),
        }

        if ifd.is_reduced_resolution() {
            info!("  (Reduced resolution version)");
        }
        if ifd.is_tiled() {
            info!("  Tiled layout");
        }

        for entry in &ifd.entries {
            debug!("    {}", entry.description());
        }
    }
}

impl Command for InspectCommand {
    fn execute(&self) -> FilmResult<()> {
        info!("Inspecting file: {}", self.input_file);

        let mut loader = FilmLoader::new();
        let (tiff, metadata) = loader.inspect(&self.input_file)?;

        self.display_tiff_summary(&tiff);
        if self.verbose {
            for ifd in &tiff.ifds {
                self.display_ifd_summary(ifd);
            }
        } else if let Some(ifd) = tiff.main_ifd() {
            self.display_ifd_summary(ifd);
        }

        info!("Film metadata:");
        for line in metadata.to_string().lines() {
            info!("{}", line);
        }

        if let Some(ifd) = tiff.main_ifd() {
            info!("  Decoder: {}", LoaderStrategyFactory::create_strategy(ifd, &metadata).name());
        }

        match metadata.resolution_x.map(scale_factor) {
            Some(Ok(mm)) => info!("  Pixel pitch: {:.4} mm", mm),
            Some(Err(e)) => warn!("  {}", e),
            None => warn!("  No X resolution recorded; profile runs need --dpi"),
        }

        Ok(())
    }
}
