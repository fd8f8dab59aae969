//! CLI argument parsing for marisol.
//!
//! Flags are layered over an optional JSON configuration file: a flag given
//! on the command line wins, anything else falls back to the file, then to
//! the built-in defaults.

use clap::Parser;
use std::path::PathBuf;

use marisol::config::Config;
use marisol::error::{MarisolError, Result};
use marisol::overlay::Area;

/// Stamp bates numbers onto PDF documents.
///
/// marisol numbers every page of the given PDF files with one running,
/// zero-padded sequence and writes one stamped copy per input.
#[derive(Parser, Debug)]
#[command(name = "marisol")]
#[command(version)]
#[command(about = "Stamp bates numbers onto PDF documents", long_about = None)]
#[command(author)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Input PDF files to number (in order)
    ///
    /// Specify multiple files or use glob patterns. Numbering continues
    /// from one file to the next in the order provided.
    ///
    /// Examples:
    ///   marisol a.pdf b.pdf --prefix ABC
    ///   marisol 'exhibits/*.pdf' --prefix EX --start 100
    #[arg(required = true, value_name = "FILE")]
    pub inputs: Vec<String>,

    /// Text placed before every number
    #[arg(short, long, value_name = "TEXT")]
    pub prefix: Option<String>,

    /// Minimum number of digits [default: 6]
    ///
    /// Numbers with more digits are printed in full.
    #[arg(long, value_name = "N")]
    pub fill: Option<usize>,

    /// Number of the first page [default: 1]
    #[arg(short, long, value_name = "N")]
    pub start: Option<u64>,

    /// Corner receiving the number [default: bottom-right]
    ///
    /// One of top-left, top-right, bottom-left, bottom-right.
    #[arg(short, long, value_name = "AREA")]
    pub area: Option<Area>,

    /// Horizontal offset of the number in points
    #[arg(short = 'x', long = "x", value_name = "PT", allow_hyphen_values = true)]
    pub x: Option<f32>,

    /// Vertical offset of the number in points
    #[arg(short = 'y', long = "y", value_name = "PT", allow_hyphen_values = true)]
    pub y: Option<f32>,

    /// Rotation of the number in degrees
    #[arg(short, long, value_name = "DEGREES", allow_hyphen_values = true)]
    pub rotation: Option<f32>,

    /// Place the number at (x, y) instead of anchoring it to the area
    #[arg(short, long)]
    pub manual: bool,

    /// Directory receiving the numbered files [default: .]
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Overwrite existing output files
    ///
    /// By default a document whose output file exists is skipped and
    /// reported as a collision.
    #[arg(short, long)]
    pub force: bool,

    /// Number of documents saved concurrently
    ///
    /// Default is six per logical CPU.
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Write content streams uncompressed
    #[arg(long)]
    pub no_compress: bool,

    /// Static text stamped on every page
    #[arg(short, long, value_name = "TEXT")]
    pub legend: Option<String>,

    /// Corner receiving the legend [default: top-left]
    #[arg(long, value_name = "AREA")]
    pub legend_area: Option<Area>,

    /// Read settings from a JSON file
    ///
    /// Command-line flags override values from the file.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Show the planned output files without writing them
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Print a JSON report instead of text
    #[arg(long)]
    pub json: bool,

    /// Suppress all non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Convert CLI arguments into a validated Config.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file cannot be read or the
    /// resulting configuration is invalid.
    pub fn to_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_json_file(path)?,
            None => Config::default(),
        };

        if let Some(prefix) = &self.prefix {
            config.prefix = prefix.clone();
        }
        if let Some(fill) = self.fill {
            config.fill = fill;
        }
        if let Some(start) = self.start {
            config.start = start;
        }
        if let Some(area) = self.area {
            config.area = area;
        }
        if let Some(x) = self.x {
            config.x = x;
        }
        if let Some(y) = self.y {
            config.y = y;
        }
        if let Some(rotation) = self.rotation {
            config.rotation = rotation;
        }
        if let Some(output_dir) = &self.output_dir {
            config.output_dir = output_dir.clone();
        }
        if self.jobs.is_some() {
            config.jobs = self.jobs;
        }
        if self.legend.is_some() {
            config.legend = self.legend.clone();
        }
        if let Some(area) = self.legend_area {
            config.legend_area = area;
        }

        config.manual |= self.manual;
        config.overwrite |= self.force;
        config.compress &= !self.no_compress;
        config.dry_run = self.dry_run;
        config.verbose = self.verbose;
        config.quiet = self.quiet || self.json;

        config.validate().map_err(|e| {
            MarisolError::invalid_config(format!("Configuration validation failed: {e}"))
        })?;

        Ok(config)
    }
}
