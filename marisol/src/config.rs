//! Configuration module for marisol.
//!
//! A [`Config`] carries every collection-level setting: numbering, overlay
//! placement, output location and save behavior. It can be built in code,
//! from CLI arguments, or loaded from a JSON file. It handles:
//! - Validation of settings and their combinations
//! - Application of defaults
//! - Derivation of the numbering overlay, legend and save options

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::bates::BatesFormat;
use crate::canvas::encode_win_ansi;
use crate::collection::SaveOptions;
use crate::overlay::{Area, Overlay};
use crate::redaction::Redaction;

/// Worker multiplier applied to the number of logical CPUs.
pub const THREADS_PER_CPU: usize = 6;

/// Default number of concurrent save tasks: logical CPUs times six.
pub fn default_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        * THREADS_PER_CPU
}

/// A redaction addressed by the bates number of its page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRedaction {
    /// Bates number of the page, e.g. `ABC000004`.
    pub page: String,

    /// The box to draw.
    #[serde(flatten)]
    pub redaction: Redaction,
}

/// Complete configuration for a numbering run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Text placed before every number.
    pub prefix: String,

    /// Minimum number of digits.
    pub fill: usize,

    /// Number of the first page of the first document.
    pub start: u64,

    /// Area of the numbering overlay.
    pub area: Area,

    /// Horizontal offset in points for manual placement.
    pub x: f32,

    /// Vertical offset in points for manual placement.
    pub y: f32,

    /// Rotation of the numbering overlay in degrees.
    pub rotation: f32,

    /// Place the number at (`x`, `y`) instead of anchoring it to `area`.
    pub manual: bool,

    /// Directory receiving the output files.
    pub output_dir: PathBuf,

    /// Replace existing output files.
    pub overwrite: bool,

    /// Number of concurrent save tasks (None = auto-detect).
    pub jobs: Option<usize>,

    /// Compress output content streams.
    pub compress: bool,

    /// Static text stamped on every page of every document.
    pub legend: Option<String>,

    /// Area of the legend.
    pub legend_area: Area,

    /// Redactions to apply, addressed by bates number.
    pub redactions: Vec<PageRedaction>,

    /// Plan the run without writing files.
    #[serde(skip)]
    pub dry_run: bool,

    /// Verbose output mode.
    #[serde(skip)]
    pub verbose: bool,

    /// Quiet mode - suppress non-error output.
    #[serde(skip)]
    pub quiet: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            fill: 6,
            start: 1,
            area: Area::BottomRight,
            x: 0.0,
            y: 0.0,
            rotation: 0.0,
            manual: false,
            output_dir: PathBuf::from("."),
            overwrite: false,
            jobs: None,
            compress: true,
            legend: None,
            legend_area: Area::TopLeft,
            redactions: Vec::new(),
            dry_run: false,
            verbose: false,
            quiet: false,
        }
    }
}

impl Config {
    /// Load a configuration from a JSON file.
    ///
    /// Missing keys take their default values.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Serialize the configuration as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize configuration")
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Fill width or jobs count is zero
    /// - Verbose and quiet modes are both enabled
    /// - Offsets or rotation are not finite
    /// - The legend is empty or shares the numbering area
    /// - The output directory is an existing file
    pub fn validate(&self) -> Result<()> {
        if self.fill == 0 {
            bail!("Fill width must be at least 1");
        }

        if let Some(jobs) = self.jobs
            && jobs == 0
        {
            bail!("Number of jobs must be at least 1");
        }

        if self.verbose && self.quiet {
            bail!("Cannot use both --verbose and --quiet");
        }

        if !(self.x.is_finite() && self.y.is_finite() && self.rotation.is_finite()) {
            bail!("Offsets and rotation must be finite numbers");
        }

        if encode_win_ansi(&self.prefix).is_err() {
            bail!("Prefix {:?} cannot be printed in the stamp font", self.prefix);
        }

        if let Some(legend) = &self.legend {
            if legend.trim().is_empty() {
                bail!("Legend text cannot be empty");
            }
            if encode_win_ansi(legend).is_err() {
                bail!("Legend {legend:?} cannot be printed in the stamp font");
            }
            if self.legend_area == self.area {
                bail!(
                    "Legend area {} is reserved for the bates number",
                    self.legend_area
                );
            }
        }

        if self.output_dir.exists() && !self.output_dir.is_dir() {
            bail!(
                "Output path is not a directory: {}",
                self.output_dir.display()
            );
        }

        let format = self.bates_format();
        for entry in &self.redactions {
            if format.parse(&entry.page).is_none() {
                bail!(
                    "Redaction page {} does not match prefix {:?}",
                    entry.page,
                    self.prefix
                );
            }
        }

        Ok(())
    }

    /// Get the effective number of concurrent save tasks.
    pub fn effective_jobs(&self) -> usize {
        self.jobs.unwrap_or_else(default_threads)
    }

    /// Prefix and fill as a [`BatesFormat`].
    pub fn bates_format(&self) -> BatesFormat {
        BatesFormat::new(self.prefix.clone(), self.fill)
    }

    /// The numbering overlay every document starts with.
    pub fn numbering_overlay(&self) -> Overlay {
        Overlay::numbering(self.area)
            .with_offset(self.x, self.y)
            .with_rotation(self.rotation)
            .manual(self.manual)
    }

    /// The legend overlay, if a legend is configured.
    pub fn legend_overlay(&self) -> Option<Overlay> {
        self.legend
            .as_ref()
            .map(|text| Overlay::text(text.clone(), self.legend_area))
    }

    /// Options for [`crate::Collection::save_all`].
    pub fn save_options(&self) -> SaveOptions {
        SaveOptions {
            output_dir: self.output_dir.clone(),
            overwrite: self.overwrite,
            threads: self.effective_jobs(),
            compress: self.compress,
        }
    }

    /// Check if output should be displayed.
    ///
    /// Returns false if in quiet mode and not doing a dry run.
    pub fn should_print(&self) -> bool {
        !self.quiet || self.dry_run
    }
}
