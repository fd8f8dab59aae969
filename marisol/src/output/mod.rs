//! Output formatting and display for marisol.
//!
//! This module handles all user-facing output including:
//! - Formatted status messages
//! - The dry-run plan
//! - Save summaries, as text or JSON
//!
//! # Examples
//!
//! ```no_run
//! use marisol::output::OutputFormatter;
//! use marisol::config::Config;
//!
//! # fn example(config: Config) {
//! let formatter = OutputFormatter::from_config(&config);
//! formatter.info("Numbering documents");
//! # }
//! ```

pub mod formatter;

pub use formatter::{MessageLevel, OutputFormatter};

use serde::Serialize;

use crate::collection::{Collection, OutcomeReport, SaveOutcome, SaveStatistics};
use crate::config::Config;
use crate::document::Document;

/// Create an output formatter from configuration.
pub fn create_formatter(config: &Config) -> OutputFormatter {
    OutputFormatter::from_config(config)
}

/// One planned output file of a dry run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanEntry {
    /// Source file or stream.
    pub origin: String,
    /// First bates number.
    pub begin: String,
    /// Last bates number.
    pub end: String,
    /// Number of pages.
    pub pages: usize,
    /// Output file name.
    pub output: String,
}

impl From<&Document> for PlanEntry {
    fn from(document: &Document) -> Self {
        Self {
            origin: document.origin().to_string(),
            begin: document.begin(),
            end: document.end(),
            pages: document.len(),
            output: document.output_name(),
        }
    }
}

/// The files a run would write, without writing them.
pub fn plan(collection: &Collection) -> Vec<PlanEntry> {
    collection.iter().map(PlanEntry::from).collect()
}

/// Display the dry-run plan.
pub fn display_plan(formatter: &OutputFormatter, collection: &Collection) {
    formatter.section("Dry run: no files will be written");
    for (i, entry) in plan(collection).iter().enumerate() {
        formatter.list_item(
            i + 1,
            &format!(
                "{} -> {} ({} - {}, {} pages)",
                entry.origin, entry.output, entry.begin, entry.end, entry.pages
            ),
        );
    }
    formatter.info(&format!(
        "{} document(s), {} page(s), next number {}",
        collection.len(),
        collection.page_count(),
        collection.format().format(collection.next_start())
    ));
}

/// Display the outcome of a save run.
pub fn display_save_summary(
    formatter: &OutputFormatter,
    outcomes: &[SaveOutcome],
    stats: &SaveStatistics,
) {
    formatter.section("Results");
    for outcome in outcomes {
        formatter.outcome(outcome);
    }

    if stats.collision_count > 0 {
        formatter.warning(&format!(
            "{} file(s) already existed; use --force to overwrite",
            stats.collision_count
        ));
    }

    formatter.info(&format!(
        "Saved {}/{} document(s) in {:.2}s: {} pages",
        stats.success_count,
        stats.total(),
        stats.total_time.as_secs_f64(),
        stats.total_pages
    ));
}

/// Machine-readable report of a save run.
#[derive(Debug, Clone, Serialize)]
pub struct SaveReport {
    /// Aggregate figures.
    pub statistics: SaveStatistics,
    /// One entry per document, in append order.
    pub documents: Vec<OutcomeReport>,
}

impl SaveReport {
    /// Build a report from a finished run.
    pub fn new(outcomes: &[SaveOutcome], statistics: SaveStatistics) -> Self {
        Self {
            statistics,
            documents: outcomes.iter().map(SaveOutcome::report).collect(),
        }
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> crate::Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| crate::MarisolError::other(e.to_string()))
    }
}
