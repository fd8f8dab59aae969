//! Message formatting and display.
//!
//! # Examples
//!
//! ```
//! use marisol::output::formatter::OutputFormatter;
//!
//! let formatter = OutputFormatter::new(false, false);
//! formatter.info("Numbering 3 documents");
//! formatter.success("ABC000001.pdf");
//! formatter.failure("ABC000004.pdf", "COLLISION");
//! ```

use crate::collection::SaveOutcome;
use crate::config::Config;
use std::io::{self, IsTerminal, Write};

/// Level of output message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    /// Informational message.
    Info,
    /// Success message.
    Success,
    /// Warning message.
    Warning,
    /// Error message.
    Error,
    /// Debug/verbose message.
    Debug,
}

impl MessageLevel {
    fn decoration(self) -> (&'static str, &'static str) {
        match self {
            MessageLevel::Info => ("", ""),
            MessageLevel::Success => ("✓ ", "\x1b[32m"),
            MessageLevel::Warning => ("⚠ ", "\x1b[33m"),
            MessageLevel::Error => ("✗ ", "\x1b[31m"),
            MessageLevel::Debug => ("→ ", "\x1b[36m"),
        }
    }
}

/// Output formatter with configurable verbosity.
#[derive(Debug, Clone)]
pub struct OutputFormatter {
    quiet: bool,
    verbose: bool,
    colored: bool,
}

impl OutputFormatter {
    /// Create a new output formatter.
    pub fn new(quiet: bool, verbose: bool) -> Self {
        Self {
            quiet,
            verbose,
            colored: io::stdout().is_terminal() && std::env::var("TERM").is_ok(),
        }
    }

    /// Create a formatter from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.quiet, config.verbose)
    }

    /// Create a quiet formatter (only errors).
    pub fn quiet() -> Self {
        Self::new(true, false)
    }

    /// Create a verbose formatter.
    pub fn verbose() -> Self {
        Self::new(false, true)
    }

    /// Print an informational message. Suppressed in quiet mode.
    pub fn info(&self, message: &str) {
        if !self.quiet {
            self.print_message(MessageLevel::Info, message);
        }
    }

    /// Print a success message. Suppressed in quiet mode.
    pub fn success(&self, message: &str) {
        if !self.quiet {
            self.print_message(MessageLevel::Success, message);
        }
    }

    /// Print a warning message, even in quiet mode.
    pub fn warning(&self, message: &str) {
        self.print_message(MessageLevel::Warning, message);
    }

    /// Print an error message.
    pub fn error(&self, message: &str) {
        self.print_message(MessageLevel::Error, message);
    }

    /// Print a per-document failure line: `✗ LABEL: TAG`.
    pub fn failure(&self, label: &str, tag: &str) {
        self.error(&format!("{label}: {tag}"));
    }

    /// Print a debug message. Only in verbose mode.
    pub fn debug(&self, message: &str) {
        if self.verbose {
            self.print_message(MessageLevel::Debug, message);
        }
    }

    /// Print one line for a finished document.
    ///
    /// Successes are listed by output path, failures by their error tag
    /// and, in verbose mode, the full error.
    pub fn outcome(&self, outcome: &SaveOutcome) {
        match &outcome.result {
            Ok(path) => self.success(&path.display().to_string()),
            Err(err) => {
                self.failure(&outcome.begin, err.tag());
                self.debug(&err.to_string());
            }
        }
    }

    fn print_message(&self, level: MessageLevel, message: &str) {
        let (prefix, color_code) = level.decoration();
        let reset = "\x1b[0m";

        if self.colored && !color_code.is_empty() {
            println!("{color_code}{prefix}{message}{reset}");
        } else {
            println!("{prefix}{message}");
        }
    }

    /// Print a section header. Suppressed in quiet mode.
    pub fn section(&self, title: &str) {
        if !self.quiet {
            println!("\n{title}");
        }
    }

    /// Print a labelled detail. Only in verbose mode.
    pub fn detail(&self, label: &str, value: &str) {
        if self.verbose {
            println!("  {label}: {value}");
        }
    }

    /// Print a `[current/total]` progress line. Suppressed in quiet mode.
    pub fn progress(&self, current: usize, total: usize, message: Option<&str>) {
        if !self.quiet {
            let msg = message.unwrap_or("");
            print!("\r\x1b[K  [{current}/{total}] {msg}");
            io::stdout().flush().ok();

            if current == total {
                println!();
            }
        }
    }

    /// Print a list item. Suppressed in quiet mode.
    pub fn list_item(&self, index: usize, message: &str) {
        if !self.quiet {
            println!("  {index}. {message}");
        }
    }

    /// True unless in quiet mode.
    pub fn should_print(&self) -> bool {
        !self.quiet
    }

    /// Check if verbose output should be shown.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Check if quiet mode is enabled.
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }
}

impl Default for OutputFormatter {
    fn default() -> Self {
        Self::new(false, false)
    }
}
