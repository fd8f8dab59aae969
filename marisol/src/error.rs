//! Error types for marisol.
//!
//! Every failure that can happen while numbering, stamping or saving a
//! document is described by [`MarisolError`]. Variants carry the paths and
//! geometry needed to act on them.
//!
//! # Error Categories
//!
//! - **Input Errors**: file not found, unreadable or encrypted PDFs
//! - **Composition Errors**: reserved or occupied overlay areas, redactions
//!   outside the page, unsupported page sizes
//! - **Output Errors**: name collisions, failed writes
//! - **Configuration Errors**: invalid numbering or CLI parameters

use std::io;
use std::path::PathBuf;

use crate::overlay::Area;

/// Result type alias for marisol operations.
pub type Result<T> = std::result::Result<T, MarisolError>;

/// Main error type for marisol operations.
#[derive(Debug, thiserror::Error)]
pub enum MarisolError {
    /// Input file was not found.
    #[error("File not found: {}", .path.display())]
    FileNotFound {
        /// Path to the file that was not found.
        path: PathBuf,
    },

    /// Input path exists but is not a regular file.
    #[error("Not a file: {}", .path.display())]
    NotAFile {
        /// Path that is not a file.
        path: PathBuf,
    },

    /// Input file is not accessible (permission denied, etc.).
    #[error("Cannot access file: {}\n  Reason: {source}", .path.display())]
    FileNotAccessible {
        /// Path to the inaccessible file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to parse PDF content.
    #[error("Failed to load PDF: {origin}\n  Reason: {reason}")]
    FailedToLoadPdf {
        /// Path or label of the source.
        origin: String,
        /// Reason for the failure.
        reason: String,
    },

    /// PDF is encrypted and cannot be stamped.
    #[error(
        "PDF is encrypted and cannot be processed: {origin}\n  \
         Hint: Decrypt the PDF first using 'qpdf --decrypt' or similar tools"
    )]
    EncryptedPdf {
        /// Path or label of the source.
        origin: String,
    },

    /// PDF parsed but has an unusable structure.
    #[error("Corrupted or invalid PDF: {origin}\n  Details: {details}")]
    CorruptedPdf {
        /// Path or label of the source.
        origin: String,
        /// Details about the corruption.
        details: String,
    },

    /// Output file already exists and overwrite is disabled.
    #[error(
        "Output file already exists: {}\n  \
         Use --force to overwrite or choose a different output directory",
        .path.display()
    )]
    OutputExists {
        /// Path to the existing output file.
        path: PathBuf,
    },

    /// The area already holds the numbering overlay.
    #[error("Area {area} is reserved for the bates number overlay")]
    AreaReserved {
        /// The reserved area.
        area: Area,
    },

    /// The area already holds a static overlay.
    #[error("Area {area} already holds an overlay")]
    AreaOccupied {
        /// The occupied area.
        area: Area,
    },

    /// A redaction rectangle does not fit on its page.
    #[error(
        "Redaction at ({x}, {y}) with size ({width}, {height}) is outside \
         the boundaries of page {page} ({page_width} x {page_height})"
    )]
    OutsideBoundaries {
        /// Bates number of the page.
        page: String,
        /// Left edge of the redaction.
        x: f32,
        /// Bottom edge of the redaction.
        y: f32,
        /// Redaction width.
        width: f32,
        /// Redaction height.
        height: f32,
        /// Page width in points.
        page_width: f32,
        /// Page height in points.
        page_height: f32,
    },

    /// Page geometry matches no known page size.
    #[error("Unknown page size {width} x {height} pts on page {page}")]
    UnknownPageSize {
        /// Bates number of the page.
        page: String,
        /// Page width in points.
        width: f32,
        /// Page height in points.
        height: f32,
    },

    /// Drawing or merging an overlay failed.
    #[error("Failed to render page {page}: {reason}")]
    RenderFailed {
        /// Bates number of the page.
        page: String,
        /// Description of the failure.
        reason: String,
    },

    /// Failed to create the output file.
    #[error("Failed to create output file: {}\n  Reason: {source}", .path.display())]
    FailedToCreateOutput {
        /// Path where output should be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to write the output file.
    #[error("Failed to write to output file: {}\n  Reason: {source}", .path.display())]
    FailedToWrite {
        /// Path being written to.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// A background save task panicked or was aborted.
    #[error("Save task for {document} failed: {reason}")]
    TaskFailed {
        /// Begin bates number of the document.
        document: String,
        /// Description of the failure.
        reason: String,
    },

    /// Some documents in a batch failed to save.
    #[error("{failed} of {total} document(s) failed to save")]
    SaveFailed {
        /// Number of failed documents.
        failed: usize,
        /// Number of documents in the batch.
        total: usize,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong with the configuration.
        message: String,
    },

    /// Generic I/O error.
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error.
        #[from]
        source: io::Error,
    },

    /// Generic error with a custom message.
    #[error("{message}")]
    Other {
        /// Error message.
        message: String,
    },
}

impl From<lopdf::Error> for MarisolError {
    fn from(err: lopdf::Error) -> Self {
        Self::other(err.to_string())
    }
}

impl From<anyhow::Error> for MarisolError {
    fn from(err: anyhow::Error) -> Self {
        Self::invalid_config(err.to_string())
    }
}

impl MarisolError {
    /// Create a FileNotFound error.
    pub fn file_not_found(path: PathBuf) -> Self {
        Self::FileNotFound { path }
    }

    /// Create a NotAFile error.
    pub fn not_a_file(path: PathBuf) -> Self {
        Self::NotAFile { path }
    }

    /// Create a FailedToLoadPdf error.
    pub fn failed_to_load_pdf(origin: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::FailedToLoadPdf {
            origin: origin.into(),
            reason: reason.into(),
        }
    }

    /// Create a CorruptedPdf error.
    pub fn corrupted_pdf(origin: impl Into<String>, details: impl Into<String>) -> Self {
        Self::CorruptedPdf {
            origin: origin.into(),
            details: details.into(),
        }
    }

    /// Create an EncryptedPdf error.
    pub fn encrypted_pdf(origin: impl Into<String>) -> Self {
        Self::EncryptedPdf {
            origin: origin.into(),
        }
    }

    /// Create an OutputExists error.
    pub fn output_exists(path: PathBuf) -> Self {
        Self::OutputExists { path }
    }

    /// Create a RenderFailed error.
    pub fn render_failed(page: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::RenderFailed {
            page: page.into(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an Other error with a custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Check if this error is a naming collision.
    pub fn is_collision(&self) -> bool {
        matches!(self, Self::OutputExists { .. })
    }

    /// Short, stable label used in per-document save reports.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::OutputExists { .. } => "COLLISION",
            Self::OutsideBoundaries { .. } => "OUT_OF_BOUNDS",
            Self::UnknownPageSize { .. } => "UNKNOWN_PAGE_SIZE",
            Self::AreaReserved { .. } | Self::AreaOccupied { .. } => "AREA",
            _ => "ERROR",
        }
    }

    /// Get the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FileNotFound { .. } => 2,
            Self::NotAFile { .. } => 2,
            Self::FileNotAccessible { .. } => 2,
            Self::FailedToLoadPdf { .. } => 3,
            Self::EncryptedPdf { .. } => 3,
            Self::CorruptedPdf { .. } => 3,
            Self::OutputExists { .. } => 4,
            Self::FailedToCreateOutput { .. } => 5,
            Self::FailedToWrite { .. } => 5,
            Self::Io { .. } => 5,
            Self::AreaReserved { .. } => 1,
            Self::AreaOccupied { .. } => 1,
            Self::OutsideBoundaries { .. } => 1,
            Self::UnknownPageSize { .. } => 6,
            Self::RenderFailed { .. } => 6,
            Self::TaskFailed { .. } => 6,
            Self::SaveFailed { .. } => 6,
            Self::InvalidConfig { .. } => 1,
            Self::Other { .. } => 1,
        }
    }
}
