//! PDF writing.
//!
//! Writes are atomic: the document is serialized to a temporary file next to
//! the target and renamed into place only once it is complete. A failed write
//! never leaves a partial file at the target path and never replaces an
//! existing one.
//!
//! Writing is synchronous; callers that run inside an async runtime move it
//! onto a blocking thread.
//!
//! # Examples
//!
//! ```no_run
//! use marisol::io::writer::PdfWriter;
//! use lopdf::Document;
//! use std::path::Path;
//!
//! # fn example(mut doc: Document) -> Result<(), Box<dyn std::error::Error>> {
//! let writer = PdfWriter::new();
//! let stats = writer.write(&mut doc, Path::new("ABC000001.pdf"))?;
//! println!("wrote {}", stats.format_file_size());
//! # Ok(())
//! # }
//! ```

use lopdf::Document;
use serde::Serialize;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::error::{MarisolError, Result};
use crate::utils::format_file_size;

/// Options for writing PDF files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOptions {
    /// Replace an existing file at the target path.
    pub overwrite: bool,

    /// Compress content streams before writing.
    pub compress: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            overwrite: false,
            compress: true,
        }
    }
}

/// Statistics about a write operation.
#[derive(Debug, Clone, Serialize)]
pub struct WriteStatistics {
    /// Time taken to write the file.
    pub write_time: Duration,

    /// Size of the written file in bytes.
    pub file_size: u64,

    /// Path where the file was written.
    pub output_path: PathBuf,

    /// Whether compression was applied.
    pub compressed: bool,
}

impl WriteStatistics {
    /// Format file size as human-readable string.
    pub fn format_file_size(&self) -> String {
        format_file_size(self.file_size)
    }
}

/// PDF writer with configurable behavior.
#[derive(Debug, Clone, Default)]
pub struct PdfWriter {
    options: WriteOptions,
}

impl PdfWriter {
    /// Create a writer that refuses to overwrite and compresses output.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether existing files may be replaced.
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.options.overwrite = overwrite;
        self
    }

    /// Set whether content streams are compressed.
    pub fn compress(mut self, compress: bool) -> Self {
        self.options.compress = compress;
        self
    }

    /// The options in use.
    pub fn options(&self) -> &WriteOptions {
        &self.options
    }

    /// Fail with [`MarisolError::OutputExists`] if `path` exists and
    /// overwriting is disabled.
    pub fn check_collision(&self, path: &Path) -> Result<()> {
        if !self.options.overwrite && path.exists() {
            return Err(MarisolError::output_exists(path.to_path_buf()));
        }
        Ok(())
    }

    /// Serialize `doc` to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `path` exists and overwriting is disabled (checked before any write)
    /// - The temporary file cannot be created
    /// - Serialization or publishing the finished file fails
    ///
    /// Without overwrite the finished file is published with a hard link,
    /// which fails if `path` appeared after the collision check.
    pub fn write(&self, doc: &mut Document, path: &Path) -> Result<WriteStatistics> {
        self.check_collision(path)?;
        let start = Instant::now();

        if self.options.compress {
            doc.compress();
        }

        let temp_path = temp_path_for(path);
        let result = self
            .write_file(doc, &temp_path)
            .and_then(|()| self.publish(&temp_path, path));

        if let Err(err) = result {
            let _ = fs::remove_file(&temp_path);
            return Err(err);
        }

        let file_size = fs::metadata(path).map(|m| m.len()).unwrap_or(0);

        Ok(WriteStatistics {
            write_time: start.elapsed(),
            file_size,
            output_path: path.to_path_buf(),
            compressed: self.options.compress,
        })
    }

    /// Move the finished temp file to `path`.
    fn publish(&self, temp_path: &Path, path: &Path) -> Result<()> {
        let failed = |e| MarisolError::FailedToWrite {
            path: path.to_path_buf(),
            source: e,
        };

        if self.options.overwrite {
            return fs::rename(temp_path, path).map_err(failed);
        }

        fs::hard_link(temp_path, path).map_err(|e| match e.kind() {
            std::io::ErrorKind::AlreadyExists => MarisolError::output_exists(path.to_path_buf()),
            _ => failed(e),
        })?;
        fs::remove_file(temp_path).map_err(failed)
    }

    fn write_file(&self, doc: &mut Document, path: &Path) -> Result<()> {
        let file = fs::File::create(path).map_err(|e| MarisolError::FailedToCreateOutput {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut writer = BufWriter::new(file);
        doc.save_to(&mut writer)
            .map_err(|e| MarisolError::FailedToWrite {
                path: path.to_path_buf(),
                source: std::io::Error::other(e),
            })?;

        writer.flush().map_err(|e| MarisolError::FailedToWrite {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

/// Hidden sibling of `path` used while writing.
fn temp_path_for(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{file_name}.{}.tmp", std::process::id()))
}
