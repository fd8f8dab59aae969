//! PDF loading.
//!
//! Sources are read fully into memory and parsed with `lopdf`. Every document
//! keeps its own parsed copy, so documents never share state once loaded.
//!
//! # Examples
//!
//! ```no_run
//! use marisol::io::reader::PdfReader;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let reader = PdfReader::new();
//! let loaded = reader.load(Path::new("exhibit.pdf")).await?;
//! println!("{} has {} pages", loaded.origin, loaded.page_count);
//! # Ok(())
//! # }
//! ```

use lopdf::Document;
use std::io::Read;
use std::path::Path;
use std::time::{Duration, Instant};
use tokio::task;
use tracing::debug;

use crate::error::{MarisolError, Result};

/// A parsed PDF and where it came from.
#[derive(Debug, Clone)]
pub struct LoadedPdf {
    /// The parsed document.
    pub document: Document,

    /// Path or label of the source, used in messages.
    pub origin: String,

    /// Base name for output files, if the source had one.
    pub name: Option<String>,

    /// Number of pages in the document.
    pub page_count: usize,

    /// Time taken to parse the document.
    pub load_time: Duration,

    /// Size of the source in bytes.
    pub file_size: u64,
}

/// PDF reader. Encrypted and page-less documents are rejected.
#[derive(Debug, Clone, Copy)]
pub struct PdfReader;

impl PdfReader {
    /// Create a new PDF reader.
    pub fn new() -> Self {
        Self
    }

    /// Load a PDF from disk.
    ///
    /// The output base name is the file name without its extension.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The path does not exist or is not a file
    /// - The file cannot be read
    /// - The file is not a valid PDF, is encrypted, or has no pages
    pub async fn load(&self, path: &Path) -> Result<LoadedPdf> {
        let metadata = tokio::fs::metadata(path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => MarisolError::file_not_found(path.to_path_buf()),
            _ => MarisolError::FileNotAccessible {
                path: path.to_path_buf(),
                source: e,
            },
        })?;
        if !metadata.is_file() {
            return Err(MarisolError::not_a_file(path.to_path_buf()));
        }

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| MarisolError::FileNotAccessible {
                path: path.to_path_buf(),
                source: e,
            })?;

        let origin = path.display().to_string();
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned());
        let reader = *self;

        // Parsing is CPU bound.
        task::spawn_blocking(move || reader.parse(&bytes, origin, name))
            .await
            .map_err(|e| MarisolError::other(format!("Load task failed: {e}")))?
    }

    /// Parse a PDF held in memory.
    pub fn parse(
        &self,
        bytes: &[u8],
        origin: impl Into<String>,
        name: Option<String>,
    ) -> Result<LoadedPdf> {
        let origin = origin.into();
        let start = Instant::now();

        let document = Document::load_mem(bytes).map_err(|e| {
            let message = e.to_string();
            if message.contains("encrypt") || message.contains("password") {
                MarisolError::encrypted_pdf(origin.clone())
            } else {
                MarisolError::failed_to_load_pdf(origin.clone(), message)
            }
        })?;

        if document.is_encrypted() {
            return Err(MarisolError::encrypted_pdf(origin));
        }

        let page_count = document.get_pages().len();
        if page_count == 0 {
            return Err(MarisolError::corrupted_pdf(origin, "PDF has no pages"));
        }

        let load_time = start.elapsed();
        debug!(%origin, page_count, ?load_time, "parsed pdf");

        Ok(LoadedPdf {
            document,
            origin,
            name,
            page_count,
            load_time,
            file_size: bytes.len() as u64,
        })
    }

    /// Read a PDF from any byte stream.
    ///
    /// Streams have no file name, so the loaded document has no base name.
    pub fn read<R: Read>(&self, mut source: R, origin: impl Into<String>) -> Result<LoadedPdf> {
        let origin = origin.into();
        let mut bytes = Vec::new();
        source.read_to_end(&mut bytes).map_err(|e| {
            MarisolError::failed_to_load_pdf(origin.clone(), format!("read failed: {e}"))
        })?;
        self.parse(&bytes, origin, None)
    }
}

impl Default for PdfReader {
    fn default() -> Self {
        Self::new()
    }
}
