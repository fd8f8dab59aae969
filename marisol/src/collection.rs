//! Ordered collections of documents and the concurrent save pipeline.
//!
//! Numbering is a running offset: each appended document starts where the
//! previous one ended. Saving fans out one blocking task per document and
//! collects every outcome, successful or not, in append order.
//!
//! # Examples
//!
//! ```no_run
//! use marisol::{Collection, SaveOptions};
//!
//! # async fn example() -> marisol::Result<()> {
//! let mut collection = Collection::new("ABC", 6, 1);
//! collection.append_path("a.pdf").await?;
//! collection.append_path("b.pdf").await?;
//!
//! for outcome in collection.save_all(&SaveOptions::default()).await {
//!     println!("{}: {}", outcome.label(), outcome.is_success());
//! }
//! # Ok(())
//! # }
//! ```

use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::task;
use tracing::{debug, warn};

use crate::bates::BatesFormat;
use crate::config::{Config, default_threads};
use crate::document::Document;
use crate::error::{MarisolError, Result};
use crate::io::{LoadedPdf, PdfReader, PdfWriter, WriteStatistics};
use crate::overlay::{Area, Overlay};
use crate::page::Page;
use crate::redaction::Redaction;

/// Options for [`Collection::save_all`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOptions {
    /// Directory receiving the output files.
    pub output_dir: PathBuf,

    /// Replace existing output files.
    pub overwrite: bool,

    /// Maximum number of documents saved at once.
    pub threads: usize,

    /// Compress output content streams.
    pub compress: bool,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            overwrite: false,
            threads: default_threads(),
            compress: true,
        }
    }
}

/// Result of saving one document.
#[derive(Debug)]
pub struct SaveOutcome {
    /// Position of the document in the collection.
    pub index: usize,

    /// First bates number of the document.
    pub begin: String,

    /// Last bates number of the document.
    pub end: String,

    /// Number of pages.
    pub pages: usize,

    /// Path written, or why nothing was written.
    pub result: Result<PathBuf>,
}

impl SaveOutcome {
    /// Whether the document was written.
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// Whether the document was skipped because its file already exists.
    pub fn is_collision(&self) -> bool {
        matches!(&self.result, Err(err) if err.is_collision())
    }

    /// Output path on success, error tag otherwise.
    pub fn label(&self) -> String {
        match &self.result {
            Ok(path) => path.display().to_string(),
            Err(err) => err.tag().to_string(),
        }
    }

    /// Serializable summary of this outcome.
    pub fn report(&self) -> OutcomeReport {
        OutcomeReport {
            index: self.index,
            begin: self.begin.clone(),
            end: self.end.clone(),
            pages: self.pages,
            success: self.is_success(),
            path: self.result.as_ref().ok().cloned(),
            tag: self.result.as_ref().err().map(MarisolError::tag),
            error: self.result.as_ref().err().map(ToString::to_string),
        }
    }
}

/// JSON-friendly form of a [`SaveOutcome`].
#[derive(Debug, Clone, Serialize)]
pub struct OutcomeReport {
    /// Position of the document in the collection.
    pub index: usize,
    /// First bates number.
    pub begin: String,
    /// Last bates number.
    pub end: String,
    /// Number of pages.
    pub pages: usize,
    /// Whether the document was written.
    pub success: bool,
    /// Path written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Error tag, e.g. `COLLISION`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<&'static str>,
    /// Full error message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Aggregate figures for a save run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SaveStatistics {
    /// Documents written.
    pub success_count: usize,

    /// Documents skipped because their file existed.
    pub collision_count: usize,

    /// Documents that failed for any other reason.
    pub failure_count: usize,

    /// Pages in documents that were written.
    pub total_pages: usize,

    /// Wall-clock time of the run.
    pub total_time: Duration,
}

impl SaveStatistics {
    /// Tally `outcomes`.
    pub fn from_outcomes(outcomes: &[SaveOutcome], total_time: Duration) -> Self {
        let mut stats = Self {
            total_time,
            ..Self::default()
        };

        for outcome in outcomes {
            if outcome.is_success() {
                stats.success_count += 1;
                stats.total_pages += outcome.pages;
            } else if outcome.is_collision() {
                stats.collision_count += 1;
            } else {
                stats.failure_count += 1;
            }
        }

        stats
    }

    /// Documents not written, for any reason.
    pub fn failed(&self) -> usize {
        self.collision_count + self.failure_count
    }

    /// Documents in the run.
    pub fn total(&self) -> usize {
        self.success_count + self.failed()
    }
}

/// An ordered set of documents sharing one numbering scheme.
#[derive(Debug, Clone)]
pub struct Collection {
    format: BatesFormat,
    start: u64,
    next_start: u64,
    numbering: Overlay,
    reader: PdfReader,
    documents: Vec<Document>,
}

impl Collection {
    /// Create an empty collection numbering from `start`.
    ///
    /// Numbers are stamped in the bottom right corner.
    pub fn new(prefix: impl Into<String>, fill: usize, start: u64) -> Self {
        Self {
            format: BatesFormat::new(prefix, fill),
            start,
            next_start: start,
            numbering: Overlay::numbering(Area::BottomRight),
            reader: PdfReader::new(),
            documents: Vec::new(),
        }
    }

    /// Create an empty collection from a validated configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config.prefix.clone(), config.fill, config.start)
            .with_numbering(config.numbering_overlay()))
    }

    /// Use `overlay` as the numbering overlay of documents appended later.
    pub fn with_numbering(mut self, overlay: Overlay) -> Self {
        self.numbering = overlay;
        self
    }

    /// Prefix and fill width.
    pub fn format(&self) -> &BatesFormat {
        &self.format
    }

    /// Number of the first page of the first document.
    pub fn start(&self) -> u64 {
        self.start
    }

    /// Number the next appended document will start at.
    pub fn next_start(&self) -> u64 {
        self.next_start
    }

    /// Append an already parsed PDF.
    pub fn append_loaded(&mut self, loaded: LoadedPdf) -> Result<&mut Self> {
        let document = Document::new(
            loaded,
            self.format.clone(),
            self.next_start,
            self.numbering.clone(),
        )?;
        let next_start = self
            .next_start
            .checked_add(document.len() as u64)
            .ok_or_else(|| {
                MarisolError::invalid_config(format!(
                    "{}: numbering would continue past {}",
                    document.origin(),
                    u64::MAX
                ))
            })?;
        debug!(document = %document, origin = document.origin(), "appended document");
        self.next_start = next_start;
        self.documents.push(document);
        Ok(self)
    }

    /// Append a PDF held in memory.
    ///
    /// `name` becomes the base of the output file name.
    pub fn append_bytes(&mut self, bytes: &[u8], name: Option<&str>) -> Result<&mut Self> {
        let origin = name.unwrap_or("<memory>");
        let loaded = self
            .reader
            .parse(bytes, origin, name.map(str::to_string))?;
        self.append_loaded(loaded)
    }

    /// Append a PDF read from a byte stream.
    pub fn append_reader<R: Read>(&mut self, source: R) -> Result<&mut Self> {
        let loaded = self.reader.read(source, "<stream>")?;
        self.append_loaded(loaded)
    }

    /// Append a PDF file. Its file stem becomes the output base name.
    pub async fn append_path(&mut self, path: impl AsRef<Path>) -> Result<&mut Self> {
        let loaded = self.reader.load(path.as_ref()).await?;
        self.append_loaded(loaded)
    }

    /// Add `overlay` to every document.
    ///
    /// Either every document accepts the overlay or none is changed.
    pub fn add_overlay_to_all(&mut self, overlay: Overlay) -> Result<&mut Self> {
        for document in &self.documents {
            document.overlays().clone().insert(overlay.clone())?;
        }
        for document in &mut self.documents {
            document.add_overlay(overlay.clone())?;
        }
        Ok(self)
    }

    /// Page carrying bates number `number`, if any document covers it.
    pub fn page_mut(&mut self, number: u64) -> Option<&mut Page> {
        self.documents
            .iter_mut()
            .find(|doc| (doc.start()..=doc.end_number()).contains(&number))
            .and_then(|doc| doc.page_mut((number - doc.start()) as usize))
    }

    /// Attach a redaction to the page with the given rendered bates number.
    pub fn add_redaction(&mut self, bates: &str, redaction: Redaction) -> Result<&mut Self> {
        let number = self.format.parse(bates).ok_or_else(|| {
            MarisolError::other(format!("Not a bates number of this collection: {bates}"))
        })?;
        let page = self
            .page_mut(number)
            .ok_or_else(|| MarisolError::other(format!("No page is numbered {bates}")))?;
        page.add_redaction(redaction)?;
        Ok(self)
    }

    /// Number of documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether no document was appended.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Document at `index`.
    pub fn get(&self, index: usize) -> Option<&Document> {
        self.documents.get(index)
    }

    /// Mutable document at `index`.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Document> {
        self.documents.get_mut(index)
    }

    /// Documents in append order.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Iterate over documents in append order.
    pub fn iter(&self) -> std::slice::Iter<'_, Document> {
        self.documents.iter()
    }

    /// Total number of pages.
    pub fn page_count(&self) -> usize {
        self.documents.iter().map(Document::len).sum()
    }

    /// Save every document concurrently.
    ///
    /// Never fails as a whole: each document's success or error is reported
    /// in its [`SaveOutcome`], in append order.
    pub async fn save_all(&self, options: &SaveOptions) -> Vec<SaveOutcome> {
        self.save_all_with_progress(options, |_| {}).await
    }

    /// Like [`Collection::save_all`], calling `on_progress` as each document
    /// finishes, in completion order.
    #[tracing::instrument(skip_all, fields(documents = self.len(), threads = options.threads))]
    pub async fn save_all_with_progress<F>(
        &self,
        options: &SaveOptions,
        mut on_progress: F,
    ) -> Vec<SaveOutcome>
    where
        F: FnMut(&SaveOutcome),
    {
        let threads = options.threads.max(1);
        let writer = PdfWriter::new()
            .overwrite(options.overwrite)
            .compress(options.compress);

        let tasks = self.documents.iter().enumerate().map(|(index, document)| {
            let document = document.clone();
            let writer = writer.clone();
            let path = options.output_dir.join(document.output_name());
            async move { save_one(index, document, writer, path).await }
        });

        let mut outcomes: Vec<SaveOutcome> = stream::iter(tasks)
            .buffer_unordered(threads)
            .inspect(|outcome| on_progress(outcome))
            .collect()
            .await;

        // Restore append order
        outcomes.sort_by_key(|outcome| outcome.index);
        outcomes
    }

    /// Save every document and tally the run.
    pub async fn save_all_with_stats(
        &self,
        options: &SaveOptions,
    ) -> (Vec<SaveOutcome>, SaveStatistics) {
        let start = Instant::now();
        let outcomes = self.save_all(options).await;
        let stats = SaveStatistics::from_outcomes(&outcomes, start.elapsed());
        (outcomes, stats)
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a Document;
    type IntoIter = std::slice::Iter<'a, Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

async fn save_one(
    index: usize,
    document: Document,
    writer: PdfWriter,
    path: PathBuf,
) -> SaveOutcome {
    let begin = document.begin();
    let end = document.end();
    let pages = document.len();

    let joined = task::spawn_blocking(move || document.write_with(&writer, &path)).await;
    let result = task_result(joined, &begin);

    if let Err(err) = &result {
        warn!(document = %begin, tag = err.tag(), error = %err, "failed to save document");
    }

    SaveOutcome {
        index,
        begin,
        end,
        pages,
        result,
    }
}

/// Output path of a finished save task, or `TaskFailed` if it panicked.
fn task_result(
    joined: std::result::Result<Result<WriteStatistics>, task::JoinError>,
    document: &str,
) -> Result<PathBuf> {
    match joined {
        Ok(result) => result.map(|stats| stats.output_path),
        Err(err) => Err(MarisolError::TaskFailed {
            document: document.to_string(),
            reason: err.to_string(),
        }),
    }
}
