//! A numbered document.
//!
//! A [`Document`] owns its parsed source, its pages and its overlay slots.
//! Rendering always works on a copy of the source, so a document can be
//! rendered and saved any number of times with identical results.

use lopdf::Document as PdfDocument;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::bates::{BatesFormat, BatesRange};
use crate::error::{MarisolError, Result};
use crate::io::{LoadedPdf, PdfWriter, WriteStatistics};
use crate::overlay::{Overlay, OverlaySlots};
use crate::page::Page;
use crate::redaction::Redaction;
use crate::stamp::Stamper;

/// One source PDF with a contiguous range of bates numbers.
#[derive(Debug, Clone)]
pub struct Document {
    source: PdfDocument,
    origin: String,
    name: Option<String>,
    format: BatesFormat,
    start: u64,
    pages: Vec<Page>,
    overlays: OverlaySlots,
}

impl Document {
    /// Number the pages of `loaded` starting at `start`.
    ///
    /// `numbering` is pinned to its area for the lifetime of the document.
    ///
    /// # Errors
    ///
    /// Returns [`MarisolError::InvalidConfig`] if the last page number does
    /// not fit in a `u64`.
    pub fn new(
        loaded: LoadedPdf,
        format: BatesFormat,
        start: u64,
        numbering: Overlay,
    ) -> Result<Self> {
        let LoadedPdf {
            document: source,
            origin,
            name,
            ..
        } = loaded;

        let pages = source
            .get_pages()
            .into_values()
            .enumerate()
            .map(|(index, id)| {
                let number = start.checked_add(index as u64).ok_or_else(|| {
                    MarisolError::invalid_config(format!(
                        "{origin}: page {} cannot be numbered after {start}",
                        index + 1
                    ))
                })?;
                Page::load(&source, id, index, number, format.format(number), &origin)
            })
            .collect::<Result<Vec<_>>>()?;

        if pages.is_empty() {
            return Err(MarisolError::corrupted_pdf(origin, "PDF has no pages"));
        }

        Ok(Self {
            source,
            origin,
            name,
            format,
            start,
            pages,
            overlays: OverlaySlots::new(numbering),
        })
    }

    /// Where the document was loaded from.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Base name used for the output file, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Bates number of the first page.
    pub fn start(&self) -> u64 {
        self.start
    }

    /// Bates number of the last page.
    pub fn end_number(&self) -> u64 {
        self.start + self.pages.len() as u64 - 1
    }

    /// Rendered bates number of the first page.
    pub fn begin(&self) -> String {
        self.format.format(self.start)
    }

    /// Rendered bates number of the last page.
    pub fn end(&self) -> String {
        self.format.format(self.end_number())
    }

    /// Inclusive range of numbers covered.
    pub fn range(&self) -> BatesRange {
        self.format.range(self.start, self.pages.len())
    }

    /// Number of pages.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Always false; documents without pages are rejected on load.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Pages in order.
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Page at zero-based `index`.
    pub fn page(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    /// Mutable page at zero-based `index`.
    pub fn page_mut(&mut self, index: usize) -> Option<&mut Page> {
        self.pages.get_mut(index)
    }

    /// The overlay registry.
    pub fn overlays(&self) -> &OverlaySlots {
        &self.overlays
    }

    /// Add an overlay to a free area.
    ///
    /// # Errors
    ///
    /// - [`MarisolError::AreaReserved`] if the area holds the numbering overlay
    /// - [`MarisolError::AreaOccupied`] if another overlay is already there
    pub fn add_overlay(&mut self, overlay: Overlay) -> Result<&mut Self> {
        self.overlays.insert(overlay)?;
        Ok(self)
    }

    /// Attach a redaction to the page at zero-based `index`.
    pub fn add_redaction(&mut self, index: usize, redaction: Redaction) -> Result<&mut Self> {
        let pages = self.pages.len();
        let page = self.pages.get_mut(index).ok_or_else(|| {
            MarisolError::other(format!(
                "page index {index} out of range for {} ({pages} pages)",
                self.origin
            ))
        })?;
        page.add_redaction(redaction)?;
        Ok(self)
    }

    /// File name used by [`Document::save`].
    ///
    /// `BEGIN.pdf` for unnamed documents, `NAME_START.pdf` otherwise, with
    /// `START` zero padded to the fill width.
    pub fn output_name(&self) -> String {
        match &self.name {
            Some(name) => format!(
                "{name}_{:0fill$}.pdf",
                self.start,
                fill = self.format.fill
            ),
            None => format!("{}.pdf", self.begin()),
        }
    }

    /// Stamp every page onto a copy of the source.
    pub fn render(&self) -> Result<PdfDocument> {
        let mut output = self.source.clone();
        let stamper = Stamper::new(&mut output);
        for page in &self.pages {
            page.apply(&mut output, &self.overlays, &stamper)?;
        }
        Ok(output)
    }

    /// Render and serialize without touching the filesystem.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut output = self.render()?;
        let mut bytes = Vec::new();
        output.save_to(&mut bytes)?;
        Ok(bytes)
    }

    /// Save to [`Document::output_name`] inside `output_dir`.
    pub fn save(&self, output_dir: &Path, overwrite: bool) -> Result<PathBuf> {
        self.save_as(&output_dir.join(self.output_name()), overwrite)
    }

    /// Save to an explicit path.
    ///
    /// # Errors
    ///
    /// [`MarisolError::OutputExists`] if `path` exists and `overwrite` is
    /// false; nothing is rendered or written in that case.
    pub fn save_as(&self, path: &Path, overwrite: bool) -> Result<PathBuf> {
        self.write_with(&PdfWriter::new().overwrite(overwrite), path)
            .map(|stats| stats.output_path)
    }

    /// Save to `path` using `writer`.
    #[tracing::instrument(skip(self, writer), fields(document = %self))]
    pub fn write_with(&self, writer: &PdfWriter, path: &Path) -> Result<WriteStatistics> {
        writer.check_collision(path)?;
        let mut output = self.render()?;
        let stats = writer.write(&mut output, path)?;
        info!(
            path = %stats.output_path.display(),
            pages = self.len(),
            size = %stats.format_file_size(),
            "saved document"
        );
        Ok(stats)
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.begin(), self.end())
    }
}
