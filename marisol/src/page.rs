//! A single numbered page.

use lopdf::{Document, Object, ObjectId};
use serde::Serialize;
use std::fmt;
use tracing::debug;

use crate::canvas::Canvas;
use crate::error::{MarisolError, Result};
use crate::overlay::OverlaySlots;
use crate::page_size::{self, Orientation, PageSize};
use crate::redaction::Redaction;
use crate::stamp::{Stamper, inherited_attribute};

/// One page of a document, with its bates number and redactions.
#[derive(Debug, Clone, Serialize)]
pub struct Page {
    index: usize,
    number: u64,
    bates: String,
    #[serde(skip)]
    id: ObjectId,
    origin: (f32, f32),
    width: f32,
    height: f32,
    redactions: Vec<Redaction>,
}

impl Page {
    /// Read the geometry of page `id` in `doc`.
    ///
    /// `origin` names the source document in errors.
    pub(crate) fn load(
        doc: &Document,
        id: ObjectId,
        index: usize,
        number: u64,
        bates: String,
        origin: &str,
    ) -> Result<Self> {
        let (origin, width, height) = media_box(doc, id).ok_or_else(|| {
            MarisolError::corrupted_pdf(
                origin,
                format!("page {} has no valid MediaBox", index + 1),
            )
        })?;

        Ok(Self {
            index,
            number,
            bates,
            id,
            origin,
            width,
            height,
            redactions: Vec::new(),
        })
    }

    /// Zero-based position within the document.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Absolute bates number.
    pub fn number(&self) -> u64 {
        self.number
    }

    /// Rendered bates number.
    pub fn bates(&self) -> &str {
        &self.bates
    }

    /// Object id of the page in the source document.
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Lower-left corner of the MediaBox in user space.
    ///
    /// Overlay and redaction coordinates are relative to this point.
    pub fn origin(&self) -> (f32, f32) {
        self.origin
    }

    /// Width in points.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Height in points.
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Redactions attached so far, in drawing order.
    pub fn redactions(&self) -> &[Redaction] {
        &self.redactions
    }

    /// The named size of this page.
    pub fn size(&self) -> Result<(&'static PageSize, Orientation)> {
        page_size::resolve(&self.bates, self.width, self.height)
    }

    /// Attach a redaction.
    ///
    /// # Errors
    ///
    /// Returns [`MarisolError::OutsideBoundaries`] if the box does not fit on
    /// the page, or [`MarisolError::InvalidConfig`] if its label cannot be
    /// printed. The page is left unchanged.
    pub fn add_redaction(&mut self, redaction: Redaction) -> Result<()> {
        redaction.check_bounds(&self.bates, self.width, self.height)?;
        redaction.check_text()?;
        self.redactions.push(redaction);
        Ok(())
    }

    /// Draw `overlays` and this page's redactions onto page `self.id` of `doc`.
    ///
    /// A fresh canvas is used on every call, so a page can be applied to any
    /// number of copies of its source document.
    pub fn apply(
        &self,
        doc: &mut Document,
        overlays: &OverlaySlots,
        stamper: &Stamper,
    ) -> Result<()> {
        let (size, orientation) = self.size()?;
        debug!(
            page = %self.bates,
            size = size.name,
            ?orientation,
            redactions = self.redactions.len(),
            "rendering page"
        );

        let render_failed =
            |e: MarisolError| MarisolError::render_failed(&self.bates, e.to_string());

        let mut canvas = Canvas::with_origin(self.width, self.height, self.origin);
        overlays
            .render(&mut canvas, &self.bates)
            .map_err(render_failed)?;
        for redaction in &self.redactions {
            redaction.render(&mut canvas).map_err(render_failed)?;
        }

        let surface = canvas.finish().map_err(render_failed)?;
        stamper.merge(doc, self.id, surface, &self.bates)
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.bates)
    }
}

/// Lower-left corner, width and height of the page's MediaBox.
fn media_box(doc: &Document, id: ObjectId) -> Option<((f32, f32), f32, f32)> {
    let media_box = inherited_attribute(doc, id, b"MediaBox")?;
    let values = media_box
        .as_array()
        .ok()?
        .iter()
        .map(|value| match value {
            Object::Reference(id) => doc.get_object(*id).ok()?.as_float().ok(),
            other => other.as_float().ok(),
        })
        .collect::<Option<Vec<f32>>>()?;

    match values.as_slice() {
        [x0, y0, x1, y1] => Some((
            (x0.min(*x1), y0.min(*y1)),
            (x1 - x0).abs(),
            (y1 - y0).abs(),
        )),
        _ => None,
    }
}
