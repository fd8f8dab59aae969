//! Named page sizes.
//!
//! Pages are only stamped when their geometry matches one of the standard
//! sizes below. Widths and heights are in PDF points (1/72 inch) and are
//! stored in portrait orientation.

use serde::Serialize;
use std::fmt;

use crate::error::{MarisolError, Result};

/// Allowed difference in points between a MediaBox and a table entry.
pub const TOLERANCE: f32 = 0.5;

const fn mm(value: f32) -> f32 {
    value * 72.0 / 25.4
}

const fn inch(value: f32) -> f32 {
    value * 72.0
}

/// A named page size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageSize {
    /// Canonical name, e.g. `A4` or `LETTER`.
    pub name: &'static str,
    /// Portrait width in points.
    pub width: f32,
    /// Portrait height in points.
    pub height: f32,
}

/// Orientation a page matched its size in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Height is the long edge.
    Portrait,
    /// Width is the long edge.
    Landscape,
}

const fn size(name: &'static str, width: f32, height: f32) -> PageSize {
    PageSize {
        name,
        width,
        height,
    }
}

/// Every size a page may have, scanned in order.
pub static PAGE_SIZES: &[PageSize] = &[
    size("A0", mm(841.0), mm(1189.0)),
    size("A1", mm(594.0), mm(841.0)),
    size("A2", mm(420.0), mm(594.0)),
    size("A3", mm(297.0), mm(420.0)),
    size("A4", mm(210.0), mm(297.0)),
    size("A5", mm(148.0), mm(210.0)),
    size("A6", mm(105.0), mm(148.0)),
    size("A7", mm(74.0), mm(105.0)),
    size("B0", mm(1000.0), mm(1414.0)),
    size("B1", mm(707.0), mm(1000.0)),
    size("B2", mm(500.0), mm(707.0)),
    size("B3", mm(353.0), mm(500.0)),
    size("B4", mm(250.0), mm(353.0)),
    size("B5", mm(176.0), mm(250.0)),
    size("B6", mm(125.0), mm(176.0)),
    size("LETTER", inch(8.5), inch(11.0)),
    size("LEGAL", inch(8.5), inch(14.0)),
    size("TABLOID", inch(11.0), inch(17.0)),
    size("JUNIOR_LEGAL", inch(5.0), inch(8.0)),
    size("HALF_LETTER", inch(5.5), inch(8.5)),
    size("GOV_LETTER", inch(8.0), inch(10.5)),
    size("GOV_LEGAL", inch(8.5), inch(13.0)),
];

impl PageSize {
    /// Look up a size by name, ignoring case.
    pub fn by_name(name: &str) -> Option<&'static PageSize> {
        PAGE_SIZES
            .iter()
            .find(|size| size.name.eq_ignore_ascii_case(name))
    }

    fn matches(&self, width: f32, height: f32) -> bool {
        (self.width - width).abs() <= TOLERANCE && (self.height - height).abs() <= TOLERANCE
    }

    /// Dimensions in the given orientation.
    pub fn dimensions(&self, orientation: Orientation) -> (f32, f32) {
        match orientation {
            Orientation::Portrait => (self.width, self.height),
            Orientation::Landscape => (self.height, self.width),
        }
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.0} x {:.0} pts)", self.name, self.width, self.height)
    }
}

/// Find the named size for a page of `width` x `height` points.
///
/// Portrait entries are scanned first, then the same table with width and
/// height swapped, so a landscape Letter page resolves to `LETTER`
/// (`Landscape`). Ledger is therefore reported as landscape Tabloid.
pub fn lookup(width: f32, height: f32) -> Option<(&'static PageSize, Orientation)> {
    PAGE_SIZES
        .iter()
        .find(|size| size.matches(width, height))
        .map(|size| (size, Orientation::Portrait))
        .or_else(|| {
            PAGE_SIZES
                .iter()
                .find(|size| size.matches(height, width))
                .map(|size| (size, Orientation::Landscape))
        })
}

/// Like [`lookup`], but fails with [`MarisolError::UnknownPageSize`].
///
/// `page` is the bates number of the page being resolved and only used in
/// the error.
pub fn resolve(page: &str, width: f32, height: f32) -> Result<(&'static PageSize, Orientation)> {
    lookup(width, height).ok_or_else(|| MarisolError::UnknownPageSize {
        page: page.to_string(),
        width,
        height,
    })
}
