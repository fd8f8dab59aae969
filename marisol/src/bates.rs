//! Bates number arithmetic.
//!
//! A bates number is a prefix followed by a zero-padded decimal counter.
//! Numbering is contiguous across a whole collection: the first page of each
//! document continues where the previous document ended.
//!
//! # Examples
//!
//! ```
//! use marisol::bates::{document_starts, format_bates, parse_number};
//!
//! assert_eq!(format_bates("ABC", 6, 42), "ABC000042");
//! assert_eq!(parse_number("ABC000042", "ABC"), Some(42));
//! assert_eq!(document_starts(1, &[3, 3]), vec![1, 4]);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Render `number` as `prefix` followed by `number` zero-padded to `fill` digits.
///
/// Numbers with more digits than `fill` are written out in full, never
/// truncated.
pub fn format_bates(prefix: &str, fill: usize, number: u64) -> String {
    format!("{prefix}{number:0fill$}")
}

/// Recover the counter from a bates string produced with `prefix`.
///
/// Returns `None` if the prefix does not match or the remainder is not a
/// decimal number.
pub fn parse_number(bates: &str, prefix: &str) -> Option<u64> {
    let digits = bates.strip_prefix(prefix)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Compute the starting number of each document from its page count.
///
/// The result has one entry per document; entry `i` is `start` plus the sum of
/// the page counts of documents `0..i`.
pub fn document_starts(start: u64, page_counts: &[usize]) -> Vec<u64> {
    page_counts
        .iter()
        .scan(start, |next, &pages| {
            let current = *next;
            *next = next.saturating_add(pages as u64);
            Some(current)
        })
        .collect()
}

/// Prefix and padding shared by every number in a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatesFormat {
    /// Text placed before the digits.
    pub prefix: String,
    /// Minimum number of digits.
    pub fill: usize,
}

impl BatesFormat {
    /// Create a format from a prefix and fill width.
    pub fn new(prefix: impl Into<String>, fill: usize) -> Self {
        Self {
            prefix: prefix.into(),
            fill,
        }
    }

    /// Render a single number.
    pub fn format(&self, number: u64) -> String {
        format_bates(&self.prefix, self.fill, number)
    }

    /// Parse a string rendered by this format.
    pub fn parse(&self, bates: &str) -> Option<u64> {
        parse_number(bates, &self.prefix)
    }

    /// Describe the inclusive range covering `pages` numbers from `start`.
    pub fn range(&self, start: u64, pages: usize) -> BatesRange {
        let last = start.saturating_add((pages as u64).saturating_sub(1));
        BatesRange {
            first: start,
            last,
            begin: self.format(start),
            end: self.format(last),
        }
    }
}

/// Inclusive range of bates numbers covered by one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatesRange {
    /// First number in the range.
    pub first: u64,
    /// Last number in the range.
    pub last: u64,
    /// Rendered first number.
    pub begin: String,
    /// Rendered last number.
    pub end: String,
}

impl BatesRange {
    /// Number of pages covered by the range.
    pub fn len(&self) -> u64 {
        self.last - self.first + 1
    }

    /// A range always covers at least one page.
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl fmt::Display for BatesRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.begin, self.end)
    }
}
