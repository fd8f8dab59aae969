//! marisol - Bates-number PDF documents.
//!
//! This library stamps a running, zero-padded number onto every page of an
//! ordered set of PDF documents. It supports:
//!
//! - Prefixed bates numbers with a configurable fill width
//! - Numbering and static text overlays in the four page corners
//! - Redaction boxes with optional labels
//! - Concurrent saving with per-document outcomes
//!
//! # Examples
//!
//! ## Numbering a set of files
//!
//! ```no_run
//! use marisol::{Collection, SaveOptions};
//! use std::path::PathBuf;
//!
//! # async fn example() -> marisol::Result<()> {
//! let mut collection = Collection::new("ABC", 6, 1);
//! collection.append_path("a.pdf").await?;
//! collection.append_path("b.pdf").await?;
//!
//! let options = SaveOptions {
//!     output_dir: PathBuf::from("out"),
//!     ..SaveOptions::default()
//! };
//! for outcome in collection.save_all(&options).await {
//!     println!("{}", outcome.label());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Overlays and redactions
//!
//! ```no_run
//! use marisol::{Area, Collection, Overlay, Redaction, RedactionStyle};
//!
//! # fn example(bytes: &[u8]) -> marisol::Result<()> {
//! let mut collection = Collection::new("ABC", 6, 1);
//! collection.append_bytes(bytes, Some("exhibit"))?;
//! collection.add_overlay_to_all(Overlay::text("CONFIDENTIAL", Area::TopLeft))?;
//! collection.add_redaction(
//!     "ABC000002",
//!     Redaction::new(72.0, 400.0, 200.0, 40.0)
//!         .with_text("PRIVILEGED")
//!         .with_style(RedactionStyle::Outline),
//! )?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bates;
pub mod canvas;
pub mod collection;
pub mod config;
pub mod document;
pub mod error;
pub mod io;
pub mod output;
pub mod overlay;
pub mod page;
pub mod page_size;
pub mod redaction;
pub mod stamp;
pub mod utils;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use bates::{BatesFormat, BatesRange, format_bates};
pub use collection::{Collection, SaveOptions, SaveOutcome, SaveStatistics};
pub use config::Config;
pub use document::Document;
pub use error::{MarisolError, Result};
pub use overlay::{Area, Overlay, OverlayKind};
pub use page::Page;
pub use page_size::{Orientation, PageSize};
pub use redaction::{Redaction, RedactionStyle};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
