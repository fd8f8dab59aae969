//! Reading source PDFs and writing stamped output.

pub mod reader;
pub mod writer;

pub use reader::{LoadedPdf, PdfReader};
pub use writer::{PdfWriter, WriteOptions, WriteStatistics};
