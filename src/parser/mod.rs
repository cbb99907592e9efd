//! PDF parsing module.
//!
//! Everything that knows about PDF internals lives here; the extraction
//! core sees documents only through [`crate::source::PageSource`].

pub mod backend;
mod content;
mod options;
mod pdf_parser;

pub use backend::{BackendFontInfo, ContentOp, LopdfBackend, PageId, PdfBackend, PdfValue};
pub use content::extract_page_runs;
pub use options::{ErrorMode, ParseOptions};
pub use pdf_parser::{PdfFile, PdfParser};
