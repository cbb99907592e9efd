//! Document model types.
//!
//! A document is an ordered list of pages, and a page is an ordered list
//! of positioned text runs carrying the font metadata needed to tell
//! headings apart from body text.

mod document;
mod page;
mod run;

pub use document::{Document, Metadata};
pub use page::Page;
pub use run::{TextJoiner, TextRun, BASELINE_TOLERANCE};
