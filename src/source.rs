//! Page access traits shared by the parser and the extraction core.
//!
//! The extraction stages only need a page count and the runs of one page
//! at a time. [`PageSource`] is that view; [`DocumentSource`] hands out a
//! fresh one per topic so no reader state is shared between topics.

use crate::error::{Error, Result};
use crate::model::{Document, TextRun};

/// Read access to the pages of an open document.
pub trait PageSource {
    /// Number of pages in the document.
    fn page_count(&self) -> u32;

    /// Text runs of a page (1-indexed), in render order.
    fn page_runs(&self, page_num: u32) -> Result<Vec<TextRun>>;
}

/// Something that can open a document for reading.
pub trait DocumentSource: Send + Sync {
    /// Open a new, independent handle on the document.
    fn open(&self) -> Result<Box<dyn PageSource>>;

    /// Human-readable name for log messages.
    fn describe(&self) -> String {
        "document".to_string()
    }
}

impl PageSource for Document {
    fn page_count(&self) -> u32 {
        Document::page_count(self)
    }

    fn page_runs(&self, page_num: u32) -> Result<Vec<TextRun>> {
        self.get_page(page_num)
            .map(|page| page.runs.clone())
            .ok_or(Error::PageOutOfRange(page_num, Document::page_count(self)))
    }
}

impl DocumentSource for Document {
    fn open(&self) -> Result<Box<dyn PageSource>> {
        Ok(Box::new(self.clone()))
    }

    fn describe(&self) -> String {
        format!("in-memory document ({} pages)", Document::page_count(self))
    }
}

impl<S: PageSource + ?Sized> PageSource for &S {
    fn page_count(&self) -> u32 {
        (**self).page_count()
    }

    fn page_runs(&self, page_num: u32) -> Result<Vec<TextRun>> {
        (**self).page_runs(page_num)
    }
}

impl<S: PageSource + ?Sized> PageSource for Box<S> {
    fn page_count(&self) -> u32 {
        (**self).page_count()
    }

    fn page_runs(&self, page_num: u32) -> Result<Vec<TextRun>> {
        (**self).page_runs(page_num)
    }
}
