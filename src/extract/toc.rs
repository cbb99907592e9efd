//! Table-of-contents page location.

use unicode_normalization::UnicodeNormalization;

use crate::error::{Error, Result};
use crate::model::{TextJoiner, TextRun};
use crate::source::PageSource;

use super::visitor::{walk_pages, RunVisitor, VisitorAction};

/// Heading that opens the table of contents in Hebrew catalogs.
pub const DEFAULT_TOC_MARKER: &str = "תוכן העניינים";

/// Number of leading pages searched for the marker.
pub const DEFAULT_TOC_PAGE_LIMIT: u32 = 9;

/// Finds the table-of-contents page by scanning a bounded prefix of the
/// document for a heading string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocLocator {
    /// Text that identifies the table-of-contents page.
    pub marker: String,
    /// Last page (inclusive) to search.
    pub page_limit: u32,
}

impl Default for TocLocator {
    fn default() -> Self {
        Self {
            marker: DEFAULT_TOC_MARKER.to_string(),
            page_limit: DEFAULT_TOC_PAGE_LIMIT,
        }
    }
}

impl TocLocator {
    /// Create a locator for a marker with the default page limit.
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            ..Self::default()
        }
    }

    /// Set the search page limit.
    pub fn with_page_limit(mut self, limit: u32) -> Self {
        self.page_limit = limit;
        self
    }

    /// Return the full text of the first page containing the marker.
    pub fn locate<S: PageSource + ?Sized>(&self, source: &S) -> Result<String> {
        locate_toc(source, &self.marker, self.page_limit)
    }
}

/// Return the text of the first page in `1..=page_limit` that contains
/// `marker`.
///
/// Fails with [`Error::TocNotFound`] if no page in the window matches.
pub fn locate_toc<S: PageSource + ?Sized>(source: &S, marker: &str, page_limit: u32) -> Result<String> {
    let mut finder = MarkerFinder::new(marker);
    walk_pages(source, 1..=page_limit, &mut finder)?;

    match finder.found {
        Some((page, text)) => {
            log::debug!("Table of contents found on page {}", page);
            Ok(text)
        }
        None => Err(Error::TocNotFound {
            marker: marker.to_string(),
            pages_searched: page_limit.min(source.page_count()),
        }),
    }
}

/// Collects each page's text and stops on the first page with the marker.
struct MarkerFinder {
    marker: String,
    page: TextJoiner,
    found: Option<(u32, String)>,
}

impl MarkerFinder {
    fn new(marker: &str) -> Self {
        Self {
            marker: marker.nfc().collect(),
            page: TextJoiner::new(),
            found: None,
        }
    }
}

impl RunVisitor for MarkerFinder {
    fn on_page_start(&mut self, _page_number: u32) -> VisitorAction {
        self.page = TextJoiner::new();
        VisitorAction::Continue
    }

    fn visit_run(&mut self, _page_number: u32, run: &TextRun) -> VisitorAction {
        self.page.push(run);
        VisitorAction::Continue
    }

    fn on_page_end(&mut self, page_number: u32) -> VisitorAction {
        let text = std::mem::take(&mut self.page).finish();
        let normalized: String = text.nfc().collect();
        if normalized.contains(&self.marker) {
            self.found = Some((page_number, text));
            VisitorAction::Stop
        } else {
            VisitorAction::Continue
        }
    }
}
