//! Topic extraction core.
//!
//! Three stages run per topic:
//!
//! 1. [`toc`] finds the table-of-contents page by its heading,
//! 2. [`resolve`] maps the topic to the page number listed there,
//! 3. [`bold`] keeps only the emphasized runs of a few pages around it.
//!
//! [`TopicExtractor`] chains them.

pub mod bold;
pub mod resolve;
pub mod style;
pub mod toc;
pub mod visitor;

use std::sync::Arc;

use serde::Serialize;

use crate::error::Result;
use crate::source::PageSource;

pub use bold::{extract_bold, BoldCollector, ExtractionWindow, DEFAULT_PAGES_AFTER, DEFAULT_PAGES_BEFORE};
pub use resolve::{resolve_line, resolve_page};
pub use style::{is_bold, FontStyleClassifier, StyleClassifier, BOLD_WEIGHT_THRESHOLD};
pub use toc::{locate_toc, TocLocator, DEFAULT_TOC_MARKER, DEFAULT_TOC_PAGE_LIMIT};
pub use visitor::{walk_pages, RunVisitor, VisitorAction};

/// What the extraction stages produced for one topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicExcerpt {
    /// The topic as given.
    pub topic: String,
    /// Page number listed in the table of contents.
    pub page: i64,
    /// Pages actually read, `None` if the page lies outside the document.
    pub window: Option<ExtractionWindow>,
    /// Concatenated bold text, possibly empty.
    pub text: String,
}

/// Runs locate → resolve → extract for a topic.
#[derive(Clone)]
pub struct TopicExtractor {
    locator: TocLocator,
    pages_before: u32,
    pages_after: u32,
    classifier: Arc<dyn StyleClassifier>,
}

impl std::fmt::Debug for TopicExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TopicExtractor")
            .field("locator", &self.locator)
            .field("pages_before", &self.pages_before)
            .field("pages_after", &self.pages_after)
            .finish_non_exhaustive()
    }
}

impl Default for TopicExtractor {
    fn default() -> Self {
        Self {
            locator: TocLocator::default(),
            pages_before: DEFAULT_PAGES_BEFORE,
            pages_after: DEFAULT_PAGES_AFTER,
            classifier: Arc::new(FontStyleClassifier::default()),
        }
    }
}

impl TopicExtractor {
    /// Create an extractor with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the table-of-contents locator.
    pub fn with_locator(mut self, locator: TocLocator) -> Self {
        self.locator = locator;
        self
    }

    /// Set how many pages to read before and after the resolved page.
    pub fn with_window(mut self, before: u32, after: u32) -> Self {
        self.pages_before = before;
        self.pages_after = after;
        self
    }

    /// Replace the bold classifier.
    pub fn with_classifier(mut self, classifier: impl StyleClassifier + 'static) -> Self {
        self.classifier = Arc::new(classifier);
        self
    }

    /// The table-of-contents locator in use.
    pub fn locator(&self) -> &TocLocator {
        &self.locator
    }

    /// Compute the window around a resolved page.
    pub fn window(&self, page: i64, page_count: u32) -> Option<ExtractionWindow> {
        ExtractionWindow::around(page, self.pages_before, self.pages_after, page_count)
    }

    /// Run all three stages for `topic`.
    pub fn extract<S: PageSource + ?Sized>(&self, source: &S, topic: &str) -> Result<TopicExcerpt> {
        let toc_text = self.locator.locate(source)?;
        let page = resolve_page(&toc_text, topic)?;
        let window = self.window(page, source.page_count());
        log::info!(
            "{}: listed on page {}, reading {}",
            topic,
            page,
            window.map_or_else(|| "no pages".to_string(), |w| format!("pages {w}"))
        );

        let text = extract_bold(source, window, self.classifier.as_ref())?;
        Ok(TopicExcerpt {
            topic: topic.to_string(),
            page,
            window,
            text,
        })
    }
}
