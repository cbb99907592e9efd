//! Bold-run extraction over a page window.

use std::ops::RangeInclusive;

use serde::Serialize;

use crate::error::Result;
use crate::model::{TextJoiner, TextRun};
use crate::source::PageSource;

use super::style::StyleClassifier;
use super::visitor::{walk_pages, RunVisitor, VisitorAction};

/// Pages read before the resolved page.
pub const DEFAULT_PAGES_BEFORE: u32 = 2;

/// Pages read after the resolved page.
pub const DEFAULT_PAGES_AFTER: u32 = 1;

/// A page range clamped to the document, always `first <= last`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExtractionWindow {
    pub first: u32,
    pub last: u32,
}

impl ExtractionWindow {
    /// Window `[page - before, page + after]` clamped to `[1, page_count]`.
    ///
    /// Returns `None` when nothing of the window lies inside the document.
    pub fn around(page: i64, before: u32, after: u32, page_count: u32) -> Option<Self> {
        if page_count == 0 {
            return None;
        }
        let start = page.saturating_sub(i64::from(before));
        let end = page.saturating_add(i64::from(after));
        if end < 1 || start > i64::from(page_count) {
            return None;
        }

        Some(Self {
            first: start.max(1) as u32,
            last: end.min(i64::from(page_count)) as u32,
        })
    }

    /// The default `[page - 2, page + 1]` window.
    pub fn standard(page: i64, page_count: u32) -> Option<Self> {
        Self::around(page, DEFAULT_PAGES_BEFORE, DEFAULT_PAGES_AFTER, page_count)
    }

    /// Number of pages covered.
    pub fn page_count(&self) -> u32 {
        self.last - self.first + 1
    }

    /// The window as an inclusive range.
    pub fn pages(&self) -> RangeInclusive<u32> {
        self.first..=self.last
    }
}

impl std::fmt::Display for ExtractionWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.first, self.last)
    }
}

/// Collects runs accepted by a [`StyleClassifier`].
pub struct BoldCollector<'a, C: StyleClassifier + ?Sized> {
    classifier: &'a C,
    text: TextJoiner,
    kept: usize,
    page_break: bool,
}

impl<'a, C: StyleClassifier + ?Sized> BoldCollector<'a, C> {
    /// Create a collector around a classifier.
    pub fn new(classifier: &'a C) -> Self {
        Self {
            classifier,
            text: TextJoiner::new(),
            kept: 0,
            page_break: false,
        }
    }

    /// Number of runs kept so far.
    pub fn kept(&self) -> usize {
        self.kept
    }

    /// The collected text.
    pub fn finish(self) -> String {
        self.text.finish()
    }
}

impl<C: StyleClassifier + ?Sized> RunVisitor for BoldCollector<'_, C> {
    // The break is written with the next kept run, so pages without bold
    // text add nothing.
    fn on_page_start(&mut self, _page_number: u32) -> VisitorAction {
        self.page_break = true;
        VisitorAction::Continue
    }

    fn visit_run(&mut self, _page_number: u32, run: &TextRun) -> VisitorAction {
        if self.classifier.is_bold(&run.font_name, run.font_weight) {
            if std::mem::take(&mut self.page_break) {
                self.text.break_line();
            }
            self.text.push(run);
            self.kept += 1;
        }
        VisitorAction::Continue
    }
}

/// Concatenate the bold runs in `window`, in document order.
///
/// A missing window, or one without bold runs, yields an empty string.
pub fn extract_bold<S, C>(source: &S, window: Option<ExtractionWindow>, classifier: &C) -> Result<String>
where
    S: PageSource + ?Sized,
    C: StyleClassifier + ?Sized,
{
    let Some(window) = window else {
        return Ok(String::new());
    };

    let mut collector = BoldCollector::new(classifier);
    walk_pages(source, window.pages(), &mut collector)?;
    log::debug!(
        "Kept {} bold runs from pages {}",
        collector.kept(),
        window
    );
    Ok(collector.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::style::FontStyleClassifier;
    use crate::model::{Document, Page};

    #[test]
    fn test_window_interior() {
        let w = ExtractionWindow::standard(42, 300).unwrap();
        assert_eq!((w.first, w.last), (40, 43));
        assert_eq!(w.page_count(), 4);
    }

    #[test]
    fn test_window_clamped_at_start() {
        let w = ExtractionWindow::standard(1, 10).unwrap();
        assert_eq!((w.first, w.last), (1, 2));
    }

    #[test]
    fn test_window_clamped_at_end() {
        let w = ExtractionWindow::standard(10, 10).unwrap();
        assert_eq!(w.pages(), 8..=10);
    }

    #[test]
    fn test_window_outside_document() {
        assert!(ExtractionWindow::standard(-5, 10).is_none());
        assert!(ExtractionWindow::standard(13, 10).is_none());
        assert!(ExtractionWindow::standard(5, 0).is_none());
        // Partially overlapping windows survive.
        assert_eq!(ExtractionWindow::standard(0, 10).map(|w| w.pages()), Some(1..=1));
        assert_eq!(ExtractionWindow::standard(12, 10).map(|w| w.pages()), Some(10..=10));
    }

    #[test]
    fn test_extract_keeps_only_bold_runs() {
        let doc = Document::from_pages(vec![Page::with_runs(
            1,
            vec![
                TextRun::new("Intro", "Arial", None),
                TextRun::new("HEADING", "Arial-Bold", None),
            ],
        )]);

        let text = extract_bold(&doc, ExtractionWindow::standard(1, 1), &FontStyleClassifier::default()).unwrap();
        assert_eq!(text, "HEADING");
    }

    #[test]
    fn test_extract_joins_pages_in_order() {
        let doc = Document::from_pages(vec![
            Page::with_runs(1, vec![TextRun::new("skip", "Arial-Bold", None)]),
            Page::with_runs(
                2,
                vec![
                    TextRun::new("Major", "Arial", Some(700.0)).at(0.0, 700.0),
                    TextRun::new(" Requirements", "Arial", Some(700.0)).at(50.0, 700.0),
                    TextRun::new("body", "Arial", Some(400.0)).at(0.0, 680.0),
                    TextRun::new("Electives", "Arial-Bold", None).at(0.0, 660.0),
                ],
            ),
            Page::with_runs(3, vec![TextRun::new("Year 2", "Times-Bold", None)]),
        ]);

        let window = ExtractionWindow { first: 2, last: 3 };
        let text = extract_bold(&doc, Some(window), &FontStyleClassifier::default()).unwrap();
        assert_eq!(text, "Major Requirements\nElectives\nYear 2");
    }

    #[test]
    fn test_pages_without_bold_add_no_break() {
        let doc = Document::from_pages(vec![
            Page::with_runs(1, vec![TextRun::new("HEADING", "Arial-Bold", None)]),
            Page::with_runs(2, vec![TextRun::new("body", "Arial", None)]),
            Page::with_runs(3, vec![TextRun::new("more body", "Arial", None)]),
        ]);
        let classifier = FontStyleClassifier::default();

        let window = ExtractionWindow { first: 1, last: 2 };
        assert_eq!(extract_bold(&doc, Some(window), &classifier).unwrap(), "HEADING");

        // A bold-free page between bold pages still yields a single break.
        let doc = Document::from_pages(vec![
            Page::with_runs(1, vec![TextRun::new("A", "Arial-Bold", None)]),
            Page::with_runs(2, vec![TextRun::new("body", "Arial", None)]),
            Page::with_runs(3, vec![TextRun::new("B", "Arial-Bold", None)]),
        ]);
        let window = ExtractionWindow { first: 1, last: 3 };
        assert_eq!(extract_bold(&doc, Some(window), &classifier).unwrap(), "A\nB");
    }

    #[test]
    fn test_extract_empty_cases() {
        let doc = Document::from_pages(vec![Page::with_runs(
            1,
            vec![TextRun::new("plain", "Arial", None)],
        )]);
        let classifier = FontStyleClassifier::default();

        assert_eq!(extract_bold(&doc, None, &classifier).unwrap(), "");
        assert_eq!(
            extract_bold(&doc, ExtractionWindow::standard(1, 1), &classifier).unwrap(),
            ""
        );
    }

    #[test]
    fn test_injected_classifier() {
        let doc = Document::from_pages(vec![Page::with_runs(
            1,
            vec![
                TextRun::new("a", "Frutiger-Heavy", None),
                TextRun::new("b", "Frutiger-Bold", None),
            ],
        )]);
        let heavy = |name: &str, _: Option<f32>| name.ends_with("Heavy");
        let text = extract_bold(&doc, ExtractionWindow::standard(1, 1), &heavy).unwrap();
        assert_eq!(text, "a");
    }
}
