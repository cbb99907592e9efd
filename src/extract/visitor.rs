//! Visitor pattern over the text runs of a page range.
//!
//! [`walk_pages`] drives the traversal; a [`RunVisitor`] decides what to
//! keep. Page order and in-page render order are always preserved.
//!
//! # Example
//!
//! ```
//! use tocdigest::extract::visitor::{walk_pages, RunVisitor, VisitorAction};
//! use tocdigest::model::{Document, Page, TextRun};
//!
//! struct CountRuns(usize);
//!
//! impl RunVisitor for CountRuns {
//!     fn visit_run(&mut self, _page: u32, _run: &TextRun) -> VisitorAction {
//!         self.0 += 1;
//!         VisitorAction::Continue
//!     }
//! }
//!
//! let doc = Document::from_pages(vec![Page::with_runs(1, vec![TextRun::new("x", "Arial", None)])]);
//! let mut counter = CountRuns(0);
//! walk_pages(&doc, 1..=1, &mut counter).unwrap();
//! assert_eq!(counter.0, 1);
//! ```

use std::ops::RangeInclusive;

use crate::error::Result;
use crate::model::TextRun;
use crate::source::PageSource;

/// Action returned by visitor methods to control the traversal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VisitorAction {
    /// Keep going.
    #[default]
    Continue,

    /// Skip the rest of the current page.
    SkipPage,

    /// Stop the traversal entirely.
    Stop,
}

/// Trait for visiting text runs in document order.
pub trait RunVisitor {
    /// Called at the start of each page.
    fn on_page_start(&mut self, page_number: u32) -> VisitorAction {
        let _ = page_number;
        VisitorAction::Continue
    }

    /// Called for every run on the page, in render order.
    fn visit_run(&mut self, page_number: u32, run: &TextRun) -> VisitorAction;

    /// Called after the last run of a page.
    fn on_page_end(&mut self, page_number: u32) -> VisitorAction {
        let _ = page_number;
        VisitorAction::Continue
    }
}

/// Visit every run of every page in `pages`, in order.
///
/// Pages outside the document are silently skipped, so callers may pass
/// an unclamped range.
pub fn walk_pages<S, V>(source: &S, pages: RangeInclusive<u32>, visitor: &mut V) -> Result<()>
where
    S: PageSource + ?Sized,
    V: RunVisitor + ?Sized,
{
    let last = (*pages.end()).min(source.page_count());
    let first = (*pages.start()).max(1);

    for page_number in first..=last {
        match visitor.on_page_start(page_number) {
            VisitorAction::Stop => return Ok(()),
            VisitorAction::SkipPage => continue,
            VisitorAction::Continue => {}
        }

        for run in &source.page_runs(page_number)? {
            match visitor.visit_run(page_number, run) {
                VisitorAction::Stop => return Ok(()),
                VisitorAction::SkipPage => break,
                VisitorAction::Continue => {}
            }
        }

        if visitor.on_page_end(page_number) == VisitorAction::Stop {
            return Ok(());
        }
    }

    Ok(())
}
