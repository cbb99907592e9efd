//! Page-level types.

use super::{TextJoiner, TextRun};
use serde::{Deserialize, Serialize};

/// A single page in the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Page number (1-indexed)
    pub number: u32,

    /// Text runs in render order
    pub runs: Vec<TextRun>,
}

impl Page {
    /// Create an empty page.
    pub fn new(number: u32) -> Self {
        Self {
            number,
            runs: Vec::new(),
        }
    }

    /// Create a page from runs.
    pub fn with_runs(number: u32, runs: Vec<TextRun>) -> Self {
        Self { number, runs }
    }

    /// Add a run to the page.
    pub fn add_run(&mut self, run: TextRun) {
        self.runs.push(run);
    }

    /// Get the text of the page, runs in render order.
    pub fn plain_text(&self) -> String {
        let mut joiner = TextJoiner::new();
        for run in &self.runs {
            joiner.push(run);
        }
        joiner.finish()
    }

    /// Check if the page has no runs.
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Get the number of runs on the page.
    pub fn run_count(&self) -> usize {
        self.runs.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_plain_text() {
        let mut page = Page::new(3);
        page.add_run(TextRun::new("Table of ", "Arial", None).at(0.0, 700.0));
        page.add_run(TextRun::new("Contents", "Arial-Bold", None).at(60.0, 700.0));
        page.add_run(TextRun::new("Physics 12", "Arial", None).at(0.0, 680.0));

        assert_eq!(page.plain_text(), "Table of Contents\nPhysics 12");
        assert_eq!(page.run_count(), 3);
        assert!(!page.is_empty());
    }
}
