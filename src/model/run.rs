//! Positioned text runs.

use serde::{Deserialize, Serialize};

/// Vertical distance (in points) under which two runs share a baseline.
pub const BASELINE_TOLERANCE: f32 = 1.0;

/// A piece of text rendered with a single font at one position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    /// The decoded text
    pub text: String,

    /// Font name as declared by the PDF (e.g., "ABCDEF+Arial-BoldMT")
    pub font_name: String,

    /// `/FontWeight` from the font descriptor, when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<f32>,

    /// Effective font size in points
    pub font_size: f32,

    /// X position (left edge)
    pub x: f32,

    /// Y position (baseline)
    pub y: f32,
}

impl TextRun {
    /// Create a run at the origin with a 12pt size.
    pub fn new(text: impl Into<String>, font_name: impl Into<String>, font_weight: Option<f32>) -> Self {
        Self {
            text: text.into(),
            font_name: font_name.into(),
            font_weight,
            font_size: 12.0,
            x: 0.0,
            y: 0.0,
        }
    }

    /// Set the run position.
    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Set the font size.
    pub fn with_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    /// Whether `other` sits on the same baseline as this run.
    pub fn same_line(&self, other: &TextRun) -> bool {
        (self.y - other.y).abs() <= BASELINE_TOLERANCE
    }
}

/// Joins runs into text, breaking lines where the baseline moves.
///
/// Runs that share a baseline are concatenated with no separator, so the
/// output carries only the spacing present in the source text.
#[derive(Debug, Default)]
pub struct TextJoiner {
    buffer: String,
    last_y: Option<f32>,
}

impl TextJoiner {
    /// Create an empty joiner.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a run.
    pub fn push(&mut self, run: &TextRun) {
        if let Some(y) = self.last_y {
            if (y - run.y).abs() > BASELINE_TOLERANCE && !self.buffer.ends_with('\n') {
                self.buffer.push('\n');
            }
        }
        self.buffer.push_str(&run.text);
        self.last_y = Some(run.y);
    }

    /// Force a line break (used between pages).
    pub fn break_line(&mut self) {
        if !self.buffer.is_empty() && !self.buffer.ends_with('\n') {
            self.buffer.push('\n');
        }
        self.last_y = None;
    }

    /// Whether nothing has been appended yet.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Consume the joiner and return the text.
    pub fn finish(self) -> String {
        self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_baseline_concatenates() {
        let mut joiner = TextJoiner::new();
        joiner.push(&TextRun::new("Comp", "Arial", None).at(10.0, 700.0));
        joiner.push(&TextRun::new("uter", "Arial", None).at(40.0, 700.4));
        assert_eq!(joiner.finish(), "Computer");
    }

    #[test]
    fn test_new_baseline_breaks_line() {
        let mut joiner = TextJoiner::new();
        joiner.push(&TextRun::new("Intro ... 5", "Arial", None).at(10.0, 700.0));
        joiner.push(&TextRun::new("Physics ... 9", "Arial", None).at(10.0, 686.0));
        assert_eq!(joiner.finish(), "Intro ... 5\nPhysics ... 9");
    }

    #[test]
    fn test_break_line_between_pages() {
        let mut joiner = TextJoiner::new();
        joiner.break_line();
        assert!(joiner.is_empty());

        joiner.push(&TextRun::new("A", "Arial", None));
        joiner.break_line();
        joiner.push(&TextRun::new("B", "Arial", None));
        assert_eq!(joiner.finish(), "A\nB");
    }
}
