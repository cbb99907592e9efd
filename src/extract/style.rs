//! Bold detection from font metadata.

/// Font weight at and above which text counts as bold (semi-bold and up).
pub const BOLD_WEIGHT_THRESHOLD: f32 = 600.0;

/// Decides whether a run's font marks it as emphasized text.
///
/// Closures with the matching signature implement this trait, so a custom
/// heuristic can be injected without defining a type.
pub trait StyleClassifier: Send + Sync {
    /// Classify a font by name and optional descriptor weight.
    fn is_bold(&self, font_name: &str, font_weight: Option<f32>) -> bool;
}

impl<F> StyleClassifier for F
where
    F: Fn(&str, Option<f32>) -> bool + Send + Sync,
{
    fn is_bold(&self, font_name: &str, font_weight: Option<f32>) -> bool {
        self(font_name, font_weight)
    }
}

/// Name-or-weight classifier.
///
/// Either signal is sufficient: a font name containing "bold" (any case),
/// or a declared weight at or above the threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontStyleClassifier {
    /// Minimum `/FontWeight` treated as bold.
    pub weight_threshold: f32,
}

impl FontStyleClassifier {
    /// Create a classifier with the standard 600 threshold.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different weight threshold.
    pub fn with_weight_threshold(mut self, threshold: f32) -> Self {
        self.weight_threshold = threshold;
        self
    }
}

impl Default for FontStyleClassifier {
    fn default() -> Self {
        Self {
            weight_threshold: BOLD_WEIGHT_THRESHOLD,
        }
    }
}

impl StyleClassifier for FontStyleClassifier {
    fn is_bold(&self, font_name: &str, font_weight: Option<f32>) -> bool {
        font_name.to_lowercase().contains("bold")
            || font_weight.is_some_and(|w| w >= self.weight_threshold)
    }
}

/// Classify with the default [`FontStyleClassifier`].
pub fn is_bold(font_name: &str, font_weight: Option<f32>) -> bool {
    FontStyleClassifier::default().is_bold(font_name, font_weight)
}
