//! Summarizer collaborators.
//!
//! The pipeline hands each excerpt, followed by the prompt template, to a
//! [`Summarizer`] and stores whatever text comes back.

mod dry_run;
mod gemini;

pub use dry_run::DryRunSummarizer;
pub use gemini::{GeminiClient, GeminiConfig, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT};

use crate::error::Result;

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Text returned by a summarizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    /// The generated text.
    pub text: String,
    /// Model that produced it.
    pub model: String,
}

impl Summary {
    /// Create a summary.
    pub fn new(text: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            model: model.into(),
        }
    }
}

/// A generative text service.
///
/// Implementations must be shareable across worker threads; transport,
/// quota and timeout failures are reported as errors, never panics.
pub trait Summarizer: Send + Sync {
    /// Generate a response for `prompt` with `model`.
    fn generate(&self, model: &str, prompt: &str) -> Result<Summary>;

    /// Name used in logs.
    fn name(&self) -> &str;
}

impl<S: Summarizer + ?Sized> Summarizer for &S {
    fn generate(&self, model: &str, prompt: &str) -> Result<Summary> {
        (**self).generate(model, prompt)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<S: Summarizer + ?Sized> Summarizer for Box<S> {
    fn generate(&self, model: &str, prompt: &str) -> Result<Summary> {
        (**self).generate(model, prompt)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
