use crate::error::Result;

use super::{Summarizer, Summary};

/// Summarizer that returns the prompt unchanged.
///
/// Lets a batch run end to end without network access, leaving the exact
/// text that would have been sent in each artifact.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunSummarizer;

impl Summarizer for DryRunSummarizer {
    fn generate(&self, model: &str, prompt: &str) -> Result<Summary> {
        Ok(Summary::new(prompt, model))
    }

    fn name(&self) -> &str {
        "dry-run"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dry_run_echoes_prompt() {
        let summary = DryRunSummarizer.generate("m", "HEADING\nSummarize").unwrap();
        assert_eq!(summary.text, "HEADING\nSummarize");
        assert_eq!(summary.model, "m");
    }
}
