//! Batch configuration.

use crate::extract::{
    TocLocator, TopicExtractor, DEFAULT_PAGES_AFTER, DEFAULT_PAGES_BEFORE, DEFAULT_TOC_MARKER,
    DEFAULT_TOC_PAGE_LIMIT,
};
use crate::parser::ParseOptions;
use crate::summarize::DEFAULT_MODEL;

/// Extension given to artifact files by default.
pub const DEFAULT_ARTIFACT_EXTENSION: &str = "txt";

/// Options for a batch run.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Heading that identifies the table-of-contents page
    pub toc_marker: String,

    /// Last page searched for the heading
    pub toc_page_limit: u32,

    /// Pages read before the resolved page
    pub pages_before: u32,

    /// Pages read after the resolved page
    pub pages_after: u32,

    /// Summarizer model identifier
    pub model: String,

    /// Artifact file extension, empty for bare topic names
    pub extension: String,

    /// What to do when an artifact already exists
    pub existing: ExistingArtifact,

    /// Number of topics processed concurrently (1 = sequential)
    pub workers: usize,

    /// Options used whenever the PDF is opened
    pub parse: ParseOptions,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            toc_marker: DEFAULT_TOC_MARKER.to_string(),
            toc_page_limit: DEFAULT_TOC_PAGE_LIMIT,
            pages_before: DEFAULT_PAGES_BEFORE,
            pages_after: DEFAULT_PAGES_AFTER,
            model: DEFAULT_MODEL.to_string(),
            extension: DEFAULT_ARTIFACT_EXTENSION.to_string(),
            existing: ExistingArtifact::default(),
            workers: 1,
            parse: ParseOptions::default(),
        }
    }
}

impl PipelineOptions {
    /// Create new pipeline options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the table-of-contents heading.
    pub fn with_toc_marker(mut self, marker: impl Into<String>) -> Self {
        self.toc_marker = marker.into();
        self
    }

    /// Set how many leading pages are searched for the heading.
    pub fn with_toc_page_limit(mut self, limit: u32) -> Self {
        self.toc_page_limit = limit;
        self
    }

    /// Set the extraction window around the resolved page.
    pub fn with_window(mut self, before: u32, after: u32) -> Self {
        self.pages_before = before;
        self.pages_after = after;
        self
    }

    /// Set the summarizer model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the artifact extension (without the dot).
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into().trim_start_matches('.').to_string();
        self
    }

    /// Set the existing-artifact policy.
    pub fn with_existing(mut self, existing: ExistingArtifact) -> Self {
        self.existing = existing;
        self
    }

    /// Skip topics whose artifact already exists.
    pub fn skip_existing(mut self) -> Self {
        self.existing = ExistingArtifact::Skip;
        self
    }

    /// Set the number of concurrent workers. Zero is treated as one.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Set PDF parse options.
    pub fn with_parse_options(mut self, parse: ParseOptions) -> Self {
        self.parse = parse;
        self
    }

    /// Build the extractor these options describe.
    pub fn extractor(&self) -> TopicExtractor {
        TopicExtractor::new()
            .with_locator(TocLocator::new(self.toc_marker.clone()).with_page_limit(self.toc_page_limit))
            .with_window(self.pages_before, self.pages_after)
    }
}

/// Policy for artifacts left by an earlier run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExistingArtifact {
    /// Regenerate and overwrite
    #[default]
    Overwrite,
    /// Leave the file alone and count the topic as skipped
    Skip,
}
