//! Batch processing of a topic list.
//!
//! For every topic the pipeline opens a fresh handle on the document, runs
//! the extraction stages, sends the excerpt followed by the prompt template
//! to the summarizer and writes the answer to `<output_dir>/<topic>.<ext>`.
//!
//! Lookup, collaborator and per-artifact write failures are recorded in the
//! [`ErrorReport`] and the batch moves on. Unreadable inputs and a missing
//! output directory abort it.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use tocdigest::pipeline::{BatchPipeline, PipelineOptions};
//! use tocdigest::summarize::DryRunSummarizer;
//!
//! fn main() -> tocdigest::Result<()> {
//!     let pipeline = BatchPipeline::new(PipelineOptions::default(), DryRunSummarizer);
//!     let report = pipeline.run_files(
//!         Path::new("topics.txt"),
//!         Path::new("catalog.pdf"),
//!         Path::new("prompt.txt"),
//!         Path::new("out"),
//!     )?;
//!     print!("{report}");
//!     Ok(())
//! }
//! ```

pub mod io;
mod options;
mod report;

pub use options::{ExistingArtifact, PipelineOptions, DEFAULT_ARTIFACT_EXTENSION};
pub use report::{ErrorReport, TopicFailure};

use std::path::{Path, PathBuf};

use crossbeam_channel::Sender;
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::extract::{StyleClassifier, TopicExtractor};
use crate::parser::PdfFile;
use crate::source::DocumentSource;
use crate::summarize::Summarizer;

/// Final state of one topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicStatus {
    /// Artifact written
    Succeeded,
    /// Artifact already present, left untouched
    Skipped,
    /// Recorded in the report
    Failed,
}

/// Progress notification sent while a batch runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    /// Work on a topic began.
    Started { index: usize, topic: String },
    /// Work on a topic ended.
    Finished {
        index: usize,
        topic: String,
        status: TopicStatus,
    },
}

enum TopicOutcome {
    Written,
    Skipped,
    Failed(Error),
}

impl TopicOutcome {
    fn status(&self) -> TopicStatus {
        match self {
            TopicOutcome::Written => TopicStatus::Succeeded,
            TopicOutcome::Skipped => TopicStatus::Skipped,
            TopicOutcome::Failed(_) => TopicStatus::Failed,
        }
    }
}

/// Excerpt followed directly by the template.
pub fn compose_prompt(excerpt: &str, template: &str) -> String {
    let mut prompt = String::with_capacity(excerpt.len() + template.len());
    prompt.push_str(excerpt);
    prompt.push_str(template);
    prompt
}

/// Runs extraction and summarization over a list of topics.
pub struct BatchPipeline<S: Summarizer> {
    options: PipelineOptions,
    extractor: TopicExtractor,
    summarizer: S,
    events: Option<Sender<PipelineEvent>>,
}

impl<S: Summarizer> BatchPipeline<S> {
    /// Create a pipeline.
    pub fn new(options: PipelineOptions, summarizer: S) -> Self {
        let extractor = options.extractor();
        Self {
            options,
            extractor,
            summarizer,
            events: None,
        }
    }

    /// Replace the bold classifier used for every topic.
    pub fn with_classifier(mut self, classifier: impl StyleClassifier + 'static) -> Self {
        self.extractor = self.extractor.with_classifier(classifier);
        self
    }

    /// Send progress events to `sender`.
    pub fn with_events(mut self, sender: Sender<PipelineEvent>) -> Self {
        self.events = Some(sender);
        self
    }

    /// The options in use.
    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Run the batch from files on disk.
    ///
    /// Reads the topic list and prompt template once, then processes the
    /// PDF at `pdf`.
    pub fn run_files(
        &self,
        topic_list: &Path,
        pdf: &Path,
        prompt_file: &Path,
        output_dir: &Path,
    ) -> Result<ErrorReport> {
        let topics = io::read_topics(topic_list)?;
        let prompt = io::read_prompt(prompt_file)?;
        let source = PdfFile::new(pdf).with_options(self.options.parse.clone());
        self.run(topics, &source, &prompt, output_dir)
    }

    /// Run the batch over `topics`.
    ///
    /// Topics are trimmed and blank ones dropped. Returns the report, or the
    /// first fatal error.
    pub fn run<I>(
        &self,
        topics: I,
        source: &dyn DocumentSource,
        prompt: &str,
        output_dir: &Path,
    ) -> Result<ErrorReport>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let topics: Vec<String> = topics
            .into_iter()
            .map(|t| t.as_ref().trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();

        let mut report = ErrorReport::new();
        io::prepare_output_dir(output_dir)?;

        // One open up front so a missing or corrupt document stops the run
        // before any topic is attempted.
        source.open().map_err(|e| Error::OpenDocument {
            path: PathBuf::from(source.describe()),
            reason: e.to_string(),
        })?;

        log::info!(
            "Processing {} topics from {} with {} worker(s)",
            topics.len(),
            source.describe(),
            self.options.workers
        );

        let process = |(index, topic): (usize, &String)| {
            self.emit(PipelineEvent::Started {
                index,
                topic: topic.clone(),
            });
            let outcome = self.process_topic(source, topic, prompt, output_dir);
            if let Ok(outcome) = &outcome {
                self.emit(PipelineEvent::Finished {
                    index,
                    topic: topic.clone(),
                    status: outcome.status(),
                });
            }
            outcome
        };

        let outcomes: Vec<TopicOutcome> = if self.options.workers > 1 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.options.workers)
                .build()
                .map_err(|e| Error::Other(format!("Failed to start worker pool: {e}")))?;
            // Collecting into a Result stops handing out topics after the
            // first fatal error.
            pool.install(|| {
                topics
                    .par_iter()
                    .enumerate()
                    .map(process)
                    .collect::<Result<Vec<_>>>()
            })?
        } else {
            let mut outcomes = Vec::with_capacity(topics.len());
            for item in topics.iter().enumerate() {
                outcomes.push(process(item)?);
            }
            outcomes
        };

        for (topic, outcome) in topics.iter().zip(outcomes) {
            match outcome {
                TopicOutcome::Written => report.record_success(),
                TopicOutcome::Skipped => report.record_skip(),
                TopicOutcome::Failed(err) => report.record_failure(topic.as_str(), &err),
            }
        }
        report.finish();

        log::info!(
            "Batch finished: {} succeeded, {} skipped, {} failed",
            report.succeeded,
            report.skipped,
            report.failed()
        );
        Ok(report)
    }

    /// Handle one topic. `Err` is reserved for fatal failures.
    fn process_topic(
        &self,
        source: &dyn DocumentSource,
        topic: &str,
        prompt: &str,
        output_dir: &Path,
    ) -> Result<TopicOutcome> {
        let path = io::artifact_path(output_dir, topic, &self.options.extension);
        if self.options.existing == ExistingArtifact::Skip && path.exists() {
            log::info!("{}: {} exists, skipping", topic, path.display());
            return Ok(TopicOutcome::Skipped);
        }

        let summary = match self.summarize_topic(source, topic, prompt) {
            Ok(summary) => summary,
            Err(err) if err.is_fatal() => return Err(err),
            Err(err) => {
                log::warn!("{}: {}", topic, err);
                return Ok(TopicOutcome::Failed(err));
            }
        };

        if let Err(source) = io::write_all(&path, &summary) {
            if !output_dir.is_dir() {
                return Err(Error::OutputDir {
                    path: output_dir.to_path_buf(),
                    source,
                });
            }
            let err = Error::WriteArtifact { path, source };
            log::warn!("{}: {}", topic, err);
            return Ok(TopicOutcome::Failed(err));
        }
        log::info!("{}: wrote {}", topic, path.display());
        Ok(TopicOutcome::Written)
    }

    fn summarize_topic(&self, source: &dyn DocumentSource, topic: &str, prompt: &str) -> Result<String> {
        let document = source.open()?;
        let excerpt = self.extractor.extract(document.as_ref(), topic)?;
        log::debug!("{}: excerpt has {} chars", topic, excerpt.text.chars().count());

        log::debug!("{}: calling {} ({})", topic, self.summarizer.name(), self.options.model);
        let summary = self
            .summarizer
            .generate(&self.options.model, &compose_prompt(&excerpt.text, prompt))?;
        Ok(summary.text)
    }

    fn emit(&self, event: PipelineEvent) {
        if let Some(sender) = &self.events {
            // A dropped receiver only means nobody is watching.
            let _ = sender.send(event);
        }
    }
}
