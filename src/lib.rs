//! # tocdigest
//!
//! Topic summaries from catalog-style PDFs.
//!
//! Given a topic name, the library finds the document's table of contents,
//! looks up the page listed for the topic, collects the bold headings on
//! the pages around it and hands them to a text-generation service together
//! with a prompt template. A batch pipeline does this for a whole topic
//! list and reports which topics could not be processed.
//!
//! ## Quick Start
//!
//! ```no_run
//! use tocdigest::{extract_topic, TopicExtractor, TocLocator};
//!
//! fn main() -> tocdigest::Result<()> {
//!     let excerpt = extract_topic("catalog.pdf", "Computer Science")?;
//!     println!("page {}: {}", excerpt.page, excerpt.text);
//!
//!     // English catalogs use a different heading.
//!     let extractor = TopicExtractor::new().with_locator(TocLocator::new("Contents"));
//!     let doc = tocdigest::parse_file("catalog-en.pdf")?;
//!     let excerpt = extractor.extract(&doc, "Physics")?;
//!     println!("{}", excerpt.text);
//!     Ok(())
//! }
//! ```
//!
//! ## Layout
//!
//! - [`parser`]: PDF access through lopdf, yielding positioned text runs
//! - [`extract`]: table-of-contents lookup, page resolution, bold extraction
//! - [`summarize`]: the summarizer collaborator (Gemini, dry run)
//! - [`pipeline`]: batch processing with per-topic error isolation

pub mod error;
pub mod extract;
pub mod model;
pub mod parser;
pub mod pipeline;
pub mod source;
pub mod summarize;

// Re-export commonly used types
pub use error::{Error, ErrorKind, Result};
pub use extract::{
    extract_bold, is_bold, locate_toc, resolve_page, ExtractionWindow, FontStyleClassifier,
    StyleClassifier, TocLocator, TopicExcerpt, TopicExtractor,
};
pub use model::{Document, Metadata, Page, TextRun};
pub use parser::{ErrorMode, ParseOptions, PdfFile, PdfParser};
pub use pipeline::{BatchPipeline, ErrorReport, ExistingArtifact, PipelineEvent, PipelineOptions};
pub use source::{DocumentSource, PageSource};
pub use summarize::{DryRunSummarizer, GeminiClient, GeminiConfig, Summarizer, Summary};

use std::path::Path;

/// Parse a PDF file into an in-memory document.
///
/// # Example
///
/// ```no_run
/// use tocdigest::parse_file;
///
/// let doc = parse_file("catalog.pdf").unwrap();
/// println!("Pages: {}", doc.page_count());
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    PdfParser::open(path)?.parse()
}

/// Parse a PDF file with custom options.
pub fn parse_file_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Document> {
    PdfParser::open_with_options(path, options)?.parse()
}

/// Parse a PDF from bytes.
pub fn parse_bytes(data: &[u8]) -> Result<Document> {
    PdfParser::from_bytes(data)?.parse()
}

/// Run the extraction stages for one topic with default settings.
///
/// Pages are read lazily; only the table-of-contents prefix and the
/// extraction window are decoded.
///
/// # Example
///
/// ```no_run
/// use tocdigest::extract_topic;
///
/// let excerpt = extract_topic("catalog.pdf", "מדעי המחשב").unwrap();
/// println!("{:?} {}", excerpt.window, excerpt.text);
/// ```
pub fn extract_topic<P: AsRef<Path>>(path: P, topic: &str) -> Result<TopicExcerpt> {
    let parser = PdfParser::open(path)?;
    TopicExtractor::new().extract(&parser, topic)
}
