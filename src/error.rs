//! Error types for tocdigest.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Result type alias for tocdigest operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Broad classification of an [`Error`].
///
/// The batch pipeline uses this to decide whether a failure is recorded
/// against a single topic or aborts the whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Expected-possible lookup miss (marker, topic or page number absent).
    NotFound,
    /// The PDF library, the summarizer or the file system failed for one topic.
    Collaborator,
    /// The run cannot continue (inputs unreadable, output unwritable).
    Fatal,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorKind::NotFound => "not found",
            ErrorKind::Collaborator => "collaborator",
            ErrorKind::Fatal => "fatal",
        };
        f.write_str(name)
    }
}

/// Error types that can occur while extracting and summarizing topics.
#[derive(Error, Debug)]
pub enum Error {
    /// No page within the search limit contains the table-of-contents marker.
    #[error("Table of contents marker {marker:?} not found in the first {pages_searched} pages")]
    TocNotFound { marker: String, pages_searched: u32 },

    /// No table-of-contents line contains the topic.
    #[error("Topic {0:?} not found in the table of contents")]
    TopicNotFound(String),

    /// The matching table-of-contents line carries no number.
    #[error("No page number on the table of contents line for {topic:?}: {line:?}")]
    PageNumberMissing { topic: String, line: String },

    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error parsing PDF structure or content streams.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted.
    #[error("Document is encrypted")]
    Encrypted,

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// The summarizer rejected the request or returned garbage.
    #[error("Summarizer error: {0}")]
    Summarizer(String),

    /// The summarizer did not answer in time.
    #[error("Summarizer timed out after {0:?}")]
    Timeout(Duration),

    /// The summarizer answered without any text.
    #[error("Summarizer returned no text{}", .0.as_deref().map(|r| format!(" ({r})")).unwrap_or_default())]
    EmptyResponse(Option<String>),

    /// The topic list could not be read.
    #[error("Cannot read topic list {}: {source}", path.display())]
    TopicList { path: PathBuf, source: io::Error },

    /// The prompt template could not be read.
    #[error("Cannot read prompt template {}: {source}", path.display())]
    PromptTemplate { path: PathBuf, source: io::Error },

    /// The output directory could not be created.
    #[error("Cannot prepare output directory {}: {source}", path.display())]
    OutputDir { path: PathBuf, source: io::Error },

    /// One topic's artifact could not be written (bad file name, for one).
    #[error("Cannot write {}: {source}", path.display())]
    WriteArtifact { path: PathBuf, source: io::Error },

    /// The source document could not be opened at all.
    #[error("Cannot open source document {}: {reason}", path.display())]
    OpenDocument { path: PathBuf, reason: String },

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::TocNotFound { .. } | Error::TopicNotFound(_) | Error::PageNumberMissing { .. } => {
                ErrorKind::NotFound
            }
            Error::TopicList { .. }
            | Error::PromptTemplate { .. }
            | Error::OutputDir { .. }
            | Error::OpenDocument { .. } => ErrorKind::Fatal,
            Error::Io(_)
            | Error::WriteArtifact { .. }
            | Error::PdfParse(_)
            | Error::Encrypted
            | Error::PageOutOfRange(..)
            | Error::Summarizer(_)
            | Error::Timeout(_)
            | Error::EmptyResponse(_)
            | Error::Other(_) => ErrorKind::Collaborator,
        }
    }

    /// Whether this error should abort the whole batch.
    pub fn is_fatal(&self) -> bool {
        self.kind() == ErrorKind::Fatal
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::TopicNotFound("Biology".to_string());
        assert_eq!(
            err.to_string(),
            "Topic \"Biology\" not found in the table of contents"
        );

        let err = Error::PageOutOfRange(10, 5);
        assert_eq!(
            err.to_string(),
            "Page 10 is out of range (document has 5 pages)"
        );

        assert_eq!(
            Error::EmptyResponse(Some("SAFETY".into())).to_string(),
            "Summarizer returned no text (SAFETY)"
        );
        assert_eq!(
            Error::EmptyResponse(None).to_string(),
            "Summarizer returned no text"
        );
    }

    #[test]
    fn test_error_kinds() {
        let not_found = Error::TocNotFound {
            marker: "Contents".into(),
            pages_searched: 9,
        };
        assert_eq!(not_found.kind(), ErrorKind::NotFound);
        assert!(!not_found.is_fatal());

        assert_eq!(
            Error::Summarizer("quota".into()).kind(),
            ErrorKind::Collaborator
        );
        assert_eq!(
            Error::Timeout(Duration::from_secs(5)).kind(),
            ErrorKind::Collaborator
        );

        let fatal = Error::TopicList {
            path: PathBuf::from("topics.txt"),
            source: io::Error::new(io::ErrorKind::NotFound, "missing"),
        };
        assert!(fatal.is_fatal());

        let artifact = Error::WriteArtifact {
            path: PathBuf::from("out/topic.txt"),
            source: io::Error::new(io::ErrorKind::Other, "File name too long"),
        };
        assert_eq!(artifact.kind(), ErrorKind::Collaborator);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(err.kind(), ErrorKind::Collaborator);
    }
}
