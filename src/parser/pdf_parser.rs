//! PDF document parser.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::model::{Document, Metadata, Page, TextRun};
use crate::source::{DocumentSource, PageSource};

use super::backend::{LopdfBackend, PageId, PdfBackend};
use super::content::extract_page_runs;
use super::options::{ErrorMode, ParseOptions};

/// PDF document parser.
///
/// Pages are decoded on demand, so locating a table of contents only
/// touches the first few pages of a long catalog.
pub struct PdfParser<B: PdfBackend = LopdfBackend> {
    backend: B,
    pages: BTreeMap<u32, PageId>,
    options: ParseOptions,
}

impl PdfParser<LopdfBackend> {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ParseOptions::default())
    }

    /// Open a PDF file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Self> {
        let backend = LopdfBackend::load_file(path)?;
        Ok(Self::with_backend(backend, options))
    }

    /// Parse a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, ParseOptions::default())
    }

    /// Parse a PDF from bytes with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<Self> {
        let backend = LopdfBackend::load_bytes(data)?;
        Ok(Self::with_backend(backend, options))
    }

    /// Extract document metadata from the info dictionary.
    pub fn metadata(&self) -> Metadata {
        Metadata {
            title: self.backend.info_text(b"Title"),
            author: self.backend.info_text(b"Author"),
            creator: self.backend.info_text(b"Creator"),
            producer: self.backend.info_text(b"Producer"),
            created: self
                .backend
                .info_text(b"CreationDate")
                .and_then(|d| parse_pdf_date(&d)),
            pdf_version: self.backend.version(),
            page_count: self.page_count(),
            encrypted: self.backend.is_encrypted(),
        }
    }
}

impl<B: PdfBackend> PdfParser<B> {
    /// Wrap an already-loaded backend.
    pub fn with_backend(backend: B, options: ParseOptions) -> Self {
        let pages = backend.pages();
        Self {
            backend,
            pages,
            options,
        }
    }

    /// Get the number of pages.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Decode the text runs of one page (1-indexed).
    pub fn page_runs(&self, page_num: u32) -> Result<Vec<TextRun>> {
        let page_id = *self
            .pages
            .get(&page_num)
            .ok_or(Error::PageOutOfRange(page_num, self.page_count()))?;

        match extract_page_runs(&self.backend, page_id) {
            Ok(runs) => Ok(runs),
            Err(e) if self.options.error_mode == ErrorMode::Lenient => {
                log::warn!("Failed to extract text from page {}: {}", page_num, e);
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    /// Decode every page into an in-memory [`Document`].
    pub fn parse(&self) -> Result<Document> {
        let mut document = Document::new();
        for &page_num in self.pages.keys() {
            let runs = self.page_runs(page_num)?;
            document.add_page(Page::with_runs(page_num, runs));
        }
        Ok(document)
    }
}

impl<B: PdfBackend> PageSource for PdfParser<B> {
    fn page_count(&self) -> u32 {
        PdfParser::page_count(self)
    }

    fn page_runs(&self, page_num: u32) -> Result<Vec<TextRun>> {
        PdfParser::page_runs(self, page_num)
    }
}

/// A PDF on disk, re-opened for every topic.
#[derive(Debug, Clone)]
pub struct PdfFile {
    path: PathBuf,
    options: ParseOptions,
}

impl PdfFile {
    /// Refer to a PDF file with default parse options.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            options: ParseOptions::default(),
        }
    }

    /// Set parse options.
    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    /// Path of the file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DocumentSource for PdfFile {
    fn open(&self) -> Result<Box<dyn PageSource>> {
        let parser = PdfParser::open_with_options(&self.path, self.options.clone())?;
        Ok(Box::new(parser))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Parse a PDF date string (D:YYYYMMDDHHmmSSOHH'mm').
fn parse_pdf_date(s: &str) -> Option<chrono::DateTime<chrono::Utc>> {
    let s = s.strip_prefix("D:").unwrap_or(s);

    let year: i32 = s.get(0..4)?.parse().ok()?;
    let field = |range: std::ops::Range<usize>, default: u32| {
        s.get(range).and_then(|v| v.parse().ok()).unwrap_or(default)
    };

    chrono::NaiveDate::from_ymd_opt(year, field(4..6, 1), field(6..8, 1))
        .and_then(|date| date.and_hms_opt(field(8..10, 0), field(10..12, 0), field(12..14, 0)))
        .map(|dt| chrono::DateTime::from_naive_utc_and_offset(dt, chrono::Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::backend::{BackendFontInfo, ContentOp, PdfValue};
    use chrono::Datelike;

    /// Backend with canned pages, one Tj per page.
    struct FakeBackend {
        texts: Vec<&'static str>,
        broken_page: Option<u32>,
    }

    impl PdfBackend for FakeBackend {
        fn pages(&self) -> BTreeMap<u32, PageId> {
            (1..=self.texts.len() as u32).map(|n| (n, (n + 10, 0))).collect()
        }

        fn page_fonts(&self, _page: PageId) -> Result<Vec<BackendFontInfo>> {
            Ok(vec![BackendFontInfo {
                name: b"F1".to_vec(),
                base_font: "Times-Bold".into(),
                weight: None,
            }])
        }

        fn page_content(&self, page: PageId) -> Result<Vec<u8>> {
            if Some(page.0 - 10) == self.broken_page {
                return Err(Error::PdfParse("bad stream".into()));
            }
            Ok(self.texts[(page.0 - 11) as usize].as_bytes().to_vec())
        }

        fn decode_content(&self, data: &[u8]) -> Result<Vec<ContentOp>> {
            Ok(vec![
                ContentOp::new("BT", vec![]),
                ContentOp::new("Tf", vec![PdfValue::Name(b"F1".to_vec()), PdfValue::Integer(11)]),
                ContentOp::new("Tj", vec![PdfValue::Str(data.to_vec())]),
                ContentOp::new("ET", vec![]),
            ])
        }

        fn decode_text(&self, _page: PageId, _font: &[u8], bytes: &[u8]) -> String {
            String::from_utf8_lossy(bytes).to_string()
        }
    }

    #[test]
    fn test_page_runs_from_backend() {
        let parser = PdfParser::with_backend(
            FakeBackend {
                texts: vec!["cover", "contents"],
                broken_page: None,
            },
            ParseOptions::default(),
        );

        assert_eq!(parser.page_count(), 2);
        let runs = parser.page_runs(2).unwrap();
        assert_eq!(runs[0].text, "contents");
        assert_eq!(runs[0].font_name, "Times-Bold");
        assert!(matches!(parser.page_runs(3), Err(Error::PageOutOfRange(3, 2))));
    }

    #[test]
    fn test_lenient_mode_blanks_broken_page() {
        let backend = || FakeBackend {
            texts: vec!["a", "b"],
            broken_page: Some(1),
        };

        let strict = PdfParser::with_backend(backend(), ParseOptions::default());
        assert!(strict.page_runs(1).is_err());
        assert!(strict.parse().is_err());

        let lenient = PdfParser::with_backend(backend(), ParseOptions::new().lenient());
        assert!(lenient.page_runs(1).unwrap().is_empty());
        let doc = lenient.parse().unwrap();
        assert_eq!(doc.page_count(), 2);
        assert!(doc.get_page(1).is_some_and(|p| p.is_empty()));
        assert_eq!(doc.get_page(2).map(|p| p.plain_text()), Some("b".into()));
    }

    #[test]
    fn test_parse_pdf_date() {
        let date = parse_pdf_date("D:20240115103045").unwrap();
        assert_eq!(date.year(), 2024);
        assert_eq!(date.month(), 1);
        assert_eq!(date.day(), 15);

        let date = parse_pdf_date("D:2024").unwrap();
        assert_eq!((date.month(), date.day()), (1, 1));

        assert!(parse_pdf_date("D:20").is_none());
    }
}
