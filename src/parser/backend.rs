//! PDF backend abstraction layer.
//!
//! The run extractor only needs pages, their fonts, their content streams
//! and a way to turn string operands into text. [`PdfBackend`] is that
//! surface; [`LopdfBackend`] implements it over `lopdf`.

use std::collections::BTreeMap;
use std::path::Path;

use lopdf::{Dictionary, Document as LopdfDocument, Object};

use crate::error::{Error, Result};

/// Page identifier: (object number, generation number).
pub type PageId = (u32, u16);

/// A font as seen from one page's resources.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendFontInfo {
    /// Resource key used by `Tf` (e.g. `F1`).
    pub name: Vec<u8>,
    /// `/BaseFont`, or the resource key when absent.
    pub base_font: String,
    /// `/FontWeight` from the font descriptor, if declared.
    pub weight: Option<f32>,
}

/// A content stream operand.
#[derive(Debug, Clone)]
pub enum PdfValue {
    Integer(i64),
    Real(f32),
    Name(Vec<u8>),
    Str(Vec<u8>),
    Array(Vec<PdfValue>),
    Other,
}

impl PdfValue {
    /// The operand as a number, if it is one.
    pub fn as_number(&self) -> Option<f32> {
        match self {
            PdfValue::Integer(i) => Some(*i as f32),
            PdfValue::Real(r) => Some(*r),
            _ => None,
        }
    }
}

impl From<&Object> for PdfValue {
    fn from(obj: &Object) -> Self {
        match obj {
            Object::Integer(i) => PdfValue::Integer(*i),
            Object::Real(r) => PdfValue::Real(*r),
            Object::Name(n) => PdfValue::Name(n.clone()),
            Object::String(bytes, _) => PdfValue::Str(bytes.clone()),
            Object::Array(items) => PdfValue::Array(items.iter().map(PdfValue::from).collect()),
            _ => PdfValue::Other,
        }
    }
}

/// One operator with its operands.
#[derive(Debug, Clone)]
pub struct ContentOp {
    pub operator: String,
    pub operands: Vec<PdfValue>,
}

impl ContentOp {
    /// Build an operation (handy for tests).
    pub fn new(operator: &str, operands: Vec<PdfValue>) -> Self {
        Self {
            operator: operator.to_string(),
            operands,
        }
    }
}

/// Page-level access to a PDF.
pub trait PdfBackend {
    /// All pages, keyed by 1-based page number.
    fn pages(&self) -> BTreeMap<u32, PageId>;

    /// Fonts referenced from the page's resources.
    fn page_fonts(&self, page: PageId) -> Result<Vec<BackendFontInfo>>;

    /// The page's content streams, decompressed and joined.
    fn page_content(&self, page: PageId) -> Result<Vec<u8>>;

    /// Parse content stream bytes into operations.
    fn decode_content(&self, data: &[u8]) -> Result<Vec<ContentOp>>;

    /// Decode a string operand shown with `font_name` on `page`.
    fn decode_text(&self, page: PageId, font_name: &[u8], bytes: &[u8]) -> String;
}

/// Decode bytes with no font encoding: UTF-16BE with a BOM, then UTF-8,
/// then Latin-1.
fn fallback_text(bytes: &[u8]) -> String {
    match bytes {
        [0xFE, 0xFF, rest @ ..] => {
            let units: Vec<u16> = rest
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16_lossy(&units)
        }
        _ => match std::str::from_utf8(bytes) {
            Ok(text) => text.to_owned(),
            Err(_) => bytes.iter().copied().map(char::from).collect(),
        },
    }
}

/// [`PdfBackend`] over an `lopdf::Document`.
pub struct LopdfBackend {
    doc: LopdfDocument,
}

impl LopdfBackend {
    /// Load from a file path.
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let doc = LopdfDocument::load(path)?;
        Ok(Self { doc })
    }

    /// Load from an in-memory byte slice.
    pub fn load_bytes(data: &[u8]) -> Result<Self> {
        let doc = LopdfDocument::load_mem(data)?;
        Ok(Self { doc })
    }

    pub fn is_encrypted(&self) -> bool {
        self.doc.is_encrypted()
    }

    /// PDF version from the header, e.g. "1.7".
    pub fn version(&self) -> String {
        self.doc.version.to_string()
    }

    /// A text entry of the trailer's `/Info` dictionary.
    pub fn info_text(&self, key: &[u8]) -> Option<String> {
        let info = self.resolve_dict(self.doc.trailer.get(b"Info").ok()?)?;
        match info.get(key).ok()? {
            Object::String(bytes, _) => Some(fallback_text(bytes)),
            Object::Name(bytes) => String::from_utf8(bytes.clone()).ok(),
            _ => None,
        }
    }

    fn resolve_dict<'a>(&'a self, obj: &'a Object) -> Option<&'a Dictionary> {
        match obj {
            Object::Reference(r) => self.doc.get_dictionary(*r).ok(),
            Object::Dictionary(d) => Some(d),
            _ => None,
        }
    }

    /// Read `/FontWeight` from a font's descriptor.
    ///
    /// Type0 fonts keep their descriptor on the first descendant font.
    fn font_weight(&self, font: &Dictionary) -> Option<f32> {
        let descriptor = font
            .get(b"FontDescriptor")
            .ok()
            .and_then(|d| self.resolve_dict(d))
            .or_else(|| {
                let descendants = match font.get(b"DescendantFonts").ok()? {
                    Object::Reference(r) => self.doc.get_object(*r).ok()?,
                    other => other,
                };
                let first = descendants.as_array().ok()?.first()?;
                self.resolve_dict(first)?
                    .get(b"FontDescriptor")
                    .ok()
                    .and_then(|d| self.resolve_dict(d))
            })?;

        match descriptor.get(b"FontWeight").ok()? {
            Object::Reference(r) => self.doc.get_object(*r).ok()?.as_float().ok(),
            weight => weight.as_float().ok(),
        }
    }
}

impl PdfBackend for LopdfBackend {
    fn pages(&self) -> BTreeMap<u32, PageId> {
        self.doc.get_pages()
    }

    fn page_fonts(&self, page: PageId) -> Result<Vec<BackendFontInfo>> {
        let fonts = self
            .doc
            .get_page_fonts(page)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        Ok(fonts
            .iter()
            .map(|(name, font)| BackendFontInfo {
                name: name.clone(),
                base_font: font
                    .get(b"BaseFont")
                    .and_then(Object::as_name)
                    .map(|n| String::from_utf8_lossy(n).into_owned())
                    .unwrap_or_else(|_| String::from_utf8_lossy(name).into_owned()),
                weight: self.font_weight(font),
            })
            .collect())
    }

    fn page_content(&self, page: PageId) -> Result<Vec<u8>> {
        // A page without /Contents is blank, not broken.
        let mut content = Vec::new();
        for id in self.doc.get_page_contents(page) {
            let Ok(stream) = self.doc.get_object(id).and_then(Object::as_stream) else {
                continue;
            };
            // Unfiltered streams make decompressed_content() fail.
            match stream.decompressed_content() {
                Ok(data) => content.extend_from_slice(&data),
                Err(_) => content.extend_from_slice(&stream.content),
            }
            // Streams of one page may split at any token boundary.
            content.push(b' ');
        }
        Ok(content)
    }

    fn decode_content(&self, data: &[u8]) -> Result<Vec<ContentOp>> {
        let content =
            lopdf::content::Content::decode(data).map_err(|e| Error::PdfParse(e.to_string()))?;

        Ok(content
            .operations
            .iter()
            .map(|op| ContentOp {
                operator: op.operator.clone(),
                operands: op.operands.iter().map(PdfValue::from).collect(),
            })
            .collect())
    }

    fn decode_text(&self, page: PageId, font_name: &[u8], bytes: &[u8]) -> String {
        self.doc
            .get_page_fonts(page)
            .ok()
            .and_then(|fonts| {
                let encoding = fonts.get(font_name)?.get_font_encoding(&self.doc).ok()?;
                LopdfDocument::decode_text(&encoding, bytes).ok()
            })
            .unwrap_or_else(|| fallback_text(bytes))
    }
}
