//! Content stream walking.
//!
//! Turns the text-showing operators of a page into [`TextRun`]s, each
//! tagged with the font that rendered it. Only enough of the graphics
//! state is tracked to know which font is active and roughly where the
//! baseline sits; glyph widths are not computed.

use std::collections::HashMap;

use crate::error::Result;
use crate::model::TextRun;

use super::backend::{BackendFontInfo, ContentOp, PageId, PdfBackend, PdfValue};

/// Default leading used by `T*` when no `TL` has been seen.
const DEFAULT_LEADING: f32 = 12.0;

/// TJ adjustment (thousandths of an em) above which a word space is assumed.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// Extract the text runs of one page.
pub fn extract_page_runs<B: PdfBackend + ?Sized>(backend: &B, page_id: PageId) -> Result<Vec<TextRun>> {
    let fonts: HashMap<Vec<u8>, BackendFontInfo> = backend
        .page_fonts(page_id)?
        .into_iter()
        .map(|f| (f.name.clone(), f))
        .collect();

    let content = backend.page_content(page_id)?;
    if content.is_empty() {
        return Ok(Vec::new());
    }
    let ops = backend.decode_content(&content)?;

    let mut walker = RunWalker::new(&fonts);
    for op in &ops {
        walker.apply(op, |font_key, bytes| backend.decode_text(page_id, font_key, bytes));
    }
    Ok(walker.runs)
}

/// Text state tracked while walking a content stream.
struct RunWalker<'a> {
    fonts: &'a HashMap<Vec<u8>, BackendFontInfo>,
    runs: Vec<TextRun>,
    font_key: Vec<u8>,
    font_size: f32,
    leading: f32,
    matrix: TextMatrix,
    in_text_block: bool,
}

impl<'a> RunWalker<'a> {
    fn new(fonts: &'a HashMap<Vec<u8>, BackendFontInfo>) -> Self {
        Self {
            fonts,
            runs: Vec::new(),
            font_key: Vec::new(),
            font_size: 12.0,
            leading: DEFAULT_LEADING,
            matrix: TextMatrix::default(),
            in_text_block: false,
        }
    }

    fn apply<D>(&mut self, op: &ContentOp, decode: D)
    where
        D: Fn(&[u8], &[u8]) -> String,
    {
        let operands = &op.operands;
        match op.operator.as_str() {
            "BT" => {
                self.in_text_block = true;
                self.matrix = TextMatrix::default();
            }
            "ET" => {
                self.in_text_block = false;
            }
            "Tf" => {
                if operands.len() >= 2 {
                    if let PdfValue::Name(name) = &operands[0] {
                        self.font_key = name.clone();
                    }
                    self.font_size = operands[1].as_number().unwrap_or(12.0);
                }
            }
            "TL" => {
                if let Some(leading) = operands.first().and_then(PdfValue::as_number) {
                    self.leading = leading;
                }
            }
            "Td" => {
                if operands.len() >= 2 {
                    let tx = operands[0].as_number().unwrap_or(0.0);
                    let ty = operands[1].as_number().unwrap_or(0.0);
                    self.matrix.translate(tx, ty);
                }
            }
            "TD" => {
                if operands.len() >= 2 {
                    let tx = operands[0].as_number().unwrap_or(0.0);
                    let ty = operands[1].as_number().unwrap_or(0.0);
                    self.leading = -ty;
                    self.matrix.translate(tx, ty);
                }
            }
            "Tm" => {
                if operands.len() >= 6 {
                    let n = |i: usize, default: f32| operands[i].as_number().unwrap_or(default);
                    self.matrix
                        .set(n(0, 1.0), n(1, 0.0), n(2, 0.0), n(3, 1.0), n(4, 0.0), n(5, 0.0));
                }
            }
            "T*" => {
                self.matrix.next_line(self.leading);
            }
            "Tj" => {
                if let Some(PdfValue::Str(bytes)) = operands.first() {
                    let text = decode(&self.font_key, bytes);
                    self.emit(text);
                }
            }
            "TJ" => {
                if let Some(PdfValue::Array(items)) = operands.first() {
                    let text = self.join_tj(items, &decode);
                    self.emit(text);
                }
            }
            "'" | "\"" => {
                self.matrix.next_line(self.leading);
                let text_idx = if op.operator == "\"" { 2 } else { 0 };
                if let Some(PdfValue::Str(bytes)) = operands.get(text_idx) {
                    let text = decode(&self.font_key, bytes);
                    self.emit(text);
                }
            }
            _ => {}
        }
    }

    /// Concatenate the strings of a TJ array, inserting a space where a
    /// large negative adjustment stands in for one.
    fn join_tj<D>(&self, items: &[PdfValue], decode: &D) -> String
    where
        D: Fn(&[u8], &[u8]) -> String,
    {
        let mut combined = String::new();
        for item in items {
            match item {
                PdfValue::Str(bytes) => combined.push_str(&decode(&self.font_key, bytes)),
                PdfValue::Integer(_) | PdfValue::Real(_) => {
                    let adjustment = -item.as_number().unwrap_or(0.0);
                    if adjustment > TJ_SPACE_THRESHOLD
                        && !combined.is_empty()
                        && !combined.ends_with(' ')
                        && !combined.ends_with('\u{00A0}')
                    {
                        if let Some(c) = combined.chars().last() {
                            if !is_spaceless_script_char(c) {
                                combined.push(' ');
                            }
                        }
                    }
                }
                _ => {}
            }
        }
        combined
    }

    fn emit(&mut self, text: String) {
        if !self.in_text_block || text.is_empty() {
            return;
        }

        let (font_name, font_weight) = match self.fonts.get(&self.font_key) {
            Some(info) => (info.base_font.clone(), info.weight),
            None => (String::from_utf8_lossy(&self.font_key).to_string(), None),
        };
        let (x, y) = self.matrix.position();
        let size = self.font_size * self.matrix.scale();

        self.runs.push(TextRun {
            text,
            font_name,
            font_weight,
            font_size: size,
            x,
            y,
        });
    }
}

/// Text matrix for tracking position in content stream.
#[derive(Debug, Clone)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }
}

impl TextMatrix {
    fn set(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        *self = Self { a, b, c, d, e, f };
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.e += tx * self.a + ty * self.c;
        self.f += tx * self.b + ty * self.d;
    }

    fn next_line(&mut self, leading: f32) {
        self.translate(0.0, -leading);
    }

    fn position(&self) -> (f32, f32) {
        (self.e, self.f)
    }

    fn scale(&self) -> f32 {
        (self.b * self.b + self.d * self.d).sqrt()
    }
}

/// Scripts written without spaces between words (Chinese, Japanese).
fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    (0x4E00..=0x9FFF).contains(&code)
        || (0x3400..=0x4DBF).contains(&code)
        || (0x20000..=0x2EBEF).contains(&code)
        || (0x3040..=0x30FF).contains(&code)
        || (0x3000..=0x303F).contains(&code)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fonts() -> HashMap<Vec<u8>, BackendFontInfo> {
        let mut map = HashMap::new();
        map.insert(
            b"F1".to_vec(),
            BackendFontInfo {
                name: b"F1".to_vec(),
                base_font: "Helvetica".into(),
                weight: None,
            },
        );
        map.insert(
            b"F2".to_vec(),
            BackendFontInfo {
                name: b"F2".to_vec(),
                base_font: "ABCDEF+Arial-BoldMT".into(),
                weight: Some(700.0),
            },
        );
        map
    }

    fn latin(_font: &[u8], bytes: &[u8]) -> String {
        String::from_utf8_lossy(bytes).to_string()
    }

    fn name(n: &str) -> PdfValue {
        PdfValue::Name(n.as_bytes().to_vec())
    }

    fn string(s: &str) -> PdfValue {
        PdfValue::Str(s.as_bytes().to_vec())
    }

    #[test]
    fn test_runs_carry_active_font() {
        let fonts = fonts();
        let mut walker = RunWalker::new(&fonts);
        let ops = vec![
            ContentOp::new("BT", vec![]),
            ContentOp::new("Tf", vec![name("F1"), PdfValue::Integer(10)]),
            ContentOp::new("Td", vec![PdfValue::Integer(72), PdfValue::Integer(700)]),
            ContentOp::new("Tj", vec![string("Intro")]),
            ContentOp::new("Tf", vec![name("F2"), PdfValue::Integer(14)]),
            ContentOp::new("Tj", vec![string("HEADING")]),
            ContentOp::new("ET", vec![]),
        ];
        for op in &ops {
            walker.apply(op, latin);
        }

        assert_eq!(walker.runs.len(), 2);
        assert_eq!(walker.runs[0].font_name, "Helvetica");
        assert_eq!(walker.runs[0].font_weight, None);
        assert_eq!(walker.runs[1].text, "HEADING");
        assert_eq!(walker.runs[1].font_name, "ABCDEF+Arial-BoldMT");
        assert_eq!(walker.runs[1].font_weight, Some(700.0));
        assert_eq!(walker.runs[1].font_size, 14.0);
        assert_eq!((walker.runs[1].x, walker.runs[1].y), (72.0, 700.0));
    }

    #[test]
    fn test_text_outside_bt_is_ignored() {
        let fonts = fonts();
        let mut walker = RunWalker::new(&fonts);
        walker.apply(&ContentOp::new("Tj", vec![string("stray")]), latin);
        assert!(walker.runs.is_empty());
    }

    #[test]
    fn test_tj_array_inserts_word_space() {
        let fonts = fonts();
        let mut walker = RunWalker::new(&fonts);
        walker.apply(&ContentOp::new("BT", vec![]), latin);
        walker.apply(
            &ContentOp::new(
                "TJ",
                vec![PdfValue::Array(vec![
                    string("Comp"),
                    PdfValue::Integer(-20),
                    string("uter"),
                    PdfValue::Real(-250.0),
                    string("Science"),
                ])],
            ),
            latin,
        );
        assert_eq!(walker.runs[0].text, "Computer Science");
    }

    #[test]
    fn test_next_line_moves_baseline_by_leading() {
        let fonts = fonts();
        let mut walker = RunWalker::new(&fonts);
        let ops = vec![
            ContentOp::new("BT", vec![]),
            ContentOp::new("Tf", vec![name("F1"), PdfValue::Integer(12)]),
            ContentOp::new("TL", vec![PdfValue::Integer(14)]),
            ContentOp::new("Td", vec![PdfValue::Integer(50), PdfValue::Integer(600)]),
            ContentOp::new("Tj", vec![string("first")]),
            ContentOp::new("T*", vec![]),
            ContentOp::new("Tj", vec![string("second")]),
            ContentOp::new("'", vec![string("third")]),
        ];
        for op in &ops {
            walker.apply(op, latin);
        }

        let ys: Vec<f32> = walker.runs.iter().map(|r| r.y).collect();
        assert_eq!(ys, vec![600.0, 586.0, 572.0]);
    }

    #[test]
    fn test_unknown_font_key_falls_back_to_resource_name() {
        let fonts = HashMap::new();
        let mut walker = RunWalker::new(&fonts);
        walker.apply(&ContentOp::new("BT", vec![]), latin);
        walker.apply(
            &ContentOp::new("Tf", vec![name("Bold1"), PdfValue::Integer(9)]),
            latin,
        );
        walker.apply(&ContentOp::new("Tj", vec![string("x")]), latin);
        assert_eq!(walker.runs[0].font_name, "Bold1");
    }
}
