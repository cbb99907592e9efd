//! Catalog PDFs built with lopdf for integration tests.

#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

/// Regular text.
pub const REGULAR: &str = "F1";
/// Bold by font name.
pub const BOLD_NAME: &str = "F2";
/// Bold by descriptor weight only.
pub const BOLD_WEIGHT: &str = "F3";
/// Light weight, not bold.
pub const LIGHT: &str = "F4";

/// One line of text: font resource, text and baseline.
pub type Line = (&'static str, &'static str, f32);

fn font(doc: &mut Document, base_font: &str, weight: Option<i64>) -> ObjectId {
    let mut font = dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base_font,
    };
    if let Some(weight) = weight {
        let descriptor = doc.add_object(dictionary! {
            "Type" => "FontDescriptor",
            "FontName" => base_font,
            "FontWeight" => Object::Integer(weight),
            "Flags" => Object::Integer(32),
        });
        font.set("FontDescriptor", descriptor);
    }
    doc.add_object(font)
}

/// Build a PDF whose pages contain the given lines, in order.
pub fn build_pdf(pages: &[Vec<Line>]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let f1 = font(&mut doc, "Helvetica", None);
    let f2 = font(&mut doc, "Helvetica-Bold", None);
    let f3 = font(&mut doc, "Frutiger-Roman", Some(700));
    let f4 = font(&mut doc, "Frutiger-Light", Some(300));
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => f1,
            "F2" => f2,
            "F3" => f3,
            "F4" => f4,
        },
    });

    let mut kids = Vec::with_capacity(pages.len());
    for lines in pages {
        let mut operations = Vec::new();
        for (font_key, text, y) in lines {
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new(
                "Tf",
                vec![Object::Name(font_key.as_bytes().to_vec()), Object::Integer(12)],
            ));
            operations.push(Operation::new(
                "Td",
                vec![Object::Integer(72), Object::Real(*y)],
            ));
            operations.push(Operation::new("Tj", vec![Object::string_literal(*text)]));
            operations.push(Operation::new("ET", vec![]));
        }
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("encode content"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => Object::Integer(count),
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(595),
                Object::Integer(842),
            ],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("save pdf");
    bytes
}

/// A six-page catalog with an English table of contents on page 2.
///
/// | topic            | listed page |
/// |------------------|-------------|
/// | Introduction     | 3           |
/// | Computer Science | 4           |
/// | Physics          | 6           |
pub fn sample_catalog() -> Vec<u8> {
    build_pdf(&[
        vec![(BOLD_NAME, "Faculty Catalog", 750.0)],
        vec![
            (REGULAR, "Contents", 750.0),
            (REGULAR, "Introduction ........ 3", 700.0),
            (REGULAR, "Computer Science ........ 4", 680.0),
            (REGULAR, "Physics ........ 6", 660.0),
        ],
        vec![
            (BOLD_NAME, "Introduction", 750.0),
            (REGULAR, "Welcome to the faculty.", 700.0),
        ],
        vec![
            (BOLD_NAME, "Computer Science", 750.0),
            (BOLD_WEIGHT, "Core Courses", 700.0),
            (REGULAR, "Algorithms, Data Structures", 680.0),
            (LIGHT, "Footnote", 660.0),
        ],
        vec![
            (BOLD_NAME, "Electives", 750.0),
            (REGULAR, "Choose three.", 700.0),
        ],
        vec![
            (BOLD_NAME, "Physics", 750.0),
            (BOLD_WEIGHT, "Lab Work", 700.0),
        ],
    ])
}
