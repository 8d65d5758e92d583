//! PDF serialization of a laid-out [`Document`].

use crate::error::{AsktubeError, Result};
use crate::render::{Document, Page, FONT_BOLD, FONT_REGULAR};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Object, ObjectId, Stream};
use std::io::Cursor;
use tracing::debug;

pub const PDF_MIME: &str = "application/pdf";

/// Resource name for each font used by the layout.
fn font_resource(font: &str) -> Result<&'static str> {
    match font {
        FONT_REGULAR => Ok("F1"),
        FONT_BOLD => Ok("F2"),
        other => Err(AsktubeError::Rendering(format!(
            "Font '{}' is not embedded",
            other
        ))),
    }
}

/// Map text onto WinAnsi bytes; characters WinAnsi lacks become `?`.
fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c as u32 {
            cp @ (0x20..=0x7e | 0xa0..=0xff) => cp as u8,
            _ => win_ansi_extra(c).unwrap_or(b'?'),
        })
        .collect()
}

/// The 0x80..=0x9F block, where WinAnsi departs from Latin-1.
fn win_ansi_extra(c: char) -> Option<u8> {
    let byte = match c {
        '€' => 0x80,
        '‚' => 0x82,
        'ƒ' => 0x83,
        '„' => 0x84,
        '…' => 0x85,
        '†' => 0x86,
        '‡' => 0x87,
        'ˆ' => 0x88,
        '‰' => 0x89,
        'Š' => 0x8a,
        '‹' => 0x8b,
        'Œ' => 0x8c,
        'Ž' => 0x8e,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '˜' => 0x98,
        '™' => 0x99,
        'š' => 0x9a,
        '›' => 0x9b,
        'œ' => 0x9c,
        'ž' => 0x9e,
        'Ÿ' => 0x9f,
        _ => return None,
    };
    Some(byte)
}

fn point(value: f32) -> Object {
    Object::Integer(value.round() as i64)
}

fn page_content(page: &Page) -> Result<Vec<u8>> {
    let mut operations = Vec::with_capacity(page.lines.len() * 5);
    // Font state does not carry over between pages.
    let mut active: Option<(&str, f32)> = None;

    for line in &page.lines {
        operations.push(Operation::new("BT", vec![]));
        if active != Some((line.font, line.size)) {
            let name = font_resource(line.font)?;
            operations.push(Operation::new(
                "Tf",
                vec![Object::Name(name.as_bytes().to_vec()), point(line.size)],
            ));
            active = Some((line.font, line.size));
        }
        operations.push(Operation::new("Td", vec![point(line.x), point(line.y)]));
        operations.push(Operation::new(
            "Tj",
            vec![Object::string_literal(encode_win_ansi(&line.text))],
        ));
        operations.push(Operation::new("ET", vec![]));
    }

    Content { operations }
        .encode()
        .map_err(|e| AsktubeError::Rendering(format!("Failed to encode page content: {}", e)))
}

fn font_dictionary(base_font: &str) -> lopdf::Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => Object::Name(base_font.as_bytes().to_vec()),
        "Encoding" => "WinAnsiEncoding",
    }
}

/// Serialize the document to PDF bytes, returned with the read position at 0.
pub fn write_pdf(document: &Document) -> Result<Cursor<Vec<u8>>> {
    let mut doc = lopdf::Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(font_dictionary(FONT_REGULAR));
    let bold_id = doc.add_object(font_dictionary(FONT_BOLD));
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular_id,
            "F2" => bold_id,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(document.pages.len());
    for page in &document.pages {
        let content_id = doc.add_object(Stream::new(dictionary! {}, page_content(page)?));
        let page_id: ObjectId = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => Object::Integer(document.pages.len() as i64),
        "Resources" => resources_id,
        "MediaBox" => vec![point(0.0), point(0.0), point(document.width), point(document.height)],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut buffer = Cursor::new(Vec::new());
    doc.save_to(&mut buffer)
        .map_err(|e| AsktubeError::Rendering(format!("Failed to write PDF: {}", e)))?;
    buffer.set_position(0);

    debug!(
        "Wrote {} page PDF ({} bytes)",
        document.pages.len(),
        buffer.get_ref().len()
    );
    Ok(buffer)
}
