//! DOCX reading and writing.
//!
//! Reading pulls raw paragraph text out of `word/document.xml`; writing builds
//! the smallest WordprocessingML package Word and LibreOffice will open.

use quick_xml::escape::{escape, unescape};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read, Write};
use thiserror::Error;
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

const DOCUMENT_PART: &str = "word/document.xml";

#[derive(Error, Debug)]
pub enum DocxError {
    #[error("invalid DOCX container: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("invalid DOCX markup: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("invalid XML escape: {0}")]
    Escape(#[from] quick_xml::escape::EscapeError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Extract the raw text of a DOCX document.
///
/// Paragraphs are each followed by a blank line, tabs and line breaks inside a
/// paragraph are kept, and all formatting is dropped.
pub fn read_text(bytes: &[u8]) -> Result<String, DocxError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut xml = String::new();
    archive.by_name(DOCUMENT_PART)?.read_to_string(&mut xml)?;

    let mut reader = Reader::from_str(&xml);
    let mut text = String::new();
    let mut in_run = false;
    let mut in_run_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:r" => in_run = true,
                b"w:t" => in_run_text = true,
                _ => {}
            },
            Event::End(e) => match e.name().as_ref() {
                b"w:r" => in_run = false,
                b"w:t" => in_run_text = false,
                b"w:p" => text.push_str("\n\n"),
                _ => {}
            },
            // w:tab and w:br also appear as tab stops and properties outside runs
            Event::Empty(e) => match e.name().as_ref() {
                b"w:tab" if in_run => text.push('\t'),
                b"w:br" | b"w:cr" if in_run => text.push('\n'),
                b"w:p" => text.push_str("\n\n"),
                _ => {}
            },
            Event::Text(e) if in_run_text => {
                let raw = String::from_utf8_lossy(&e);
                text.push_str(&unescape(&raw)?);
            }
            Event::GeneralRef(e) if in_run_text => {
                let name = String::from_utf8_lossy(&e);
                text.push_str(&unescape(&format!("&{};", name))?);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(text)
}

/// Build a DOCX document with one paragraph per line of `text`.
pub fn write_paragraphs(text: &str) -> Result<Vec<u8>, DocxError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let parts = [
        ("[Content_Types].xml", CONTENT_TYPES.to_string()),
        ("_rels/.rels", ROOT_RELS.to_string()),
        (DOCUMENT_PART, document_xml(text)),
    ];

    for (name, content) in parts {
        zip.start_file(name, SimpleFileOptions::default())?;
        zip.write_all(content.as_bytes())?;
    }

    Ok(zip.finish()?.into_inner())
}

fn document_xml(text: &str) -> String {
    let mut body = String::new();
    for line in text.split('\n') {
        let line = line.trim();
        if line.is_empty() {
            body.push_str("<w:p/>");
        } else {
            body.push_str("<w:p><w:r><w:t xml:space=\"preserve\">");
            body.push_str(&escape(line));
            body.push_str("</w:t></w:r></w:p>");
        }
    }

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
<w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
<w:body>{}</w:body></w:document>",
        body
    )
}

const CONTENT_TYPES: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
<Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">\
<Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>\
<Default Extension=\"xml\" ContentType=\"application/xml\"/>\
<Override PartName=\"/word/document.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml\"/>\
</Types>";

const ROOT_RELS: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
<Relationship Id=\"rId1\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument\" Target=\"word/document.xml\"/>\
</Relationships>";
