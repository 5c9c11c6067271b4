use std::io::{Read, Seek};

use anyhow::{Context, Result};
use roxmltree::Document;
use zip::ZipArchive;

/// Paragraph text of a DOCX archive, one line per paragraph. Empty
/// paragraphs become blank lines so section breaks survive.
pub fn extract_docx_text<R: Read + Seek>(reader: R) -> Result<String> {
    let mut archive = ZipArchive::new(reader).context("DOCX is not a valid ZIP archive")?;

    let mut document_xml = String::new();
    archive
        .by_name("word/document.xml")
        .context("DOCX missing word/document.xml")?
        .read_to_string(&mut document_xml)
        .context("failed to read word/document.xml")?;

    let doc = Document::parse(&document_xml).context("failed to parse DOCX XML")?;

    let lines: Vec<String> = doc
        .descendants()
        .filter(|node| node.is_element() && node.tag_name().name() == "p")
        .map(|paragraph| {
            paragraph
                .descendants()
                .filter(|node| node.is_element() && node.tag_name().name() == "t")
                .filter_map(|node| node.text())
                .collect::<Vec<_>>()
                .join("")
        })
        .collect();

    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::{Cursor, Write};

    use zip::write::{FileOptions, ZipWriter};

    fn docx_bytes(document_xml: &str) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("word/document.xml", FileOptions::default())
            .unwrap();
        writer.write_all(document_xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn paragraphs_become_lines() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>Who </w:t></w:r><w:r><w:t>governs the state?</w:t></w:r></w:p>
    <w:p></w:p>
    <w:p><w:r><w:t>The governor.</w:t></w:r></w:p>
  </w:body>
</w:document>"#;

        let text = extract_docx_text(Cursor::new(docx_bytes(xml))).unwrap();
        assert_eq!(text, "Who governs the state?\n\nThe governor.");
    }

    #[test]
    fn rejects_non_zip_input() {
        let err = extract_docx_text(Cursor::new(b"plain".to_vec())).unwrap_err();
        assert!(err.to_string().contains("ZIP"));
    }

    #[test]
    fn rejects_archive_without_document_xml() {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("other.xml", FileOptions::default())
            .unwrap();
        writer.write_all(b"<x/>").unwrap();
        let bytes = writer.finish().unwrap().into_inner();

        let err = extract_docx_text(Cursor::new(bytes)).unwrap_err();
        assert!(err.to_string().contains("word/document.xml"));
    }
}
