//! Cover Sheet Builder
//!
//! Produces the standardized front-matter document placed in every template
//! folder: a centered bold title over a metadata table with four rows
//! (template id, case label, build timestamp, and the dataset reference
//! list, with a single dash when the list is empty).
//!
//! The output is a minimal WordprocessingML package: `[Content_Types].xml`,
//! `_rels/.rels`, and `word/document.xml` inside a zip container. No remote
//! call is involved; this is a pure transformation of the manifest entry and
//! a timestamp captured by the caller at build time.

use std::io::{Cursor, Write};

use chrono::{DateTime, Local};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::manifest::ManifestEntry;
use crate::types::Result;

/// WordprocessingML main namespace.
const WORDPROCESSING_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// Timestamp pattern rendered into the metadata table.
pub const TIMESTAMP_FORMAT: &str = "%d.%m.%Y %H:%M";

/// Title font size in half-points (16pt).
const TITLE_SIZE: &str = "32";

/// Placeholder rendered when a template has no dataset references.
const EMPTY_DATASETS_PLACEHOLDER: &str = "-";

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

const RELATIONSHIPS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

/// Build the cover sheet for a template entry.
///
/// Never fails for an empty dataset list; the table renders the placeholder
/// row instead.
pub fn build_cover(entry: &ManifestEntry, built_at: DateTime<Local>) -> Result<Vec<u8>> {
    let document = document_xml(entry, built_at)?;

    let mut archive = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    archive.start_file("[Content_Types].xml", options)?;
    archive.write_all(CONTENT_TYPES.as_bytes())?;
    archive.start_file("_rels/.rels", options)?;
    archive.write_all(RELATIONSHIPS.as_bytes())?;
    archive.start_file("word/document.xml", options)?;
    archive.write_all(&document)?;

    let cursor = archive.finish()?;
    Ok(cursor.into_inner())
}

/// Render `word/document.xml` for the entry.
fn document_xml(entry: &ManifestEntry, built_at: DateTime<Local>) -> Result<Vec<u8>> {
    let mut writer = Writer::new(Vec::new());

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;

    let mut root = BytesStart::new("w:document");
    root.push_attribute(("xmlns:w", WORDPROCESSING_NS));
    writer.write_event(Event::Start(root))?;
    writer.write_event(Event::Start(BytesStart::new("w:body")))?;

    title_paragraph(&mut writer, &entry.case_label)?;
    empty_paragraph(&mut writer)?;

    write_table_start(&mut writer)?;
    metadata_row(&mut writer, "Template", &[entry.id.clone()])?;
    metadata_row(&mut writer, "Case", &[entry.case_label.clone()])?;
    metadata_row(
        &mut writer,
        "Generated",
        &[built_at.format(TIMESTAMP_FORMAT).to_string()],
    )?;
    metadata_row(&mut writer, "Datasets", &dataset_lines(&entry.datasets))?;
    writer.write_event(Event::End(BytesEnd::new("w:tbl")))?;

    writer.write_event(Event::Empty(BytesStart::new("w:sectPr")))?;
    writer.write_event(Event::End(BytesEnd::new("w:body")))?;
    writer.write_event(Event::End(BytesEnd::new("w:document")))?;

    Ok(writer.into_inner())
}

/// One bulleted line per dataset reference, or the dash placeholder.
fn dataset_lines(datasets: &[String]) -> Vec<String> {
    if datasets.is_empty() {
        vec![EMPTY_DATASETS_PLACEHOLDER.to_string()]
    } else {
        datasets.iter().map(|name| format!("• {name}")).collect()
    }
}

fn title_paragraph<W: Write>(writer: &mut Writer<W>, title: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new("w:p")))?;
    writer.write_event(Event::Start(BytesStart::new("w:pPr")))?;
    let mut jc = BytesStart::new("w:jc");
    jc.push_attribute(("w:val", "center"));
    writer.write_event(Event::Empty(jc))?;
    writer.write_event(Event::End(BytesEnd::new("w:pPr")))?;

    writer.write_event(Event::Start(BytesStart::new("w:r")))?;
    writer.write_event(Event::Start(BytesStart::new("w:rPr")))?;
    writer.write_event(Event::Empty(BytesStart::new("w:b")))?;
    let mut sz = BytesStart::new("w:sz");
    sz.push_attribute(("w:val", TITLE_SIZE));
    writer.write_event(Event::Empty(sz))?;
    writer.write_event(Event::End(BytesEnd::new("w:rPr")))?;
    text_element(writer, title)?;
    writer.write_event(Event::End(BytesEnd::new("w:r")))?;

    writer.write_event(Event::End(BytesEnd::new("w:p")))?;
    Ok(())
}

fn empty_paragraph<W: Write>(writer: &mut Writer<W>) -> Result<()> {
    writer.write_event(Event::Empty(BytesStart::new("w:p")))?;
    Ok(())
}

fn write_table_start<W: Write>(writer: &mut Writer<W>) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new("w:tbl")))?;
    writer.write_event(Event::Start(BytesStart::new("w:tblPr")))?;

    let mut width = BytesStart::new("w:tblW");
    width.push_attribute(("w:w", "0"));
    width.push_attribute(("w:type", "auto"));
    writer.write_event(Event::Empty(width))?;

    writer.write_event(Event::Start(BytesStart::new("w:tblBorders")))?;
    for side in ["top", "left", "bottom", "right", "insideH", "insideV"] {
        let mut border = BytesStart::new(format!("w:{side}"));
        border.push_attribute(("w:val", "single"));
        border.push_attribute(("w:sz", "4"));
        border.push_attribute(("w:color", "auto"));
        writer.write_event(Event::Empty(border))?;
    }
    writer.write_event(Event::End(BytesEnd::new("w:tblBorders")))?;

    writer.write_event(Event::End(BytesEnd::new("w:tblPr")))?;
    Ok(())
}

/// A two-cell row: bold label on the left, one paragraph per value line on
/// the right.
fn metadata_row<W: Write>(writer: &mut Writer<W>, label: &str, values: &[String]) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new("w:tr")))?;

    cell_start(writer)?;
    writer.write_event(Event::Start(BytesStart::new("w:p")))?;
    writer.write_event(Event::Start(BytesStart::new("w:r")))?;
    writer.write_event(Event::Start(BytesStart::new("w:rPr")))?;
    writer.write_event(Event::Empty(BytesStart::new("w:b")))?;
    writer.write_event(Event::End(BytesEnd::new("w:rPr")))?;
    text_element(writer, label)?;
    writer.write_event(Event::End(BytesEnd::new("w:r")))?;
    writer.write_event(Event::End(BytesEnd::new("w:p")))?;
    writer.write_event(Event::End(BytesEnd::new("w:tc")))?;

    cell_start(writer)?;
    for value in values {
        writer.write_event(Event::Start(BytesStart::new("w:p")))?;
        writer.write_event(Event::Start(BytesStart::new("w:r")))?;
        text_element(writer, value)?;
        writer.write_event(Event::End(BytesEnd::new("w:r")))?;
        writer.write_event(Event::End(BytesEnd::new("w:p")))?;
    }
    writer.write_event(Event::End(BytesEnd::new("w:tc")))?;

    writer.write_event(Event::End(BytesEnd::new("w:tr")))?;
    Ok(())
}

fn cell_start<W: Write>(writer: &mut Writer<W>) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new("w:tc")))?;
    writer.write_event(Event::Start(BytesStart::new("w:tcPr")))?;
    let mut width = BytesStart::new("w:tcW");
    width.push_attribute(("w:w", "0"));
    width.push_attribute(("w:type", "auto"));
    writer.write_event(Event::Empty(width))?;
    writer.write_event(Event::End(BytesEnd::new("w:tcPr")))?;
    Ok(())
}

fn text_element<W: Write>(writer: &mut Writer<W>, text: &str) -> Result<()> {
    let mut t = BytesStart::new("w:t");
    t.push_attribute(("xml:space", "preserve"));
    writer.write_event(Event::Start(t))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new("w:t")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::io::Read;

    fn entry(datasets: Vec<&str>) -> ManifestEntry {
        ManifestEntry {
            id: "747".to_string(),
            case_label: "Motion to Dismiss".to_string(),
            datasets: datasets.into_iter().map(str::to_string).collect(),
        }
    }

    fn fixed_timestamp() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap()
    }

    fn read_document_xml(bytes: &[u8]) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut file = archive.by_name("word/document.xml").unwrap();
        let mut content = String::new();
        file.read_to_string(&mut content).unwrap();
        content
    }

    #[test]
    fn test_cover_is_a_zip_package() {
        let bytes = build_cover(&entry(vec!["alpha"]), fixed_timestamp()).unwrap();
        assert!(bytes.starts_with(b"PK"));

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert!(archive.by_name("[Content_Types].xml").is_ok());
        assert!(archive.by_name("_rels/.rels").is_ok());
        assert!(archive.by_name("word/document.xml").is_ok());
    }

    #[test]
    fn test_cover_table_carries_metadata() {
        let bytes = build_cover(&entry(vec!["alpha", "beta"]), fixed_timestamp()).unwrap();
        let document = read_document_xml(&bytes);

        assert!(document.contains("747"));
        assert!(document.contains("Motion to Dismiss"));
        assert!(document.contains("01.03.2025 09:30"));
        assert!(document.contains("• alpha"));
        assert!(document.contains("• beta"));
    }

    #[test]
    fn test_empty_dataset_list_renders_placeholder() {
        let bytes = build_cover(&entry(vec![]), fixed_timestamp()).unwrap();
        let document = read_document_xml(&bytes);
        assert!(document.contains(">-<"));
    }

    #[test]
    fn test_title_is_centered_and_bold() {
        let bytes = build_cover(&entry(vec![]), fixed_timestamp()).unwrap();
        let document = read_document_xml(&bytes);
        assert!(document.contains(r#"<w:jc w:val="center"/>"#));
        assert!(document.contains("<w:b/>"));
    }

    #[test]
    fn test_label_with_markup_characters_is_escaped() {
        let mut e = entry(vec![]);
        e.case_label = "Fish & <Chips>".to_string();
        let bytes = build_cover(&e, fixed_timestamp()).unwrap();
        let document = read_document_xml(&bytes);
        assert!(document.contains("Fish &amp; &lt;Chips&gt;"));
    }
}
