//! Word (docx) 生成
//!
//! WordprocessingML を zip コンテナに格納する

use crate::error::{EstimateError, Result};
use blueprint_estimate_common::export::report_core::{BillReport, TOTAL_LABEL};
use std::io::{Cursor, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
</Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
</Relationships>"#;

const TABLE_PROPERTIES: &str = r#"<w:tblPr><w:tblW w:w="5000" w:type="pct"/><w:tblBorders><w:top w:val="single" w:sz="4" w:space="0" w:color="AAAAAA"/><w:left w:val="single" w:sz="4" w:space="0" w:color="AAAAAA"/><w:bottom w:val="single" w:sz="4" w:space="0" w:color="AAAAAA"/><w:right w:val="single" w:sz="4" w:space="0" w:color="AAAAAA"/><w:insideH w:val="single" w:sz="4" w:space="0" w:color="CCCCCC"/><w:insideV w:val="single" w:sz="4" w:space="0" w:color="CCCCCC"/></w:tblBorders></w:tblPr>"#;

fn escape_xml(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '\'' => out.push_str("&apos;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

fn paragraph(text: &str, bold: bool, size_half_pt: u32) -> String {
    let bold_tag = if bold { "<w:b/>" } else { "" };
    format!(
        r#"<w:p><w:r><w:rPr>{}<w:sz w:val="{}"/></w:rPr><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#,
        bold_tag,
        size_half_pt,
        escape_xml(text)
    )
}

fn table_row(cells: &[String], bold: bool) -> String {
    let mut row = String::from("<w:tr>");
    for cell in cells {
        row.push_str("<w:tc>");
        row.push_str(&paragraph(cell, bold, 20));
        row.push_str("</w:tc>");
    }
    row.push_str("</w:tr>");
    row
}

fn build_document_xml(report: &BillReport) -> String {
    let mut body = String::new();
    body.push_str(&paragraph(&report.title, true, 36));
    body.push_str(&paragraph(&format!("Date: {}", report.date), false, 20));

    for (label, value) in &report.contact {
        body.push_str(&paragraph(&format!("{}: {}", label, value), false, 20));
    }

    body.push_str("<w:tbl>");
    body.push_str(TABLE_PROPERTIES);
    let header: Vec<String> = report.header().iter().map(|s| s.to_string()).collect();
    body.push_str(&table_row(&header, true));
    for cells in report.cells() {
        body.push_str(&table_row(&cells, false));
    }
    let total_row = vec![
        String::new(),
        String::new(),
        TOTAL_LABEL.to_string(),
        report.total_text(),
    ];
    body.push_str(&table_row(&total_row, true));
    body.push_str("</w:tbl>");

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}<w:sectPr><w:pgSz w:w="11906" w:h="16838"/><w:pgMar w:top="850" w:right="850" w:bottom="850" w:left="850" w:header="0" w:footer="0" w:gutter="0"/></w:sectPr></w:body></w:document>"#,
        body
    )
}

/// docx をバッファに生成
pub fn generate_docx_buffer(report: &BillReport) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let parts = [
        ("[Content_Types].xml", CONTENT_TYPES.to_string()),
        ("_rels/.rels", ROOT_RELS.to_string()),
        ("word/document.xml", build_document_xml(report)),
    ];

    for (name, content) in parts {
        zip.start_file(name, options)
            .map_err(|e| EstimateError::DocxGeneration(format!("{}: {}", name, e)))?;
        zip.write_all(content.as_bytes())?;
    }

    let cursor = zip
        .finish()
        .map_err(|e| EstimateError::DocxGeneration(format!("zip書き込みエラー: {}", e)))?;
    Ok(cursor.into_inner())
}

pub fn generate_docx(report: &BillReport, output_path: &Path) -> Result<()> {
    let buffer = generate_docx_buffer(report)?;
    std::fs::write(output_path, buffer)?;
    Ok(())
}
