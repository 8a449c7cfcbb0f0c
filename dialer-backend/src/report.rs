//! Feedback history export as an Excel workbook.
//!
//! An `.xlsx` file is a ZIP package of SpreadsheetML parts. The export only
//! needs one sheet of text cells, so the parts are written directly with
//! inline strings instead of a shared-string table.

use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::models::FeedbackReportRow;

pub const REPORT_FILENAME: &str = "feedback_report.xlsx";
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const SHEET_NAME: &str = "Sheet1";

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;
const NS_MAIN: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const NS_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_PKG_REL: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

/// Style index of the bold header cells in `xl/styles.xml`.
const HEADER_STYLE: u32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("failed to build workbook archive: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("failed to write workbook part: {0}")]
    Io(#[from] std::io::Error),
}

/// Render the change history as an `.xlsx` workbook: a header row followed by
/// one row per change. An empty slice yields a header-only sheet.
pub fn build_feedback_report(rows: &[FeedbackReportRow]) -> Result<Vec<u8>, ReportError> {
    let body: Vec<Vec<&str>> = rows.iter().map(|r| r.cells().to_vec()).collect();
    write_workbook(&FeedbackReportRow::HEADERS, &body)
}

/// Write a single-sheet workbook with a bold header row.
pub fn write_workbook(header: &[&str], rows: &[Vec<&str>]) -> Result<Vec<u8>, ReportError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    let parts: [(&str, String); 6] = [
        ("[Content_Types].xml", content_types_xml()),
        ("_rels/.rels", root_rels_xml()),
        ("xl/workbook.xml", workbook_xml()),
        ("xl/_rels/workbook.xml.rels", workbook_rels_xml()),
        ("xl/styles.xml", styles_xml()),
        ("xl/worksheets/sheet1.xml", worksheet_xml(header, rows)),
    ];
    for (name, xml) in parts {
        zip.start_file(name, options)?;
        zip.write_all(xml.as_bytes())?;
    }

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

fn content_types_xml() -> String {
    format!(
        concat!(
            "{}",
            r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
            r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
            r#"<Default Extension="xml" ContentType="application/xml"/>"#,
            r#"<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>"#,
            r#"<Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>"#,
            r#"<Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
            "</Types>"
        ),
        XML_DECL
    )
}

fn root_rels_xml() -> String {
    format!(
        r#"{}<Relationships xmlns="{}"><Relationship Id="rId1" Type="{}/officeDocument" Target="xl/workbook.xml"/></Relationships>"#,
        XML_DECL, NS_PKG_REL, NS_REL
    )
}

fn workbook_xml() -> String {
    format!(
        r#"{}<workbook xmlns="{}" xmlns:r="{}"><sheets><sheet name="{}" sheetId="1" r:id="rId1"/></sheets></workbook>"#,
        XML_DECL,
        NS_MAIN,
        NS_REL,
        escape_xml(SHEET_NAME)
    )
}

fn workbook_rels_xml() -> String {
    format!(
        concat!(
            r#"{decl}<Relationships xmlns="{pkg}">"#,
            r#"<Relationship Id="rId1" Type="{rel}/worksheet" Target="worksheets/sheet1.xml"/>"#,
            r#"<Relationship Id="rId2" Type="{rel}/styles" Target="styles.xml"/>"#,
            "</Relationships>"
        ),
        decl = XML_DECL,
        pkg = NS_PKG_REL,
        rel = NS_REL
    )
}

// cellXfs[0] is the default style, cellXfs[1] is bold (HEADER_STYLE).
fn styles_xml() -> String {
    format!(
        concat!(
            r#"{}<styleSheet xmlns="{}">"#,
            r#"<fonts count="2"><font><sz val="11"/><name val="Calibri"/></font><font><b/><sz val="11"/><name val="Calibri"/></font></fonts>"#,
            r#"<fills count="2"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill></fills>"#,
            r#"<borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders>"#,
            r#"<cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>"#,
            r#"<cellXfs count="2"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/><xf numFmtId="0" fontId="1" fillId="0" borderId="0" xfId="0" applyFont="1"/></cellXfs>"#,
            "</styleSheet>"
        ),
        XML_DECL, NS_MAIN
    )
}

fn worksheet_xml(header: &[&str], rows: &[Vec<&str>]) -> String {
    let mut xml = format!(r#"{}<worksheet xmlns="{}"><sheetData>"#, XML_DECL, NS_MAIN);
    push_row(&mut xml, 1, header, Some(HEADER_STYLE));
    for (i, row) in rows.iter().enumerate() {
        push_row(&mut xml, i + 2, row, None);
    }
    xml.push_str("</sheetData></worksheet>");
    xml
}

fn push_row(xml: &mut String, row_number: usize, cells: &[&str], style: Option<u32>) {
    xml.push_str(&format!(r#"<row r="{}">"#, row_number));
    for (col, value) in cells.iter().enumerate() {
        let style_attr = style.map(|s| format!(r#" s="{}""#, s)).unwrap_or_default();
        xml.push_str(&format!(
            r#"<c r="{}{}" t="inlineStr"{}><is><t xml:space="preserve">{}</t></is></c>"#,
            column_name(col),
            row_number,
            style_attr,
            escape_xml(value)
        ));
    }
    xml.push_str("</row>");
}

/// Zero-based column index to spreadsheet letters: 0 → A, 25 → Z, 26 → AA.
fn column_name(index: usize) -> String {
    let mut name = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        name.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    name.reverse();
    String::from_utf8(name).unwrap_or_default()
}

/// Escape text for an XML text node or attribute. Characters outside the XML
/// 1.0 `Char` production are dropped.
fn escape_xml(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars().filter(|&c| is_xml_char(c)) {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

// Surrogates cannot occur in a `char`, so only the gaps around them matter.
fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}'
    )
}

#[cfg(test)]
pub(crate) mod test_support {
    use calamine::{Reader, Xlsx};
    use std::io::{Cursor, Read};
    use zip::ZipArchive;

    use super::SHEET_NAME;

    /// Fail unless every part of the package is well-formed XML.
    pub fn assert_well_formed(workbook: &[u8]) {
        let mut archive = ZipArchive::new(Cursor::new(workbook)).expect("valid zip");
        for i in 0..archive.len() {
            let mut part = archive.by_index(i).unwrap();
            let mut xml = String::new();
            part.read_to_string(&mut xml).unwrap();
            if let Err(e) = roxmltree::Document::parse(&xml) {
                panic!("{} is not well-formed: {}", part.name(), e);
            }
        }
    }

    /// Open the workbook with a spreadsheet reader and return the cell text of
    /// every row in the report sheet.
    pub fn sheet_rows(workbook: &[u8]) -> Vec<Vec<String>> {
        assert_well_formed(workbook);

        let mut xlsx = Xlsx::new(Cursor::new(workbook.to_vec())).expect("readable xlsx");
        let range = xlsx.worksheet_range(SHEET_NAME).expect("report sheet present");
        range
            .rows()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect()
    }
}
