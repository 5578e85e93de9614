//! Template export: a spreadsheet holding only the required header row.
//!
//! The XLSX writer emits the smallest package a spreadsheet application (and
//! `calamine`) will open: content types, package and workbook relationships, a
//! workbook with one sheet, and the worksheet itself with inline strings.

use std::fmt;
use std::io::{Cursor, Write};
use std::str::FromStr;

use breath_model::RequiredSchema;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::error::{IngestError, Result};

/// Sheet name used by the downloadable template.
pub const TEMPLATE_SHEET_NAME: &str = "Training Data";
/// Default file name offered for the template download.
pub const TEMPLATE_FILE_NAME: &str = "training.xlsx";

const MAIN_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const PACKAGE_REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels"
 ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/xl/workbook.xml"
 ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
<Override PartName="/xl/worksheets/sheet1.xml"
 ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
</Types>"#;

/// Output format of the template export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TemplateFormat {
    #[default]
    Xlsx,
    Csv,
}

impl TemplateFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Xlsx => "xlsx",
            Self::Csv => "csv",
        }
    }

    /// Default download name, `training.xlsx` or `training.csv`.
    pub fn default_file_name(self) -> String {
        match self {
            Self::Xlsx => TEMPLATE_FILE_NAME.to_string(),
            Self::Csv => format!("training.{}", self.extension()),
        }
    }

    /// Renders the template for `schema` in this format.
    pub fn render(self, schema: &RequiredSchema) -> Result<Vec<u8>> {
        match self {
            Self::Xlsx => write_template_xlsx(schema),
            Self::Csv => write_template_csv(schema),
        }
    }
}

impl fmt::Display for TemplateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for TemplateFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "xlsx" => Ok(Self::Xlsx),
            "csv" => Ok(Self::Csv),
            other => Err(format!("unknown template format '{other}' (expected xlsx or csv)")),
        }
    }
}

/// XLSX workbook whose single sheet holds the schema display names.
pub fn write_template_xlsx(schema: &RequiredSchema) -> Result<Vec<u8>> {
    let header: Vec<String> = schema.display_names().map(str::to_string).collect();
    write_workbook(TEMPLATE_SHEET_NAME, &[header])
}

/// CSV file holding the schema display names as its only line.
pub fn write_template_csv(schema: &RequiredSchema) -> Result<Vec<u8>> {
    let mut writer = ::csv::Writer::from_writer(Vec::new());
    writer
        .write_record(schema.display_names())
        .map_err(|e| IngestError::Template {
            message: e.to_string(),
        })?;
    writer.into_inner().map_err(|e| IngestError::Template {
        message: e.to_string(),
    })
}

/// Writes `rows` as text cells of a single-sheet XLSX workbook.
pub fn write_workbook(sheet_name: &str, rows: &[Vec<String>]) -> Result<Vec<u8>> {
    if sheet_name.trim().is_empty() {
        return Err(IngestError::Template {
            message: "sheet name must not be empty".to_string(),
        });
    }

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    zip.start_file("[Content_Types].xml", options)?;
    zip.write_all(CONTENT_TYPES.as_bytes())?;

    zip.start_file("_rels/.rels", options)?;
    zip.write_all(&relationships(
        "officeDocument",
        "xl/workbook.xml",
    )?)?;

    zip.start_file("xl/workbook.xml", options)?;
    zip.write_all(&workbook_xml(sheet_name)?)?;

    zip.start_file("xl/_rels/workbook.xml.rels", options)?;
    zip.write_all(&relationships("worksheet", "worksheets/sheet1.xml")?)?;

    zip.start_file("xl/worksheets/sheet1.xml", options)?;
    zip.write_all(&sheet_xml(rows)?)?;

    let cursor = zip.finish()?;
    let bytes = cursor.into_inner();
    tracing::debug!(sheet = %sheet_name, rows = rows.len(), bytes = bytes.len(), "wrote workbook");
    Ok(bytes)
}

fn xml_writer() -> Result<Writer<Vec<u8>>> {
    let mut xml = Writer::new(Vec::new());
    xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
    Ok(xml)
}

fn relationships(kind: &str, target: &str) -> Result<Vec<u8>> {
    let mut xml = xml_writer()?;
    let mut root = BytesStart::new("Relationships");
    root.push_attribute(("xmlns", PACKAGE_REL_NS));
    xml.write_event(Event::Start(root))?;

    let rel_type = format!("{REL_NS}/{kind}");
    let mut rel = BytesStart::new("Relationship");
    rel.push_attribute(("Id", "rId1"));
    rel.push_attribute(("Type", rel_type.as_str()));
    rel.push_attribute(("Target", target));
    xml.write_event(Event::Empty(rel))?;

    xml.write_event(Event::End(BytesEnd::new("Relationships")))?;
    Ok(xml.into_inner())
}

fn workbook_xml(sheet_name: &str) -> Result<Vec<u8>> {
    let mut xml = xml_writer()?;
    let mut root = BytesStart::new("workbook");
    root.push_attribute(("xmlns", MAIN_NS));
    root.push_attribute(("xmlns:r", REL_NS));
    xml.write_event(Event::Start(root))?;
    xml.write_event(Event::Start(BytesStart::new("sheets")))?;

    let mut sheet = BytesStart::new("sheet");
    sheet.push_attribute(("name", sheet_name));
    sheet.push_attribute(("sheetId", "1"));
    sheet.push_attribute(("r:id", "rId1"));
    xml.write_event(Event::Empty(sheet))?;

    xml.write_event(Event::End(BytesEnd::new("sheets")))?;
    xml.write_event(Event::End(BytesEnd::new("workbook")))?;
    Ok(xml.into_inner())
}

fn sheet_xml(rows: &[Vec<String>]) -> Result<Vec<u8>> {
    let mut xml = xml_writer()?;
    let mut root = BytesStart::new("worksheet");
    root.push_attribute(("xmlns", MAIN_NS));
    xml.write_event(Event::Start(root))?;

    let width = rows.iter().map(Vec::len).max().unwrap_or(0).max(1);
    let height = rows.len().max(1);
    let dimension = format!("A1:{}{height}", column_name(width - 1));
    let mut dim = BytesStart::new("dimension");
    dim.push_attribute(("ref", dimension.as_str()));
    xml.write_event(Event::Empty(dim))?;

    xml.write_event(Event::Start(BytesStart::new("sheetData")))?;
    for (row_idx, row) in rows.iter().enumerate() {
        let row_ref = (row_idx + 1).to_string();
        let mut row_start = BytesStart::new("row");
        row_start.push_attribute(("r", row_ref.as_str()));
        xml.write_event(Event::Start(row_start))?;

        for (col_idx, value) in row.iter().enumerate() {
            let cell_ref = format!("{}{row_ref}", column_name(col_idx));
            let mut cell = BytesStart::new("c");
            cell.push_attribute(("r", cell_ref.as_str()));
            cell.push_attribute(("t", "inlineStr"));
            xml.write_event(Event::Start(cell))?;
            xml.write_event(Event::Start(BytesStart::new("is")))?;
            xml.write_event(Event::Start(BytesStart::new("t")))?;
            xml.write_event(Event::Text(BytesText::new(value)))?;
            xml.write_event(Event::End(BytesEnd::new("t")))?;
            xml.write_event(Event::End(BytesEnd::new("is")))?;
            xml.write_event(Event::End(BytesEnd::new("c")))?;
        }
        xml.write_event(Event::End(BytesEnd::new("row")))?;
    }
    xml.write_event(Event::End(BytesEnd::new("sheetData")))?;
    xml.write_event(Event::End(BytesEnd::new("worksheet")))?;
    Ok(xml.into_inner())
}

/// Spreadsheet column letters for a zero-based index (`0` → `A`, `26` → `AA`).
fn column_name(mut index: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(b'A' + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    letters.reverse();
    String::from_utf8_lossy(&letters).into_owned()
}
