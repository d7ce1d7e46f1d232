//! Minimal XLSX fixtures for integration tests

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use sheetprobe_core::CellReference;

/// Content of one fixture cell
#[allow(dead_code)]
pub enum Fixture {
    Text(&'static str),
    Owned(String),
    Number(f64),
    Bool(bool),
    /// Formula text (without `=`) and its cached string result
    Formula(&'static str, &'static str),
    /// Cell XML written as given, for malformed sheets
    Raw(&'static str),
}

pub type SheetSpec<'a> = (&'a str, Vec<(&'a str, Fixture)>);

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn cell_xml(reference: &str, cell: &Fixture) -> String {
    match cell {
        Fixture::Text(s) => format!(
            r#"<c r="{}" t="inlineStr"><is><t>{}</t></is></c>"#,
            reference,
            escape(s)
        ),
        Fixture::Owned(s) => format!(
            r#"<c r="{}" t="inlineStr"><is><t>{}</t></is></c>"#,
            reference,
            escape(s)
        ),
        Fixture::Number(n) => format!(r#"<c r="{}"><v>{}</v></c>"#, reference, n),
        Fixture::Bool(b) => format!(
            r#"<c r="{}" t="b"><v>{}</v></c>"#,
            reference,
            if *b { 1 } else { 0 }
        ),
        Fixture::Formula(f, cached) => format!(
            r#"<c r="{}" t="str"><f>{}</f><v>{}</v></c>"#,
            reference,
            escape(f),
            escape(cached)
        ),
        Fixture::Raw(xml) => xml.to_string(),
    }
}

fn sheet_xml(cells: &[(&str, Fixture)]) -> String {
    let mut rows: BTreeMap<u32, BTreeMap<u32, String>> = BTreeMap::new();
    for (reference, cell) in cells {
        let parsed = CellReference::parse(reference).expect("fixture reference");
        rows.entry(parsed.row)
            .or_default()
            .insert(parsed.col, cell_xml(&parsed.to_string(), cell));
    }

    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
    );
    for (row, cells) in rows {
        xml.push_str(&format!(r#"<row r="{}">"#, row + 1));
        for cell in cells.values() {
            xml.push_str(cell);
        }
        xml.push_str("</row>");
    }
    xml.push_str("</sheetData></worksheet>");
    xml
}

/// Write a minimal valid XLSX file with the given sheets and cells
pub fn create_xlsx(path: &Path, sheets: &[SheetSpec<'_>]) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);

    zip.start_file("[Content_Types].xml", options)?;
    let mut content_types = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
"#,
    );
    for i in 0..sheets.len() {
        content_types.push_str(&format!(
            r#"<Override PartName="/xl/worksheets/sheet{}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
            i + 1
        ));
    }
    content_types.push_str("</Types>");
    zip.write_all(content_types.as_bytes())?;

    zip.start_file("_rels/.rels", options)?;
    zip.write_all(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#.as_bytes())?;

    zip.start_file("xl/workbook.xml", options)?;
    let mut workbook_xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<sheets>
"#,
    );
    for (i, (name, _)) in sheets.iter().enumerate() {
        workbook_xml.push_str(&format!(
            r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
            escape(name),
            i + 1,
            i + 1
        ));
    }
    workbook_xml.push_str("</sheets></workbook>");
    zip.write_all(workbook_xml.as_bytes())?;

    zip.start_file("xl/_rels/workbook.xml.rels", options)?;
    let mut rels_xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
"#,
    );
    for i in 0..sheets.len() {
        rels_xml.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
            i + 1,
            i + 1
        ));
    }
    rels_xml.push_str("</Relationships>");
    zip.write_all(rels_xml.as_bytes())?;

    for (i, (_, cells)) in sheets.iter().enumerate() {
        zip.start_file(format!("xl/worksheets/sheet{}.xml", i + 1), options)?;
        zip.write_all(sheet_xml(cells).as_bytes())?;
    }

    zip.finish()?;
    Ok(())
}
