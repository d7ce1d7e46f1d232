//! Inspection report model and plain-text layout

use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;

/// Width of the `=` rule printed around part titles
pub const BANNER_WIDTH: usize = 70;

/// Result of running a whole plan against a workbook
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub file: PathBuf,
    pub parts: Vec<PartReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PartReport {
    pub title: String,
    pub sections: Vec<SectionReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionReport {
    pub sheet: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    pub lines: Vec<ReportLine>,
}

/// Why a line was reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    /// A scanned cell that passed the section's filter
    Match,
    /// A single-cell lookup, reported whatever its content
    Lookup,
}

/// One printed line: `<label>: <value>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportLine {
    pub kind: LineKind,
    /// A1 reference of the cell
    pub cell: String,
    pub label: String,
    /// Rendered value; `None` only for lookups of empty cells
    pub value: Option<String>,
}

impl ReportLine {
    pub fn to_text(&self) -> String {
        format!(
            "{}: {}",
            self.label,
            self.value.as_deref().unwrap_or("None")
        )
    }
}

/// Styling hooks for banners and headings; lines are always plain
pub trait Highlight {
    fn banner(&self, text: &str) -> String {
        text.to_string()
    }

    fn heading(&self, text: &str) -> String {
        text.to_string()
    }
}

/// No styling at all
pub struct Plain;

impl Highlight for Plain {}

/// Write a part banner; every part but the first is preceded by a blank line
pub fn write_part_header<W: Write, H: Highlight>(
    out: &mut W,
    title: &str,
    first: bool,
    highlight: &H,
) -> io::Result<()> {
    let rule = "=".repeat(BANNER_WIDTH);
    if !first {
        writeln!(out)?;
    }
    writeln!(out, "{}", highlight.banner(&rule))?;
    writeln!(out, "{}", highlight.banner(title))?;
    writeln!(out, "{}", highlight.banner(&rule))
}

/// Write a section: blank line, optional heading and caption, then its lines
pub fn write_section<W: Write, H: Highlight>(
    out: &mut W,
    section: &SectionReport,
    highlight: &H,
) -> io::Result<()> {
    write_section_header(
        out,
        section.heading.as_deref(),
        section.caption.as_deref(),
        highlight,
    )?;
    write_section_lines(out, section)
}

/// Blank line, then `=== heading ===` and the caption when present
pub fn write_section_header<W: Write, H: Highlight>(
    out: &mut W,
    heading: Option<&str>,
    caption: Option<&str>,
    highlight: &H,
) -> io::Result<()> {
    writeln!(out)?;
    if let Some(heading) = heading {
        writeln!(out, "{}", highlight.heading(&format!("=== {} ===", heading)))?;
    }
    if let Some(caption) = caption {
        writeln!(out, "{}", caption)?;
    }
    Ok(())
}

pub fn write_section_lines<W: Write>(out: &mut W, section: &SectionReport) -> io::Result<()> {
    for line in &section.lines {
        writeln!(out, "{}", line.to_text())?;
    }
    Ok(())
}

impl Report {
    /// Write the whole report as text
    pub fn write_text<W: Write, H: Highlight>(&self, out: &mut W, highlight: &H) -> io::Result<()> {
        for (index, part) in self.parts.iter().enumerate() {
            write_part_header(out, &part.title, index == 0, highlight)?;
            for section in &part.sections {
                write_section(out, section, highlight)?;
            }
        }
        Ok(())
    }

    /// Plain-text rendering of the whole report
    pub fn to_text(&self) -> String {
        let mut buf = Vec::new();
        // Writing into a Vec cannot fail
        let _ = self.write_text(&mut buf, &Plain);
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Number of reported lines across all sections
    pub fn line_count(&self) -> usize {
        self.parts
            .iter()
            .flat_map(|p| &p.sections)
            .map(|s| s.lines.len())
            .sum()
    }
}
