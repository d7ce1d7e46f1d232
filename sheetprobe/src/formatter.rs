//! Output formatters for inspection reports

use anyhow::Result;
use colored::*;
use sheetprobe_core::report::Highlight;
use sheetprobe_core::{Inspector, Report, Workbook};
use std::io;

/// Bold banners and cyan headings; finding lines stay plain
pub struct Terminal;

impl Highlight for Terminal {
    fn banner(&self, text: &str) -> String {
        text.bold().to_string()
    }

    fn heading(&self, text: &str) -> String {
        text.cyan().bold().to_string()
    }
}

/// Run the plan and print each section as soon as it is evaluated
pub fn print_streamed(inspector: &Inspector, workbook: &Workbook) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    inspector.write_text(workbook, &mut out, &Terminal)
}

/// Print the workbook's sheet names, one per line
pub fn print_sheet_names(workbook: &Workbook) {
    println!("{}", format!("Sheets in {}:", workbook.path.display()).bold());
    for name in workbook.sheet_names() {
        println!("  {}", name);
    }
}

/// Print the report in JSON format
pub fn print_json(report: &Report) -> Result<()> {
    let output = serde_json::json!({
        "file": report.file.display().to_string(),
        "parts": report.parts,
        "summary": {
            "sections": report.parts.iter().map(|p| p.sections.len()).sum::<usize>(),
            "lines": report.line_count(),
        }
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
