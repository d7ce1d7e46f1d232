//! Excel/ODS file reader using calamine

use anyhow::{Context, Result};
use calamine::{Data, ExcelDateTime, Range, Reader, SheetType, Sheets, open_workbook_auto};
use log::debug;
use std::path::Path;

pub mod workbook;

pub use workbook::{Cell, CellValue, Sheet, Workbook};

use crate::reference::CellReference;

/// Read a workbook from a file path.
///
/// Formulas are kept as source text; cached results of formula cells are
/// discarded. The file is never written back.
pub fn read_workbook<P: AsRef<Path>>(path: P) -> Result<Workbook> {
    let path = path.as_ref();
    let mut excel: Sheets<_> = open_workbook_auto(path)
        .with_context(|| format!("Failed to open workbook: {}", path.display()))?;

    // Chart, dialog and macro sheets hold no cell grid
    let sheet_names: Vec<String> = excel
        .sheets_metadata()
        .iter()
        .filter(|meta| {
            let keep = meta.typ == SheetType::WorkSheet;
            if !keep {
                debug!("Skipping {:?} '{}'", meta.typ, meta.name);
            }
            keep
        })
        .map(|meta| meta.name.clone())
        .collect();
    debug!(
        "Opened {} with {} worksheet(s)",
        path.display(),
        sheet_names.len()
    );

    let mut sheets = Vec::with_capacity(sheet_names.len());

    for sheet_name in &sheet_names {
        let range = excel
            .worksheet_range(sheet_name)
            .with_context(|| format!("Failed to read sheet '{}'", sheet_name))?;
        let formula_range = excel
            .worksheet_formula(sheet_name)
            .with_context(|| format!("Failed to read formulas of sheet '{}'", sheet_name))?;

        let sheet = parse_sheet(sheet_name, &range, &formula_range);
        debug!(
            "Loaded sheet '{}' ({} cells, {} formulas)",
            sheet.name,
            sheet.cells.len(),
            sheet.all_cells().filter(|c| c.value.is_formula()).count()
        );
        sheets.push(sheet);
    }

    Ok(Workbook {
        path: path.to_path_buf(),
        sheets,
    })
}

fn parse_sheet(name: &str, range: &Range<Data>, formula_range: &Range<String>) -> Sheet {
    let mut sheet = Sheet::new(name);

    let (start_row, start_col) = range.start().unwrap_or((0, 0));
    for (rel_row, rel_col, data) in range.used_cells() {
        let reference = CellReference::new(
            start_row + rel_row as u32,
            start_col + rel_col as u32,
        );
        sheet.set_cell(reference, parse_cell_value(data));
    }

    // Formulas take precedence over their cached values
    let (start_row, start_col) = formula_range.start().unwrap_or((0, 0));
    for (rel_row, rel_col, formula) in formula_range.used_cells() {
        if formula.is_empty() {
            continue;
        }
        let reference = CellReference::new(
            start_row + rel_row as u32,
            start_col + rel_col as u32,
        );
        sheet.set_cell(reference, CellValue::Formula(formula.clone()));
    }

    sheet
}

fn parse_cell_value(data: &Data) -> CellValue {
    match data {
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Boolean(*b),
        Data::Error(e) => CellValue::Error(e.to_string()),
        Data::Empty => CellValue::Empty,
        Data::DateTime(dt) => match format_datetime(dt) {
            Some(text) => CellValue::DateTime(text),
            None => CellValue::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) => CellValue::Text(s.clone()),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}

/// `2026-01-07 00:00:00` for dates, `10:30:00` for bare times of day.
/// Durations have no calendar form and stay serial numbers.
fn format_datetime(dt: &ExcelDateTime) -> Option<String> {
    if dt.is_duration() {
        return None;
    }
    let value = dt.as_datetime()?;
    if (0.0..1.0).contains(&dt.as_f64()) {
        Some(value.time().to_string())
    } else {
        Some(value.to_string())
    }
}
