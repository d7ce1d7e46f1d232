//! Workbook data structures

use crate::error::ProbeError;
use crate::reference::CellReference;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

/// Represents a complete workbook, read-only once loaded
#[derive(Debug, Clone)]
pub struct Workbook {
    pub path: PathBuf,
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    /// Get a sheet by name
    pub fn get_sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    /// Get a sheet by name, failing when the workbook has no such sheet
    pub fn sheet(&self, name: &str) -> Result<&Sheet, ProbeError> {
        self.get_sheet(name).ok_or_else(|| ProbeError::SheetNotFound {
            sheet: name.to_string(),
            available: self.sheet_names().join(", "),
        })
    }

    /// Get all sheet names
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }
}

static EMPTY: CellValue = CellValue::Empty;

/// Represents a worksheet
#[derive(Debug, Clone)]
pub struct Sheet {
    pub name: String,
    pub cells: HashMap<(u32, u32), Cell>,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cells: HashMap::new(),
        }
    }

    /// Get a cell at the given position
    pub fn get_cell(&self, reference: CellReference) -> Option<&Cell> {
        self.cells.get(&(reference.row, reference.col))
    }

    /// Value at the given position; missing cells read as `Empty`
    pub fn value_at(&self, reference: CellReference) -> &CellValue {
        self.get_cell(reference)
            .map(|c| &c.value)
            .unwrap_or(&EMPTY)
    }

    /// Insert or replace a cell
    pub fn set_cell(&mut self, reference: CellReference, value: CellValue) {
        self.cells.insert(
            (reference.row, reference.col),
            Cell {
                row: reference.row,
                col: reference.col,
                value,
            },
        );
    }

    /// Get all cells with values
    pub fn all_cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.values()
    }
}

/// Represents a single cell
#[derive(Debug, Clone)]
pub struct Cell {
    pub row: u32,
    pub col: u32,
    pub value: CellValue,
}

/// Cell value types
///
/// Formulas are kept as written (without the leading `=`) and never evaluated.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Number(f64),
    Text(String),
    Boolean(bool),
    /// Calendar rendering of a date or time cell
    DateTime(String),
    Error(String),
    Formula(String),
}

impl CellValue {
    pub fn text(s: impl Into<String>) -> Self {
        CellValue::Text(s.into())
    }

    pub fn formula(f: impl Into<String>) -> Self {
        CellValue::Formula(f.into())
    }

    /// Check if the cell is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Check if the cell contains a formula
    pub fn is_formula(&self) -> bool {
        matches!(self, CellValue::Formula(_))
    }

    /// Whether the value counts as filled in for a report.
    ///
    /// Empty cells, empty strings, zero and `false` are all treated as blank.
    pub fn is_present(&self) -> bool {
        match self {
            CellValue::Empty => false,
            CellValue::Number(n) => *n != 0.0,
            CellValue::Text(s) => !s.is_empty(),
            CellValue::Boolean(b) => *b,
            CellValue::DateTime(_) | CellValue::Error(_) | CellValue::Formula(_) => true,
        }
    }

    /// Textual content for keyword matching: text cells and formula source.
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Text(s) => Some(s.clone()),
            CellValue::Formula(_) => Some(self.to_string()),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => write!(f, "None"),
            CellValue::Number(n) => write!(f, "{}", format_number(*n)),
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Boolean(true) => write!(f, "True"),
            CellValue::Boolean(false) => write!(f, "False"),
            CellValue::DateTime(d) => write!(f, "{}", d),
            CellValue::Error(e) => write!(f, "{}", e),
            CellValue::Formula(formula) => write!(f, "={}", formula),
        }
    }
}

/// Integral values print without a fractional part ("5", not "5.0").
/// Magnitudes below 1e-4 or from 1e16 up switch to exponent form (`1e-05`, `1e+16`).
fn format_number(n: f64) -> String {
    if !n.is_finite() {
        return format!("{}", n);
    }
    let magnitude = n.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        return format_exponent(n);
    }
    if n.fract() == 0.0 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// `1.5e-7` becomes `1.5e-07`: signed exponent, at least two digits
fn format_exponent(n: f64) -> String {
    let formatted = format!("{:e}", n);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => formatted,
    }
}
