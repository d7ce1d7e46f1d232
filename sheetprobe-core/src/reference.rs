//! A1-style cell references and rectangular ranges

use crate::error::ProbeError;
use std::cmp::Ordering;
use std::fmt;

/// Cell reference (e.g., A1, B2), 0-based internally
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellReference {
    pub row: u32,
    pub col: u32,
}

impl CellReference {
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Convert to Excel-style reference (e.g., "A1")
    pub fn to_excel_ref(&self) -> String {
        format!("{}{}", self.column_letters(), self.row + 1)
    }

    /// Column part of the reference (e.g., "AA")
    pub fn column_letters(&self) -> String {
        col_to_letter(self.col)
    }

    /// Parse an Excel-style reference such as "J3" or "$AB$12"
    pub fn parse(s: &str) -> Result<Self, ProbeError> {
        let invalid = || ProbeError::InvalidCellReference(s.to_string());
        let trimmed = s.trim().replace('$', "");

        let split = trimmed
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(invalid)?;
        let (letters, digits) = trimmed.split_at(split);

        if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(invalid());
        }

        let mut col: u32 = 0;
        for c in letters.chars() {
            let value = (c.to_ascii_uppercase() as u8 - b'A') as u32 + 1;
            col = col
                .checked_mul(26)
                .and_then(|v| v.checked_add(value))
                .ok_or_else(invalid)?;
        }

        let row: u32 = digits.parse().map_err(|_| invalid())?;
        if row == 0 {
            return Err(invalid());
        }

        Ok(Self::new(row - 1, col - 1))
    }
}

/// Convert column number to letter (0 -> A, 1 -> B, etc.)
fn col_to_letter(mut col: u32) -> String {
    let mut result = String::new();
    loop {
        result.insert(0, (b'A' + (col % 26) as u8) as char);
        if col < 26 {
            break;
        }
        col = col / 26 - 1;
    }
    result
}

impl PartialOrd for CellReference {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellReference {
    fn cmp(&self, other: &Self) -> Ordering {
        self.row.cmp(&other.row).then_with(|| self.col.cmp(&other.col))
    }
}

impl fmt::Display for CellReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_excel_ref())
    }
}

/// Inclusive rectangular range of cells (e.g., "A15:E24")
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    pub start: CellReference,
    pub end: CellReference,
}

impl CellRange {
    /// Build a range from two corners in any order
    pub fn new(a: CellReference, b: CellReference) -> Self {
        Self {
            start: CellReference::new(a.row.min(b.row), a.col.min(b.col)),
            end: CellReference::new(a.row.max(b.row), a.col.max(b.col)),
        }
    }

    /// Parse "A1:B2"; a single reference yields a one-cell range
    pub fn parse(s: &str) -> Result<Self, ProbeError> {
        let parts: Vec<&str> = s.split(':').collect();
        match parts.as_slice() {
            [single] => {
                let cell = CellReference::parse(single)?;
                Ok(Self::new(cell, cell))
            }
            [a, b] => Ok(Self::new(CellReference::parse(a)?, CellReference::parse(b)?)),
            _ => Err(ProbeError::InvalidRange(s.to_string())),
        }
    }

    /// Number of cells covered by the range
    pub fn cell_count(&self) -> usize {
        let rows = (self.end.row - self.start.row + 1) as usize;
        let cols = (self.end.col - self.start.col + 1) as usize;
        rows * cols
    }

    /// Iterate references row by row, columns left to right within each row
    pub fn cells(&self) -> impl Iterator<Item = CellReference> + '_ {
        (self.start.row..=self.end.row).flat_map(move |row| {
            (self.start.col..=self.end.col).map(move |col| CellReference::new(row, col))
        })
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}:{}", self.start, self.end)
        }
    }
}
