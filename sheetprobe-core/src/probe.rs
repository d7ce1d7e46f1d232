//! Inspection plans and the probes they run against a sheet

use crate::reader::{CellValue, Sheet};
use crate::reference::{CellRange, CellReference};
use crate::report::{LineKind, ReportLine};
use log::debug;
use serde::Deserialize;

/// Ordered parts, each printed under its own banner
#[derive(Debug, Clone)]
pub struct InspectionPlan {
    pub parts: Vec<Part>,
}

impl InspectionPlan {
    /// Every sheet the plan reads, in first-use order
    pub fn sheet_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for section in self.parts.iter().flat_map(|p| &p.sections) {
            if !names.contains(&section.sheet.as_str()) {
                names.push(&section.sheet);
            }
        }
        names
    }
}

#[derive(Debug, Clone)]
pub struct Part {
    pub title: String,
    pub sections: Vec<Section>,
}

/// A probe bound to a sheet, with the text printed above its results
#[derive(Debug, Clone)]
pub struct Section {
    pub sheet: String,
    pub heading: Option<String>,
    pub caption: Option<String>,
    /// Write heading and caption before the sheet is looked up
    pub heading_first: bool,
    pub probe: Probe,
}

#[derive(Debug, Clone)]
pub enum Probe {
    Scan(ScanProbe),
    Lookup(Vec<CellLookup>),
}

impl Probe {
    pub fn run(&self, sheet: &Sheet) -> Vec<ReportLine> {
        match self {
            Probe::Scan(scan) => scan.run(sheet),
            Probe::Lookup(cells) => cells.iter().map(|c| c.run(sheet)).collect(),
        }
    }
}

/// How a scan labels the cells it prints
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelStyle {
    /// `B7: value`
    #[default]
    Coordinate,
    /// `  B: value`, for scans along a single row
    Column,
}

/// Scan of a rectangular range, optionally filtered by keywords
#[derive(Debug, Clone)]
pub struct ScanProbe {
    pub range: CellRange,
    /// Lowercased; empty means every present cell is reported
    pub keywords: Vec<String>,
    /// Maximum number of characters printed per value
    pub truncate: Option<usize>,
    pub label: LabelStyle,
}

impl ScanProbe {
    pub fn new(
        range: CellRange,
        keywords: &[String],
        truncate: Option<usize>,
        label: LabelStyle,
    ) -> Self {
        Self {
            range,
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
            truncate,
            label,
        }
    }

    pub fn run(&self, sheet: &Sheet) -> Vec<ReportLine> {
        debug!(
            "Scanning {} cells of '{}' in {}",
            self.range.cell_count(),
            sheet.name,
            self.range
        );
        self.range
            .cells()
            .filter_map(|reference| {
                let value = sheet.value_at(reference);
                if !self.matches(value) {
                    return None;
                }
                Some(ReportLine {
                    kind: LineKind::Match,
                    cell: reference.to_string(),
                    label: self.label_for(reference),
                    value: Some(truncate_chars(&value.to_string(), self.truncate)),
                })
            })
            .collect()
    }

    /// Present values pass when unfiltered; filtered scans need textual
    /// content containing a keyword, ignoring case.
    pub fn matches(&self, value: &CellValue) -> bool {
        if !value.is_present() {
            return false;
        }
        if self.keywords.is_empty() {
            return true;
        }
        match value.as_text() {
            Some(text) => {
                let text = text.to_lowercase();
                self.keywords.iter().any(|k| text.contains(k.as_str()))
            }
            None => false,
        }
    }

    fn label_for(&self, reference: CellReference) -> String {
        match self.label {
            LabelStyle::Coordinate => reference.to_string(),
            LabelStyle::Column => format!("  {}", reference.column_letters()),
        }
    }
}

/// Raw read of one cell, printed even when the cell is empty
#[derive(Debug, Clone)]
pub struct CellLookup {
    pub label: String,
    pub reference: CellReference,
}

impl CellLookup {
    pub fn run(&self, sheet: &Sheet) -> ReportLine {
        let value = sheet.value_at(self.reference);
        ReportLine {
            kind: LineKind::Lookup,
            cell: self.reference.to_string(),
            label: self.label.clone(),
            value: (!value.is_empty()).then(|| value.to_string()),
        }
    }
}

/// Keep at most `limit` characters, with no ellipsis
pub fn truncate_chars(s: &str, limit: Option<usize>) -> String {
    match limit {
        Some(limit) => s.chars().take(limit).collect(),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet_with(cells: &[(&str, CellValue)]) -> Sheet {
        let mut sheet = Sheet::new("Main Calculations");
        for (cell, value) in cells {
            sheet.set_cell(CellReference::parse(cell).unwrap(), value.clone());
        }
        sheet
    }

    fn scan(range: &str, keywords: &[&str], truncate: Option<usize>) -> ScanProbe {
        let keywords: Vec<String> = keywords.iter().map(|k| k.to_string()).collect();
        ScanProbe::new(
            CellRange::parse(range).unwrap(),
            &keywords,
            truncate,
            LabelStyle::Coordinate,
        )
    }

    #[test]
    fn test_keyword_match_reports_cell() {
        let sheet = sheet_with(&[
            ("C12", CellValue::text("2nd Charge")),
            ("D12", CellValue::text("Loan Amount")),
        ]);

        let lines = scan("A1:I79", &["charge", "1st", "2nd"], Some(70)).run(&sheet);

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].cell, "C12");
        assert_eq!(lines[0].to_text(), "C12: 2nd Charge");
    }

    #[test]
    fn test_keyword_match_ignores_case() {
        let probe = scan("A1:D29", &["Commercial"], None);

        assert!(probe.matches(&CellValue::text("commercial property")));
        assert!(probe.matches(&CellValue::text("COMMERCIAL PROPERTY")));
        assert!(!probe.matches(&CellValue::text("Residential")));
    }

    #[test]
    fn test_keyword_filter_skips_non_text() {
        let probe = scan("A1:A1", &["1"], None);

        assert!(!probe.matches(&CellValue::Number(1.0)));
        assert!(!probe.matches(&CellValue::Boolean(true)));
        assert!(probe.matches(&CellValue::formula("IF(A1=1,\"1st\",\"2nd\")")));
    }

    #[test]
    fn test_long_values_truncate_to_limit() {
        let long = "Charge type is derived from the security position entered on the input sheet";
        assert!(long.chars().count() > 70);
        let sheet = sheet_with(&[("A15", CellValue::text(long))]);

        let lines = scan("A15:E24", &[], Some(70)).run(&sheet);

        let value = lines[0].value.as_deref().unwrap();
        assert_eq!(value.chars().count(), 70);
        assert_eq!(value, &long[..70]);
        assert!(!value.ends_with("..."));
    }

    #[test]
    fn test_truncate_counts_characters() {
        assert_eq!(truncate_chars("£1,000,000 – £2m", Some(3)), "£1,");
        assert_eq!(truncate_chars("short", Some(70)), "short");
        assert_eq!(truncate_chars("untouched", None), "untouched");
    }

    #[test]
    fn test_blank_cells_are_skipped() {
        let sheet = sheet_with(&[
            ("A15", CellValue::Empty),
            ("B15", CellValue::text("")),
            ("C15", CellValue::Number(0.0)),
            ("D15", CellValue::text("Charge Type")),
        ]);

        let lines = scan("A15:E24", &[], Some(70)).run(&sheet);

        let cells: Vec<&str> = lines.iter().map(|l| l.cell.as_str()).collect();
        assert_eq!(cells, vec!["D15"]);
    }

    #[test]
    fn test_scan_order_is_row_major() {
        let sheet = sheet_with(&[
            ("B2", CellValue::text("1st")),
            ("A3", CellValue::text("2nd")),
            ("C1", CellValue::text("charge")),
        ]);

        let lines = scan("A1:C3", &[], None).run(&sheet);

        let cells: Vec<&str> = lines.iter().map(|l| l.cell.as_str()).collect();
        assert_eq!(cells, vec!["C1", "B2", "A3"]);
    }

    #[test]
    fn test_column_labels() {
        let mut sheet = Sheet::new("Rates");
        sheet.set_cell(CellReference::parse("C7").unwrap(), CellValue::text("Residential"));
        sheet.set_cell(CellReference::parse("D7").unwrap(), CellValue::Number(0.0095));

        let probe = ScanProbe::new(
            CellRange::parse("B7:J7").unwrap(),
            &[],
            None,
            LabelStyle::Column,
        );
        let text: Vec<String> = probe.run(&sheet).iter().map(|l| l.to_text()).collect();

        assert_eq!(text, vec!["  C: Residential", "  D: 0.0095"]);
    }

    #[test]
    fn test_lookup_prints_raw_value_or_none() {
        let mut sheet = Sheet::new("Multi Property Deal");
        sheet.set_cell(CellReference::parse("J3").unwrap(), CellValue::text("Property Type"));

        let header = CellLookup {
            label: "Header J3".to_string(),
            reference: CellReference::parse("J3").unwrap(),
        };
        let formula = CellLookup {
            label: "J4 formula".to_string(),
            reference: CellReference::parse("J4").unwrap(),
        };

        assert_eq!(header.run(&sheet).to_text(), "Header J3: Property Type");
        let missing = formula.run(&sheet);
        assert_eq!(missing.value, None);
        assert_eq!(missing.to_text(), "J4 formula: None");
    }

    #[test]
    fn test_lookup_is_never_truncated() {
        let long = format!("IF({},\"Commercial\",\"Residential\")", "A1=1,".repeat(30));
        let mut sheet = Sheet::new("Multi Property Deal");
        sheet.set_cell(CellReference::parse("J4").unwrap(), CellValue::formula(long.clone()));

        let line = CellLookup {
            label: "J4 formula".to_string(),
            reference: CellReference::parse("J4").unwrap(),
        }
        .run(&sheet);

        assert_eq!(line.value, Some(format!("={}", long)));
    }

    #[test]
    fn test_plan_sheet_names_dedup() {
        let section = |sheet: &str| Section {
            sheet: sheet.to_string(),
            heading: None,
            caption: None,
            heading_first: false,
            probe: Probe::Lookup(Vec::new()),
        };
        let plan = InspectionPlan {
            parts: vec![
                Part {
                    title: "A".to_string(),
                    sections: vec![section("Rates"), section("Dropdowns")],
                },
                Part {
                    title: "B".to_string(),
                    sections: vec![section("Rates")],
                },
            ],
        };

        assert_eq!(plan.sheet_names(), vec!["Rates", "Dropdowns"]);
    }
}
