//! sheetprobe-core: fixed-range workbook inspection
//!
//! Reads a workbook with formulas left unevaluated, then runs an inspection
//! plan against it: each section scans a range of one sheet (optionally
//! filtered by keywords) or looks up single cells, producing a report that
//! can be printed as text or serialized.

pub mod config;
pub mod error;
pub mod probe;
pub mod reader;
pub mod reference;
pub mod report;

use anyhow::Result;
use log::debug;
use report::Highlight;
use std::io::Write;
use std::path::Path;

pub use config::PlanConfig;
pub use error::ProbeError;
pub use probe::{InspectionPlan, Probe, Section};
pub use reader::{CellValue, Workbook, read_workbook};
pub use reference::{CellRange, CellReference};
pub use report::{PartReport, Report, ReportLine, SectionReport};

/// Main inspector interface
pub struct Inspector {
    plan: InspectionPlan,
}

impl Inspector {
    /// Create an inspector running the built-in bridging calculator plan
    pub fn bridging() -> Result<Self> {
        let plan = PlanConfig::bridging()?.compile()?;
        Ok(Self::with_plan(plan))
    }

    /// Create an inspector for a custom plan
    pub fn with_plan(plan: InspectionPlan) -> Self {
        Self { plan }
    }

    pub fn plan(&self) -> &InspectionPlan {
        &self.plan
    }

    /// Read a spreadsheet file and run the whole plan against it
    pub fn inspect_file<P: AsRef<Path>>(&self, path: P) -> Result<Report> {
        let workbook = reader::read_workbook(path)?;
        self.inspect(&workbook)
    }

    /// Run the whole plan; the first failing section aborts the run
    pub fn inspect(&self, workbook: &Workbook) -> Result<Report> {
        let mut parts = Vec::with_capacity(self.plan.parts.len());

        for part in &self.plan.parts {
            let sections = part
                .sections
                .iter()
                .map(|section| self.run_section(workbook, section))
                .collect::<Result<Vec<_>, _>>()?;

            parts.push(PartReport {
                title: part.title.clone(),
                sections,
            });
        }

        Ok(Report {
            file: workbook.path.clone(),
            parts,
        })
    }

    /// Run the plan, writing each section as text as soon as it is evaluated.
    ///
    /// On failure, everything written before the failing section stays in
    /// `out`; for `heading_first` sections that includes its heading.
    pub fn write_text<W: Write, H: Highlight>(
        &self,
        workbook: &Workbook,
        out: &mut W,
        highlight: &H,
    ) -> Result<()> {
        for (index, part) in self.plan.parts.iter().enumerate() {
            report::write_part_header(out, &part.title, index == 0, highlight)?;
            for section in &part.sections {
                if section.heading_first {
                    report::write_section_header(
                        out,
                        section.heading.as_deref(),
                        section.caption.as_deref(),
                        highlight,
                    )?;
                    out.flush()?;
                    let result = self.run_section(workbook, section)?;
                    report::write_section_lines(out, &result)?;
                } else {
                    let result = self.run_section(workbook, section)?;
                    report::write_section(out, &result, highlight)?;
                }
                out.flush()?;
            }
        }
        Ok(())
    }

    /// Run a single section against its sheet
    pub fn run_section(
        &self,
        workbook: &Workbook,
        section: &Section,
    ) -> Result<SectionReport, ProbeError> {
        let sheet = workbook.sheet(&section.sheet)?;
        let lines = section.probe.run(sheet);

        debug!(
            "Section {:?} on '{}': {} line(s)",
            section.heading.as_deref().or(section.caption.as_deref()),
            section.sheet,
            lines.len()
        );

        Ok(SectionReport {
            sheet: section.sheet.clone(),
            heading: section.heading.clone(),
            caption: section.caption.clone(),
            lines,
        })
    }
}
