//! Inspection plan configuration (TOML)

use crate::error::ProbeError;
use crate::probe::{CellLookup, InspectionPlan, LabelStyle, Part, Probe, ScanProbe, Section};
use crate::reference::{CellRange, CellReference};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Built-in plan for the bridging calculator workbook
const BRIDGING_PLAN: &str = include_str!("../plans/bridging.toml");

/// Plan configuration as written in TOML
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlanConfig {
    #[serde(default, rename = "part")]
    pub parts: Vec<PartConfig>,
}

impl PlanConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read plan: {}", path.display()))?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: PlanConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// The built-in bridging calculator plan
    pub fn bridging() -> Result<Self> {
        Self::from_toml(BRIDGING_PLAN).context("Built-in bridging plan is malformed")
    }

    /// Validate the configuration and turn it into an executable plan
    pub fn compile(&self) -> Result<InspectionPlan, ProbeError> {
        if self.parts.is_empty() {
            return Err(ProbeError::InvalidPlan("plan has no parts".to_string()));
        }

        let parts = self
            .parts
            .iter()
            .map(PartConfig::compile)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(InspectionPlan { parts })
    }
}

/// A titled group of sections
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartConfig {
    pub title: String,
    #[serde(default, rename = "section")]
    pub sections: Vec<SectionConfig>,
}

impl PartConfig {
    fn compile(&self) -> Result<Part, ProbeError> {
        let sections = self
            .sections
            .iter()
            .map(|s| s.compile(&self.title))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Part {
            title: self.title.clone(),
            sections,
        })
    }
}

/// One probe against one sheet: either a `range` scan or a list of `lookups`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SectionConfig {
    pub sheet: String,
    pub heading: Option<String>,
    pub caption: Option<String>,
    #[serde(default)]
    pub heading_first: bool,
    pub range: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub truncate: Option<usize>,
    pub label: Option<LabelStyle>,
    pub lookups: Option<Vec<LookupConfig>>,
}

impl SectionConfig {
    fn compile(&self, part_title: &str) -> Result<Section, ProbeError> {
        let context = |msg: &str| {
            ProbeError::InvalidPlan(format!(
                "section on sheet '{}' in part '{}': {}",
                self.sheet, part_title, msg
            ))
        };

        if self.sheet.trim().is_empty() {
            return Err(context("sheet name is empty"));
        }

        let probe = match (&self.range, &self.lookups) {
            (Some(_), Some(_)) => return Err(context("set either 'range' or 'lookups', not both")),
            (None, None) => return Err(context("one of 'range' or 'lookups' is required")),
            (Some(range), None) => {
                if self.truncate == Some(0) {
                    return Err(context("'truncate' must be at least 1"));
                }
                if self.keywords.iter().any(|k| k.trim().is_empty()) {
                    return Err(context("keywords must not be blank"));
                }
                Probe::Scan(ScanProbe::new(
                    CellRange::parse(range)?,
                    &self.keywords,
                    self.truncate,
                    self.label.unwrap_or_default(),
                ))
            }
            (None, Some(lookups)) => {
                if !self.keywords.is_empty() || self.truncate.is_some() || self.label.is_some() {
                    return Err(context(
                        "'keywords', 'truncate' and 'label' only apply to range scans",
                    ));
                }
                if lookups.is_empty() {
                    return Err(context("'lookups' is empty"));
                }
                let cells = lookups
                    .iter()
                    .map(|l| {
                        Ok(CellLookup {
                            label: l.label.clone(),
                            reference: CellReference::parse(&l.cell)?,
                        })
                    })
                    .collect::<Result<Vec<_>, ProbeError>>()?;
                Probe::Lookup(cells)
            }
        };

        Ok(Section {
            sheet: self.sheet.clone(),
            heading: self.heading.clone(),
            caption: self.caption.clone(),
            heading_first: self.heading_first,
            probe,
        })
    }
}

/// A labelled single-cell lookup
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LookupConfig {
    pub label: String,
    pub cell: String,
}
