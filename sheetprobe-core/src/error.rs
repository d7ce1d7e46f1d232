//! Error types for inspection runs

use thiserror::Error;

/// Errors raised while building or running an inspection plan.
///
/// Workbook open failures (missing file, unsupported or corrupt format) come
/// from calamine and are reported through `anyhow` context instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    /// The plan names a sheet the workbook does not contain.
    #[error("Sheet not found: '{sheet}' (available: {available})")]
    SheetNotFound { sheet: String, available: String },

    /// A cell reference could not be parsed (e.g. "J" or "A0").
    #[error("Invalid cell reference: '{0}'")]
    InvalidCellReference(String),

    /// A range could not be parsed (e.g. "A1:B2:C3").
    #[error("Invalid range: '{0}'")]
    InvalidRange(String),

    /// The plan is structurally invalid.
    #[error("Invalid plan: {0}")]
    InvalidPlan(String),
}
