//! Report specifications, statuses, and validation.
//!
//! An "état" is an issued report: the user submits a [`ReportSpec`], the
//! engine persists a descriptor, computes totals, and renders artifacts.

mod types;
mod validation;

pub use types::{
    AuditAction, OutputFormat, OutputOptions, Periodicity, ReportKind, ReportSpec, ReportStatus,
    ReportTotals, ScalarFilters, SetFilters, SortKey, SortOrder,
};
pub use validation::SpecViolations;
