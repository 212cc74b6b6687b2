//! Browser-driven accessibility audit.
//!
//! Loads a page over WebDriver, runs axe-core in it, adds a few layout and
//! interaction heuristics, and reduces the axe-core violations to a single
//! 0–100 score.

pub mod audit;
pub mod browser;
pub mod checks;
pub mod config;
pub mod error;
pub mod report;
pub mod rules;
pub mod util;

pub use audit::{audit, audit_with};

pub const TOOL_NAME: &str = "a11yscore";

/// JSON schema version of audit reports.
/// Bump when report fields change meaning or disappear.
pub const SCHEMA_VERSION: &str = "0.1.0";
