use serde::{Deserialize, Serialize};

use crate::SCHEMA_VERSION;
use crate::browser::axe::TestEngine;
use crate::checks::model::HeuristicChecks;
use crate::rules::catalog::Impact;
use crate::rules::eval::Violation;
use crate::rules::score::ScoreInfo;
use crate::util::deterministic::{sort_criteria, sort_warnings};

/// Top-level audit report.
///
/// `final_score` and `criteria` come first and keep their names and
/// shapes; consumers of the plain score file rely on them. The remaining
/// blocks are additive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub final_score: f64,
    pub criteria: Vec<CriterionInfo>,
    pub schema_version: String,
    pub tool: ToolInfo,
    pub page: PageInfo,
    pub scoring: ScoreInfo,
    pub checks: HeuristicChecks,
    pub analysis: AnalysisInfo,
}

impl Report {
    /// Assemble a report from pipeline outputs.
    ///
    /// Criteria are sorted by rule id; the penalty breakdown inside
    /// `scoring` keeps audit-engine order.
    pub fn new(
        tool: ToolInfo,
        page: PageInfo,
        violations: &[Violation],
        scoring: ScoreInfo,
        checks: HeuristicChecks,
        mut analysis: AnalysisInfo,
    ) -> Self {
        let mut criteria: Vec<CriterionInfo> = violations.iter().map(CriterionInfo::from).collect();
        sort_criteria(&mut criteria);
        sort_warnings(&mut analysis.warnings);

        Self {
            final_score: scoring.final_score,
            criteria,
            schema_version: SCHEMA_VERSION.to_string(),
            tool,
            page,
            scoring,
            checks,
            analysis,
        }
    }

    pub fn exit_code(&self) -> i32 {
        self.scoring.exit_code
    }
}

/// Tool metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,
}

/// The audited page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageInfo {
    /// URL requested on the command line.
    pub url: String,
    /// URL axe-core reports having audited (after redirects).
    pub audited_url: String,
    pub engine: TestEngine,
    pub timestamp: String,
}

/// One violated rule in the report summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionInfo {
    pub id: String,
    pub description: String,
    pub impact: Option<Impact>,
    pub errors_count: u64,
}

impl From<&Violation> for CriterionInfo {
    fn from(v: &Violation) -> Self {
        Self {
            id: v.id.clone(),
            description: v.description.clone(),
            impact: v.impact.clone(),
            errors_count: v.nodes_count,
        }
    }
}

/// Whether every heuristic check completed.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AnalysisInfo {
    pub status: String,
    pub warnings: Vec<String>,
}

impl AnalysisInfo {
    pub fn ok() -> Self {
        Self {
            status: "ok".into(),
            warnings: vec![],
        }
    }

    /// Record a failed check; the status degrades to `partial`.
    pub fn warn(&mut self, msg: impl Into<String>) {
        self.status = "partial".into();
        self.warnings.push(msg.into());
    }

    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}
