//! Scoring engine.
//!
//! Reduces a flat list of violations to a single number in `[0, 100]`:
//!
//!   score = 100 - sum(penalty)
//!
//! where each penalty is `weight(impact) * node_count`, or
//! `weight(impact) * 10` for single-error rules. The result is clamped.
//!
//! Scoring does not look at the heuristic checks; those are reported
//! alongside the score but never feed into it.

use serde::{Deserialize, Serialize};

use crate::rules::catalog::ImpactWeights;
use crate::rules::eval::{Penalty, Violation, penalty_for};

pub const MAX_SCORE: f64 = 100.0;
pub const MIN_SCORE: f64 = 0.0;

/// Scoring outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreInfo {
    pub final_score: f64,
    /// `100 - total_penalty` before clamping; may be negative.
    pub raw_score: f64,
    pub total_penalty: f64,
    pub weights: ImpactWeights,
    /// One entry per violation, in input order.
    pub penalties: Vec<Penalty>,
    pub min_score: Option<f64>,
    pub passed: bool,
    pub exit_code: i32,
}

/// Score `violations`.
///
/// `min_score` sets the pass threshold; without one every score passes.
///
/// Exit code mapping:
/// - passed        → 0
/// - below minimum → 1
pub fn score(
    violations: &[Violation],
    weights: &ImpactWeights,
    single_error_criteria: &[String],
    min_score: Option<f64>,
) -> ScoreInfo {
    let penalties: Vec<Penalty> = violations
        .iter()
        .map(|v| penalty_for(v, weights, single_error_criteria))
        .collect();

    let total_penalty: f64 = penalties.iter().map(|p| p.amount).sum();
    let raw_score = MAX_SCORE - total_penalty;
    let final_score = raw_score.clamp(MIN_SCORE, MAX_SCORE);

    let passed = min_score.is_none_or(|min| final_score >= min);

    ScoreInfo {
        final_score,
        raw_score,
        total_penalty,
        weights: *weights,
        penalties,
        min_score,
        passed,
        exit_code: if passed { 0 } else { 1 },
    }
}
