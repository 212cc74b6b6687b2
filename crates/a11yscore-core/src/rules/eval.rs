use serde::{Deserialize, Serialize};

use crate::rules::catalog::{Impact, ImpactWeights, SINGLE_ERROR_MULTIPLIER};

/// A violated rule as reported by the audit engine, reduced to what
/// scoring and reporting need.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub id: String,
    pub description: String,
    pub impact: Option<Impact>,
    pub help: String,
    pub help_url: String,
    /// Number of page nodes failing the rule.
    pub nodes_count: u64,
}

/// Score deduction attributed to one violation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Penalty {
    pub rule_id: String,
    pub impact: Option<Impact>,
    pub weight: f64,
    pub errors_count: u64,
    /// Node count, or the fixed multiplier for single-error rules.
    pub multiplier: u64,
    pub single_error: bool,
    pub amount: f64,
}

/// Compute the deduction for `violation`.
///
/// Rules listed in `single_error_criteria` cost `weight * 10` regardless of
/// how many nodes fail; every other rule costs `weight` per failing node.
pub fn penalty_for(
    violation: &Violation,
    weights: &ImpactWeights,
    single_error_criteria: &[String],
) -> Penalty {
    let weight = weights.weight(violation.impact.as_ref());
    let single_error = single_error_criteria.iter().any(|c| *c == violation.id);
    let multiplier = if single_error {
        SINGLE_ERROR_MULTIPLIER
    } else {
        violation.nodes_count
    };

    Penalty {
        rule_id: violation.id.clone(),
        impact: violation.impact.clone(),
        weight,
        errors_count: violation.nodes_count,
        multiplier,
        single_error,
        amount: weight * multiplier as f64,
    }
}
