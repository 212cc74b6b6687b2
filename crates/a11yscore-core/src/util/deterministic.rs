//! Deterministic ordering helpers.
//!
//! Report blocks whose order carries no meaning are sorted here, so two
//! audits of an unchanged page serialize identically.

use crate::report::model::CriterionInfo;

/// Sort criteria by rule id.
///
/// The audit engine already reports rules in a fixed order, but that order
/// changes between engine releases; ids do not.
pub fn sort_criteria(criteria: &mut [CriterionInfo]) {
    criteria.sort_by(|a, b| a.id.cmp(&b.id));
}

/// Sort analysis warnings lexicographically.
pub fn sort_warnings(warnings: &mut [String]) {
    warnings.sort();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::catalog::Impact;

    fn c(id: &str) -> CriterionInfo {
        CriterionInfo {
            id: id.to_string(),
            description: String::new(),
            impact: Some(Impact::Minor),
            errors_count: 1,
        }
    }

    #[test]
    fn sort_criteria_orders_by_id() {
        let mut criteria = vec![c("region"), c("color-contrast"), c("label")];
        sort_criteria(&mut criteria);

        let ids: Vec<&str> = criteria.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["color-contrast", "label", "region"]);
    }

    #[test]
    fn sort_criteria_handles_empty() {
        let mut criteria: Vec<CriterionInfo> = vec![];
        sort_criteria(&mut criteria);
        assert!(criteria.is_empty());
    }

    #[test]
    fn sort_warnings_is_lexicographic() {
        let mut w = vec!["popup".to_string(), "contrast".to_string()];
        sort_warnings(&mut w);
        assert_eq!(w, vec!["contrast", "popup"]);
    }
}
