use crate::TOOL_NAME;
use crate::checks::model::{HeuristicChecks, PopupOutcome};
use crate::report::model::Report;

/// Human-readable summary: penalty breakdown, score, important criteria
/// and one line per heuristic check.
pub fn render_text(report: &Report, important_criteria: &[String]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{} {}\n", TOOL_NAME, report.tool.version));
    out.push_str(&format!("Page: {}\n", report.page.url));
    if !report.page.engine.name.is_empty() {
        out.push_str(&format!(
            "Engine: {} {}\n",
            report.page.engine.name, report.page.engine.version
        ));
    }

    out.push_str("\nPenalties:\n");
    if report.scoring.penalties.is_empty() {
        out.push_str("  (none)\n");
    }
    for p in &report.scoring.penalties {
        if p.single_error {
            out.push_str(&format!(
                "  - {} | weight {} | penalty {} * {} = {:.2}\n",
                p.rule_id, p.weight, p.weight, p.multiplier, p.amount
            ));
        } else {
            out.push_str(&format!(
                "  - {} | weight {} | errors {} | penalty {} * {} = {:.2}\n",
                p.rule_id, p.weight, p.errors_count, p.weight, p.multiplier, p.amount
            ));
        }
    }

    out.push_str(&format!(
        "\nAccessibility score: {:.2}/100\n",
        report.final_score
    ));
    if let Some(min) = report.scoring.min_score {
        let verdict = if report.scoring.passed { "PASS" } else { "FAIL" };
        out.push_str(&format!("Minimum score: {min:.2} ({verdict})\n"));
    }

    out.push_str("\nImportant criteria:\n");
    let mut any = false;
    for c in report
        .criteria
        .iter()
        .filter(|c| important_criteria.iter().any(|i| *i == c.id))
    {
        any = true;
        out.push_str(&format!("  - {}: {}\n", c.id, c.description));
        out.push_str(&format!("    failing elements: {}\n", c.errors_count));
    }
    if !any {
        out.push_str("  (none violated)\n");
    }

    out.push_str("\nChecks:\n");
    render_checks(&mut out, &report.checks);

    if !report.analysis.warnings.is_empty() {
        out.push_str("\nWarnings:\n");
        for w in &report.analysis.warnings {
            out.push_str(&format!("  - {w}\n"));
        }
    }
    out
}

fn render_checks(out: &mut String, checks: &HeuristicChecks) {
    match &checks.responsive {
        Some(r) if r.passes => out.push_str("  responsive: page scales without horizontal scrolling\n"),
        Some(r) => out.push_str(&format!(
            "  responsive: horizontal scrolling at {} of {} viewports\n",
            r.overflow_count,
            r.samples.len()
        )),
        None => out.push_str("  responsive: not measured\n"),
    }

    match &checks.contrast {
        Some(c) => out.push_str(&format!("  contrast: {:.2}\n", c.contrast)),
        None => out.push_str("  contrast: not measured\n"),
    }

    match &checks.image_alt {
        Some(i) if !i.first_image_present => out.push_str("  image alt: no images\n"),
        Some(i) => {
            match &i.first_image_alt {
                Some(alt) => out.push_str(&format!("  image alt: \"{alt}\"")),
                None => out.push_str("  image alt: alt attribute missing"),
            }
            out.push_str(&format!(
                " ({} of {} images without alt)\n",
                i.missing_alt_count, i.image_count
            ));
        }
        None => out.push_str("  image alt: not measured\n"),
    }

    match &checks.popup {
        Some(p) => {
            let line = match &p.outcome {
                PopupOutcome::NotFound => "no popup found".to_string(),
                PopupOutcome::Accessible => "popup is keyboard accessible".to_string(),
                PopupOutcome::NoFocusableElements => {
                    "popup is not keyboard accessible (no focusable elements)".to_string()
                }
                PopupOutcome::Timeout => {
                    "popup is not keyboard accessible (element not interactable)".to_string()
                }
                PopupOutcome::FocusLost { index } => {
                    format!("popup is not keyboard accessible (focus lost at element {index})")
                }
            };
            out.push_str(&format!("  popup: {line}\n"));
        }
        None => out.push_str("  popup: not measured\n"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::model::{ImageAltCheck, PopupCheck};
    use crate::report::model::{AnalysisInfo, PageInfo, ToolInfo};
    use crate::rules::catalog::{DEFAULT_IMPORTANT_CRITERIA, Impact, ImpactWeights};
    use crate::rules::eval::Violation;
    use crate::rules::score::score;

    fn important() -> Vec<String> {
        DEFAULT_IMPORTANT_CRITERIA.iter().map(|s| s.to_string()).collect()
    }

    fn report(checks: HeuristicChecks) -> Report {
        let violations = vec![
            Violation {
                id: "document-title".into(),
                description: "Ensures each HTML document contains a non-empty <title>".into(),
                impact: Some(Impact::Serious),
                help: String::new(),
                help_url: String::new(),
                nodes_count: 1,
            },
            Violation {
                id: "region".into(),
                description: "Ensures all page content is contained by landmarks".into(),
                impact: Some(Impact::Moderate),
                help: String::new(),
                help_url: String::new(),
                nodes_count: 4,
            },
        ];
        let scoring = score(
            &violations,
            &ImpactWeights::default(),
            &["document-title".to_string()],
            Some(99.0),
        );
        Report::new(
            ToolInfo {
                name: "a11yscore".into(),
                version: "0.1.0".into(),
            },
            PageInfo {
                url: "https://example.test".into(),
                ..Default::default()
            },
            &violations,
            scoring,
            checks,
            AnalysisInfo::ok(),
        )
    }

    #[test]
    fn renders_score_and_penalties() {
        let text = render_text(&report(HeuristicChecks::default()), &important());

        assert!(text.contains("Accessibility score: 96.20/100"));
        assert!(text.contains("document-title | weight 0.3 | penalty 0.3 * 10 = 3.00"));
        assert!(text.contains("region | weight 0.2 | errors 4 | penalty 0.2 * 4 = 0.80"));
        assert!(text.contains("Minimum score: 99.00 (FAIL)"));
    }

    #[test]
    fn only_important_criteria_are_highlighted() {
        let text = render_text(&report(HeuristicChecks::default()), &important());
        let section = text
            .split("Important criteria:")
            .nth(1)
            .and_then(|s| s.split("Checks:").next())
            .unwrap();

        assert!(section.contains("document-title"));
        assert!(!section.contains("region"));
    }

    #[test]
    fn renders_check_lines() {
        let checks = HeuristicChecks {
            image_alt: Some(ImageAltCheck {
                image_count: 2,
                missing_alt_count: 1,
                first_image_present: true,
                first_image_alt: Some("logo".into()),
            }),
            popup: Some(PopupCheck::not_found()),
            ..Default::default()
        };
        let text = render_text(&report(checks), &important());

        assert!(text.contains("image alt: \"logo\" (1 of 2 images without alt)"));
        assert!(text.contains("popup: no popup found"));
        assert!(text.contains("responsive: not measured"));
    }

    #[test]
    fn warnings_close_the_summary() {
        let mut r = report(HeuristicChecks::default());
        r.analysis.warn("contrast check failed: webdriver error: no such window");
        let text = render_text(&r, &important());

        assert!(text.ends_with("Warnings:\n  - contrast check failed: webdriver error: no such window\n"));
    }
}
