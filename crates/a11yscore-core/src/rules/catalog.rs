use serde::{Deserialize, Serialize};

/// Rules that count once per page no matter how many nodes fail.
pub const DEFAULT_SINGLE_ERROR_CRITERIA: &[&str] = &["document-title", "heading-order"];

/// Penalty multiplier applied to single-error rules in place of the node count.
pub const SINGLE_ERROR_MULTIPLIER: u64 = 10;

/// Rules highlighted in the summary.
pub const DEFAULT_IMPORTANT_CRITERIA: &[&str] = &[
    "keyboard",
    "image-alt",
    "color-contrast",
    "document-title",
    "label",
    "aria-roles",
    "heading-order",
];

/// Severity reported by axe-core for a violated rule.
///
/// Ordering is semantic: `Minor < Moderate < Serious < Critical`.
/// Levels axe-core may add later decode as `Other` with the engine's
/// string kept verbatim, and sort after the known ones.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(from = "String", into = "String")]
pub enum Impact {
    Minor,
    Moderate,
    Serious,
    Critical,
    Other(String),
}

impl From<String> for Impact {
    fn from(s: String) -> Self {
        match s.as_str() {
            "minor" => Impact::Minor,
            "moderate" => Impact::Moderate,
            "serious" => Impact::Serious,
            "critical" => Impact::Critical,
            _ => Impact::Other(s),
        }
    }
}

impl From<Impact> for String {
    fn from(impact: Impact) -> Self {
        impact.to_string()
    }
}

impl std::fmt::Display for Impact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Impact::Minor => "minor",
            Impact::Moderate => "moderate",
            Impact::Serious => "serious",
            Impact::Critical => "critical",
            Impact::Other(other) => other.as_str(),
        };
        f.write_str(s)
    }
}

/// Per-impact penalty weights.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ImpactWeights {
    pub critical: f64,
    pub serious: f64,
    pub moderate: f64,
    pub minor: f64,
    /// Used when axe-core reports no impact, or one not listed above.
    pub unknown: f64,
}

impl Default for ImpactWeights {
    fn default() -> Self {
        Self {
            critical: 0.5,
            serious: 0.3,
            moderate: 0.2,
            minor: 0.1,
            unknown: 1.0,
        }
    }
}

impl ImpactWeights {
    pub fn weight(&self, impact: Option<&Impact>) -> f64 {
        match impact {
            Some(Impact::Critical) => self.critical,
            Some(Impact::Serious) => self.serious,
            Some(Impact::Moderate) => self.moderate,
            Some(Impact::Minor) => self.minor,
            Some(Impact::Other(_)) | None => self.unknown,
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let all = [
            ("critical", self.critical),
            ("serious", self.serious),
            ("moderate", self.moderate),
            ("minor", self.minor),
            ("unknown", self.unknown),
        ];
        for (name, w) in all {
            if !w.is_finite() || w < 0.0 {
                anyhow::bail!("weight `{name}` must be a finite non-negative number, got {w}");
            }
        }
        Ok(())
    }
}
