use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Debug, Parser)]
#[command(
    name = "a11yscore",
    version,
    about = "Browser-driven accessibility audit with a single 0-100 score"
)]
pub struct Args {
    /// URL of the page to audit
    pub url: String,

    /// JSON config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// What to print on stdout
    #[arg(long, default_value = "text")]
    pub format: OutputFormat,

    /// Where to write the JSON report (overrides config)
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// WebDriver server URL (overrides config)
    #[arg(long)]
    pub webdriver: Option<String>,

    /// Run the browser without a window (overrides config)
    #[arg(long, overrides_with = "no_headless")]
    pub headless: bool,

    /// Show the browser window (overrides config)
    #[arg(long, overrides_with = "headless")]
    pub no_headless: bool,

    /// Exit with status 1 when the score is below this value
    #[arg(long)]
    pub min_score: Option<f64>,

    /// Local axe.min.js to inject instead of the CDN build
    #[arg(long, conflicts_with = "axe_url")]
    pub axe_script: Option<PathBuf>,

    /// URL of the axe-core build to load
    #[arg(long)]
    pub axe_url: Option<String>,

    /// Skip the pauses that let the page settle after load and resize
    #[arg(long)]
    pub no_settle: bool,

    /// Enable debug logging
    #[arg(long, short)]
    pub verbose: bool,
}

impl Args {
    /// `Some` when either headless flag was given; the last one wins.
    pub fn headless(&self) -> Option<bool> {
        match (self.headless, self.no_headless) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Text,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(flags: &[&str]) -> Args {
        let mut argv = vec!["a11yscore", "https://example.test"];
        argv.extend_from_slice(flags);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn headless_unset_by_default() {
        assert_eq!(parse(&[]).headless(), None);
    }

    #[test]
    fn headless_flags_override_each_other() {
        assert_eq!(parse(&["--headless"]).headless(), Some(true));
        assert_eq!(parse(&["--no-headless"]).headless(), Some(false));
        assert_eq!(parse(&["--headless", "--no-headless"]).headless(), Some(false));
        assert_eq!(parse(&["--no-headless", "--headless"]).headless(), Some(true));
    }
}
