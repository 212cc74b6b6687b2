use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use a11yscore_core::config::{AuditConfig, AxeSource, load_config};
use a11yscore_core::report::model::ToolInfo;
use a11yscore_core::report::{render, write};

mod args;

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_env("A11YSCORE_LOG").unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("a11yscore_core=debug")
        } else {
            EnvFilter::new("a11yscore_core=warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn validate_url(url: &str) -> Result<()> {
    let ok = ["http://", "https://", "file://"]
        .iter()
        .any(|scheme| url.starts_with(scheme));
    if !ok {
        anyhow::bail!("URL must start with http://, https:// or file://: {url}");
    }
    Ok(())
}

fn apply_overrides(mut config: AuditConfig, args: &args::Args) -> Result<AuditConfig> {
    if let Some(url) = &args.webdriver {
        config.webdriver_url = url.clone();
    }
    if let Some(headless) = args.headless() {
        config.headless = headless;
    }
    if let Some(out) = &args.out {
        config.output_path = out.clone();
    }
    if let Some(min) = args.min_score {
        config.min_score = Some(min);
    }
    if let Some(path) = &args.axe_script {
        config.axe_source = AxeSource::File(path.clone());
    }
    if let Some(url) = &args.axe_url {
        config.axe_source = AxeSource::Url(url.clone());
    }
    if args.no_settle {
        config = config.without_settle();
    }
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = args::Args::parse();
    init_logging(args.verbose);

    validate_url(&args.url)?;
    let config = apply_overrides(load_config(args.config.as_deref())?, &args)?;

    let tool = ToolInfo {
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    let report = a11yscore_core::audit(&args.url, &config, tool).await?;
    write::save_results_to_json(&report, &config.output_path)?;

    let output = match args.format {
        args::OutputFormat::Json => write::to_json_string(&report)?,
        args::OutputFormat::Text => render::render_text(&report, &config.important_criteria),
    };
    print!("{output}");
    if !output.ends_with('\n') {
        println!();
    }

    std::process::exit(report.exit_code());
}
