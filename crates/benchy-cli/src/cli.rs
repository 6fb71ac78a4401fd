//! benchy-plan: translate a captured EXPLAIN ANALYZE document
//!
//! Reads a vendor plan and its query text, runs the translation engine and
//! writes the canonical document to stdout or a file.

use anyhow::{Context, Result};
use benchy_queryplan::{Dialect, EncodingFormat, TranslateConfig, read_plan_json, translate};
use clap::Parser;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "benchy-plan")]
#[command(about = "Translate vendor query plans into a canonical plan tree", long_about = None)]
struct Cli {
    /// Plan dialect: umbra, postgres, hyper or duckdb
    #[arg(short, long, env = "BENCHY_DIALECT")]
    dialect: Dialect,

    /// Path to the captured plan JSON, or `-` for stdin
    #[arg(short, long)]
    plan: PathBuf,

    /// Path to a file holding the query text
    #[arg(short, long, conflicts_with = "query_text", required_unless_present = "query_text")]
    query: Option<PathBuf>,

    /// The query text itself
    #[arg(long)]
    query_text: Option<String>,

    /// Output format (overrides config)
    #[arg(short, long)]
    format: Option<EncodingFormat>,

    /// TOML file with translation settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Keep vendor bookkeeping operators in the tree
    #[arg(long)]
    no_clean: bool,

    /// Omit vendor fragments from the output
    #[arg(long)]
    no_system_representation: bool,

    /// Copy shared pipelines into every place that references them
    #[arg(long)]
    duplicate_shared_pipelines: bool,

    /// Write the document here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Loads the config file, if any, and applies flag overrides on top
    fn translate_config(&self) -> Result<TranslateConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let source = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config {}", path.display()))?;
                TranslateConfig::from_toml_str(&source)
                    .with_context(|| format!("Failed to load config {}", path.display()))?
            }
            None => TranslateConfig::default(),
        };
        if let Some(format) = self.format {
            config.format = format;
        }
        if self.no_clean {
            config.clean = false;
        }
        if self.no_system_representation {
            config.parse.include_system_representation = false;
        }
        if self.duplicate_shared_pipelines {
            config.parse.duplicate_shared_pipelines = true;
        }
        Ok(config)
    }

    fn query(&self) -> Result<String> {
        match (&self.query_text, &self.query) {
            (Some(text), _) => Ok(text.clone()),
            (None, Some(path)) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read query {}", path.display())),
            (None, None) => anyhow::bail!("either --query or --query-text is required"),
        }
    }
}

fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_plan(path: &Path) -> Result<serde_json::Value> {
    let source = if path == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read plan from stdin")?;
        buffer
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read plan {}", path.display()))?
    };
    read_plan_json(&source).context("Plan is not valid JSON")
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli.translate_config()?;
    let query = cli.query()?;
    let raw = read_plan(&cli.plan)?;

    tracing::info!(dialect = %cli.dialect, format = %config.format, clean = config.clean, "translating plan");
    let document = translate(cli.dialect, &query, &raw, &config)
        .with_context(|| format!("Failed to translate {} plan", cli.dialect))?;

    match &cli.output {
        Some(path) => std::fs::write(path, document)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{document}").context("Failed to write to stdout")?;
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
