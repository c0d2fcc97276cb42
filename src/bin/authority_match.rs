//! Authority Match CLI
//!
//! Demonstration entry point: loads heading and alias tables from a file and
//! resolves the names given on the command line.
//!
//! # Usage
//!
//! ```bash
//! # tables.yaml:
//! #   headings: { "118584596": ["Mozart, Wolfgang Amadeus"] }
//! #   aliases:  { "118584596": ["Mozart, Wolfgang Gottlieb"] }
//! authority_match --tables tables.yaml --strategy fuzzy "Mozart, Wolfgang Amadeos"
//!
//! # Print index statistics
//! authority_match --tables tables.json --stats
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use authority_match::{AuthorityTables, MatchResult, Resolver, ResolverConfig, StrategyKind};

#[derive(Parser)]
#[command(name = "authority_match")]
#[command(version = "0.1.0")]
#[command(about = "Resolve free-text names against an authority file")]
struct Cli {
    /// Heading/alias tables (JSON, or YAML by .yaml/.yml extension)
    #[arg(long, short = 't', env = "AUTHORITY_TABLES")]
    tables: PathBuf,

    /// Resolver config (YAML)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Override the configured tertiary strategy
    #[arg(long, value_enum)]
    strategy: Option<StrategyArg>,

    /// Print index statistics before resolving
    #[arg(long)]
    stats: bool,

    /// Names to resolve
    names: Vec<String>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StrategyArg {
    Prefix,
    Fuzzy,
}

impl From<StrategyArg> for StrategyKind {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Prefix => StrategyKind::Prefix,
            StrategyArg::Fuzzy => StrategyKind::Fuzzy,
        }
    }
}

fn load_tables(path: &Path) -> Result<AuthorityTables> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;

    let is_yaml = path
        .extension()
        .map(|e| e == "yaml" || e == "yml")
        .unwrap_or(false);

    if is_yaml {
        serde_yaml::from_str(&content).with_context(|| format!("Failed to parse {:?}", path))
    } else {
        serde_json::from_str(&content).with_context(|| format!("Failed to parse {:?}", path))
    }
}

fn run(cli: Cli) -> Result<bool> {
    let mut config = match &cli.config {
        Some(path) => ResolverConfig::load_from_file(path)?,
        None => ResolverConfig::default(),
    };
    if let Some(strategy) = cli.strategy {
        config.strategy = strategy.into();
    }

    let tables = load_tables(&cli.tables)?;
    let resolver = Resolver::builder()
        .tables(tables)
        .config(config)
        .build()
        .context("Failed to build resolver")?;

    if cli.stats {
        eprint!("{}", resolver.stats());
    }

    let mut all_matched = true;
    for name in &cli.names {
        let result = resolver.find(name.as_str());
        all_matched &= result.as_ref().is_some_and(MatchResult::is_match);
        let line = serde_json::json!({ "query": name, "result": result });
        println!("{}", serde_json::to_string(&line)?);
    }

    Ok(all_matched)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}
