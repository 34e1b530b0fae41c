use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use budparse::ParserConfig;

#[derive(Parser)]
#[command(name = "budparse")]
#[command(about = "Extract form fields, reference tables and workflows from a BUD .docx")]
#[command(version)]
struct Cli {
    /// Path to the .docx file
    file: PathBuf,

    /// Parser configuration (TOML); defaults to the user config file if present
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    // RUST_LOG wins over -v
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "warn,budparse={}",
            level.as_str().to_lowercase()
        ))
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false).without_time())
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => ParserConfig::load_from(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ParserConfig::load().context("Failed to load user config")?,
    };

    let document = budparse::parse_document(&cli.file, &config)
        .with_context(|| format!("Failed to parse {}", cli.file.display()))?;

    println!("{}", document.to_json(cli.pretty)?);
    Ok(())
}
