//! Savor: restaurant review opinion extraction and filtered recall.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};
use savor_adapter::{create_adapter, ExtractionAdapter};
use savor_core::{AdapterConfig, Capabilities, ExtractionSettings};
use savor_runtime::{load_documents, ReviewEngine};
use tracing::info;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "\
Savor: restaurant review opinion extraction and filtered recall

Usage: savor [options] <command>

Commands:
  extract <docs.json>             Extract opinion triples from each review
  metadata <docs.json>            Derive shop, rating, date, focus, tags, sentiment
  search <docs.json> <query>...   Index the reviews and recall with planned filters
  status [docs.json]              Show extraction mode and index size
  help                            Show this help message

Options:
  --config <file>    Adapter config JSON (default: SAVOR_API_KEY and friends)
  --rule-based       Never call the extraction adapter
  --passes <n>       Extraction passes forwarded to the adapter (default 2)

Documents are a JSON array of {\"id\", \"content\", \"title\"?} objects.";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Extract(PathBuf),
    Metadata(PathBuf),
    Search { docs: PathBuf, query: String },
    Status(Option<PathBuf>),
    Help,
}

#[derive(Debug, PartialEq, Eq)]
struct Cli {
    command: Command,
    config: Option<PathBuf>,
    settings: ExtractionSettings,
}

fn parse_args(args: &[String]) -> anyhow::Result<Cli> {
    let mut config = None;
    let mut settings = ExtractionSettings::default();
    let mut positional: Vec<&str> = Vec::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let path = iter.next().context("--config needs a file path")?;
                config = Some(PathBuf::from(path));
            }
            "--rule-based" => settings.use_model = false,
            "--passes" => {
                let n = iter.next().context("--passes needs a number")?;
                settings.extraction_passes =
                    n.parse().with_context(|| format!("invalid pass count: {}", n))?;
            }
            "--help" | "-h" => positional.insert(0, "help"),
            other => positional.push(other),
        }
    }

    let command = match positional.as_slice() {
        [] | ["help", ..] => Command::Help,
        ["extract", docs] => Command::Extract(PathBuf::from(docs)),
        ["metadata", docs] => Command::Metadata(PathBuf::from(docs)),
        ["search", docs, query @ ..] if !query.is_empty() => Command::Search {
            docs: PathBuf::from(docs),
            query: query.join(" "),
        },
        ["status"] => Command::Status(None),
        ["status", docs] => Command::Status(Some(PathBuf::from(docs))),
        [cmd, ..] => bail!("Unknown or incomplete command: {}. Use 'savor help' for usage.", cmd),
    };

    Ok(Cli {
        command,
        config,
        settings,
    })
}

/// Resolve the adapter once at startup.
fn build_adapter(config_path: Option<&Path>) -> anyhow::Result<Option<Arc<dyn ExtractionAdapter>>> {
    let config = match config_path {
        Some(path) => Some(
            AdapterConfig::load(path)
                .with_context(|| format!("Failed to load adapter config {}", path.display()))?,
        ),
        None => AdapterConfig::from_env()?,
    };
    let adapter = config.as_ref().and_then(create_adapter);
    let caps = Capabilities::discover(adapter.is_some());
    info!("Extraction mode: {}", caps.mode);
    Ok(adapter)
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries JSON only.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let cli = match parse_args(&args) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    if cli.command == Command::Help {
        println!("{}", USAGE);
        return Ok(());
    }

    let adapter = build_adapter(cli.config.as_deref())?;
    let adapter = adapter.as_deref();
    let mut engine = ReviewEngine::new().with_settings(cli.settings);

    match cli.command {
        Command::Extract(path) => {
            let docs = load_documents(&path)?;
            print_json(&engine.extract_triples(&docs, adapter))?;
        }
        Command::Metadata(path) => {
            let docs = load_documents(&path)?;
            print_json(&engine.extract_metadata(&docs, adapter))?;
        }
        Command::Search { docs, query } => {
            let docs = load_documents(&docs)?;
            engine.ingest(&docs, adapter);
            print_json(&engine.recall(&query))?;
        }
        Command::Status(docs) => {
            if let Some(path) = docs {
                let docs = load_documents(&path)?;
                engine.ingest(&docs, adapter);
            }
            print_json(&engine.status(adapter))?;
        }
        Command::Help => {}
    }

    Ok(())
}
