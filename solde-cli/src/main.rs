use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, Subcommand};
use solde_core::{ExtractError, IgnoreRules, Layout, Value, filter_values};
use solde_finance::{BatchReport, Extractor};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod output;
mod state;

#[derive(Parser, Debug)]
#[command(
    name = "solde",
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("SOLDE_BUILD_SHA"), ")"),
    about = "Balance series from BNP Paribas PDF statements"
)]
struct Cli {
    /// Config file (default: ~/.solde/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More logging on stderr (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract and reconcile the balance series of PDF statements
    Parse {
        /// PDF statements, processed in order
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Write the values as a JSON array
        #[arg(long)]
        json: Option<PathBuf>,

        /// Write the values as CSV
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Write raw bytes of streams that failed to tokenize into this directory
        #[arg(long)]
        dump_dir: Option<PathBuf>,
    },

    /// Drop operations matching an ignore file from a JSON series
    Filter {
        /// JSON series written by `solde parse --json`
        values: PathBuf,

        /// One regular expression per line, `#` starts a comment
        #[arg(long)]
        ignore: PathBuf,

        /// Write the filtered series as a JSON array
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Layout configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default configuration file
    Init,

    /// Print the effective configuration
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Parse {
            files,
            json,
            csv,
            dump_dir,
        } => {
            let cfg = config::load_config(cli.config.as_deref())?;
            let report = extract_files(files, cfg.layout).await?;

            for doc in &report.documents {
                for line in output::value_lines(&doc.values) {
                    println!("{line}");
                }
            }
            let values = report.values();
            if let Some(path) = &json {
                output::write_json(path, &values)?;
            }
            if let Some(path) = &csv {
                output::write_csv(path, &values)?;
            }

            for failure in &report.failures {
                eprintln!("error: {}: {}", failure.path.display(), failure.error);
                if let Some(dir) = &dump_dir {
                    if let Some(p) = output::dump_raw_stream(dir, failure)? {
                        eprintln!("raw stream written to {}", p.display());
                    }
                }
            }
            if !report.is_success() {
                bail!("{} reports failed", report.failures.len());
            }
        }

        Command::Filter {
            values,
            ignore,
            json,
        } => {
            filter_series(&values, &ignore, json.as_deref())?;
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => {
                config::init_config(cli.config.as_deref())?;
            }
            ConfigCommand::Show => {
                let cfg = config::load_config(cli.config.as_deref())?;
                println!("# {}", config::config_path(cli.config.as_deref())?.display());
                print!("{}", config::render_config(&cfg)?);
            }
        },
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Extract every document on the blocking pool, folding results in input order.
async fn extract_files(files: Vec<PathBuf>, layout: Layout) -> Result<BatchReport> {
    let extractor = Arc::new(Extractor::new(layout).context("invalid layout configuration")?);
    let tasks: Vec<_> = files
        .into_iter()
        .map(|path| {
            let extractor = Arc::clone(&extractor);
            let file = path.clone();
            let handle = tokio::task::spawn_blocking(move || extractor.file_values(&file));
            (path, handle)
        })
        .collect();

    let report = fold_tasks(tasks).await;
    info!(
        documents = report.documents.len(),
        failures = report.failures.len(),
        "batch done"
    );
    Ok(report)
}

type ExtractionTask = (PathBuf, JoinHandle<solde_core::Result<Vec<Value>>>);

/// Await every task in order. A task that panicked or was cancelled fails its
/// own document only.
async fn fold_tasks(tasks: Vec<ExtractionTask>) -> BatchReport {
    let mut results = Vec::with_capacity(tasks.len());
    for (path, handle) in tasks {
        let result = handle.await.unwrap_or_else(|e| {
            warn!(file = %path.display(), error = %e, "extraction task failed");
            Err(ExtractError::Document(format!("extraction panicked: {e}")))
        });
        results.push((path, result));
    }
    BatchReport::fold(results)
}

fn filter_series(values: &Path, ignore: &Path, json: Option<&Path>) -> Result<()> {
    let series = output::read_json(values)?;
    let rules_text =
        std::fs::read_to_string(ignore).with_context(|| format!("read {}", ignore.display()))?;
    let rules = IgnoreRules::parse(&rules_text).with_context(|| format!("parse {}", ignore.display()))?;
    if rules.is_empty() {
        warn!(file = %ignore.display(), "no ignore rules");
    }

    let kept = filter_values(&series, &rules);
    if kept.is_empty() && !series.is_empty() {
        warn!("all values were filtered");
    }
    for line in output::value_lines(&kept) {
        println!("{line}");
    }
    if let Some(path) = json {
        output::write_json(path, &kept)?;
    }
    Ok(())
}
