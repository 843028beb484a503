use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tally_core::{summarize, SummarizerConfig, Summary};
use tally_ingest::{load_path, DatasetStore, Loaded};
use tally_report::{
    flow_slices, paginate, preview, CategoryTable, SortKey, SortOrder, SummaryDigest,
};
use tracing::warn;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod advisor;
mod config;
mod render;
mod state;

use advisor::{Advice, Advisor};

#[derive(Parser, Debug)]
#[command(
    name = "tally",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("TALLY_BUILD_SHA"), ")"),
    about = "Summarize a transaction CSV: inflow, outflow, savings and spending by category"
)]
struct Cli {
    /// Debug logging (RUST_LOG takes precedence)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Full dashboard: preview, metrics, categories, flow split, raw rows
    Summary {
        /// Transaction CSV (defaults to ./sample_transactions.csv if present)
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Page of raw rows to list
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Rows per page (default: from config)
        #[arg(long)]
        page_size: Option<usize>,
    },

    /// Spending by category
    Categories {
        #[arg(long)]
        csv: Option<PathBuf>,

        /// magnitude, amount or name
        #[arg(long, default_value = "magnitude")]
        sort: SortKey,

        /// Ascending instead of descending
        #[arg(long)]
        asc: bool,
    },

    /// Paginated raw transaction listing
    Rows {
        #[arg(long)]
        csv: Option<PathBuf>,

        #[arg(long, default_value_t = 1)]
        page: usize,

        #[arg(long)]
        page_size: Option<usize>,
    },

    /// Ask the AI advisor for a plan toward a goal
    Advise {
        /// e.g. "Save 10,000 for emergency fund"
        #[arg(long)]
        goal: String,

        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Re-print metrics whenever the file changes
    Watch {
        #[arg(long)]
        csv: PathBuf,

        /// Poll interval in seconds
        #[arg(long, default_value_t = 2)]
        interval: u64,
    },

    /// Manage ~/.tally/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config if none exists
    Init,
    /// Print the effective config
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config(),
            ConfigCommand::Show => config::show_config(),
        },

        Command::Summary {
            csv,
            page,
            page_size,
        } => {
            let cfg = config::load_config()?;
            let Some(path) = resolve_csv(csv) else {
                print!("{}", render::sample_format());
                return Ok(());
            };
            let loaded = load(&path)?;
            let summary = summarize(&loaded.set, &cfg.summarizer);
            dashboard(
                &loaded,
                &summary,
                &cfg.summarizer,
                page,
                page_size.unwrap_or(cfg.display.page_size),
            );
            Ok(())
        }

        Command::Categories { csv, sort, asc } => {
            let cfg = config::load_config()?;
            let path = require_csv(csv)?;
            let loaded = load(&path)?;
            let summary = summarize(&loaded.set, &cfg.summarizer);

            if !loaded.set.columns().category {
                println!("{}\n", no_category_note(&cfg.summarizer));
            }
            let order = if asc {
                SortOrder::Ascending
            } else {
                SortOrder::Descending
            };
            let table = CategoryTable::from_summary(&summary).sorted(sort, order);
            print!("{}", render::category_table(&table));
            Ok(())
        }

        Command::Rows {
            csv,
            page,
            page_size,
        } => {
            let cfg = config::load_config()?;
            let path = require_csv(csv)?;
            let loaded = load(&path)?;
            let p = paginate(
                loaded.set.rows(),
                page,
                page_size.unwrap_or(cfg.display.page_size),
            );
            print!("{}", render::page(&p));
            Ok(())
        }

        Command::Advise { goal, csv } => {
            let cfg = config::load_config()?;
            let path = require_csv(csv)?;
            let loaded = load(&path)?;
            let summary = summarize(&loaded.set, &cfg.summarizer);

            println!("Your Goal: {}\n", goal.trim());
            print!("{}", render::metrics(&summary));

            let advisor = Advisor::from_config(&cfg.advisor);
            let digest = SummaryDigest::from_summary(&summary);
            println!("\n## AI suggestions\n");
            match advisor.suggest(&goal, &digest).await {
                Advice::Recommendation(text) => println!("{text}"),
                Advice::Unavailable(msg) => {
                    println!("Warning: AI suggestions are unavailable right now ({msg}).");
                    println!("The summary above is unaffected.");
                }
            }
            Ok(())
        }

        Command::Watch { csv, interval } => {
            let cfg = config::load_config()?;
            watch(&csv, interval, &cfg.summarizer).await
        }
    }
}

/// Priority: RUST_LOG > --verbose > warn. Logs go to stderr.
fn init_logging(verbose: bool) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .compact()
                .with_writer(std::io::stderr),
        )
        .init();
}

fn resolve_csv(csv: Option<PathBuf>) -> Option<PathBuf> {
    csv.or_else(|| {
        let p = state::default_sample_csv();
        if p.exists() { Some(p) } else { None }
    })
}

fn require_csv(csv: Option<PathBuf>) -> Result<PathBuf> {
    match resolve_csv(csv) {
        Some(p) => Ok(p),
        None => bail!("no transaction file given (pass --csv <path>)"),
    }
}

fn load(path: &Path) -> Result<Loaded> {
    load_path(path).with_context(|| format!("reading {}", path.display()))
}

fn no_category_note(cfg: &SummarizerConfig) -> String {
    format!(
        "No `category` column found; every row is grouped under \"{}\". Add one to see a category breakdown.",
        cfg.uncategorized_bucket_name
    )
}

fn dashboard(
    loaded: &Loaded,
    summary: &Summary,
    cfg: &SummarizerConfig,
    page: usize,
    page_size: usize,
) {
    println!("{}\n", render::load_banner(&loaded.report, loaded.set.len()));

    println!("## Transactions preview\n");
    print!("{}", render::rows(preview(&loaded.set), 1));

    println!("\n## Summary\n");
    print!("{}", render::metrics(summary));

    println!("\n## Spending by category\n");
    if !loaded.set.columns().category {
        println!("{}\n", no_category_note(cfg));
    }
    print!(
        "{}",
        render::category_table(&CategoryTable::from_summary(summary))
    );

    println!("\n## Where the inflow went\n");
    print!("{}", render::slices(&flow_slices(summary)));

    println!("\n## All transactions\n");
    print!(
        "{}",
        render::page(&paginate(loaded.set.rows(), page, page_size))
    );
}

/// Remembers the last watch failure so a persistent one prints once.
#[derive(Debug, Default)]
struct FailureLatch {
    last: Option<String>,
}

impl FailureLatch {
    /// True when `msg` differs from the previous failure.
    fn report(&mut self, msg: String) -> bool {
        if self.last.as_deref() == Some(msg.as_str()) {
            return false;
        }
        self.last = Some(msg);
        true
    }

    fn clear(&mut self) {
        self.last = None;
    }
}

async fn watch(path: &Path, interval: u64, cfg: &SummarizerConfig) -> Result<()> {
    let mut store = DatasetStore::new(path);
    let mut failures = FailureLatch::default();
    let mut ticker = tokio::time::interval(Duration::from_secs(interval.max(1)));
    println!("Watching {} for changes (Ctrl-C to stop)\n", path.display());

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => return Ok(()),
            _ = ticker.tick() => {}
        }

        match store.is_stale() {
            Ok(false) => continue,
            Ok(true) => {}
            Err(e) => {
                let msg = format!("cannot stat {}: {e}", path.display());
                if failures.report(msg.clone()) {
                    warn!(error = %e, "cannot stat {}", path.display());
                    println!("Error: {msg}");
                }
                continue;
            }
        }

        // a failed load leaves the store stale, so the same error recurs each tick
        match store.get() {
            Ok(loaded) => {
                failures.clear();
                let summary = summarize(&loaded.set, cfg);
                println!("{}", render::load_banner(&loaded.report, loaded.set.len()));
                println!("{}", render::metrics(&summary));
            }
            Err(e) => {
                let msg = e.to_string();
                if failures.report(msg.clone()) {
                    println!("Error: {msg}");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_categories_sort() {
        let cli = Cli::try_parse_from(["tally", "categories", "--csv", "tx.csv", "--sort", "name", "--asc"])
            .unwrap();
        match cli.command {
            Command::Categories { csv, sort, asc } => {
                assert_eq!(csv, Some(PathBuf::from("tx.csv")));
                assert_eq!(sort, SortKey::Name);
                assert!(asc);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_bad_sort_key_rejected() {
        assert!(Cli::try_parse_from(["tally", "categories", "--sort", "size"]).is_err());
    }

    #[test]
    fn test_advise_requires_goal() {
        assert!(Cli::try_parse_from(["tally", "advise"]).is_err());
        let cli = Cli::try_parse_from(["tally", "-v", "advise", "--goal", "Save 10k"]).unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn test_explicit_csv_is_kept() {
        let p = PathBuf::from("/tmp/some.csv");
        assert_eq!(resolve_csv(Some(p.clone())), Some(p));
    }

    #[test]
    fn test_repeated_watch_failure_reported_once() {
        let mut latch = FailureLatch::default();
        assert!(latch.report("cannot stat tx.csv: not found".to_string()));
        assert!(!latch.report("cannot stat tx.csv: not found".to_string()));
        assert!(latch.report("CSV must include an `amount` column".to_string()));
        assert!(latch.report("cannot stat tx.csv: not found".to_string()));

        latch.clear();
        assert!(latch.report("cannot stat tx.csv: not found".to_string()));
    }

    #[test]
    fn test_no_category_note_names_bucket() {
        let cfg = SummarizerConfig::default();
        assert!(no_category_note(&cfg).contains("\"Uncategorized\""));
    }
}
