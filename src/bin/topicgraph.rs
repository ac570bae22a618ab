//! topicgraph CLI
//!
//! Usage:
//!   topicgraph topics [--stocks dir] [--output dir] [--json file] [--continue-on-error]
//!   topicgraph groups [--topic-dir dir] [--output file]
//!   topicgraph info <path> [--scan]

use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use topicgraph::analysis::{extract_stock_info, scan_stocks_dir};
use topicgraph::{
    CorpusError, FailurePolicy, FsSink, StockGroups, TopicGraphConfig, TopicGraphError,
    TopicPipeline,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "topicgraph",
    version,
    about = "Cross-linked topic pages from a stock knowledge base"
)]
struct Cli {
    /// Path to a YAML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate main-topic and attached-topic pages from stock documents
    Topics {
        /// Directory of stock documents
        #[arg(long)]
        stocks: Option<PathBuf>,
        /// Directory to write topic pages under
        #[arg(long)]
        output: Option<PathBuf>,
        /// Also dump the aggregated topic graph as JSON
        #[arg(long)]
        json: Option<PathBuf>,
        /// Keep rendering when a page cannot be written
        #[arg(long)]
        continue_on_error: bool,
    },
    /// Merge stock group JSON files into one file
    Groups {
        /// Directory of group JSON files
        #[arg(long)]
        topic_dir: Option<PathBuf>,
        /// Merged output file
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print code and tags of a stock document
    Info {
        /// Stock document, or a directory with --scan
        path: PathBuf,
        /// Scan every document directly inside PATH
        #[arg(long)]
        scan: bool,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_topics(
    config: &TopicGraphConfig,
    stocks: Option<PathBuf>,
    output: Option<PathBuf>,
    json: Option<PathBuf>,
    continue_on_error: bool,
) -> i32 {
    let stocks_dir = stocks.unwrap_or_else(|| config.stocks_dir.clone());
    let output_dir = output.unwrap_or_else(|| config.output_dir.clone());

    if !stocks_dir.is_dir() {
        error!("stocks directory {} does not exist", stocks_dir.display());
        return 0;
    }

    let mut config = config.clone();
    if continue_on_error {
        config.failure_policy = FailurePolicy::Continue;
    }

    match run_topics(&config, &stocks_dir, &output_dir, json.as_deref()) {
        Ok(true) => {
            info!("all topic pages written to {}", output_dir.display());
            0
        }
        Ok(false) => 1,
        Err(TopicGraphError::Corpus(CorpusError::NotFound(path))) => {
            error!("stocks directory {} does not exist", path.display());
            0
        }
        Err(e) => {
            error!("{}", e);
            1
        }
    }
}

/// Returns whether every page was written
fn run_topics(
    config: &TopicGraphConfig,
    stocks_dir: &Path,
    output_dir: &Path,
    json: Option<&Path>,
) -> Result<bool, TopicGraphError> {
    let pipeline = TopicPipeline::from_config(config);
    let mut sink = FsSink::create(output_dir, &config.labels)?;
    let summary = pipeline.run(stocks_dir, &mut sink)?;

    for failure in &summary.report.failures {
        warn!(
            "could not write {} page '{}': {}",
            failure.collection, failure.name, failure.error
        );
    }

    if let Some(path) = json {
        fs::write(path, summary.graph.to_json_pretty()?)?;
        info!("topic graph written to {}", path.display());
    }

    Ok(summary.report.is_complete())
}

fn cmd_groups(config: &TopicGraphConfig, topic_dir: Option<PathBuf>, output: Option<PathBuf>) -> i32 {
    let topic_dir = topic_dir.unwrap_or_else(|| config.topic_dir.clone());
    let output = output.unwrap_or_else(|| config.group_output.clone());

    let groups = StockGroups::load(&topic_dir);
    if groups.is_empty() {
        warn!("no stock group files found in {}", topic_dir.display());
        return 0;
    }

    match groups.write(&output) {
        Ok(()) => {
            info!("generated {} with {} groups", output.display(), groups.len());
            0
        }
        Err(e) => {
            error!("{}", e);
            1
        }
    }
}

fn cmd_info(path: &Path, scan: bool) -> i32 {
    let infos = if scan {
        match scan_stocks_dir(path) {
            Ok(infos) => {
                println!("\n找到 {} 个股票文件:\n", infos.len());
                infos
            }
            Err(e) => {
                error!("{}", e);
                return 0;
            }
        }
    } else {
        match extract_stock_info(path) {
            Ok(info) => vec![info],
            Err(e) => {
                error!("{}", e);
                return 0;
            }
        }
    };

    for info in infos {
        println!("\n{}", info);
    }
    0
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let config = match TopicGraphConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    let code = match cli.command {
        Commands::Topics {
            stocks,
            output,
            json,
            continue_on_error,
        } => cmd_topics(&config, stocks, output, json, continue_on_error),
        Commands::Groups { topic_dir, output } => cmd_groups(&config, topic_dir, output),
        Commands::Info { path, scan } => cmd_info(&path, scan),
    };
    std::process::exit(code);
}
