use std::fs;
use std::io::{self, BufWriter, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use stats_to_void::config::Settings;
use stats_to_void::serialize::{self, Format};
use stats_to_void::{Result, stats_to_void};

/// Describe an RDF dataset in VOID from optimizer statistics
#[derive(Parser, Debug)]
#[command(
    version,
    about = "Turns an optimizer statistics file (SSE) into a VOID dataset description",
    after_help = "Example: stats-to-void stats.opt http://example.org/sparql http://example.org/dataset > void.ttl"
)]
struct Args {
    /// Statistics file written by the optimizer
    stats: PathBuf,
    /// SPARQL endpoint of the dataset (ignored when blank)
    endpoint: Option<String>,
    /// IRI naming the dataset, a blank node is used otherwise
    dataset: Option<String>,
    /// Settings file, ./stats-to-void.toml is read when present
    #[arg(long)]
    config: Option<PathBuf>,
    /// Output syntax, overrides the settings
    #[arg(long, value_enum)]
    format: Option<Format>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let settings = Settings::load(args.config.as_deref());
    let level = settings.as_ref().map(|s| s.log_level.as_str()).unwrap_or("warn");
    init_tracing(level);

    match settings.and_then(|settings| run(&args, &settings)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

// logs go to stderr, stdout carries only the graph
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .init();
}

fn run(args: &Args, settings: &Settings) -> Result<()> {
    let text = fs::read_to_string(&args.stats)?;
    let graph = stats_to_void(&text, settings, args.endpoint.as_deref(), args.dataset.as_deref())?;
    let Some(graph) = graph else {
        info!(file = %args.stats.display(), "Nothing written");
        return Ok(());
    };
    let format = args.format.unwrap_or(settings.format);
    let stdout = io::stdout();
    serialize::write(&graph, format, BufWriter::new(stdout.lock()))?;
    info!(triples = graph.len(), ?format, "Dataset description written");
    Ok(())
}
