use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use crfcut::{render, ModelBundle, OutputFormat, RunStats, Segmenter, ToolSearch};

#[derive(Parser, Debug)]
#[command(name = "crfcut")]
#[command(about = "Statistical sentence and word segmenter backed by an external CRF labeler")]
#[command(version)]
struct Args {
    /// Model directory holding the `wapiti` model and the optional `elman`
    /// and `vocab` files
    #[arg(short = 'm', long)]
    model_dir: PathBuf,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Normal)]
    format: OutputFormat,

    /// Write a JSON run summary to this path
    #[arg(long)]
    stats_out: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Logs go to stderr; stdout carries the segmented text
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    info!(?args, "Parsed CLI arguments");

    // Resolve models and executables before touching stdin so configuration
    // and environment errors abort with nothing consumed and nothing printed
    let bundle = ModelBundle::resolve(&args.model_dir)?;
    let search = ToolSearch::from_env();
    let segmenter = Segmenter::from_bundle(bundle, &search)?;

    let start = std::time::Instant::now();
    let text =
        std::io::read_to_string(std::io::stdin()).context("Failed to read UTF-8 text from stdin")?;
    info!(characters = text.chars().count(), "Read input text");

    let labeled = segmenter.segment(&text)?;
    print!("{}", render(&labeled, args.format));

    if let Some(path) = args.stats_out {
        let stats = RunStats::from_stream(
            &labeled,
            text.chars().count(),
            segmenter.has_recurrent_features(),
            start.elapsed(),
        );
        stats.write_json(&path)?;
        info!("Wrote run stats to {}", path.display());
    }

    Ok(())
}
