//! biosonic - render physiological recordings as music
//!
//! Run with: cargo run -- render recording.json --out-dir songs

mod app;

use std::path::PathBuf;

use biosonic::io::StartStrategy;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "biosonic", version, about = "Beat-synchronous sonification of physiological recordings")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Render every configured segment of a recording to WAV
    Render(RenderArgs),
    /// Print the labels and channels of a recording
    Inspect {
        /// Recording JSON file
        recording: PathBuf,
    },
}

#[derive(Debug, clap::Args)]
struct RenderArgs {
    /// Recording JSON file
    recording: PathBuf,

    /// TOML configuration; built-in defaults when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory the WAV files are written to
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// File name prefix, overrides the configured one
    #[arg(short, long)]
    prefix: Option<String>,

    /// Segment length in seconds
    #[arg(short, long)]
    duration: Option<f64>,

    /// Where each segment starts: `midpoint` or `first-occurrence`
    #[arg(long)]
    start: Option<StartStrategy>,

    /// Seed for noise-based instruments
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    match Cli::parse().command {
        Command::Render(args) => app::render(args),
        Command::Inspect { recording } => app::inspect(&recording),
    }
}
