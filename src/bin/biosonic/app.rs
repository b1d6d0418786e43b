//! Subcommand implementations

use std::path::Path;

use color_eyre::eyre::{bail, Result as EyreResult, WrapErr};
use tracing::info;

use biosonic::{io::Recording, Sonifier, SonifyConfig};

use super::RenderArgs;

pub fn render(args: RenderArgs) -> EyreResult<()> {
    let mut config = match &args.config {
        Some(path) => SonifyConfig::load(path).wrap_err("failed to load configuration")?,
        None => SonifyConfig::default(),
    };
    if let Some(prefix) = args.prefix {
        config.segments.output_prefix = prefix;
    }
    if let Some(duration) = args.duration {
        config.timeline.segment_duration_s = duration;
    }
    if let Some(start) = args.start {
        config.segments.start = start;
    }
    if let Some(seed) = args.seed {
        config.audio.seed = seed;
    }

    let prefix = config.segments.output_prefix.clone();
    let sonifier = Sonifier::new(config).wrap_err("invalid configuration")?;

    let recording = Recording::load(&args.recording)
        .wrap_err_with(|| format!("failed to load {}", args.recording.display()))?;

    let mut written = 0;
    for outcome in sonifier.render_all(&recording) {
        // Failures were already logged by the sonifier.
        let Ok(segment) = outcome.result else {
            continue;
        };
        let path = segment
            .write_wav(&args.out_dir, &prefix)
            .wrap_err_with(|| format!("failed to write segment {}", segment.name))?;
        println!(
            "{:<12} {:>6.1}s  {:>4} transitions  {}",
            segment.name,
            segment.duration_ms() / 1000.0,
            segment.schedule.transitions.len(),
            path.display()
        );
        written += 1;
    }

    let stats = sonifier.cache_stats();
    info!(hits = stats.hits, misses = stats.misses, "instrument cache");

    if written == 0 {
        bail!("no segment could be rendered");
    }
    Ok(())
}

pub fn inspect(path: &Path) -> EyreResult<()> {
    let recording =
        Recording::load(path).wrap_err_with(|| format!("failed to load {}", path.display()))?;

    println!("=== {} ===", path.display());
    println!("Sampling rate: {} Hz", recording.sampling_rate());
    println!(
        "Samples: {} ({:.1}s)",
        recording.len(),
        recording.len() as f64 / recording.sampling_rate()
    );
    println!();

    println!("Channels:");
    for (channel, samples) in recording.channels() {
        println!("  {:<5} {} samples", channel, samples.len());
    }
    println!();

    println!("Labels:");
    for (label, count) in recording.label_counts() {
        println!(
            "  {:>3}  {:>9} samples  {:>8.1}s",
            label,
            count,
            count as f64 / recording.sampling_rate()
        );
    }
    Ok(())
}
