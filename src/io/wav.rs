use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use crate::error::ExportError;

/// `<dir>/<prefix>_<segment>.wav`
pub fn output_path(dir: &Path, prefix: &str, segment: &str) -> PathBuf {
    dir.join(format!("{prefix}_{segment}.wav"))
}

/// Write mono 16-bit PCM. Samples are expected in [-1, 1] and clamped.
#[instrument(skip(samples), fields(path = %path.display(), frames = samples.len()))]
pub fn write_wav(path: &Path, samples: &[f32], sample_rate: u32) -> Result<(), ExportError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec)?;
    for &sample in samples {
        let quantized = (sample.clamp(-1.0, 1.0) * f32::from(i16::MAX)).round() as i16;
        writer.write_sample(quantized)?;
    }
    writer.finalize()?;

    info!("wav export completed");
    Ok(())
}
