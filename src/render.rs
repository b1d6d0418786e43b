//! The segment pipeline: window → features → schedule → mix.

use std::path::{Path, PathBuf};

use tracing::{info, instrument, warn};

use crate::config::SonifyConfig;
use crate::error::{ConfigError, ExportError, SegmentError};
use crate::features::{FeatureSet, ReferenceExtractor};
use crate::instruments::{CacheStats, CachedBank, SynthBank};
use crate::io::{output_path, select_window, write_wav, Recording, SegmentSpec};
use crate::mixer::{render_triggers, MasterTrack};
use crate::sequencing::{BeatScheduler, Schedule};

/// One finished segment, normalized and ready to write.
#[derive(Debug, Clone)]
pub struct RenderedSegment {
    pub name: String,
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub schedule: Schedule,
}

impl RenderedSegment {
    pub fn duration_ms(&self) -> f64 {
        self.samples.len() as f64 * 1000.0 / self.sample_rate as f64
    }

    /// Write `<dir>/<prefix>_<name>.wav` and return its path.
    pub fn write_wav(&self, dir: &Path, prefix: &str) -> Result<PathBuf, ExportError> {
        let path = output_path(dir, prefix, &self.name);
        write_wav(&path, &self.samples, self.sample_rate)?;
        Ok(path)
    }
}

/// Result of one entry of a batch render.
#[derive(Debug)]
pub struct SegmentOutcome {
    pub segment: SegmentSpec,
    pub result: Result<RenderedSegment, SegmentError>,
}

/// Renders labelled segments of recordings with one fixed configuration.
///
/// Holds no per-segment state besides the bounded instrument cache, so a `Sonifier`
/// can be shared between threads rendering different segments.
pub struct Sonifier {
    config: SonifyConfig,
    extractor: ReferenceExtractor,
    bank: CachedBank<SynthBank>,
}

impl Sonifier {
    pub fn new(config: SonifyConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let extractor = ReferenceExtractor::new(config.features.clone());
        let bank = CachedBank::new(SynthBank::new(config.audio.sample_rate, config.audio.seed));
        Ok(Self {
            config,
            extractor,
            bank,
        })
    }

    pub fn config(&self) -> &SonifyConfig {
        &self.config
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.bank.stats()
    }

    /// Schedule and mix already-extracted features.
    pub fn render_features(&self, name: &str, features: &FeatureSet) -> Result<RenderedSegment, SegmentError> {
        let schedule = BeatScheduler::new(&self.config)?.run(features)?;

        let mut master = MasterTrack::silent(schedule.duration_ms, self.config.audio.sample_rate);
        let dropped = render_triggers(&mut master, &self.bank, &schedule.triggers);
        if dropped > 0 {
            warn!(segment = name, dropped, "samples fell past the end of the segment");
        }
        master.finalize(self.config.audio.ceiling);

        Ok(RenderedSegment {
            name: name.to_string(),
            sample_rate: master.sample_rate(),
            samples: master.into_samples(),
            schedule,
        })
    }

    #[instrument(skip(self, recording, segment), fields(segment = %segment.name, label = segment.label))]
    pub fn render_segment(&self, recording: &Recording, segment: &SegmentSpec) -> Result<RenderedSegment, SegmentError> {
        let rate = recording.sampling_rate();
        let len = self.config.segment_samples(rate);
        let window = select_window(recording.labels(), segment.label, len, self.config.segments.start)?;
        info!(start = window.start, len = window.len, "rendering segment");

        let channels = recording.window(window.start, window.len)?;
        let features = FeatureSet::extract(&self.extractor, &channels, rate)?;
        let rendered = self.render_features(&segment.name, &features)?;

        info!(
            duration_ms = rendered.duration_ms(),
            triggers = rendered.schedule.triggers.len(),
            "segment rendered"
        );
        Ok(rendered)
    }

    /// Render every configured segment. A failing segment is logged and
    /// reported in its outcome; the rest still render.
    pub fn render_all(&self, recording: &Recording) -> Vec<SegmentOutcome> {
        self.config
            .segments
            .segments
            .iter()
            .map(|segment| {
                let result = self.render_segment(recording, segment);
                if let Err(err) = &result {
                    warn!(segment = %segment.name, error = %err, "skipping segment");
                }
                SegmentOutcome {
                    segment: segment.clone(),
                    result,
                }
            })
            .collect()
    }
}
