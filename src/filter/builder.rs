//! Filter fragment assembly
//!
//! Builds the per-asset `[0:a]...[a0]` chain from an ordered list of stage
//! producers. Each producer returns at most one clause; producers with
//! nothing to do return `None` and are left out entirely, since redundant
//! adjacent filters are audible.

use super::tempo::{AtempoChain, TempoExpression};
use super::trim::{trim_and_set_tempo, TrimAndTempo, TrimWindow};
use super::types::{AssetPlacement, FilterFragment, INPUT_LABEL, OUTPUT_LABEL};
use super::volume::{FrameVolumeExpression, VolumeEvaluation, VolumeExpression, VolumeRequest};
use crate::config::AudioFilterConfig;
use crate::utils::error::{FilterError, FilterResult};

/// End padding shorter than this is floating point noise
const PAD_TOLERANCE_SECONDS: f64 = 0.000_000_1;

/// Highest accepted tone frequency factor
const MAX_TONE_FREQUENCY: f64 = 2.0;

/// Everything a stage producer may look at
struct StageContext<'a> {
    config: &'a AudioFilterConfig,
    trim_and_tempo: &'a TrimAndTempo,
    volume: &'a VolumeEvaluation,
    tone_frequency: Option<f64>,
}

type StageProducer = fn(&StageContext<'_>) -> Option<String>;

/// Stages in chain order
const STAGES: [StageProducer; 4] = [format_stage, trim_tempo_stage, volume_stage, tone_stage];

fn format_stage(ctx: &StageContext<'_>) -> Option<String> {
    Some(ctx.config.format_clause())
}

fn trim_tempo_stage(ctx: &StageContext<'_>) -> Option<String> {
    let stages = &ctx.trim_and_tempo.stages;
    (!stages.is_empty()).then(|| stages.join(","))
}

fn volume_stage(ctx: &StageContext<'_>) -> Option<String> {
    (!ctx.volume.is_identity())
        .then(|| format!("volume={}:eval={}", ctx.volume.value, ctx.volume.eval))
}

fn tone_stage(ctx: &StageContext<'_>) -> Option<String> {
    let rate = ctx.config.sample_rate;
    ctx.tone_frequency
        .filter(|&tone| tone != 1.0)
        .map(|tone| format!("asetrate={rate}*{tone},aresample={rate},atempo=1/{tone}"))
}

/// Synthesizes the audio filter fragment for one asset in one render chunk
pub struct FilterGraphBuilder {
    config: AudioFilterConfig,
    tempo: Box<dyn TempoExpression>,
    volume: Box<dyn VolumeExpression>,
}

impl FilterGraphBuilder {
    /// Builder using the `atempo` chain and frame volume services
    pub fn new(config: AudioFilterConfig) -> Self {
        Self::with_services(config, AtempoChain, FrameVolumeExpression)
    }

    pub fn with_services(
        config: AudioFilterConfig,
        tempo: impl TempoExpression + 'static,
        volume: impl VolumeExpression + 'static,
    ) -> Self {
        Self {
            config,
            tempo: Box::new(tempo),
            volume: Box::new(volume),
        }
    }

    pub fn config(&self) -> &AudioFilterConfig {
        &self.config
    }

    /// Build the fragment for `placement`.
    ///
    /// Returns `Ok(None)` when the trim window starts at or past the end of
    /// the source, meaning the asset has nothing to contribute to this chunk.
    pub fn build(&self, placement: &AssetPlacement) -> FilterResult<Option<FilterFragment>> {
        if let Some(duration) = placement.asset_duration {
            if placement.trim_left >= duration {
                tracing::debug!(
                    "Skipping asset: trimLeft {} is past asset duration {}",
                    placement.trim_left,
                    duration
                );
                return Ok(None);
            }
        }

        self.validate(placement)?;

        let start_in_video_seconds = placement.start_in_video_seconds();

        let trim_and_tempo = trim_and_set_tempo(
            &TrimWindow {
                trim_left: placement.trim_left,
                trim_right: placement.trim_right,
                playback_rate: placement.playback_rate,
                asset_duration: placement.asset_duration,
            },
            placement.ordering_mode(),
            self.tempo.as_ref(),
        );

        // Envelope timestamps follow the time base of the first applied stage
        let volume = self.volume.evaluate(&VolumeRequest {
            volume: &placement.volume,
            fps: placement.fps,
            trim_left: trim_and_tempo.actual_trim_left,
            allow_amplification_during_render: placement.allow_amplification_during_render,
        });

        let ctx = StageContext {
            config: &self.config,
            trim_and_tempo: &trim_and_tempo,
            volume: &volume,
            tone_frequency: placement.tone_frequency,
        };
        let clauses: Vec<String> = STAGES.iter().filter_map(|stage| stage(&ctx)).collect();

        let fragment = FilterFragment {
            filter: format!("[{}]{}[{}]", INPUT_LABEL, clauses.join(","), OUTPUT_LABEL),
            pad_start: self.pad_start(start_in_video_seconds, placement.channels),
            pad_end: self.pad_end(
                placement.chunk_length_in_seconds
                    - trim_and_tempo.audible_duration
                    - start_in_video_seconds,
            ),
        };

        tracing::debug!(
            "Built audio filter ({:?} mode, actual trim left {}s, audible {}s): {}",
            placement.ordering_mode(),
            trim_and_tempo.actual_trim_left,
            trim_and_tempo.audible_duration,
            fragment.filter
        );

        Ok(Some(fragment))
    }

    fn validate(&self, placement: &AssetPlacement) -> FilterResult<()> {
        if let Some(tone) = placement.tone_frequency {
            if !(tone > 0.0 && tone <= MAX_TONE_FREQUENCY) {
                return Err(FilterError::InvalidToneFrequency(tone));
            }
        }

        self.config.validate()?;

        if !(placement.fps.is_finite() && placement.fps > 0.0) {
            return Err(FilterError::InvalidConfig(format!(
                "fps must be a positive number, got {}",
                placement.fps
            )));
        }
        if !(placement.playback_rate.is_finite() && placement.playback_rate > 0.0) {
            return Err(FilterError::InvalidConfig(format!(
                "playbackRate must be a positive number, got {}",
                placement.playback_rate
            )));
        }
        if placement.channels == 0 {
            return Err(FilterError::InvalidConfig(
                "channels must be at least 1".to_string(),
            ));
        }

        for (name, value) in [
            ("trimLeft", placement.trim_left),
            ("trimRight", placement.trim_right),
            ("chunkLengthInSeconds", placement.chunk_length_in_seconds),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(FilterError::InvalidConfig(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        if placement.trim_right < placement.trim_left {
            return Err(FilterError::InvalidConfig(format!(
                "trimRight {} is before trimLeft {}",
                placement.trim_right, placement.trim_left
            )));
        }
        Ok(())
    }

    /// Per-channel delay, one extra value in case the probed channel count is low
    fn pad_start(&self, start_in_video_seconds: f64, channels: u32) -> Option<String> {
        if start_in_video_seconds == 0.0 {
            return None;
        }
        let delay_ms = ((start_in_video_seconds * 1000.0).round() as i64).to_string();
        let delays = vec![delay_ms; channels as usize + 1];
        Some(format!("adelay={}", delays.join("|")))
    }

    fn pad_end(&self, pad_at_end: f64) -> Option<String> {
        if pad_at_end <= PAD_TOLERANCE_SECONDS {
            return None;
        }
        let pad_len = (pad_at_end * self.config.sample_rate as f64).round() as i64;
        Some(format!("apad=pad_len={}", pad_len))
    }
}

impl Default for FilterGraphBuilder {
    fn default() -> Self {
        Self::new(AudioFilterConfig::default())
    }
}
