//! Request and result types for audio filter synthesis

use super::trim::OrderingMode;
use serde::{Deserialize, Serialize};

/// Input label consumed by every fragment
pub const INPUT_LABEL: &str = "0:a";
/// Output label produced by every fragment
pub const OUTPUT_LABEL: &str = "a0";

/// Volume envelope of an asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AssetVolume {
    /// Same volume for the whole asset
    Constant(f64),
    /// One volume per composition frame, starting at the asset's first frame
    PerFrame(Vec<f64>),
}

impl Default for AssetVolume {
    fn default() -> Self {
        AssetVolume::Constant(1.0)
    }
}

/// How one audio asset is placed into a render chunk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetPlacement {
    /// Seconds cut from the start of the source
    pub trim_left: f64,
    /// Seconds into the source where audio stops, before playback-rate adjustment
    pub trim_right: f64,
    #[serde(default = "default_playback_rate")]
    pub playback_rate: f64,
    /// Source duration in seconds, `None` when unknown
    #[serde(default)]
    pub asset_duration: Option<f64>,
    /// Composition frame at which the asset becomes audible
    #[serde(default)]
    pub start_in_video: u64,
    pub fps: f64,
    pub channels: u32,
    #[serde(default)]
    pub volume: AssetVolume,
    /// Pitch-shift factor in (0, 2]
    #[serde(default)]
    pub tone_frequency: Option<f64>,
    pub chunk_length_in_seconds: f64,
    #[serde(default)]
    pub allow_amplification_during_render: bool,
    #[serde(default)]
    pub for_seamless_aac_concatenation: bool,
}

fn default_playback_rate() -> f64 {
    1.0
}

impl AssetPlacement {
    pub fn start_in_video_seconds(&self) -> f64 {
        self.start_in_video as f64 / self.fps
    }

    pub fn ordering_mode(&self) -> OrderingMode {
        OrderingMode::from_seamless_flag(self.for_seamless_aac_concatenation)
    }
}

/// A single-input/single-output filter chain plus the padding the caller
/// splices into the surrounding graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterFragment {
    /// `[0:a]<clauses>[a0]`
    pub filter: String,
    /// `adelay=...` directive, absent when the asset starts at zero
    pub pad_start: Option<String>,
    /// `apad=pad_len=...` directive, absent when the asset fills the chunk
    pub pad_end: Option<String>,
}

impl FilterFragment {
    pub fn has_padding(&self) -> bool {
        self.pad_start.is_some() || self.pad_end.is_some()
    }

    /// Inline both pad directives into the chain, just before the output label
    pub fn with_padding_applied(&self) -> String {
        let output = format!("[{}]", OUTPUT_LABEL);
        let body = self.filter.strip_suffix(&output).unwrap_or(&self.filter);

        let mut chain = body.to_string();
        for pad in [&self.pad_start, &self.pad_end].into_iter().flatten() {
            chain.push(',');
            chain.push_str(pad);
        }
        chain.push_str(&output);
        chain
    }
}
