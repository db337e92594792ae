//! Trim and tempo ordering
//!
//! Decides whether `atrim` runs before or after the tempo stage and computes
//! the bounds and audible duration that result from that order.

use super::tempo::TempoExpression;
use super::time::stringify_trim;
use serde::{Deserialize, Serialize};

/// Relative order of the trim and tempo stages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderingMode {
    /// Tempo on the untrimmed stream, then trim in the tempo-adjusted time base.
    /// Every chunk then sees the same atempo offset, which keeps AAC chunks
    /// gapless when concatenated.
    Seamless,
    /// Trim first so the tempo filter processes less audio
    Default,
}

impl OrderingMode {
    pub fn from_seamless_flag(for_seamless_aac_concatenation: bool) -> Self {
        if for_seamless_aac_concatenation {
            OrderingMode::Seamless
        } else {
            OrderingMode::Default
        }
    }
}

/// Inputs of the trim/tempo stage
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrimWindow {
    pub trim_left: f64,
    pub trim_right: f64,
    pub playback_rate: f64,
    pub asset_duration: Option<f64>,
}

impl TrimWindow {
    /// Right bound, never past the physical end of the source
    fn clamped_trim_right(&self) -> f64 {
        match self.asset_duration {
            Some(duration) => self.trim_right.min(duration),
            None => self.trim_right,
        }
    }
}

/// Output of the trim/tempo stage
#[derive(Debug, Clone, PartialEq)]
pub struct TrimAndTempo {
    /// Clauses in application order, identity stages already dropped
    pub stages: Vec<String>,
    /// Left bound in the time base of the first applied stage
    pub actual_trim_left: f64,
    /// Seconds of audio left after trimming and tempo scaling
    pub audible_duration: f64,
}

pub fn trim_and_set_tempo(
    window: &TrimWindow,
    mode: OrderingMode,
    tempo: &dyn TempoExpression,
) -> TrimAndTempo {
    match mode {
        OrderingMode::Seamless => tempo_then_trim(window, tempo),
        OrderingMode::Default => trim_then_tempo(window, tempo),
    }
}

fn tempo_then_trim(window: &TrimWindow, tempo: &dyn TempoExpression) -> TrimAndTempo {
    let actual_trim_left = window.trim_left / window.playback_rate;
    let actual_trim_right = window.clamped_trim_right() / window.playback_rate;

    let stages = tempo
        .expression(window.playback_rate)
        .into_iter()
        .chain(std::iter::once(atrim(actual_trim_left, actual_trim_right)))
        .collect();

    TrimAndTempo {
        stages,
        actual_trim_left,
        audible_duration: actual_trim_right - actual_trim_left,
    }
}

fn trim_then_tempo(window: &TrimWindow, tempo: &dyn TempoExpression) -> TrimAndTempo {
    let trim_right = window.clamped_trim_right();

    let stages = std::iter::once(atrim(window.trim_left, trim_right))
        .chain(tempo.expression(window.playback_rate))
        .collect();

    TrimAndTempo {
        stages,
        actual_trim_left: window.trim_left,
        audible_duration: (trim_right - window.trim_left) / window.playback_rate,
    }
}

fn atrim(start: f64, end: f64) -> String {
    format!("atrim={}:{}", stringify_trim(start), stringify_trim(end))
}
