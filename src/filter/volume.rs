//! Volume expression generation
//!
//! Converts an asset's volume envelope into the value and evaluation mode of
//! an FFmpeg `volume` filter.

use super::types::AssetVolume;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// When FFmpeg evaluates the volume expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolumeEval {
    Once,
    Frame,
}

impl VolumeEval {
    pub fn as_str(&self) -> &'static str {
        match self {
            VolumeEval::Once => "once",
            VolumeEval::Frame => "frame",
        }
    }
}

impl fmt::Display for VolumeEval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the volume service needs to know about an asset
#[derive(Debug, Clone, Copy)]
pub struct VolumeRequest<'a> {
    pub volume: &'a AssetVolume,
    pub fps: f64,
    pub trim_left: f64,
    pub allow_amplification_during_render: bool,
}

/// Value and evaluation mode of a `volume` filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeEvaluation {
    /// `"1"` means the volume filter can be skipped
    pub value: String,
    pub eval: VolumeEval,
}

impl VolumeEvaluation {
    pub fn is_identity(&self) -> bool {
        self.value == "1"
    }
}

/// Produces the volume filter arguments for an asset
pub trait VolumeExpression: Send + Sync {
    fn evaluate(&self, request: &VolumeRequest<'_>) -> VolumeEvaluation;
}

/// Default volume service for constant and per-frame envelopes
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameVolumeExpression;

impl VolumeExpression for FrameVolumeExpression {
    fn evaluate(&self, request: &VolumeRequest<'_>) -> VolumeEvaluation {
        let max_volume = if request.allow_amplification_during_render {
            f64::INFINITY
        } else {
            1.0
        };

        let frames = match request.volume {
            AssetVolume::Constant(volume) => return constant(*volume, max_volume),
            AssetVolume::PerFrame(frames) => frames,
        };

        let Some(&first) = frames.first() else {
            return constant(1.0, max_volume);
        };
        if frames.iter().all(|&v| v == first) {
            return constant(first, max_volume);
        }

        VolumeEvaluation {
            value: format!("'{}'", envelope_expression(frames, request, max_volume)),
            eval: VolumeEval::Frame,
        }
    }
}

fn constant(volume: f64, max_volume: f64) -> VolumeEvaluation {
    VolumeEvaluation {
        value: format!("{}", volume.clamp(0.0, max_volume)),
        eval: VolumeEval::Once,
    }
}

/// Nested `if(...)` over frame ranges, the most common volume as fallback
fn envelope_expression(frames: &[f64], request: &VolumeRequest<'_>, max_volume: f64) -> String {
    // The last frame is repeated so its volume holds until the end of its
    // own duration rather than stopping at its start timestamp.
    let padded = frames
        .iter()
        .chain(frames.last())
        .map(|&v| volume_key(v.clamp(0.0, max_volume)));

    // Volume (in thousandths) -> frames using it, in frame order
    let mut by_volume: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
    for (frame, key) in padded.enumerate() {
        by_volume.entry(key).or_default().push(frame);
    }

    let mut levels: Vec<(i64, Vec<usize>)> = by_volume.into_iter().collect();
    levels.sort_by_key(|(_, frames)| frames.len());

    let mut levels = levels.into_iter().rev();
    let Some((fallback, _)) = levels.next() else {
        return "1".to_string();
    };

    let mut expression = format_volume(fallback);
    for (key, frames) in levels {
        expression = format!(
            "if({},{},{})",
            frame_ranges(&frames, request.fps, request.trim_left),
            format_volume(key),
            expression
        );
    }
    expression
}

fn volume_key(volume: f64) -> i64 {
    (volume * 1000.0).round() as i64
}

fn format_volume(key: i64) -> String {
    format!("{}", key as f64 / 1000.0)
}

/// `between(t,a,b)` per run of consecutive frames, joined with `+`
fn frame_ranges(frames: &[usize], fps: f64, trim_left: f64) -> String {
    let mut runs: Vec<(usize, usize)> = Vec::new();
    for &frame in frames {
        match runs.last_mut() {
            Some((_, last)) if *last + 1 == frame => *last = frame,
            _ => runs.push((frame, frame)),
        }
    }

    runs.iter()
        .map(|&(first, last)| {
            let before = (first as f64 - 0.5) / fps + trim_left;
            let after = (last as f64 + 0.5) / fps + trim_left;
            format!("between(t,{:.4},{:.4})", before, after)
        })
        .collect::<Vec<_>>()
        .join("+")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evaluate(volume: AssetVolume, allow_amplification: bool) -> VolumeEvaluation {
        FrameVolumeExpression.evaluate(&VolumeRequest {
            volume: &volume,
            fps: 10.0,
            trim_left: 0.0,
            allow_amplification_during_render: allow_amplification,
        })
    }

    #[test]
    fn test_constant_volume() {
        let result = evaluate(AssetVolume::Constant(0.5), false);
        assert_eq!(result.value, "0.5");
        assert_eq!(result.eval, VolumeEval::Once);

        assert!(evaluate(AssetVolume::Constant(1.0), false).is_identity());
    }

    #[test]
    fn test_amplification_requires_opt_in() {
        assert_eq!(evaluate(AssetVolume::Constant(2.5), false).value, "1");
        assert_eq!(evaluate(AssetVolume::Constant(2.5), true).value, "2.5");
    }

    #[test]
    fn test_uniform_per_frame_volume_is_constant() {
        let result = evaluate(AssetVolume::PerFrame(vec![0.25; 5]), false);
        assert_eq!(result.value, "0.25");
        assert_eq!(result.eval, VolumeEval::Once);

        assert!(evaluate(AssetVolume::PerFrame(vec![]), false).is_identity());
    }

    #[test]
    fn test_per_frame_envelope() {
        // Frames 0-1 at 0.5, frames 2-3 (plus the padded frame 4) at 1
        let result = evaluate(AssetVolume::PerFrame(vec![0.5, 0.5, 1.0, 1.0]), false);
        assert_eq!(result.eval, VolumeEval::Frame);
        assert_eq!(result.value, "'if(between(t,-0.0500,0.1500),0.5,1)'");
    }

    #[test]
    fn test_envelope_ranges_shift_by_trim_left() {
        let volume = AssetVolume::PerFrame(vec![1.0, 0.0, 1.0, 1.0]);
        let result = FrameVolumeExpression.evaluate(&VolumeRequest {
            volume: &volume,
            fps: 10.0,
            trim_left: 2.0,
            allow_amplification_during_render: false,
        });
        assert_eq!(result.value, "'if(between(t,2.0500,2.1500),0,1)'");
    }

    #[test]
    fn test_frame_ranges_split_runs() {
        assert_eq!(
            frame_ranges(&[0, 1, 4], 2.0, 0.0),
            "between(t,-0.2500,0.7500)+between(t,1.7500,2.2500)"
        );
    }
}
