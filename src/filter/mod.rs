//! Audio filter synthesis
//!
//! This module turns an asset's trim window, playback rate, volume envelope
//! and timeline position into the FFmpeg filter fragment that decodes and
//! positions its audio inside one render chunk.

pub mod builder;
pub mod tempo;
pub mod time;
pub mod trim;
pub mod types;
pub mod volume;

pub use builder::FilterGraphBuilder;
pub use tempo::{AtempoChain, TempoExpression};
pub use time::stringify_trim;
pub use trim::{trim_and_set_tempo, OrderingMode, TrimAndTempo, TrimWindow};
pub use types::{AssetPlacement, AssetVolume, FilterFragment};
pub use volume::{
    FrameVolumeExpression, VolumeEval, VolumeEvaluation, VolumeExpression, VolumeRequest,
};
