//! Audio Filter Graph - FFmpeg audio filter synthesis for chunked rendering.
//!
//! Given one audio asset's trim window, playback rate, volume envelope and
//! position in the composition, this crate produces the filter fragment and
//! padding directives that place its samples inside a fixed-length chunk.

pub mod config;
pub mod filter;
pub mod manifest;
pub mod utils;

pub use config::{AudioFilterConfig, SampleFormat, DEFAULT_SAMPLE_RATE};
pub use filter::{AssetPlacement, AssetVolume, FilterFragment, FilterGraphBuilder, OrderingMode};
pub use manifest::{build_chunk_fragments, read_manifest, write_manifest, ChunkManifest};
pub use utils::error::{ErrorResponse, FilterError, FilterResult};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing/logging.
///
/// Does nothing if a global subscriber is already installed.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "audio_filter_graph=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();

    tracing::debug!("Audio filter graph v{}", env!("CARGO_PKG_VERSION"));
}

/// Build the filter fragment for a single asset with the default services
pub fn build_filter(
    config: &AudioFilterConfig,
    placement: &AssetPlacement,
) -> FilterResult<Option<FilterFragment>> {
    FilterGraphBuilder::new(config.clone()).build(placement)
}
