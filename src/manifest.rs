//! Chunk manifest read/write operations
//!
//! A manifest is a JSON file describing one render chunk: the output audio
//! format and every audio asset placed in that chunk.

use crate::config::AudioFilterConfig;
use crate::filter::{AssetPlacement, FilterFragment, FilterGraphBuilder};
use crate::utils::error::FilterResult;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// All audio placed into one render chunk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkManifest {
    #[serde(default)]
    pub config: AudioFilterConfig,
    #[serde(default)]
    pub assets: Vec<AssetPlacement>,
}

/// Read a manifest from a JSON file
pub fn read_manifest(path: &Path) -> FilterResult<ChunkManifest> {
    let content = fs::read_to_string(path)?;
    let manifest: ChunkManifest = serde_json::from_str(&content)?;

    tracing::info!(
        "Loaded chunk manifest with {} assets from {:?}",
        manifest.assets.len(),
        path
    );

    Ok(manifest)
}

/// Write a manifest as pretty-printed JSON
pub fn write_manifest(manifest: &ChunkManifest, path: &Path) -> FilterResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let content = serde_json::to_string_pretty(manifest)?;
    fs::write(path, content)?;

    tracing::info!("Saved chunk manifest to {:?}", path);

    Ok(())
}

/// Build the fragment of every audible asset, in manifest order.
///
/// Assets trimmed past their end are left out. An invalid asset fails the
/// whole chunk.
pub fn build_chunk_fragments(manifest: &ChunkManifest) -> FilterResult<Vec<FilterFragment>> {
    let builder = FilterGraphBuilder::new(manifest.config.clone());

    let mut fragments = Vec::with_capacity(manifest.assets.len());
    for (index, asset) in manifest.assets.iter().enumerate() {
        match builder.build(asset)? {
            Some(fragment) => fragments.push(fragment),
            None => tracing::debug!("Asset {} has no audio in this chunk", index),
        }
    }

    Ok(fragments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::AssetVolume;
    use crate::utils::error::FilterError;
    use tempfile::tempdir;

    fn asset(trim_left: f64, asset_duration: Option<f64>) -> AssetPlacement {
        AssetPlacement {
            trim_left,
            trim_right: 4.0,
            playback_rate: 1.0,
            asset_duration,
            start_in_video: 0,
            fps: 25.0,
            channels: 1,
            volume: AssetVolume::Constant(1.0),
            tone_frequency: None,
            chunk_length_in_seconds: 4.0,
            allow_amplification_during_render: false,
            for_seamless_aac_concatenation: false,
        }
    }

    #[test]
    fn test_write_and_read_manifest() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("chunks").join("chunk-0.json");

        let manifest = ChunkManifest {
            config: AudioFilterConfig::default(),
            assets: vec![asset(0.0, Some(10.0))],
        };
        write_manifest(&manifest, &path).unwrap();

        let loaded = read_manifest(&path).unwrap();
        assert_eq!(loaded, manifest);
    }

    #[test]
    fn test_read_missing_manifest() {
        let dir = tempdir().unwrap();
        let result = read_manifest(&dir.path().join("missing.json"));
        assert!(matches!(result, Err(FilterError::Io(_))));
    }

    #[test]
    fn test_read_malformed_manifest() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{\"assets\": 3}").unwrap();
        assert!(matches!(read_manifest(&path), Err(FilterError::Json(_))));
    }

    #[test]
    fn test_build_skips_silent_assets() {
        let manifest = ChunkManifest {
            config: AudioFilterConfig::default(),
            assets: vec![asset(0.0, Some(10.0)), asset(5.0, Some(3.0)), asset(1.0, None)],
        };
        let fragments = build_chunk_fragments(&manifest).unwrap();

        assert_eq!(fragments.len(), 2);
        assert!(fragments[0].filter.contains("atrim=0us:4000000us"));
        assert!(fragments[1].filter.contains("atrim=1000000us:4000000us"));
        assert_eq!(fragments[1].pad_end.as_deref(), Some("apad=pad_len=48000"));
    }

    #[test]
    fn test_build_fails_on_invalid_asset() {
        let mut bad = asset(0.0, None);
        bad.tone_frequency = Some(2.5);
        let manifest = ChunkManifest {
            config: AudioFilterConfig::default(),
            assets: vec![asset(0.0, None), bad],
        };
        assert!(matches!(
            build_chunk_fragments(&manifest),
            Err(FilterError::InvalidToneFrequency(_))
        ));
    }
}
