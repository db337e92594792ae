//! Audio filter configuration
//!
//! The sample rate and sample format every asset is converted to before
//! mixing. Passed explicitly to the builder instead of living in a global.

use crate::utils::error::{FilterError, FilterResult};
use serde::{Deserialize, Serialize};

/// Sample rate shared with the rest of the render pipeline
pub const DEFAULT_SAMPLE_RATE: u32 = 48_000;

/// Sample formats accepted by the `aformat` filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleFormat {
    #[default]
    S16,
    S32,
    Flt,
    Fltp,
}

impl SampleFormat {
    /// Name used by FFmpeg's `sample_fmts` option
    pub fn as_str(&self) -> &'static str {
        match self {
            SampleFormat::S16 => "s16",
            SampleFormat::S32 => "s32",
            SampleFormat::Flt => "flt",
            SampleFormat::Fltp => "fltp",
        }
    }
}

/// Output format applied to every asset's audio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioFilterConfig {
    /// Samples per second of the rendered audio
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
    #[serde(default)]
    pub sample_format: SampleFormat,
}

fn default_sample_rate() -> u32 {
    DEFAULT_SAMPLE_RATE
}

impl Default for AudioFilterConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            sample_format: SampleFormat::default(),
        }
    }
}

impl AudioFilterConfig {
    pub fn validate(&self) -> FilterResult<()> {
        if self.sample_rate == 0 {
            return Err(FilterError::InvalidConfig(
                "sample rate must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// The leading format-conversion clause of every fragment
    pub fn format_clause(&self) -> String {
        format!(
            "aformat=sample_fmts={}:sample_rates={}",
            self.sample_format.as_str(),
            self.sample_rate
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_format_clause() {
        let config = AudioFilterConfig::default();
        assert_eq!(
            config.format_clause(),
            "aformat=sample_fmts=s16:sample_rates=48000"
        );
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: AudioFilterConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, AudioFilterConfig::default());

        let config: AudioFilterConfig =
            serde_json::from_str(r#"{"sampleRate":44100,"sampleFormat":"fltp"}"#).unwrap();
        assert_eq!(config.sample_rate, 44100);
        assert_eq!(config.sample_format, SampleFormat::Fltp);
    }

    #[test]
    fn test_zero_sample_rate_rejected() {
        let config = AudioFilterConfig {
            sample_rate: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(FilterError::InvalidConfig(_))
        ));
    }
}
