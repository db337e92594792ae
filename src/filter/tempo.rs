//! Tempo expression generation
//!
//! Turns a playback-rate ratio into an `atempo` clause. A single `atempo`
//! stage only accepts ratios in 0.5..=2.0, so more extreme ratios are built
//! from chained stages.

/// Produces the tempo clause for a playback-rate ratio.
///
/// Returns `None` when the ratio needs no tempo stage at all.
pub trait TempoExpression: Send + Sync {
    fn expression(&self, playback_rate: f64) -> Option<String>;
}

/// Default tempo service built on chained `atempo` filters
#[derive(Debug, Clone, Copy, Default)]
pub struct AtempoChain;

impl TempoExpression for AtempoChain {
    fn expression(&self, playback_rate: f64) -> Option<String> {
        build_atempo_chain(playback_rate)
    }
}

const ATEMPO_MIN: f64 = 0.5;
const ATEMPO_MAX: f64 = 2.0;

/// Build atempo filter chain for arbitrary speed changes
/// atempo only accepts 0.5-2.0, so chain multiple for larger changes
fn build_atempo_chain(playback_rate: f64) -> Option<String> {
    if playback_rate == 1.0 || !playback_rate.is_finite() || playback_rate <= 0.0 {
        return None;
    }

    let mut remaining = playback_rate;
    let mut filters = Vec::new();

    while remaining > ATEMPO_MAX {
        filters.push("atempo=2.0".to_string());
        remaining /= 2.0;
    }
    while remaining < ATEMPO_MIN {
        filters.push("atempo=0.5".to_string());
        remaining *= 2.0;
    }

    if remaining != 1.0 {
        filters.push(format!("atempo={:.6}", remaining));
    }

    if filters.is_empty() {
        None
    } else {
        Some(filters.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atempo_chain_normal() {
        assert_eq!(AtempoChain.expression(1.0), None);
    }

    #[test]
    fn test_atempo_chain_2x() {
        let chain = AtempoChain.expression(2.0).unwrap();
        assert_eq!(chain, "atempo=2.000000");
    }

    #[test]
    fn test_atempo_chain_4x() {
        // 4x speed needs: atempo=2.0,atempo=2.0
        let chain = AtempoChain.expression(4.0).unwrap();
        assert_eq!(chain, "atempo=2.0,atempo=2.0");
    }

    #[test]
    fn test_atempo_chain_half() {
        let chain = AtempoChain.expression(0.5).unwrap();
        assert_eq!(chain, "atempo=0.500000");
    }

    #[test]
    fn test_atempo_chain_extreme_slowdown() {
        // 0.1 = 0.5 * 0.5 * 0.5 * 0.8
        let chain = AtempoChain.expression(0.1).unwrap();
        assert_eq!(chain.matches("atempo=0.5,").count(), 3);
        assert!(chain.ends_with("atempo=0.800000"));
    }

    #[test]
    fn test_atempo_chain_rejects_invalid_rates() {
        assert_eq!(AtempoChain.expression(0.0), None);
        assert_eq!(AtempoChain.expression(-1.0), None);
        assert_eq!(AtempoChain.expression(f64::NAN), None);
    }
}
