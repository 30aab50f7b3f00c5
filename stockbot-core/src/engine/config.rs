//! Engine configuration.

use crate::candlestick::HammerParams;
use crate::indicators::RsiSmoothing;
use crate::signal::{CombinePolicy, RsiThresholds};
use serde::{Deserialize, Serialize};

/// Everything the signal engine needs; thresholds and window are values,
/// never literals, so alternative parameter sets can be tested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub rsi_window: usize,
    pub rsi_smoothing: RsiSmoothing,
    pub policy: CombinePolicy,
    /// How many of the most recent pattern events the override policy reads.
    pub trailing_events: usize,
    pub thresholds: RsiThresholds,
    pub hammer: HammerParams,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rsi_window: 14,
            rsi_smoothing: RsiSmoothing::Wilder,
            policy: CombinePolicy::Strict,
            trailing_events: 3,
            thresholds: RsiThresholds::default(),
            hammer: HammerParams::default(),
        }
    }
}

impl EngineConfig {
    pub fn with_policy(policy: CombinePolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_classic_parameters() {
        let c = EngineConfig::default();
        assert_eq!(c.rsi_window, 14);
        assert_eq!(c.thresholds.oversold, 30.0);
        assert_eq!(c.thresholds.overbought, 70.0);
        assert_eq!(c.trailing_events, 3);
        assert_eq!(c.hammer.lower_ratio, 2.0);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let c: EngineConfig = toml::from_str("policy = \"override\"\nrsi_window = 10\n").unwrap();
        assert_eq!(c.policy, CombinePolicy::Override);
        assert_eq!(c.rsi_window, 10);
        assert_eq!(c.trailing_events, 3);
    }
}
