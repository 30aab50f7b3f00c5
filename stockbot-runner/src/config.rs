//! Run configuration loaded from TOML.
//!
//! One `StockbotConfig` is built per run and passed down explicitly. Every
//! section has defaults, so a file only needs the keys it changes:
//!
//! ```toml
//! [engine]
//! policy = "override"
//!
//! [engine.thresholds]
//! oversold = 25.0
//!
//! [data]
//! provider = "csv"
//! csv_dir = "data/bars"
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use stockbot_core::data::{Interval, Period};
use stockbot_core::normalize::AlignmentPolicy;
use stockbot_core::signal::CombinePolicy;
use stockbot_core::EngineConfig;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("cannot serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("unknown preset '{0}' (expected one of: service, scanner, portfolio)")]
    UnknownPreset(String),
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

/// Which bar source to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    #[default]
    Yahoo,
    Csv,
    Synthetic,
}

impl FromStr for ProviderKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yahoo" => Ok(Self::Yahoo),
            "csv" => Ok(Self::Csv),
            "synthetic" => Ok(Self::Synthetic),
            other => Err(invalid(
                "data.provider",
                format!("'{other}' (expected yahoo, csv or synthetic)"),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub provider: ProviderKind,
    pub period: Period,
    pub interval: Interval,
    /// Per-ticker fetch timeout.
    pub timeout_secs: u64,
    pub max_retries: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub csv_dir: Option<PathBuf>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Yahoo,
            period: Period::Year1,
            interval: Interval::Daily,
            timeout_secs: 30,
            max_retries: 3,
            csv_dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// 1 runs tickers sequentially.
    pub workers: usize,
    /// Pause before each fetch after the first.
    pub request_delay_ms: u64,
    pub alignment: AlignmentPolicy,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            workers: 1,
            request_delay_ms: 0,
            alignment: AlignmentPolicy::Positional,
        }
    }
}

impl BatchConfig {
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            json: false,
        }
    }
}

/// Named starting points matching the three ways the engine is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Single/compare lookups: override policy on 1y daily bars.
    Service,
    /// Market scan: strict policy on 6mo weekly bars, polite 1s delay.
    Scanner,
    /// Portfolio P/L: RSI-only policy on 6mo daily bars.
    Portfolio,
}

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::Service, Preset::Scanner, Preset::Portfolio];

    pub fn name(&self) -> &'static str {
        match self {
            Preset::Service => "service",
            Preset::Scanner => "scanner",
            Preset::Portfolio => "portfolio",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Preset::ALL
            .into_iter()
            .find(|p| p.name() == wanted)
            .ok_or_else(|| ConfigError::UnknownPreset(s.to_string()))
    }
}

/// Full configuration for one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StockbotConfig {
    pub engine: EngineConfig,
    pub data: DataConfig,
    pub batch: BatchConfig,
    pub logging: LoggingConfig,
}

impl StockbotConfig {
    pub fn preset(preset: Preset) -> Self {
        let mut config = Self::default();
        match preset {
            Preset::Service => {
                config.engine.policy = CombinePolicy::Override;
            }
            Preset::Scanner => {
                config.engine.policy = CombinePolicy::Strict;
                config.data.period = Period::Month6;
                config.data.interval = Interval::Weekly;
                config.batch.request_delay_ms = 1000;
            }
            Preset::Portfolio => {
                config.engine.policy = CombinePolicy::RsiOnly;
                config.data.period = Period::Month6;
            }
        }
        config
    }

    /// Load and validate a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a TOML string. Missing keys take their defaults.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let e = &self.engine;
        if e.rsi_window == 0 {
            return Err(invalid("engine.rsi_window", "must be at least 1"));
        }
        let t = &e.thresholds;
        for (field, v) in [
            ("engine.thresholds.oversold", t.oversold),
            ("engine.thresholds.overbought", t.overbought),
        ] {
            if !(0.0..=100.0).contains(&v) {
                return Err(invalid(field, format!("{v} is outside [0, 100]")));
            }
        }
        if t.oversold >= t.overbought {
            return Err(invalid(
                "engine.thresholds",
                format!(
                    "oversold ({}) must be below overbought ({})",
                    t.oversold, t.overbought
                ),
            ));
        }
        if e.trailing_events == 0 {
            return Err(invalid("engine.trailing_events", "must be at least 1"));
        }
        if !(e.hammer.lower_ratio > 0.0) {
            return Err(invalid("engine.hammer.lower_ratio", "must be positive"));
        }
        if !(e.hammer.upper_ratio > 0.0) {
            return Err(invalid("engine.hammer.upper_ratio", "must be positive"));
        }
        if self.data.timeout_secs == 0 {
            return Err(invalid("data.timeout_secs", "must be at least 1"));
        }
        if self.data.provider == ProviderKind::Csv && self.data.csv_dir.is_none() {
            return Err(invalid("data.csv_dir", "required when provider = \"csv\""));
        }
        if self.batch.workers == 0 {
            return Err(invalid("batch.workers", "must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockbot_core::indicators::RsiSmoothing;

    #[test]
    fn defaults_are_valid() {
        let c = StockbotConfig::default();
        c.validate().unwrap();
        assert_eq!(c.engine.rsi_window, 14);
        assert_eq!(c.data.period, Period::Year1);
        assert_eq!(c.batch.workers, 1);
    }

    #[test]
    fn presets_pick_policy_and_window() {
        let svc = StockbotConfig::preset(Preset::Service);
        assert_eq!(svc.engine.policy, CombinePolicy::Override);
        assert_eq!(svc.data.interval, Interval::Daily);

        let scan = StockbotConfig::preset(Preset::Scanner);
        assert_eq!(scan.engine.policy, CombinePolicy::Strict);
        assert_eq!(scan.data.period, Period::Month6);
        assert_eq!(scan.data.interval, Interval::Weekly);
        assert_eq!(scan.batch.request_delay(), Duration::from_secs(1));

        let pf = StockbotConfig::preset(Preset::Portfolio);
        assert_eq!(pf.engine.policy, CombinePolicy::RsiOnly);

        for p in Preset::ALL {
            StockbotConfig::preset(p).validate().unwrap();
        }
    }

    #[test]
    fn preset_names_parse() {
        assert_eq!("Scanner".parse::<Preset>().unwrap(), Preset::Scanner);
        assert!(matches!(
            "nightly".parse::<Preset>(),
            Err(ConfigError::UnknownPreset(_))
        ));
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let c = StockbotConfig::from_toml(
            r#"
[engine]
policy = "rsi_only"
rsi_smoothing = "simple"

[engine.thresholds]
oversold = 25.0

[data]
period = "6mo"
interval = "1wk"

[batch]
workers = 4
alignment = "by_date"
"#,
        )
        .unwrap();
        assert_eq!(c.engine.policy, CombinePolicy::RsiOnly);
        assert_eq!(c.engine.rsi_smoothing, RsiSmoothing::SimpleMean);
        assert_eq!(c.engine.thresholds.oversold, 25.0);
        assert_eq!(c.engine.thresholds.overbought, 70.0);
        assert_eq!(c.data.period, Period::Month6);
        assert_eq!(c.data.interval, Interval::Weekly);
        assert_eq!(c.batch.workers, 4);
        assert_eq!(c.batch.alignment, AlignmentPolicy::ByDate);
        assert_eq!(c.logging.level, "info");
    }

    #[test]
    fn round_trips_through_toml() {
        let c = StockbotConfig::preset(Preset::Scanner);
        let text = c.to_toml().unwrap();
        assert_eq!(StockbotConfig::from_toml(&text).unwrap(), c);
    }

    #[test]
    fn rejects_bad_values() {
        let cases = [
            "[engine]\nrsi_window = 0\n",
            "[engine.thresholds]\noversold = 80.0\n",
            "[engine.thresholds]\noverbought = 120.0\n",
            "[engine]\ntrailing_events = 0\n",
            "[engine.hammer]\nlower_ratio = 0.0\n",
            "[data]\nprovider = \"csv\"\n",
            "[batch]\nworkers = 0\n",
        ];
        for case in cases {
            assert!(
                matches!(StockbotConfig::from_toml(case), Err(ConfigError::Invalid { .. })),
                "accepted: {case}"
            );
        }
    }

    #[test]
    fn unknown_enum_value_is_parse_error() {
        let err = StockbotConfig::from_toml("[engine]\npolicy = \"yolo\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn reads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stockbot.toml");
        std::fs::write(&path, "[logging]\nlevel = \"debug\"\n").unwrap();
        let c = StockbotConfig::from_file(&path).unwrap();
        assert_eq!(c.logging.level, "debug");

        let missing = StockbotConfig::from_file(&dir.path().join("nope.toml"));
        assert!(matches!(missing, Err(ConfigError::Read { .. })));
    }
}
