use std::{fs, path::Path, time::Duration};

use divscan_model::{identifiers::ExchangeId, timeframe::Timeframe};
use serde::{Deserialize, Serialize};

use crate::{
    cluster::{ClusterExtractor, DEFAULT_WINDOW},
    model::config_error::ConfigError,
    oscillator::{OscillatorConfig, OscillatorEngine, TrendConfig},
    strategy::{
        divergence::DivergenceStrategy,
        rule::{DivergenceRule, Preset, RuleEntry},
    },
};

/// Everything a scan needs, loaded from JSON. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ScanConfig {
    pub exchange: ExchangeId,
    /// Quote currency the universe is restricted to.
    pub quote: String,
    /// Number of markets kept after ranking by 24h quote volume.
    pub top_n: usize,
    pub timeframes: Vec<Timeframe>,
    /// Bars requested per market and timeframe.
    pub bar_limit: usize,
    pub oscillator: OscillatorConfig,
    pub trend: TrendConfig,
    pub cluster_window: usize,
    pub rules: Vec<RuleEntry>,
    /// Markets fetched concurrently.
    pub concurrency: usize,
    /// Pause after every fetch.
    pub throttle_ms: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            exchange: ExchangeId::Okx,
            quote: "usdt".to_owned(),
            top_n: 150,
            timeframes: vec![Timeframe::W1],
            bar_limit: 200,
            oscillator: OscillatorConfig::default(),
            trend: TrendConfig::default(),
            cluster_window: DEFAULT_WINDOW,
            rules: vec![RuleEntry::Preset(Preset::StrictTwoCluster)],
            concurrency: 1,
            throttle_ms: 100,
        }
    }
}

impl ScanConfig {
    pub fn from_json(input: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(input).map_err(ConfigError::from)
    }

    pub fn from_file<P>(path: P) -> Result<Self, ConfigError>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|error| ConfigError::Io {
            path: path.to_path_buf(),
            error,
        })?;
        Self::from_json(&contents)
    }

    pub fn throttle(&self) -> Duration {
        Duration::from_millis(self.throttle_ms)
    }

    pub fn rules(&self) -> Vec<DivergenceRule> {
        self.rules.iter().cloned().map(DivergenceRule::from).collect()
    }

    /// Build one strategy per rule, validating the whole configuration on the way.
    pub fn strategies(&self) -> Result<Vec<DivergenceStrategy>, ConfigError> {
        if self.quote.trim().is_empty() {
            return Err(ConfigError::invalid("quote", "must not be empty"));
        }
        if self.top_n == 0 {
            return Err(ConfigError::invalid("top_n", "must be positive"));
        }
        if self.timeframes.is_empty() {
            return Err(ConfigError::invalid("timeframes", "must not be empty"));
        }
        if self.concurrency == 0 {
            return Err(ConfigError::invalid("concurrency", "must be positive"));
        }
        if self.rules.is_empty() {
            return Err(ConfigError::invalid("rules", "must not be empty"));
        }

        let engine = OscillatorEngine::new(self.oscillator, self.trend)?;
        let extractor = ClusterExtractor::new(self.cluster_window)?;

        self.rules()
            .into_iter()
            .map(|rule| {
                let strategy = DivergenceStrategy::new(engine.clone(), extractor, rule)?;
                if strategy.required_bars() > self.bar_limit {
                    return Err(ConfigError::invalid(
                        "bar_limit",
                        format!(
                            "{} is below the {} bars rule {} needs",
                            self.bar_limit,
                            strategy.required_bars(),
                            strategy.rule().name
                        ),
                    ));
                }
                Ok(strategy)
            })
            .collect()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.strategies().map(|_| ())
    }
}
