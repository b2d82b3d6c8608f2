//! MACD oscillator and long-window trend references.
//!
//! Every EMA is seeded by its first observation and smoothed with `2 / (length + 1)`, so a
//! fresh engine reproduces pandas' `ewm(span, adjust=False)` from the very first bar.

use divscan_model::series::PriceSeries;
use serde::{Deserialize, Serialize};
use ta::{
    indicators::{ExponentialMovingAverage, MovingAverageConvergenceDivergence, SimpleMovingAverage},
    Next,
};

use crate::model::config_error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct OscillatorConfig {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
}

impl Default for OscillatorConfig {
    fn default() -> Self {
        Self {
            fast: 12,
            slow: 26,
            signal: 9,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct TrendConfig {
    pub ema: usize,
    pub ma: usize,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self { ema: 55, ma: 99 }
    }
}

/// One bar's MACD values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OscillatorSample {
    /// DIF: fast EMA minus slow EMA.
    pub momentum: f64,
    /// DEA: EMA of the momentum line.
    pub signal: f64,
    pub histogram: f64,
}

/// Trend references as of the last bar.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct TrendLevels {
    pub ema: f64,
    pub ma: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OscillatorFrame {
    /// Aligned one-to-one with the input bars.
    pub samples: Vec<OscillatorSample>,
    pub trend: TrendLevels,
}

#[derive(Debug, Clone)]
pub struct OscillatorEngine {
    config: OscillatorConfig,
    trend_config: TrendConfig,
    macd: MovingAverageConvergenceDivergence,
    trend_ema: ExponentialMovingAverage,
    trend_ma: SimpleMovingAverage,
}

impl OscillatorEngine {
    pub fn new(config: OscillatorConfig, trend_config: TrendConfig) -> Result<Self, ConfigError> {
        if config.fast == 0 || config.slow == 0 || config.signal == 0 {
            return Err(ConfigError::invalid("oscillator", "lengths must be positive"));
        }
        if config.fast >= config.slow {
            return Err(ConfigError::invalid(
                "oscillator",
                format!("fast length {} must be below slow length {}", config.fast, config.slow),
            ));
        }
        if trend_config.ema == 0 || trend_config.ma == 0 {
            return Err(ConfigError::invalid("trend", "lengths must be positive"));
        }

        let macd = MovingAverageConvergenceDivergence::new(config.fast, config.slow, config.signal)
            .map_err(|_| ConfigError::invalid("oscillator", "rejected by indicator library"))?;
        let trend_ema = ExponentialMovingAverage::new(trend_config.ema)
            .map_err(|_| ConfigError::invalid("trend.ema", "rejected by indicator library"))?;
        let trend_ma = SimpleMovingAverage::new(trend_config.ma)
            .map_err(|_| ConfigError::invalid("trend.ma", "rejected by indicator library"))?;

        Ok(Self {
            config,
            trend_config,
            macd,
            trend_ema,
            trend_ma,
        })
    }

    /// Bars needed before the longest lookback is meaningful.
    pub fn warmup(&self) -> usize {
        (self.config.slow + self.config.signal)
            .max(self.trend_config.ema)
            .max(self.trend_config.ma)
    }

    /// Returns `None` when the series is shorter than [`Self::warmup`].
    pub fn compute(&self, series: &PriceSeries) -> Option<OscillatorFrame> {
        if series.len() < self.warmup() {
            return None;
        }
        self.compute_closes(series.closes())
    }

    /// Runs the indicators over raw closes without the warm-up check. `None` on empty input.
    pub fn compute_closes<I>(&self, closes: I) -> Option<OscillatorFrame>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut macd = self.macd.clone();
        let mut trend_ema = self.trend_ema.clone();
        let mut trend_ma = self.trend_ma.clone();

        let mut trend = None;
        let samples = closes
            .into_iter()
            .map(|close| {
                let output = macd.next(close);
                trend = Some(TrendLevels {
                    ema: trend_ema.next(close),
                    ma: trend_ma.next(close),
                });
                OscillatorSample {
                    momentum: output.macd,
                    signal: output.signal,
                    histogram: output.histogram,
                }
            })
            .collect();

        trend.map(|trend| OscillatorFrame { samples, trend })
    }
}
