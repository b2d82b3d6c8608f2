use chrono::{DateTime, Utc};
use divscan_model::{identifiers::Market, timeframe::Timeframe};
use serde::{Deserialize, Serialize};

use crate::oscillator::TrendLevels;

use super::market_meta::MarketMeta;

/// Bullish MACD cluster divergence detected on one [`Market`] at one [`Timeframe`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DivergenceSignal {
    pub datetime: DateTime<Utc>,
    pub market: Market,
    pub timeframe: Timeframe,
    pub rule: String,
    pub market_meta: MarketMeta,
    pub evidence: Evidence,
}

/// Cluster statistics that satisfied a rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    /// Areas of the compared clusters, oldest first.
    pub areas: Vec<f64>,
    /// Momentum (DIF) troughs of the compared clusters, oldest first.
    pub momentum_troughs: Vec<f64>,
    /// Latest cluster area as a percentage of the previous one.
    pub area_ratio_pct: f64,
    /// Present when the rule required trend confirmation.
    pub trend: Option<TrendLevels>,
}

impl Evidence {
    pub fn latest_trough(&self) -> Option<f64> {
        self.momentum_troughs.last().copied()
    }

    /// Momentum troughs rise strictly across every compared cluster.
    pub fn momentum_chain(&self) -> bool {
        self.momentum_troughs.len() >= 2
            && self.momentum_troughs.windows(2).all(|pair| pair[1] > pair[0])
    }
}
