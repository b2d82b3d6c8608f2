use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::model::config_error::ConfigError;

/// One divergence pattern: how many clusters to compare and how strictly.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DivergenceRule {
    pub name: String,
    /// Number of most recent clusters compared.
    pub depth: usize,
    /// `depth - 1` thresholds, oldest pair first. Each newer cluster's area must stay below the
    /// previous area times its threshold.
    pub area_decay: Vec<f64>,
    /// Latest price trough may sit at most this multiple above the previous one.
    #[serde(default)]
    pub price_tolerance: Option<f64>,
    /// Last close must be above both trend references.
    #[serde(default)]
    pub trend_confirmation: bool,
    pub min_bars: usize,
}

impl DivergenceRule {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let field = |name: &str| format!("rules.{}.{}", self.name, name);

        if self.name.trim().is_empty() {
            return Err(ConfigError::invalid("rules.name", "must not be empty"));
        }
        if self.depth < 2 {
            return Err(ConfigError::invalid(field("depth"), "must compare at least 2 clusters"));
        }
        if self.area_decay.len() != self.depth - 1 {
            return Err(ConfigError::invalid(
                field("area_decay"),
                format!("expected {} thresholds, got {}", self.depth - 1, self.area_decay.len()),
            ));
        }
        if self.area_decay.iter().any(|decay| !decay.is_finite() || *decay <= 0.0) {
            return Err(ConfigError::invalid(field("area_decay"), "thresholds must be positive"));
        }
        if let Some(tolerance) = self.price_tolerance {
            if !tolerance.is_finite() || tolerance <= 0.0 {
                return Err(ConfigError::invalid(field("price_tolerance"), "must be positive"));
            }
        }
        if self.min_bars == 0 {
            return Err(ConfigError::invalid(field("min_bars"), "must be positive"));
        }
        Ok(())
    }
}

/// Built-in rules.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// Two clusters: area halved, DIF trough higher, price near or below the prior low.
    StrictTwoCluster,
    /// Two clusters with a looser price band, confirmed by price back above EMA55 and MA99.
    TrendConfirmed,
    /// Three clusters: two consecutive area contractions and a rising DIF trough chain.
    ThreeClusterChain,
}

impl Preset {
    pub const ALL: [Preset; 3] = [
        Preset::StrictTwoCluster,
        Preset::TrendConfirmed,
        Preset::ThreeClusterChain,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::StrictTwoCluster => "strict_two_cluster",
            Preset::TrendConfirmed => "trend_confirmed",
            Preset::ThreeClusterChain => "three_cluster_chain",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Preset {
    type Err = ConfigError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .into_iter()
            .find(|preset| preset.as_str() == input)
            .ok_or_else(|| ConfigError::invalid("rules", format!("unknown preset {input:?}")))
    }
}

impl From<Preset> for DivergenceRule {
    fn from(preset: Preset) -> Self {
        let (depth, area_decay, price_tolerance, trend_confirmation, min_bars) = match preset {
            Preset::StrictTwoCluster => (2, vec![0.5], Some(1.08), false, 100),
            Preset::TrendConfirmed => (2, vec![0.45], Some(1.10), true, 120),
            Preset::ThreeClusterChain => (3, vec![0.7, 0.6], None, false, 150),
        };

        Self {
            name: preset.as_str().to_owned(),
            depth,
            area_decay,
            price_tolerance,
            trend_confirmation,
            min_bars,
        }
    }
}

/// Config entry: either a preset name or a full rule.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RuleEntry {
    Preset(Preset),
    Custom(DivergenceRule),
}

impl From<RuleEntry> for DivergenceRule {
    fn from(entry: RuleEntry) -> Self {
        match entry {
            RuleEntry::Preset(preset) => preset.into(),
            RuleEntry::Custom(rule) => rule,
        }
    }
}
