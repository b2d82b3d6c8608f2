use divscan_model::series::PriceSeries;
use tracing::debug;

use crate::{
    cluster::ClusterExtractor,
    model::{
        analysis::{Analysis, Verdict},
        config_error::ConfigError,
        market_meta::MarketMeta,
        signal::DivergenceSignal,
    },
    oscillator::OscillatorEngine,
};

use super::{
    classifier::{Classification, DivergenceClassifier, MarketContext},
    rule::DivergenceRule,
    SignalGenerator,
};

/// Oscillator, cluster extraction and classification for one rule.
#[derive(Debug, Clone)]
pub struct DivergenceStrategy {
    engine: OscillatorEngine,
    extractor: ClusterExtractor,
    classifier: DivergenceClassifier,
}

impl DivergenceStrategy {
    pub fn new(
        engine: OscillatorEngine,
        extractor: ClusterExtractor,
        rule: DivergenceRule,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            engine,
            extractor,
            classifier: DivergenceClassifier::new(rule)?,
        })
    }

    pub fn rule(&self) -> &DivergenceRule {
        self.classifier.rule()
    }

    /// Bars needed by both the rule and the oscillator warm-up.
    pub fn required_bars(&self) -> usize {
        self.rule().min_bars.max(self.engine.warmup())
    }

    fn insufficient_data(&self, bars: usize) -> Analysis {
        Analysis {
            rule: self.rule().name.clone(),
            verdict: Verdict::InsufficientData {
                bars,
                required: self.required_bars(),
            },
        }
    }
}

impl SignalGenerator for DivergenceStrategy {
    fn name(&self) -> &str {
        &self.rule().name
    }

    fn generate_signal(&self, series: &PriceSeries) -> Analysis {
        if series.len() < self.required_bars() {
            return self.insufficient_data(series.len());
        }
        let (Some(frame), Some(last_bar)) = (self.engine.compute(series), series.last()) else {
            return self.insufficient_data(series.len());
        };

        let lows: Vec<f64> = series.lows().collect();
        let clusters = self.extractor.extract(&frame.samples, &lows);
        let context = MarketContext {
            last_close: last_bar.close,
            trend: Some(frame.trend),
        };

        let verdict = match self.classifier.classify(&clusters, &context) {
            Classification::Divergence(evidence) => Verdict::Signal(DivergenceSignal {
                datetime: last_bar.timestamp,
                market: series.market.clone(),
                timeframe: series.timeframe,
                rule: self.rule().name.clone(),
                market_meta: MarketMeta {
                    close: last_bar.close,
                    timestamp: last_bar.timestamp,
                },
                evidence,
            }),
            Classification::NoDivergence => Verdict::NoDivergence,
            Classification::InsufficientClusters { found, required } => {
                Verdict::InsufficientClusters { found, required }
            }
        };

        debug!(
            market = %series.market,
            timeframe = %series.timeframe,
            rule = %self.rule().name,
            clusters = clusters.len(),
            ?verdict,
            "analysed series"
        );

        Analysis {
            rule: self.rule().name.clone(),
            verdict,
        }
    }
}
