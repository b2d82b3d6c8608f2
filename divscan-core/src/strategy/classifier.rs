use tracing::debug;

use crate::{
    cluster::Cluster,
    model::{config_error::ConfigError, signal::Evidence},
    oscillator::TrendLevels,
};

use super::rule::DivergenceRule;

/// Price context the clusters are judged against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarketContext {
    pub last_close: f64,
    pub trend: Option<TrendLevels>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    Divergence(Evidence),
    NoDivergence,
    InsufficientClusters { found: usize, required: usize },
}

/// Applies one [`DivergenceRule`] to the most recent clusters.
#[derive(Debug, Clone, PartialEq)]
pub struct DivergenceClassifier {
    rule: DivergenceRule,
}

impl DivergenceClassifier {
    pub fn new(rule: DivergenceRule) -> Result<Self, ConfigError> {
        rule.validate()?;
        Ok(Self { rule })
    }

    pub fn rule(&self) -> &DivergenceRule {
        &self.rule
    }

    /// `clusters` are ordered oldest first.
    pub fn classify(&self, clusters: &[Cluster], context: &MarketContext) -> Classification {
        let depth = self.rule.depth;
        if clusters.len() < depth {
            return Classification::InsufficientClusters {
                found: clusters.len(),
                required: depth,
            };
        }

        let recent = &clusters[clusters.len() - depth..];
        let prev = &recent[depth - 2];
        let curr = &recent[depth - 1];

        let area_shrinking = recent
            .windows(2)
            .zip(&self.rule.area_decay)
            .all(|(pair, decay)| pair[1].area > 0.0 && pair[1].area < pair[0].area * decay);

        let momentum_rising = recent
            .windows(2)
            .all(|pair| pair[1].trough_momentum > pair[0].trough_momentum);

        let price_holding = self
            .rule
            .price_tolerance
            .map_or(true, |tolerance| curr.trough_price <= prev.trough_price * tolerance);

        let trend_confirmed = !self.rule.trend_confirmation
            || context
                .trend
                .is_some_and(|trend| context.last_close > trend.ema && context.last_close > trend.ma);

        debug!(
            rule = %self.rule.name,
            area_shrinking,
            momentum_rising,
            price_holding,
            trend_confirmed,
            "classified clusters"
        );

        if !(area_shrinking && momentum_rising && price_holding && trend_confirmed) {
            return Classification::NoDivergence;
        }

        Classification::Divergence(Evidence {
            areas: recent.iter().map(|cluster| cluster.area).collect(),
            momentum_troughs: recent.iter().map(|cluster| cluster.trough_momentum).collect(),
            area_ratio_pct: curr.area / prev.area * 100.0,
            trend: if self.rule.trend_confirmation { context.trend } else { None },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::rule::Preset;

    fn cluster(area: f64, trough_momentum: f64, trough_price: f64) -> Cluster {
        Cluster {
            start: 0,
            end: 0,
            area,
            trough_momentum,
            trough_price,
        }
    }

    fn classifier(preset: Preset) -> DivergenceClassifier {
        DivergenceClassifier::new(preset.into()).unwrap()
    }

    fn context(last_close: f64) -> MarketContext {
        MarketContext {
            last_close,
            trend: None,
        }
    }

    #[test]
    fn test_strict_two_cluster() {
        struct TestCase {
            clusters: Vec<Cluster>,
            expected_signal: bool,
        }

        let prev = cluster(10.0, -1.0, 100.0);
        let cases = vec![
            TestCase {
                // TC0: area 4 < 5, momentum -0.5 > -1.0, price 105 <= 108
                clusters: vec![prev, cluster(4.0, -0.5, 105.0)],
                expected_signal: true,
            },
            TestCase {
                // TC1: area 6 is not below half of 10
                clusters: vec![prev, cluster(6.0, -0.5, 105.0)],
                expected_signal: false,
            },
            TestCase {
                // TC2: momentum trough not higher
                clusters: vec![prev, cluster(4.0, -1.0, 105.0)],
                expected_signal: false,
            },
            TestCase {
                // TC3: price trough rebounded beyond 8%
                clusters: vec![prev, cluster(4.0, -0.5, 108.5)],
                expected_signal: false,
            },
            TestCase {
                // TC4: only the last two clusters are compared
                clusters: vec![cluster(1.0, -9.0, 1.0), prev, cluster(4.0, -0.5, 95.0)],
                expected_signal: true,
            },
        ];

        let classifier = classifier(Preset::StrictTwoCluster);
        for (i, test_case) in cases.into_iter().enumerate() {
            let actual = classifier.classify(&test_case.clusters, &context(110.0));
            assert_eq!(
                matches!(actual, Classification::Divergence(_)),
                test_case.expected_signal,
                "Test case {} failed: {:?}",
                i,
                actual
            );
        }
    }

    #[test]
    fn test_strict_two_cluster_evidence() {
        let clusters = vec![cluster(10.0, -1.0, 100.0), cluster(4.0, -0.5, 105.0)];

        let Classification::Divergence(evidence) =
            classifier(Preset::StrictTwoCluster).classify(&clusters, &context(110.0))
        else {
            panic!("expected divergence");
        };

        assert_eq!(evidence.areas, vec![10.0, 4.0]);
        assert_eq!(evidence.latest_trough(), Some(-0.5));
        assert!((evidence.area_ratio_pct - 40.0).abs() < 1e-9);
        assert_eq!(evidence.trend, None);
    }

    #[test]
    fn test_trend_confirmed() {
        struct TestCase {
            last_close: f64,
            trend: Option<TrendLevels>,
            curr: Cluster,
            expected_signal: bool,
        }

        let prev = cluster(10.0, -1.0, 100.0);
        let trend = TrendLevels { ema: 100.0, ma: 102.0 };
        let cases = vec![
            TestCase {
                // TC0: area 4 < 4.5, price 109 <= 110, close above both references
                last_close: 103.0,
                trend: Some(trend),
                curr: cluster(4.0, -0.5, 109.0),
                expected_signal: true,
            },
            TestCase {
                // TC1: close above EMA but below MA
                last_close: 101.0,
                trend: Some(trend),
                curr: cluster(4.0, -0.5, 109.0),
                expected_signal: false,
            },
            TestCase {
                // TC2: area 4.6 passes the 0.5 rule but not 0.45
                last_close: 103.0,
                trend: Some(trend),
                curr: cluster(4.6, -0.5, 100.0),
                expected_signal: false,
            },
            TestCase {
                // TC3: trend references unavailable
                last_close: 103.0,
                trend: None,
                curr: cluster(4.0, -0.5, 100.0),
                expected_signal: false,
            },
            TestCase {
                // TC4: degenerate zero area cluster
                last_close: 103.0,
                trend: Some(trend),
                curr: cluster(0.0, -0.5, 100.0),
                expected_signal: false,
            },
        ];

        let classifier = classifier(Preset::TrendConfirmed);
        for (i, test_case) in cases.into_iter().enumerate() {
            let context = MarketContext {
                last_close: test_case.last_close,
                trend: test_case.trend,
            };
            let actual = classifier.classify(&[prev, test_case.curr], &context);
            assert_eq!(
                matches!(actual, Classification::Divergence(_)),
                test_case.expected_signal,
                "Test case {} failed: {:?}",
                i,
                actual
            );
        }
    }

    #[test]
    fn test_trend_confirmed_evidence_carries_trend() {
        let trend = TrendLevels { ema: 100.0, ma: 102.0 };
        let context = MarketContext {
            last_close: 103.0,
            trend: Some(trend),
        };
        let clusters = [cluster(10.0, -1.0, 100.0), cluster(4.0, -0.5, 100.0)];

        match classifier(Preset::TrendConfirmed).classify(&clusters, &context) {
            Classification::Divergence(evidence) => assert_eq!(evidence.trend, Some(trend)),
            other => panic!("expected divergence, got {:?}", other),
        }
    }

    #[test]
    fn test_three_cluster_chain() {
        let chain = |middle_area: f64, troughs: [f64; 3]| {
            vec![
                cluster(10.0, troughs[0], 100.0),
                cluster(middle_area, troughs[1], 300.0),
                cluster(3.0, troughs[2], 500.0),
            ]
        };

        let classifier = classifier(Preset::ThreeClusterChain);

        // Areas 10, 6, 3 with rising troughs. Price troughs are ignored by this rule.
        match classifier.classify(&chain(6.0, [-2.0, -1.0, -0.3]), &context(1.0)) {
            Classification::Divergence(evidence) => {
                assert_eq!(evidence.areas, vec![10.0, 6.0, 3.0]);
                assert!(evidence.momentum_chain());
            }
            other => panic!("expected divergence, got {:?}", other),
        }

        // Middle area 8 fails the 0.7 contraction.
        assert_eq!(
            classifier.classify(&chain(8.0, [-2.0, -1.0, -0.3]), &context(1.0)),
            Classification::NoDivergence
        );

        // Troughs not monotonically rising.
        assert_eq!(
            classifier.classify(&chain(6.0, [-1.0, -2.0, -0.3]), &context(1.0)),
            Classification::NoDivergence
        );
    }

    #[test]
    fn test_insufficient_clusters() {
        struct TestCase {
            preset: Preset,
            clusters: Vec<Cluster>,
            expected: Classification,
        }

        let cases = vec![
            TestCase {
                preset: Preset::StrictTwoCluster,
                clusters: vec![],
                expected: Classification::InsufficientClusters { found: 0, required: 2 },
            },
            TestCase {
                preset: Preset::TrendConfirmed,
                clusters: vec![cluster(1.0, -1.0, 1.0)],
                expected: Classification::InsufficientClusters { found: 1, required: 2 },
            },
            TestCase {
                preset: Preset::ThreeClusterChain,
                clusters: vec![cluster(10.0, -2.0, 1.0), cluster(6.0, -1.0, 1.0)],
                expected: Classification::InsufficientClusters { found: 2, required: 3 },
            },
        ];

        for (i, test_case) in cases.into_iter().enumerate() {
            let actual = classifier(test_case.preset).classify(&test_case.clusters, &context(1.0));
            assert_eq!(actual, test_case.expected, "Test case {} failed", i);
        }
    }
}
