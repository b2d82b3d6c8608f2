//! Segmentation of a MACD histogram into runs of negative bars.

use serde::{Deserialize, Serialize};

use crate::{model::config_error::ConfigError, oscillator::OscillatorSample};

pub const DEFAULT_WINDOW: usize = 150;

/// A maximal run of negative-histogram bars.
///
/// `start` and `end` are inclusive indices into the extraction window.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Cluster {
    pub start: usize,
    pub end: usize,
    /// Sum of `|histogram|` over the run, always positive.
    pub area: f64,
    /// Lowest momentum (DIF) value inside the run.
    pub trough_momentum: f64,
    /// Lowest bar low inside the run.
    pub trough_price: f64,
}

impl Cluster {
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }
}

#[derive(Debug, Clone, Copy)]
struct Accumulator {
    start: usize,
    end: usize,
    area: f64,
    trough_momentum: f64,
    trough_price: f64,
}

impl Accumulator {
    fn open(index: usize, sample: &OscillatorSample, low: f64) -> Self {
        Self {
            start: index,
            end: index,
            area: sample.histogram.abs(),
            trough_momentum: sample.momentum,
            trough_price: low,
        }
    }

    fn absorb(&mut self, index: usize, sample: &OscillatorSample, low: f64) {
        self.end = index;
        self.area += sample.histogram.abs();
        self.trough_momentum = self.trough_momentum.min(sample.momentum);
        self.trough_price = self.trough_price.min(low);
    }

    fn close(self) -> Cluster {
        Cluster {
            start: self.start,
            end: self.end,
            area: self.area,
            trough_momentum: self.trough_momentum,
            trough_price: self.trough_price,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum RunState {
    Idle,
    InRun(Accumulator),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClusterExtractor {
    window: usize,
}

impl Default for ClusterExtractor {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
        }
    }
}

impl ClusterExtractor {
    pub fn new(window: usize) -> Result<Self, ConfigError> {
        if window == 0 {
            return Err(ConfigError::invalid("cluster_window", "must be positive"));
        }
        Ok(Self { window })
    }

    /// Extract clusters, oldest first, from the most recent `window` samples.
    ///
    /// `samples` and `lows` are aligned from their last element. A run still open at the end of
    /// the window is emitted as a cluster, so a forming run takes part in comparisons.
    pub fn extract(&self, samples: &[OscillatorSample], lows: &[f64]) -> Vec<Cluster> {
        let len = samples.len().min(lows.len()).min(self.window);
        let samples = &samples[samples.len() - len..];
        let lows = &lows[lows.len() - len..];

        let mut clusters = Vec::new();
        let mut state = RunState::Idle;

        for (index, (sample, low)) in samples.iter().zip(lows).enumerate() {
            state = match (state, sample.histogram < 0.0) {
                (RunState::Idle, true) => RunState::InRun(Accumulator::open(index, sample, *low)),
                (RunState::InRun(mut run), true) => {
                    run.absorb(index, sample, *low);
                    RunState::InRun(run)
                }
                (RunState::InRun(run), false) => {
                    clusters.push(run.close());
                    RunState::Idle
                }
                (RunState::Idle, false) => RunState::Idle,
            };
        }

        if let RunState::InRun(run) = state {
            clusters.push(run.close());
        }

        clusters
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-12;

    fn samples(histogram: &[f64]) -> Vec<OscillatorSample> {
        histogram
            .iter()
            .map(|h| OscillatorSample {
                momentum: *h * 2.0,
                signal: *h,
                histogram: *h,
            })
            .collect()
    }

    fn count_negative_runs(histogram: &[f64]) -> usize {
        histogram
            .iter()
            .enumerate()
            .filter(|(i, h)| **h < 0.0 && (*i == 0 || histogram[i - 1] >= 0.0))
            .count()
    }

    #[test]
    fn test_extract_two_runs() {
        let histogram = [-2.0, -3.0, 1.0, 1.0, -1.0, -0.5, 2.0];
        let lows = [10.0, 9.0, 11.0, 12.0, 8.5, 9.5, 12.0];

        let clusters = ClusterExtractor::default().extract(&samples(&histogram), &lows);

        assert_eq!(clusters.len(), 2);
        assert!((clusters[0].area - 5.0).abs() < EPSILON);
        assert!((clusters[1].area - 1.5).abs() < EPSILON);
        assert_eq!((clusters[0].start, clusters[0].end), (0, 1));
        assert_eq!((clusters[1].start, clusters[1].end), (4, 5));
        assert_eq!(clusters[0].trough_momentum, -6.0);
        assert_eq!(clusters[1].trough_momentum, -2.0);
        assert_eq!(clusters[0].trough_price, 9.0);
        assert_eq!(clusters[1].trough_price, 8.5);
    }

    #[test]
    fn test_extract_run_boundaries() {
        struct TestCase {
            histogram: Vec<f64>,
            expected_areas: Vec<f64>,
            expected_lens: Vec<usize>,
        }

        let cases = vec![
            TestCase {
                // TC0: never negative
                histogram: vec![0.5, 0.0, 1.0, 0.0],
                expected_areas: vec![],
                expected_lens: vec![],
            },
            TestCase {
                // TC1: single bar run between positives
                histogram: vec![1.0, -0.25, 1.0],
                expected_areas: vec![0.25],
                expected_lens: vec![1],
            },
            TestCase {
                // TC2: run still open at the end is emitted
                histogram: vec![1.0, -1.0, 2.0, -0.5, -0.5],
                expected_areas: vec![1.0, 1.0],
                expected_lens: vec![1, 2],
            },
            TestCase {
                // TC3: zero closes a run and never opens one
                histogram: vec![-1.0, 0.0, 0.0, -2.0, 0.0],
                expected_areas: vec![1.0, 2.0],
                expected_lens: vec![1, 1],
            },
            TestCase {
                // TC4: whole input is one run
                histogram: vec![-1.0, -2.0, -3.0],
                expected_areas: vec![6.0],
                expected_lens: vec![3],
            },
        ];

        for (i, test_case) in cases.into_iter().enumerate() {
            let lows = vec![1.0; test_case.histogram.len()];
            let clusters = ClusterExtractor::default().extract(&samples(&test_case.histogram), &lows);

            let areas: Vec<f64> = clusters.iter().map(|c| c.area).collect();
            let lens: Vec<usize> = clusters.iter().map(Cluster::len).collect();
            assert_eq!(areas, test_case.expected_areas, "Test case {} failed", i);
            assert_eq!(lens, test_case.expected_lens, "Test case {} failed", i);
        }
    }

    #[test]
    fn test_extract_invariants_over_generated_histograms() {
        for seed in 0..50u64 {
            let histogram: Vec<f64> = (0..120)
                .map(|i| ((i as f64 * 0.37 + seed as f64).sin() * 3.0 + (seed % 5) as f64 * 0.2 - 0.4))
                .collect();
            let lows: Vec<f64> = (0..120).map(|i| 100.0 + i as f64).collect();
            let extractor = ClusterExtractor::default();

            let clusters = extractor.extract(&samples(&histogram), &lows);

            assert!(clusters.iter().all(|c| c.area > 0.0), "seed {} produced a non-positive area", seed);
            assert_eq!(clusters.len(), count_negative_runs(&histogram), "seed {} run count differs", seed);
            assert_eq!(clusters, extractor.extract(&samples(&histogram), &lows), "seed {} not repeatable", seed);
        }
    }

    #[test]
    fn test_extract_uses_most_recent_window() {
        // First run falls outside a 4 bar window.
        let histogram = [-5.0, 1.0, 1.0, -1.0, 1.0, -2.0];
        let lows = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];

        let clusters = ClusterExtractor::new(4).unwrap().extract(&samples(&histogram), &lows);

        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].start, 1);
        assert_eq!(clusters[0].trough_price, 4.0);
        assert_eq!(clusters[1].area, 2.0);
    }

    #[test]
    fn test_new_rejects_zero_window() {
        assert!(matches!(ClusterExtractor::new(0), Err(ConfigError::Invalid { .. })));
    }
}
