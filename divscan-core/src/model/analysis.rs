use divscan_model::{identifiers::Market, timeframe::Timeframe};

use crate::model::{scan_error::ScanError, signal::DivergenceSignal};

/// Result of running one rule over one series.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub rule: String,
    pub verdict: Verdict,
}

/// Insufficient data and insufficient clusters are ordinary outcomes, not errors.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Signal(DivergenceSignal),
    NoDivergence,
    InsufficientData { bars: usize, required: usize },
    InsufficientClusters { found: usize, required: usize },
}

impl Analysis {
    pub fn signal(&self) -> Option<&DivergenceSignal> {
        match &self.verdict {
            Verdict::Signal(signal) => Some(signal),
            _ => None,
        }
    }
}

/// Everything the scan learned about one market at one timeframe.
#[derive(Debug)]
pub struct InstrumentReport {
    pub market: Market,
    pub timeframe: Timeframe,
    pub outcome: Result<Vec<Analysis>, ScanError>,
}

impl InstrumentReport {
    pub fn signals(&self) -> impl Iterator<Item = &DivergenceSignal> {
        self.outcome
            .as_ref()
            .into_iter()
            .flatten()
            .filter_map(Analysis::signal)
    }

    pub fn error(&self) -> Option<&ScanError> {
        self.outcome.as_ref().err()
    }
}
