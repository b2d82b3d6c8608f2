use serde::{Deserialize, Serialize};

use crate::{bar::Bar, error::DataError, identifiers::Market, timeframe::Timeframe};

/// Chronological [`Bar`]s of one [`Market`] at one [`Timeframe`].
///
/// Timestamps are strictly increasing. The series is immutable once constructed.
#[derive(Clone, PartialEq, Debug, Deserialize, Serialize)]
pub struct PriceSeries {
    pub market: Market,
    pub timeframe: Timeframe,
    bars: Vec<Bar>,
}

impl PriceSeries {
    pub fn new(market: Market, timeframe: Timeframe, bars: Vec<Bar>) -> Result<Self, DataError> {
        if let Some(index) = bars
            .windows(2)
            .position(|pair| pair[1].timestamp <= pair[0].timestamp)
        {
            return Err(DataError::NonMonotonicSeries { index: index + 1 });
        }

        Ok(Self { market, timeframe, bars })
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    pub fn closes(&self) -> impl Iterator<Item = f64> + '_ {
        self.bars.iter().map(|bar| bar.close)
    }

    pub fn lows(&self) -> impl Iterator<Item = f64> + '_ {
        self.bars.iter().map(|bar| bar.low)
    }
}
