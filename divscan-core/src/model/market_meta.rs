use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Last observed price of a series and the open time of the bar it came from.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct MarketMeta {
    pub close: f64,
    pub timestamp: DateTime<Utc>,
}
