use async_trait::async_trait;
use divscan_model::{
    error::DataError,
    identifiers::Market,
    series::PriceSeries,
    timeframe::Timeframe,
};

/// Source of the scan universe and of per-market price history.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Markets quoted in `quote`, most traded first, at most `limit` of them.
    async fn top_markets(&self, quote: &str, limit: usize) -> Result<Vec<Market>, DataError>;

    /// Up to `limit` most recent bars, oldest first.
    async fn price_series(
        &self,
        market: &Market,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<PriceSeries, DataError>;
}
