use async_trait::async_trait;
use divscan_core::data::MarketDataProvider;
use divscan_model::{
    error::{DataError, SocketError},
    identifiers::{ExchangeId, Identifier, Market},
    series::PriceSeries,
    timeframe::Timeframe,
};
use reqwest::StatusCode;
use tracing::{debug, info};

use crate::protocol::http::{parser::HttpParser, public::PublicNoHeaders, rest::client::RestClient};

use self::{
    channel::OkxBar,
    market::OkxMarket,
    model::{parse_candles, rank_by_quote_volume, OkxApiError},
    request::{FetchCandles, FetchTickers},
};

pub mod channel;
pub mod market;
pub mod model;
pub mod request;

pub const REST_BASE_URL_OKX: &str = "https://www.okx.com";

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Okx;

impl Okx {
    pub const ID: ExchangeId = ExchangeId::Okx;
}

#[derive(Debug, Copy, Clone)]
pub struct OkxParser;

impl HttpParser for OkxParser {
    type ApiError = OkxApiError;
    type OutputError = SocketError;

    fn parse_api_error(&self, status: StatusCode, error: Self::ApiError) -> Self::OutputError {
        if status.is_success() {
            SocketError::Exchange(format!("code {}: {}", error.code, error.msg))
        } else {
            SocketError::HttpResponse(status, format!("code {}: {}", error.code, error.msg))
        }
    }
}

/// Public OKX spot market data over REST.
#[derive(Debug)]
pub struct OkxClient {
    rest: RestClient<PublicNoHeaders, OkxParser>,
}

impl Default for OkxClient {
    fn default() -> Self {
        Self::new(REST_BASE_URL_OKX)
    }
}

impl OkxClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            rest: RestClient::new(base_url.to_owned(), PublicNoHeaders, OkxParser),
        }
    }
}

#[async_trait]
impl MarketDataProvider for OkxClient {
    async fn top_markets(&self, quote: &str, limit: usize) -> Result<Vec<Market>, DataError> {
        let tickers = self.rest.execute(FetchTickers::spot()).await?.into_data()?;
        let listed = tickers.len();

        let markets: Vec<Market> = rank_by_quote_volume(tickers, quote, limit)
            .into_iter()
            .filter_map(|ticker| ticker.inst_id.spot_market(quote))
            .collect();

        info!(exchange = %Okx::ID, quote, listed, selected = markets.len(), "ranked markets by 24h quote volume");
        Ok(markets)
    }

    async fn price_series(
        &self,
        market: &Market,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<PriceSeries, DataError> {
        let inst_id: OkxMarket = market.id();
        let bar: OkxBar = timeframe.id();

        let rows = self
            .rest
            .execute(FetchCandles::new(inst_id.0, bar.0, limit))
            .await?
            .into_data()?;
        let bars = parse_candles(&rows)?;

        debug!(%market, %timeframe, bars = bars.len(), "fetched candles");
        PriceSeries::new(market.clone(), timeframe, bars)
    }
}
