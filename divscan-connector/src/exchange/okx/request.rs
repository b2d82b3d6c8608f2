use std::borrow::Cow;

use divscan_macro::AsUrlParams;
use serde::Serialize;

use crate::protocol::http::rest::request::{AsUrlParams, RestRequest};

use super::model::{OkxCandleRow, OkxResponse, OkxTicker};

/// Most candles OKX returns from a single `market/candles` call.
pub const MAX_CANDLES_PER_REQUEST: usize = 300;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, AsUrlParams)]
#[serde(rename_all = "camelCase")]
pub struct TickersParams {
    pub inst_type: &'static str,
}

/// `GET /api/v5/market/tickers`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTickers {
    pub params: TickersParams,
}

impl FetchTickers {
    pub fn spot() -> Self {
        Self {
            params: TickersParams { inst_type: "SPOT" },
        }
    }
}

impl RestRequest for FetchTickers {
    type Response = OkxResponse<OkxTicker>;
    type QueryParams = TickersParams;
    type Body = ();

    fn path(&self) -> Cow<'static, str> {
        Cow::Borrowed("/api/v5/market/tickers")
    }

    fn method() -> reqwest::Method {
        reqwest::Method::GET
    }

    fn query_params(&self) -> Option<&Self::QueryParams> {
        Some(&self.params)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, AsUrlParams)]
#[serde(rename_all = "camelCase")]
pub struct CandlesParams {
    pub inst_id: String,
    pub bar: &'static str,
    pub limit: usize,
}

/// `GET /api/v5/market/candles`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchCandles {
    pub params: CandlesParams,
}

impl FetchCandles {
    /// `limit` is clamped to what a single request can return.
    pub fn new(inst_id: String, bar: &'static str, limit: usize) -> Self {
        Self {
            params: CandlesParams {
                inst_id,
                bar,
                limit: limit.clamp(1, MAX_CANDLES_PER_REQUEST),
            },
        }
    }
}

impl RestRequest for FetchCandles {
    type Response = OkxResponse<OkxCandleRow>;
    type QueryParams = CandlesParams;
    type Body = ();

    fn path(&self) -> Cow<'static, str> {
        Cow::Borrowed("/api/v5/market/candles")
    }

    fn method() -> reqwest::Method {
        reqwest::Method::GET
    }

    fn query_params(&self) -> Option<&Self::QueryParams> {
        Some(&self.params)
    }
}
