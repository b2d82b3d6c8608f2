use chrono::{DateTime, Utc};
use divscan_model::{
    bar::Bar,
    deserialization::{datetime_utc_from_epoch_ms_str, de_str_opt},
    error::{DataError, SocketError},
};
use serde::{Deserialize, Serialize};

use super::market::OkxMarket;

/// OKX v5 REST response envelope. A `code` other than `"0"` is an exchange error.
///
/// ```json
/// {"code": "0", "msg": "", "data": [...]}
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct OkxResponse<T> {
    pub code: String,
    #[serde(default)]
    pub msg: String,
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

impl<T> OkxResponse<T> {
    pub fn into_data(self) -> Result<Vec<T>, SocketError> {
        if self.code == "0" {
            Ok(self.data)
        } else {
            Err(SocketError::Exchange(format!("code {}: {}", self.code, self.msg)))
        }
    }
}

/// Error body OKX returns alongside a non-2xx status.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OkxApiError {
    pub code: String,
    #[serde(default)]
    pub msg: String,
}

/// Spot ticker from `GET /api/v5/market/tickers`.
///
/// Numbers arrive as strings and may be empty for freshly listed instruments.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OkxTicker {
    pub inst_id: OkxMarket,
    /// 24h volume in quote currency.
    #[serde(default, deserialize_with = "de_str_opt")]
    pub vol_ccy_24h: Option<f64>,
}

/// Keep tickers quoted in `quote`, most traded first, at most `limit` of them.
pub fn rank_by_quote_volume(tickers: Vec<OkxTicker>, quote: &str, limit: usize) -> Vec<OkxTicker> {
    let mut tickers: Vec<OkxTicker> = tickers
        .into_iter()
        .filter(|ticker| ticker.inst_id.spot_market(quote).is_some())
        .collect();

    tickers.sort_by(|a, b| {
        let a = a.vol_ccy_24h.unwrap_or(0.0);
        let b = b.vol_ccy_24h.unwrap_or(0.0);
        b.total_cmp(&a)
    });
    tickers.truncate(limit);
    tickers
}

/// Candlestick row from `GET /api/v5/market/candles`:
/// `[ts, o, h, l, c, vol, volCcy, volCcyQuote, confirm]`.
pub type OkxCandleRow = Vec<String>;

/// Parse one candlestick row into a [`Bar`]. Trailing fields beyond the volume are ignored.
pub fn parse_candle(row: &[String]) -> Result<Bar, DataError> {
    let [ts, open, high, low, close, volume, ..] = row else {
        return Err(DataError::MalformedBar(format!(
            "expected at least 6 fields, got {}",
            row.len()
        )));
    };

    let timestamp: DateTime<Utc> = datetime_utc_from_epoch_ms_str(ts)
        .ok_or_else(|| DataError::MalformedBar(format!("invalid timestamp: {ts}")))?;

    let number = |field: &str, value: &String| {
        value
            .parse::<f64>()
            .map_err(|_| DataError::MalformedBar(format!("invalid {field} at {ts}: {value}")))
    };

    Ok(Bar::new(
        timestamp,
        number("open", open)?,
        number("high", high)?,
        number("low", low)?,
        number("close", close)?,
        number("volume", volume)?,
    ))
}

/// Parse rows delivered newest first into chronological [`Bar`]s.
pub fn parse_candles(rows: &[OkxCandleRow]) -> Result<Vec<Bar>, DataError> {
    rows.iter().rev().map(|row| parse_candle(row)).collect()
}
