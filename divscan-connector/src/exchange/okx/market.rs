use divscan_model::{
    identifiers::{Identifier, Market},
    instruments::{Instrument, InstrumentKind},
};
use serde::{Deserialize, Serialize};

use super::Okx;

/// OKX instrument id, eg/ `BTC-USDT`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct OkxMarket(pub String);

impl Identifier<OkxMarket> for Instrument {
    fn id(&self) -> OkxMarket {
        OkxMarket(format!("{}-{}", self.base_currency, self.quote_currency).to_uppercase())
    }
}

impl Identifier<OkxMarket> for Market {
    fn id(&self) -> OkxMarket {
        self.instrument.id()
    }
}

impl OkxMarket {
    /// Map back to a spot [`Market`] when this id is quoted in `quote`.
    pub fn spot_market(&self, quote: &str) -> Option<Market> {
        let (base, market_quote) = self.0.split_once('-')?;
        if base.is_empty() || !market_quote.eq_ignore_ascii_case(quote) {
            return None;
        }
        Some(Market::new(Okx::ID, (base, market_quote, InstrumentKind::CryptoSpot)))
    }
}

impl AsRef<str> for OkxMarket {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
