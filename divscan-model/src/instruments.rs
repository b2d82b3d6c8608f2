use std::fmt::{self, Debug, Display};

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InstrumentKind {
    CryptoSpot,
}

impl Default for InstrumentKind {
    fn default() -> Self {
        Self::CryptoSpot
    }
}

impl Display for InstrumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                InstrumentKind::CryptoSpot => "spot",
            }
        )
    }
}

#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Symbol(String);

impl Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for Symbol {
    fn deserialize<D>(deserializer: D) -> Result<Symbol, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Symbol::new)
    }
}

impl<S> From<S> for Symbol
where
    S: Into<String>,
{
    fn from(input: S) -> Self {
        Self::new(input)
    }
}

impl Symbol {
    pub fn new<S>(symbol: S) -> Self
    where
        S: Into<String>,
    {
        Symbol(symbol.into().to_lowercase())
    }
}

#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Instrument {
    pub base_currency: Symbol,
    pub quote_currency: Symbol,
    #[serde(rename = "instrument_kind")]
    pub kind: InstrumentKind,
}

impl Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}/{}, {})", self.base_currency, self.quote_currency, self.kind)
    }
}

impl<S> From<(S, S, InstrumentKind)> for Instrument
where
    S: Into<Symbol>,
{
    fn from((base_currency, quote_currency, kind): (S, S, InstrumentKind)) -> Self {
        Instrument {
            base_currency: base_currency.into(),
            quote_currency: quote_currency.into(),
            kind,
        }
    }
}

impl Instrument {
    pub fn new<S>(base_currency: S, quote_currency: S, kind: InstrumentKind) -> Self
    where
        S: Into<Symbol>,
    {
        Instrument {
            base_currency: base_currency.into(),
            quote_currency: quote_currency.into(),
            kind,
        }
    }

    /// Human readable pair, eg/ `BTC/USDT`.
    pub fn pair(&self) -> String {
        format!("{}/{}", self.base_currency, self.quote_currency).to_uppercase()
    }
}
