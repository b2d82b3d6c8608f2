use divscan_model::{identifiers::Identifier, timeframe::Timeframe};

/// OKX candlestick `bar` parameter.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct OkxBar(pub &'static str);

impl OkxBar {
    pub const MINUTE_15: Self = Self("15m");
    pub const HOUR_1: Self = Self("1H");
    pub const HOUR_4: Self = Self("4H");
    pub const DAY_1: Self = Self("1D");
    pub const WEEK_1: Self = Self("1W");
}

impl Identifier<OkxBar> for Timeframe {
    fn id(&self) -> OkxBar {
        match self {
            Timeframe::M15 => OkxBar::MINUTE_15,
            Timeframe::H1 => OkxBar::HOUR_1,
            Timeframe::H4 => OkxBar::HOUR_4,
            Timeframe::D1 => OkxBar::DAY_1,
            Timeframe::W1 => OkxBar::WEEK_1,
        }
    }
}

