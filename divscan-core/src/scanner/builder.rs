use uuid::Uuid;

use crate::{
    data::MarketDataProvider,
    model::scan_error::ScanError,
    notify::Notifier,
    strategy::SignalGenerator,
};

use super::{ScanSettings, Scanner};

/// Builder to construct [`Scanner`] instances.
#[derive(Debug)]
pub struct ScannerBuilder<Provider, Notify, Strategy>
where
    Provider: MarketDataProvider,
    Notify: Notifier,
    Strategy: SignalGenerator + Sync,
{
    scan_id: Option<Uuid>,
    provider: Option<Provider>,
    notifier: Option<Notify>,
    strategies: Option<Vec<Strategy>>,
    settings: Option<ScanSettings>,
}

impl<Provider, Notify, Strategy> Default for ScannerBuilder<Provider, Notify, Strategy>
where
    Provider: MarketDataProvider,
    Notify: Notifier,
    Strategy: SignalGenerator + Sync,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<Provider, Notify, Strategy> ScannerBuilder<Provider, Notify, Strategy>
where
    Provider: MarketDataProvider,
    Notify: Notifier,
    Strategy: SignalGenerator + Sync,
{
    pub fn new() -> Self {
        Self {
            scan_id: None,
            provider: None,
            notifier: None,
            strategies: None,
            settings: None,
        }
    }

    pub fn scan_id(self, value: Uuid) -> Self {
        Self {
            scan_id: Some(value),
            ..self
        }
    }

    pub fn provider(self, value: Provider) -> Self {
        Self {
            provider: Some(value),
            ..self
        }
    }

    pub fn notifier(self, value: Notify) -> Self {
        Self {
            notifier: Some(value),
            ..self
        }
    }

    pub fn strategies(self, value: Vec<Strategy>) -> Self {
        Self {
            strategies: Some(value),
            ..self
        }
    }

    pub fn settings(self, value: ScanSettings) -> Self {
        Self {
            settings: Some(value),
            ..self
        }
    }

    pub fn build(self) -> Result<Scanner<Provider, Notify, Strategy>, ScanError> {
        Ok(Scanner {
            scan_id: self.scan_id.unwrap_or_else(Uuid::new_v4),
            provider: self.provider.ok_or(ScanError::BuilderIncomplete("provider"))?,
            notifier: self.notifier.ok_or(ScanError::BuilderIncomplete("notifier"))?,
            strategies: self
                .strategies
                .filter(|strategies| !strategies.is_empty())
                .ok_or(ScanError::BuilderIncomplete("strategies"))?,
            settings: self.settings.ok_or(ScanError::BuilderIncomplete("settings"))?,
        })
    }
}
