//! Batch scan over a market universe: fetch, analyse, report, notify.

use std::time::Duration;

use chrono::Utc;
use divscan_model::{
    identifiers::{Exchange, Market},
    timeframe::Timeframe,
};
use futures::{stream, StreamExt};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    config::ScanConfig,
    data::MarketDataProvider,
    model::{
        analysis::{Analysis, InstrumentReport},
        scan_error::ScanError,
    },
    notify::{self, Notifier},
    strategy::SignalGenerator,
};

use self::{builder::ScannerBuilder, report::ScanReport};

pub mod builder;
pub mod report;

/// Scan parameters that are not part of a strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanSettings {
    pub exchange: Exchange,
    pub quote: String,
    pub top_n: usize,
    pub timeframes: Vec<Timeframe>,
    pub bar_limit: usize,
    pub concurrency: usize,
    pub throttle: Duration,
}

impl From<&ScanConfig> for ScanSettings {
    fn from(config: &ScanConfig) -> Self {
        Self {
            exchange: config.exchange.into(),
            quote: config.quote.clone(),
            top_n: config.top_n,
            timeframes: config.timeframes.clone(),
            bar_limit: config.bar_limit,
            concurrency: config.concurrency.max(1),
            throttle: config.throttle(),
        }
    }
}

#[derive(Debug)]
pub struct Scanner<Provider, Notify, Strategy>
where
    Provider: MarketDataProvider,
    Notify: Notifier,
    Strategy: SignalGenerator + Sync,
{
    pub(crate) scan_id: Uuid,
    pub(crate) provider: Provider,
    pub(crate) notifier: Notify,
    pub(crate) strategies: Vec<Strategy>,
    pub(crate) settings: ScanSettings,
}

impl<Provider, Notify, Strategy> Scanner<Provider, Notify, Strategy>
where
    Provider: MarketDataProvider,
    Notify: Notifier,
    Strategy: SignalGenerator + Sync,
{
    pub fn builder() -> ScannerBuilder<Provider, Notify, Strategy> {
        ScannerBuilder::new()
    }

    pub fn scan_id(&self) -> Uuid {
        self.scan_id
    }

    /// Run one scan. Only a failure to resolve the universe aborts it; per-market failures are
    /// recorded in the returned [`ScanReport`].
    pub async fn run(&self) -> Result<ScanReport, ScanError> {
        let started = Utc::now();
        info!(
            scan_id = %self.scan_id,
            exchange = %self.settings.exchange,
            quote = %self.settings.quote,
            top_n = self.settings.top_n,
            timeframes = ?self.settings.timeframes,
            rules = ?self.strategies.iter().map(SignalGenerator::name).collect::<Vec<_>>(),
            "starting scan"
        );

        let markets = self
            .provider
            .top_markets(&self.settings.quote, self.settings.top_n)
            .await?;
        info!(scan_id = %self.scan_id, markets = markets.len(), "resolved scan universe");

        let jobs = self
            .settings
            .timeframes
            .iter()
            .flat_map(|timeframe| markets.iter().map(move |market| (market, *timeframe)));

        let instruments = stream::iter(jobs)
            .map(|(market, timeframe)| self.scan_instrument(market, timeframe))
            .buffered(self.settings.concurrency)
            .collect::<Vec<_>>()
            .await;

        let report = ScanReport {
            scan_id: self.scan_id,
            started,
            finished: Utc::now(),
            instruments,
        };

        info!(
            scan_id = %self.scan_id,
            scanned = report.instruments.len(),
            signals = report.signals().count(),
            failed = report.failures().count(),
            "finished scan"
        );

        self.dispatch(&report).await;
        Ok(report)
    }

    async fn scan_instrument(&self, market: &Market, timeframe: Timeframe) -> InstrumentReport {
        let fetched = self
            .provider
            .price_series(market, timeframe, self.settings.bar_limit)
            .await;

        if !self.settings.throttle.is_zero() {
            tokio::time::sleep(self.settings.throttle).await;
        }

        let outcome = match fetched {
            Ok(series) => {
                let analyses: Vec<Analysis> = self
                    .strategies
                    .iter()
                    .map(|strategy| strategy.generate_signal(&series))
                    .collect();

                for signal in analyses.iter().filter_map(Analysis::signal) {
                    info!(
                        %market,
                        %timeframe,
                        rule = %signal.rule,
                        close = signal.market_meta.close,
                        area_ratio_pct = signal.evidence.area_ratio_pct,
                        "divergence detected"
                    );
                }
                Ok(analyses)
            }
            Err(error) => {
                warn!(
                    %market,
                    %timeframe,
                    %error,
                    transient = error.is_transient(),
                    "failed to fetch price series"
                );
                Err(ScanError::from(error))
            }
        };

        InstrumentReport {
            market: market.clone(),
            timeframe,
            outcome,
        }
    }

    async fn dispatch(&self, report: &ScanReport) {
        let exchange = self.settings.exchange.to_string();
        let Some(message) = notify::format_report(&exchange, report.signals()) else {
            info!(scan_id = %self.scan_id, "no matching signals");
            return;
        };

        match self.notifier.notify(&message).await {
            Ok(()) => info!(
                scan_id = %self.scan_id,
                signals = report.signals().count(),
                "delivered scan notification"
            ),
            Err(error) => warn!(
                scan_id = %self.scan_id,
                %error,
                "failed to deliver scan notification"
            ),
        }
    }
}
