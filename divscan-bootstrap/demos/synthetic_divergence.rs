use chrono::{Duration, TimeZone, Utc};
use divscan_core::{
    config::ScanConfig,
    model::analysis::Verdict,
    notify::format_signal,
    strategy::{rule::{Preset, RuleEntry}, SignalGenerator},
};
use divscan_model::{
    bar::Bar,
    identifiers::{ExchangeId, Market},
    instruments::InstrumentKind,
    series::PriceSeries,
    timeframe::Timeframe,
};

/// Weekly closes: a long base, a sharp sell-off, a weak bounce, a slow grind back to the same
/// low, then a recovery above the trend references.
fn closes() -> Vec<f64> {
    let mut closes = vec![100.0; 120];
    closes.extend((1..=5).map(|i| 100.0 - 8.0 * i as f64));
    closes.extend((1..=15).map(|i| 60.0 + i as f64));
    closes.extend((1..=30).map(|i| 75.0 - 0.5 * i as f64));
    closes.extend((1..=8).map(|i| 60.0 + 5.0 * i as f64));
    closes
}

fn main() -> anyhow::Result<()> {
    let start = Utc.with_ymd_and_hms(2021, 1, 4, 0, 0, 0).unwrap();
    let bars = closes()
        .into_iter()
        .enumerate()
        .map(|(i, close)| {
            Bar::new(start + Duration::weeks(i as i64), close, close * 1.02, close * 0.97, close, 1_000.0)
        })
        .collect();

    let series = PriceSeries::new(
        Market::new(ExchangeId::Okx, ("demo", "usdt", InstrumentKind::CryptoSpot)),
        Timeframe::W1,
        bars,
    )?;

    let config = ScanConfig {
        rules: Preset::ALL.into_iter().map(RuleEntry::Preset).collect(),
        ..ScanConfig::default()
    };

    for strategy in config.strategies()? {
        let analysis = strategy.generate_signal(&series);
        match &analysis.verdict {
            Verdict::Signal(signal) => println!("{}\n", format_signal(signal)),
            verdict => println!("[{}] {:?}\n", analysis.rule, verdict),
        }
    }

    Ok(())
}
