//! Delivery seam for scan results, and the message every notifier sends.

use std::collections::BTreeMap;

use async_trait::async_trait;
use divscan_model::timeframe::Timeframe;
use thiserror::Error;

use crate::model::signal::DivergenceSignal;

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("notification delivery failed: {0}")]
    Delivery(String),

    #[error("notification rejected (status={status}): {body}")]
    Rejected { status: u16, body: String },
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, message: &str) -> Result<(), NotifyError>;
}

const FOOTER: &str =
    "*Pattern: price flat or lower + shrinking MACD cluster area + rising DIF trough*";

/// Render one signal as a Markdown line, with evidence matching the rule that fired.
///
/// Rule names go inside a code span: legacy Markdown reads a bare `_` as an italic marker.
pub fn format_signal(signal: &DivergenceSignal) -> String {
    let evidence = &signal.evidence;
    let head = format!(
        "⭐ `{}` [`{}`]: last `{}`",
        signal.market.instrument.pair(),
        signal.rule,
        signal.market_meta.close
    );

    let detail = if evidence.areas.len() >= 3 {
        let areas = evidence
            .areas
            .iter()
            .map(|area| format!("{area:.4}"))
            .collect::<Vec<_>>()
            .join(" → ");
        let chain = if evidence.momentum_chain() { "✅" } else { "❌" };
        format!("areas `{areas}` | DIF troughs rising {chain}")
    } else if let Some(trend) = evidence.trend {
        format!(
            "above EMA `{:.6}` | area shrink `{:.1}%`",
            trend.ema, evidence.area_ratio_pct
        )
    } else {
        format!(
            "area shrink `{:.1}%` | DIF trough rising (now: {:.6}) ✅",
            evidence.area_ratio_pct,
            evidence.latest_trough().unwrap_or_default()
        )
    };

    format!("{head}\n   └ {detail}")
}

/// Render a full scan message, grouped by timeframe. `None` when there is nothing to report.
pub fn format_report<'a, I>(exchange: &str, signals: I) -> Option<String>
where
    I: IntoIterator<Item = &'a DivergenceSignal>,
{
    let mut by_timeframe: BTreeMap<Timeframe, Vec<String>> = BTreeMap::new();
    for signal in signals {
        by_timeframe
            .entry(signal.timeframe)
            .or_default()
            .push(format_signal(signal));
    }
    if by_timeframe.is_empty() {
        return None;
    }

    let mut sections: Vec<String> = Vec::new();
    for (timeframe, lines) in by_timeframe {
        sections.push(format!(
            "🚨 *{} {} bullish divergence alert* 🚨\n\n{}",
            exchange.to_uppercase(),
            timeframe.label(),
            lines.join("\n")
        ));
    }

    Some(format!("{}\n\n{}", sections.join("\n\n"), FOOTER))
}
