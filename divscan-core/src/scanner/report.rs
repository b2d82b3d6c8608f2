use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use divscan_model::timeframe::Timeframe;
use prettytable::{row, Table};
use uuid::Uuid;

use crate::model::{
    analysis::{InstrumentReport, Verdict},
    scan_error::ScanError,
    signal::DivergenceSignal,
};

#[derive(Debug)]
pub struct ScanReport {
    pub scan_id: Uuid,
    pub started: DateTime<Utc>,
    pub finished: DateTime<Utc>,
    pub instruments: Vec<InstrumentReport>,
}

/// Outcome counts for one timeframe. Verdict counts are per rule, the rest per market.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeframeSummary {
    pub scanned: usize,
    pub failed: usize,
    pub signals: usize,
    pub no_divergence: usize,
    pub insufficient_data: usize,
    pub insufficient_clusters: usize,
}

impl ScanReport {
    pub fn signals(&self) -> impl Iterator<Item = &DivergenceSignal> {
        self.instruments.iter().flat_map(InstrumentReport::signals)
    }

    pub fn failures(&self) -> impl Iterator<Item = (&InstrumentReport, &ScanError)> {
        self.instruments
            .iter()
            .filter_map(|instrument| instrument.error().map(|error| (instrument, error)))
    }

    pub fn summary(&self) -> BTreeMap<Timeframe, TimeframeSummary> {
        let mut summary: BTreeMap<Timeframe, TimeframeSummary> = BTreeMap::new();

        for instrument in &self.instruments {
            let entry = summary.entry(instrument.timeframe).or_default();
            entry.scanned += 1;

            let Ok(analyses) = &instrument.outcome else {
                entry.failed += 1;
                continue;
            };
            for analysis in analyses {
                match analysis.verdict {
                    Verdict::Signal(_) => entry.signals += 1,
                    Verdict::NoDivergence => entry.no_divergence += 1,
                    Verdict::InsufficientData { .. } => entry.insufficient_data += 1,
                    Verdict::InsufficientClusters { .. } => entry.insufficient_clusters += 1,
                }
            }
        }

        summary
    }

    pub fn summary_table(&self) -> Table {
        let mut table = Table::new();
        table.set_titles(row![
            "Timeframe",
            "Scanned",
            "Failed",
            "Signals",
            "No divergence",
            "Insufficient data",
            "Insufficient clusters"
        ]);

        for (timeframe, summary) in self.summary() {
            table.add_row(row![
                timeframe,
                summary.scanned,
                summary.failed,
                summary.signals,
                summary.no_divergence,
                summary.insufficient_data,
                summary.insufficient_clusters
            ]);
        }

        table
    }
}
