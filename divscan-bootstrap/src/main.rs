use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use divscan_connector::{
    exchange::okx::OkxClient,
    notify::{console::ConsoleNotifier, ChatNotifier},
};
use divscan_core::{
    config::ScanConfig,
    scanner::{ScanSettings, Scanner},
    strategy::rule::{Preset, RuleEntry},
};
use divscan_model::{identifiers::ExchangeId, timeframe::Timeframe};
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "divscan",
    version,
    about = "Scan the most traded spot markets for MACD histogram bullish divergence"
)]
struct Cli {
    /// JSON scan configuration. Missing fields take their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Timeframe to scan (15m, 1h, 4h, 1d, 1w). Repeatable.
    #[arg(long = "timeframe")]
    timeframes: Vec<Timeframe>,

    /// Number of markets to scan, ranked by 24h quote volume
    #[arg(long)]
    top: Option<usize>,

    /// Divergence rule preset (strict_two_cluster, trend_confirmed, three_cluster_chain). Repeatable.
    #[arg(long = "rule")]
    rules: Vec<Preset>,

    /// Markets fetched concurrently
    #[arg(long)]
    concurrency: Option<usize>,

    /// Human readable logs instead of JSON
    #[arg(long, default_value_t = false)]
    pretty_logs: bool,

    /// Print the notification to stdout even when Telegram is configured
    #[arg(long, default_value_t = false)]
    dry_run: bool,
}

impl Cli {
    /// Config file (or defaults) with command line overrides applied.
    fn scan_config(&self) -> anyhow::Result<ScanConfig> {
        let mut config = match &self.config {
            Some(path) => ScanConfig::from_file(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => ScanConfig::default(),
        };

        if !self.timeframes.is_empty() {
            config.timeframes = self.timeframes.clone();
        }
        if let Some(top) = self.top {
            config.top_n = top;
        }
        if !self.rules.is_empty() {
            config.rules = self.rules.iter().copied().map(RuleEntry::Preset).collect();
        }
        if let Some(concurrency) = self.concurrency {
            config.concurrency = concurrency;
        }

        Ok(config)
    }

    fn notifier(&self) -> ChatNotifier {
        if self.dry_run {
            ChatNotifier::Console(ConsoleNotifier)
        } else {
            ChatNotifier::from_env()
        }
    }
}

// Initialise an INFO `Subscriber` for `Tracing` logs on stderr and install it as the global default.
fn init_logging(pretty: bool) {
    let builder = tracing_subscriber::fmt()
        // Filter messages based on the INFO
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::builder()
                .with_default_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        // Keep stdout for the report
        .with_writer(std::io::stderr)
        // Disable colours on release builds
        .with_ansi(cfg!(debug_assertions));

    if pretty {
        builder.init()
    } else {
        builder.json().init()
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.pretty_logs);

    let config = cli.scan_config()?;
    let strategies = config.strategies().context("invalid scan configuration")?;
    info!(?config, "loaded scan configuration");

    let provider = match config.exchange {
        ExchangeId::Okx => OkxClient::default(),
    };

    let scanner = Scanner::builder()
        .provider(provider)
        .notifier(cli.notifier())
        .strategies(strategies)
        .settings(ScanSettings::from(&config))
        .build()?;

    let report = scanner.run().await.context("scan aborted")?;
    report.summary_table().printstd();

    Ok(())
}
