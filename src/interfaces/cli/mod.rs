/// CLI Interface Module
///
/// Stand-alone entry point for the depth engine. Raw venue frames are read
/// line by line from stdin (for example piped from a websocket client), fed
/// through a `FeedService`, and every published view is written to stdout as
/// one JSON line. Subscription frames the transport would have to send are
/// logged.
///
/// ## Responsibilities
/// - Parse command-line arguments and merge them onto `EngineConfig`
/// - Initialize logging
/// - Wire stdin -> FeedService -> stdout
/// - Stop on EOF or Ctrl-C

use crate::application::services::{FeedCommand, FeedOutput, FeedService};
use crate::shared::config::EngineConfig;
use crate::shared::error::ConfigError;
use crate::shared::metrics::METRICS;
use crate::shared::protocol::ProductId;
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

#[derive(Parser, Debug, Clone)]
#[command(name = "depth-engine")]
#[command(version)]
#[command(about = "Top-of-book depth engine for snapshot + delta feeds", long_about = None)]
pub struct CliConfig {
    /// JSON config file (fields absent from it use defaults)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Levels retained per side
    #[arg(long)]
    pub capacity: Option<usize>,

    /// Rows shown per side
    #[arg(short = 's', long)]
    pub shown: Option<usize>,

    /// Display refresh interval in milliseconds
    #[arg(short = 'r', long)]
    pub refresh_ms: Option<u64>,

    /// Product to track, e.g. PI_XBTUSD
    #[arg(short = 'p', long)]
    pub product: Option<String>,

    /// Log level
    #[arg(short = 'l', long, default_value = "info", value_parser = ["trace", "debug", "info", "warn", "error"])]
    pub log_level: String,

    /// Print metrics to stderr on exit
    #[arg(long, default_value_t = false)]
    pub print_metrics: bool,

    /// Only print the resolved configuration
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

impl CliConfig {
    /// Config file (or defaults) with command-line overrides applied
    pub fn engine_config(&self) -> Result<EngineConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => EngineConfig::from_file(path)?,
            None => EngineConfig::default(),
        };

        if let Some(capacity) = self.capacity {
            config.capacity_per_side = capacity;
        }
        if let Some(shown) = self.shown {
            config.shown_elements = shown;
        }
        if let Some(refresh_ms) = self.refresh_ms {
            config.refresh_interval_ms = refresh_ms;
        }
        if let Some(product) = &self.product {
            config.product_id = ProductId::from(product.as_str());
        }

        config.validate()?;
        Ok(config)
    }
}

/// Runs the CLI application
pub async fn run() -> Result<(), ConfigError> {
    let cli = CliConfig::parse();
    init_logging(&cli.log_level);

    let config = cli.engine_config()?;
    tracing::info!(?config, "depth engine starting");

    if cli.dry_run {
        println!("{:#?}", config);
        return Ok(());
    }

    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    let (out_tx, mut out_rx) = mpsc::unbounded_channel();
    let service = FeedService::new(config, cmd_rx, out_tx);
    let service_task = tokio::spawn(service.run());

    let reader_tx = cmd_tx.clone();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) if line.trim().is_empty() => continue,
                Ok(Some(line)) => {
                    if reader_tx.send(FeedCommand::Message(line)).is_err() {
                        break;
                    }
                }
                Ok(None) => break,
                Err(err) => {
                    let _ = reader_tx.send(FeedCommand::Disconnected(err.to_string()));
                    break;
                }
            }
        }
        tracing::info!("input closed");
    });
    // only the reader keeps the command channel open
    drop(cmd_tx);

    let mut stdout = std::io::stdout();
    loop {
        tokio::select! {
            output = out_rx.recv() => match output {
                Some(FeedOutput::View(view)) => match serde_json::to_string(&view) {
                    Ok(line) => {
                        if writeln!(stdout, "{}", line).is_err() {
                            break;
                        }
                    }
                    Err(err) => tracing::warn!(error = %err, "failed to encode view"),
                },
                Some(FeedOutput::Subscription(frame)) => match frame.to_json() {
                    Ok(json) => tracing::info!(frame = %json, "subscription frame for transport"),
                    Err(err) => tracing::warn!(error = %err, "failed to encode subscription frame"),
                },
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupted");
                break;
            }
        }
    }

    service_task.abort();

    if cli.print_metrics {
        match METRICS.export() {
            Ok(text) => eprintln!("{}", text),
            Err(err) => tracing::warn!(error = %err, "failed to export metrics"),
        }
    }
    Ok(())
}

/// Initializes logging; `RUST_LOG` takes precedence over `--log-level`
fn init_logging(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_config_default() {
        let cli = CliConfig::parse_from(["depth-engine"]);
        assert_eq!(cli.log_level, "info");
        assert!(!cli.dry_run);
        assert!(!cli.print_metrics);

        let config = cli.engine_config().unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_cli_overrides() {
        let cli = CliConfig::parse_from([
            "depth-engine",
            "--capacity", "10",
            "--shown", "5",
            "--refresh-ms", "250",
            "--product", "PI_ETHUSD",
            "--log-level", "debug",
            "--dry-run",
        ]);

        let config = cli.engine_config().unwrap();
        assert_eq!(config.capacity_per_side, 10);
        assert_eq!(config.shown_elements, 5);
        assert_eq!(config.refresh_interval_ms, 250);
        assert_eq!(config.product_id, ProductId::EthUsd);
        assert_eq!(cli.log_level, "debug");
        assert!(cli.dry_run);
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = CliConfig::parse_from(["depth-engine", "-s", "3", "-r", "50", "-p", "PI_XBTUSD", "-l", "warn"]);

        let config = cli.engine_config().unwrap();
        assert_eq!(config.shown_elements, 3);
        assert_eq!(config.refresh_interval_ms, 50);
        assert_eq!(cli.log_level, "warn");
    }

    #[test]
    fn test_cli_rejects_zero_capacity() {
        let cli = CliConfig::parse_from(["depth-engine", "--capacity", "0"]);
        assert!(matches!(
            cli.engine_config(),
            Err(ConfigError::Zero { field: "capacity_per_side" })
        ));
    }

    #[test]
    fn test_cli_rejects_unknown_log_level() {
        assert!(CliConfig::try_parse_from(["depth-engine", "--log-level", "loud"]).is_err());
    }
}
