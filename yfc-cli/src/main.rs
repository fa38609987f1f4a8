//! yfc CLI — query daily price history for one symbol.
//!
//! ```sh
//! yfc AAPL
//! yfc bas.de --start 2017-09-01 --end 2017-09-30 --json
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use yfc_core::{ClientConfig, HistoricalQuery, QueryError, Quote};

#[derive(Parser, Debug)]
#[command(name = "yfc", version, about = "Daily price history downloader")]
struct Cli {
    /// Symbol to query (e.g., AAPL, bas.de).
    symbol: String,

    /// Start date (YYYY-MM-DD). Defaults to the first available record.
    #[arg(long, default_value = "")]
    start: String,

    /// End date (YYYY-MM-DD). Defaults to now.
    #[arg(long, default_value = "")]
    end: String,

    /// TOML file overriding endpoints, headers and timeout.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the undecoded CSV rows instead of quotes.
    #[arg(long, default_value_t = false, conflicts_with = "json")]
    raw: bool,

    /// Print quotes as a JSON array.
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "warn")]
    log_level: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cli.log_level))
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => ClientConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ClientConfig::default(),
    };

    let mut historical = HistoricalQuery::with_config(config)?;
    historical.set_dates(cli.start.as_str(), cli.end.as_str());

    if cli.raw {
        let rows = with_renew(&historical, |h| h.query_raw(&cli.symbol))?;
        for row in &rows {
            println!("{}", row.join(","));
        }
        return Ok(());
    }

    let quotes = with_renew(&historical, |h| h.query(&cli.symbol))?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&quotes)?);
    } else {
        print_quotes(&cli.symbol, &quotes);
    }
    Ok(())
}

/// Run `op`; if the download rejected the session, renew it and retry once.
fn with_renew<T>(
    historical: &HistoricalQuery,
    op: impl Fn(&HistoricalQuery) -> Result<T, QueryError>,
) -> Result<T> {
    match op(historical) {
        Err(e) if e.is_stale_session() => {
            warn!("session rejected ({e}), renewing and retrying once");
            historical.renew_session()?;
            Ok(op(historical)?)
        }
        other => Ok(other?),
    }
}

fn print_quotes(symbol: &str, quotes: &[Quote]) {
    info!(symbol, count = quotes.len(), "received quotes");
    println!("received quotes for {}: {}", symbol.to_uppercase(), quotes.len());
    println!(
        "{:<10}  {:>12}  {:>12}  {:>12}  {:>12}  {:>12}  {:>12}",
        "Date", "Open", "High", "Low", "Close", "Adj Close", "Volume"
    );
    for q in quotes {
        println!(
            "{:<10}  {:>12.4}  {:>12.4}  {:>12.4}  {:>12.4}  {:>12.4}  {:>12}",
            q.date.format("%Y-%m-%d"),
            q.open,
            q.high,
            q.low,
            q.close,
            q.adj_close,
            q.volume
        );
    }
}
