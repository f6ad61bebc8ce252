//! ZeroGEX CLI
//!
//! Terminal client for the ZeroGEX backend:
//! - Poll or stream any endpoint
//! - One-shot gamma exposure, flow and quote snapshots
//! - Market session and config helpers

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use zerogex::client::ApiClient;
use zerogex::config::{generate_default_config, Config};
use zerogex::endpoints::Endpoint;
use zerogex::logging;
use zerogex::models::{GexSummary, OptionFlow, UnderlyingQuote};
use zerogex::polling::{PollOptions, PollingFeed};
use zerogex::session::MarketSession;
use zerogex::stream::{LiveFeed, StreamOptions, WsConnector};

#[derive(Parser)]
#[command(name = "zerogex")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Live gamma exposure and options flow from the ZeroGEX backend")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search the usual locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// REST base URL, overrides config
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// WebSocket base URL, overrides config
    #[arg(long, global = true)]
    pub ws_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Poll an endpoint and print every update
    Poll {
        /// Endpoint name (e.g. gex-summary) or raw path (e.g. /api/gex/summary)
        endpoint: String,
        /// Refresh interval in milliseconds (default: the endpoint's usual cadence)
        #[arg(short, long)]
        interval: Option<u64>,
        /// Stop after this many updates
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },

    /// Stream a WebSocket channel and print every message
    Stream {
        /// Channel path relative to the WebSocket base URL (e.g. /gex)
        endpoint: String,
        /// Stop after this many messages
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },

    /// Latest gamma exposure summary
    Gex,

    /// Option flow by type
    Flow {
        /// Window in minutes
        #[arg(short, long, default_value = "60")]
        window: u32,
    },

    /// Latest underlying quote
    Quote,

    /// Current US market session
    Session,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Config loading logs through a bootstrap subscriber driven by the environment
    let bootstrap = Config::from_env().logging;
    let loaded = tracing::subscriber::with_default(
        logging::subscriber(&bootstrap, logging::env_filter(&bootstrap), std::io::stderr),
        || match &cli.config {
            Some(path) => Config::load_with_env(path),
            None => Ok(Config::load_default()),
        },
    );
    let mut config = loaded?;
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }
    if let Some(url) = cli.ws_url {
        config.stream.base_url = url;
    }

    logging::init(&config.logging)?;

    match cli.command {
        Commands::Poll {
            endpoint,
            interval,
            count,
        } => {
            let (path, default_interval) = resolve_endpoint(&endpoint)?;
            let refresh = interval.map(Duration::from_millis).unwrap_or(default_interval);

            let client = Arc::new(ApiClient::new(config.api.clone())?);
            let options = PollOptions::default().refresh_interval(refresh);
            let feed: PollingFeed<Value> = PollingFeed::new(client, path.clone(), options);

            tracing::info!(endpoint = %path, interval_ms = refresh.as_millis() as u64, "Polling");
            watch_polling(&feed, count).await?;
            feed.shutdown();
        }

        Commands::Stream { endpoint, count } => {
            let (tx, messages) = mpsc::unbounded_channel();
            let options = StreamOptions::from_config(&config.stream).on_message(move |message: &Value| {
                let _ = tx.send(message.clone());
            });
            let feed: LiveFeed<Value> = LiveFeed::new(
                Arc::new(WsConnector),
                &config.stream.base_url,
                &endpoint,
                options,
            );

            tracing::info!(url = %feed.url(), "Streaming");
            let mut stdout = std::io::stdout();
            tokio::select! {
                result = watch_stream(&feed, messages, count, &mut stdout) => { result?; }
                _ = tokio::signal::ctrl_c() => {}
            }
            feed.disconnect();
        }

        Commands::Gex => {
            let client = ApiClient::new(config.api.clone())?;
            let summary: GexSummary = client.get(&Endpoint::GexSummary.path()).await?;
            print_gex(&summary);
        }

        Commands::Flow { window } => {
            let client = ApiClient::new(config.api.clone())?;
            let endpoint = Endpoint::FlowByType {
                window_minutes: window,
            };
            let flows: Vec<OptionFlow> = client.get(&endpoint.path()).await?;
            print_flow(&flows);
        }

        Commands::Quote => {
            let client = ApiClient::new(config.api.clone())?;
            let quote: UnderlyingQuote = client.get(&Endpoint::MarketQuote.path()).await?;
            println!(
                "{} {:.2}  vol {:.0}  ({})",
                quote.symbol, quote.close, quote.volume, quote.timestamp
            );
        }

        Commands::Session => {
            let session = MarketSession::current();
            println!("{}", session);
        }

        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!("Config written to {}", path.display());
                }
                None => print!("{}", content),
            }
        }
    }

    Ok(())
}

/// Short name or raw path, with the refresh interval to use by default
fn resolve_endpoint(arg: &str) -> anyhow::Result<(String, Duration)> {
    if arg.starts_with('/') {
        return Ok((arg.to_string(), PollOptions::default().refresh_interval));
    }
    let endpoint: Endpoint = arg.parse()?;
    Ok((endpoint.path(), endpoint.default_refresh_interval()))
}

async fn watch_polling(feed: &PollingFeed<Value>, count: Option<usize>) -> anyhow::Result<()> {
    let mut updates = feed.subscribe();
    let mut seen = 0;

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }

        let state = updates.borrow_and_update().clone();
        if state.loading {
            continue;
        }
        match (&state.data, &state.error) {
            (_, Some(error)) => eprintln!("{}", error),
            (Some(data), None) => println!("{}", serde_json::to_string(data)?),
            (None, None) => continue,
        }

        seen += 1;
        if count.is_some_and(|n| seen >= n) {
            break;
        }
    }
    Ok(())
}

/// Print every message as it arrives, and phase changes to stderr
///
/// Returns the number of messages printed.
async fn watch_stream<W: Write>(
    feed: &LiveFeed<Value>,
    mut messages: mpsc::UnboundedReceiver<Value>,
    count: Option<usize>,
    out: &mut W,
) -> anyhow::Result<usize> {
    let mut updates = feed.subscribe();
    let mut last_phase = feed.state().phase;
    let mut seen = 0;

    loop {
        tokio::select! {
            message = messages.recv() => {
                let Some(message) = message else { break };
                writeln!(out, "{}", serde_json::to_string(&message)?)?;
                seen += 1;
                if count.is_some_and(|n| seen >= n) {
                    break;
                }
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = updates.borrow_and_update().clone();
                if state.phase != last_phase {
                    last_phase = state.phase;
                    match &state.error {
                        Some(error) => eprintln!("[{}] {}", state.phase, error),
                        None => eprintln!("[{}]", state.phase),
                    }
                }
            }
        }
    }
    Ok(seen)
}

fn print_gex(summary: &GexSummary) {
    let level = |v: Option<f64>| v.map(|v| format!("{:.2}", v)).unwrap_or_else(|| "-".to_string());

    println!("GEX summary ({})", summary.timestamp);
    println!("{}", "-".repeat(40));
    println!("{:<16} {:>20.3e}", "Net GEX", summary.net_gex);
    println!("{:<16} {:>20.3e}", "Call GEX", summary.total_call_gex);
    println!("{:<16} {:>20.3e}", "Put GEX", summary.total_put_gex);
    println!("{:<16} {:>20.2}", "Put/Call", summary.put_call_ratio);
    println!("{:<16} {:>20}", "Gamma flip", level(summary.gamma_flip));
    println!("{:<16} {:>20}", "Max pain", level(summary.max_pain));
    println!("{:<16} {:>20}", "Call wall", level(summary.call_wall));
    println!("{:<16} {:>20}", "Put wall", level(summary.put_wall));
}

fn print_flow(flows: &[OptionFlow]) {
    if flows.is_empty() {
        println!("No flow in this window yet.");
        return;
    }

    println!("{:<25} {:<6} {:>12} {:>16}", "Window end", "Type", "Volume", "Premium");
    println!("{}", "-".repeat(62));
    for flow in flows {
        println!(
            "{:<25} {:<6} {:>12.0} {:>16.0}",
            flow.time_window_end, flow.option_type, flow.total_volume, flow.total_premium
        );
    }
}
