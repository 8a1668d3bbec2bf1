//! Crypto tracker server and command line

mod demo;
mod output;

use std::sync::Arc;
use std::time::Duration;

use api_gateway::{AppConfig, AppState};
use clap::{Parser, Subcommand};
use common::format::friendly_error_message;
use common::model::market::find_entry;
use converter::ConverterSession;
use dotenv::dotenv;
use market_data::{filter_entries, CoinGeckoFeed, FeedConfig, MarketFeed, RefreshController, ScriptedFeed};
use settings_service::{SettingsConfig, SettingsService};
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{debug, error, info, warn, Level};
use tracing_subscriber::EnvFilter;

/// Track top cryptocurrencies by market cap
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Serve built-in demo data instead of calling the market API
    #[arg(short, long, global = true)]
    demo: bool,

    /// Market API root, overrides MARKET_API_URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP server with periodic refresh (default)
    Serve {
        /// Listening address, overrides HOST and PORT
        #[arg(short, long)]
        addr: Option<String>,

        /// Seconds between refreshes, overrides REFRESH_INTERVAL_SECS
        #[arg(short, long)]
        interval: Option<u64>,
    },
    /// Fetch once and print the list
    List {
        /// Only show entries whose name or symbol contains this
        #[arg(short, long)]
        search: Option<String>,

        /// Maximum number of rows
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Fetch once and convert an amount between two assets
    Convert {
        /// Source asset id, e.g. bitcoin
        from: String,
        /// Destination asset id, e.g. ethereum
        to: String,
        /// Amount of the source asset
        #[arg(default_value = "1")]
        amount: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv().ok();

    let cli = Cli::parse();
    let log_level = init_tracing();

    let mut feed_config = FeedConfig::from_env();
    if let Some(url) = &cli.api_url {
        feed_config.base_url = url.clone();
    }

    match cli.command.unwrap_or(Commands::Serve { addr: None, interval: None }) {
        Commands::Serve { addr, interval } => {
            if let Some(secs) = interval.filter(|secs| *secs > 0) {
                feed_config.refresh_interval = Duration::from_secs(secs);
            }
            let feed = build_feed(cli.demo, &feed_config)?;
            serve(feed, &feed_config, addr, log_level).await?;
        }
        Commands::List { search, limit } => {
            let feed = build_feed(cli.demo, &feed_config)?;
            let entries = match feed.fetch_markets().await {
                Ok(entries) => entries,
                Err(e) => return fail(&e.to_string()),
            };

            let mut matched = filter_entries(&entries, search.as_deref().unwrap_or(""));
            if let Some(limit) = limit {
                matched.truncate(limit);
            }
            print!("{}", output::render_table(&matched));
        }
        Commands::Convert { from, to, amount } => {
            let feed = build_feed(cli.demo, &feed_config)?;
            let entries = match feed.fetch_markets().await {
                Ok(entries) => entries,
                Err(e) => return fail(&e.to_string()),
            };

            let mut session = ConverterSession::new(&from, &to, "");
            session.set_amount_input(&amount);
            for id in [&from, &to] {
                if find_entry(&entries, id).is_none() {
                    warn!("{} is not in the top {} entries, pricing it at 0", id, entries.len());
                }
            }

            let symbol_of = |id: &str| {
                find_entry(&entries, id)
                    .map(|entry| entry.symbol.clone())
                    .unwrap_or_else(|| id.to_string())
            };
            let quote = session.quote(&entries);
            print!("{}", output::render_quote(&quote, &symbol_of(&from), &symbol_of(&to)));
        }
    }

    Ok(())
}

/// Install the global subscriber; DEBUG=1 lowers the default level
fn init_tracing() -> Level {
    let env_debug = std::env::var("DEBUG").unwrap_or_else(|_| "0".to_string());
    let log_level = if env_debug == "1" { Level::DEBUG } else { Level::INFO };

    let env_filter = EnvFilter::builder()
        .with_default_directive(log_level.into())
        .from_env_lossy();

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    // Only set the global subscriber if it hasn't been set already
    if tracing::subscriber::set_global_default(subscriber).is_ok() && env_debug == "1" {
        debug!("Debug logging enabled");
    }
    log_level
}

fn build_feed(
    demo: bool,
    config: &FeedConfig,
) -> Result<Arc<dyn MarketFeed>, Box<dyn std::error::Error>> {
    if demo {
        info!("Using demo market data");
        return Ok(Arc::new(ScriptedFeed::new(demo::entries())));
    }

    let feed = CoinGeckoFeed::new(config)?;
    info!("Using market data from {}", feed.url());
    Ok(Arc::new(feed))
}

async fn serve(
    feed: Arc<dyn MarketFeed>,
    feed_config: &FeedConfig,
    addr: Option<String>,
    log_level: Level,
) -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting crypto tracker...");

    let controller = Arc::new(RefreshController::start(feed, feed_config));
    let settings = Arc::new(SettingsService::with_config(&SettingsConfig::from_env()));

    let state = Arc::new(AppState {
        controller: controller.clone(),
        settings,
    });
    let app = api_gateway::router_with_log_level(state, log_level);

    let addr = match addr {
        Some(addr) => addr.parse()?,
        None => AppConfig::from_env().addr()?,
    };
    let listener = TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    controller.stop();
    info!("Shutting down");
    Ok(())
}

fn fail(message: &str) -> Result<(), Box<dyn std::error::Error>> {
    error!("Fetch failed: {}", message);
    eprintln!("{}", friendly_error_message(message));
    std::process::exit(1);
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!("Error waiting for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                error!("Error installing SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown");
}
