use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use quotedeck_api::QuoteClient;
use quotedeck_cache::CacheManager;
use quotedeck_core::{BookmarkManager, Config, QuoteStore, RemoteQuoteFetcher};
use quotedeck_tui::App;

#[derive(Parser)]
#[command(name = "quotedeck")]
#[command(version, about = "Terminal quote display with a typewriter reveal", long_about = None)]
struct Cli {
    /// Override the quote list URL
    #[arg(long)]
    url: Option<String>,

    /// Skip the typewriter animation (quotes appear instantly)
    #[arg(long)]
    reduced_motion: bool,

    /// Render quotes in uppercase
    #[arg(long)]
    uppercase: bool,

    /// Ignore the on-disk quote cache and always fetch
    #[arg(long)]
    no_cache: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging - helps when things go sideways
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quotedeck=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(url) = cli.url {
        config.source.url = url;
    }
    if cli.reduced_motion {
        config.ui.reduced_motion = true;
    }
    if cli.uppercase {
        config.ui.uppercase = true;
    }
    if cli.no_cache {
        config.cache.disabled = true;
    }

    let cache = if config.cache.disabled {
        None
    } else {
        let db_path = Config::cache_db_path()?;
        match CacheManager::new(&db_path.to_string_lossy()) {
            Ok(cache) => Some(Arc::new(cache)),
            Err(e) => {
                // A broken cache shouldn't keep quotes off the screen.
                tracing::warn!("Cache unavailable, running without it: {}", e);
                None
            }
        }
    };

    let client = QuoteClient::with_url(config.source.url.clone());
    let store = QuoteStore::new(
        Box::new(RemoteQuoteFetcher::new(client)),
        cache.clone(),
        config.cache.ttl_hours,
    );
    let bookmarks = BookmarkManager::new(cache);

    let app = App::new(store, bookmarks, config.ui.reduced_motion, config.ui.uppercase);
    quotedeck_tui::run_tui(app).await
}
