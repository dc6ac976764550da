mod metrics;
mod render;

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use reelcache_core::{
    connectivity::probe, load_config, validate_config, CachedRepository, CatalogRepository,
    Connectivity, DetailsController, DetailsState, DiskCache, ListController, ProbeMonitor,
    SanitizedConfig, TmdbClient,
};

/// Environment variable naming the config file.
const CONFIG_ENV: &str = "REELCACHE_CONFIG";

#[derive(Parser, Debug)]
#[command(name = "reelcache", version, about = "Browse the TMDB movie catalog with an offline cache")]
struct Args {
    /// Config file (default: $REELCACHE_CONFIG or config.toml)
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Start offline: read only from the cache and skip the connectivity probe
    #[arg(long, global = true)]
    offline: bool,

    /// Log as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    /// Print Prometheus metrics after the command
    #[arg(long, global = true)]
    metrics: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List trending movies
    List {
        /// Number of pages to load
        #[arg(long, default_value_t = 1)]
        pages: u32,

        /// Only show titles containing this text
        #[arg(long)]
        search: Option<String>,

        /// Only show movies in this genre (repeatable)
        #[arg(long = "genre", value_name = "ID")]
        genres: Vec<i64>,
    },
    /// Show the details of one movie
    Details {
        /// TMDB movie ID
        id: i64,
    },
    /// List movie genres
    Genres {
        /// Bypass the cache
        #[arg(long)]
        refresh: bool,
    },
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logging(args.log_json);

    if let Err(e) = run(args).await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_logging(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn run(args: Args) -> Result<()> {
    // Determine config path
    let config_path = args
        .config
        .clone()
        .or_else(|| std::env::var(CONFIG_ENV).ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("config.toml"));

    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;
    validate_config(&config).context("Configuration validation failed")?;
    debug!(config = ?SanitizedConfig::from(&config), "Configuration loaded");

    // Connectivity
    let (connectivity, monitor) = if args.offline {
        info!("Starting in offline mode");
        (Connectivity::new(false), None)
    } else {
        let online = probe(
            &config.connectivity.probe_addr,
            Duration::from_secs(config.connectivity.probe_timeout_secs),
        )
        .await;
        info!(online, "Initial connectivity");
        let connectivity = Connectivity::new(online);
        let monitor = ProbeMonitor::spawn(&config.connectivity, connectivity.clone());
        (connectivity, Some(monitor))
    };

    // Data layer
    let remote = Arc::new(TmdbClient::new(&config.api).context("Failed to create TMDB client")?);
    let cache = Arc::new(
        DiskCache::new(&config.cache.dir)
            .with_context(|| format!("Failed to open cache at {:?}", config.cache.dir))?,
    );
    let repository: Arc<dyn CatalogRepository> = Arc::new(CachedRepository::new(remote, cache));

    let result = match args.command {
        Command::List {
            pages,
            search,
            genres,
        } => run_list(repository, connectivity, pages, search, genres).await,
        Command::Details { id } => run_details(repository, id, &config.api.image_base_url).await,
        Command::Genres { refresh } => {
            let online = connectivity.is_online();
            let genres = repository.fetch_genres(refresh && online).await;
            print!("{}", render::genres(&genres));
            Ok(())
        }
    };

    if let Some(monitor) = monitor {
        monitor.stop().await;
    }

    if args.metrics {
        print!("{}", metrics::encode_metrics());
    }

    result
}

async fn run_list(
    repository: Arc<dyn CatalogRepository>,
    connectivity: Connectivity,
    pages: u32,
    search: Option<String>,
    genres: Vec<i64>,
) -> Result<()> {
    let controller = ListController::new(repository, connectivity);

    if let Some(text) = search {
        controller.set_search_text(text).await;
    }
    if !genres.is_empty() {
        controller
            .set_selected_genres(genres.into_iter().collect::<BTreeSet<_>>())
            .await;
    }

    controller.start().await;
    for _ in 1..pages {
        if !controller.snapshot().can_load_more {
            break;
        }
        controller.load_next_page().await;
    }
    controller.stop().await;

    let snapshot = controller.snapshot();
    print!("{}", render::list(&snapshot));

    if snapshot.items.is_empty() {
        if let Some(error) = snapshot.error_message {
            bail!(error);
        }
    }
    Ok(())
}

async fn run_details(
    repository: Arc<dyn CatalogRepository>,
    id: i64,
    image_base_url: &str,
) -> Result<()> {
    let controller = DetailsController::new(id, repository);
    controller.load().await;

    match controller.state() {
        DetailsState::Loaded(details) => {
            print!("{}", render::details(&details, image_base_url));
            Ok(())
        }
        DetailsState::Failed(message) => bail!(message),
        DetailsState::Loading => bail!("Details for movie {} did not finish loading", id),
    }
}
