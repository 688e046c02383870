use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use fukurou::cache::{CacheStore, DiskStore, MemoryStore};
use fukurou::config::{StoreBackend, WorkerConfig};
use fukurou::fetch::client::HttpFetcher;
use fukurou::lifecycle::{LifecycleController, NullClients, WorkerEvents};

/// Fukurou cache warmer - installs and activates an offline cache generation
#[derive(Parser, Debug)]
#[command(name = "fukurou")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Test configuration and exit
    #[arg(long)]
    test: bool,
}

#[tokio::main]
async fn main() {
    // Initialize logging subsystem
    fukurou::logging::init_subscriber().expect("Failed to initialize logging subsystem");

    let args = Args::parse();

    let config = WorkerConfig::from_file(&args.config).unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::process::exit(1);
    });

    tracing::info!(
        config_file = %args.config.display(),
        origin = %config.origin,
        namespace = %config.namespace(),
        precache_resources = config.precache.len(),
        "Configuration loaded successfully"
    );

    if args.test {
        println!("Configuration OK");
        return;
    }

    let store: Arc<dyn CacheStore> = match config.store.backend {
        StoreBackend::Memory => Arc::new(MemoryStore::new(&config.store.memory)),
        StoreBackend::Disk => Arc::new(DiskStore::new(&config.store.disk)),
    };
    let fetcher = Arc::new(HttpFetcher::new(config.normalized_origin()));

    let controller =
        LifecycleController::new(config, store.clone(), fetcher, Arc::new(NullClients));

    if let Err(e) = controller.on_install().await {
        tracing::error!(error = %e, "install failed, previous cache generation left intact");
        std::process::exit(1);
    }
    if let Err(e) = controller.on_activate().await {
        tracing::error!(error = %e, "activation failed");
        std::process::exit(1);
    }

    match store.stats().await {
        Ok(stats) => tracing::info!(
            namespace = %controller.namespace(),
            entries = stats.current_item_count,
            bytes = stats.current_size_bytes,
            "Cache generation installed and active"
        ),
        Err(e) => tracing::warn!(error = %e, "could not read store statistics"),
    }
}
