//! `MyTasks` task service -- HTTP backend for the task tracker.
//!
//! An axum server exposing task CRUD and toggle endpoints under `/tasks`,
//! backed by either in-memory or JSON-file storage.
//!
//! # Usage
//!
//! ```bash
//! # Run on default address 0.0.0.0:5000 with storage in the data dir
//! cargo run --bin mytasks-server
//!
//! # Custom port and throwaway storage
//! cargo run --bin mytasks-server -- --port 8080 --storage memory
//!
//! # Or via environment variables
//! PORT=8080 MYTASKS_STORAGE=file:///var/lib/mytasks/tasks.json cargo run --bin mytasks-server
//! ```

use std::sync::Arc;

use clap::Parser;
use mytasks_server::api;
use mytasks_server::config::{ServerCliArgs, ServerConfig};
use mytasks_server::store::{FileTaskStore, MemoryTaskStore, StorageBackend, TaskStore};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() {
    let cli = ServerCliArgs::parse();

    // Load config from CLI args + config file + env vars + defaults.
    let config = match ServerConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            std::process::exit(1);
        }
    };

    // Initialize tracing with the resolved log level.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    if let Err(e) = run(&config).await {
        tracing::error!(error = %e, "task service failed");
        std::process::exit(1);
    }
}

async fn run(config: &ServerConfig) -> Result<(), BoxError> {
    let backend = StorageBackend::parse(&config.storage)?;
    tracing::info!(addr = %config.bind_addr, storage = %backend, "starting mytasks server");

    match backend {
        StorageBackend::Memory => serve(Arc::new(MemoryTaskStore::new()), config).await,
        StorageBackend::File(path) => {
            serve(Arc::new(FileTaskStore::open(path).await?), config).await
        }
    }
}

async fn serve<S: TaskStore + 'static>(
    store: Arc<S>,
    config: &ServerConfig,
) -> Result<(), BoxError> {
    let (bound_addr, handle) =
        api::start_server(&config.bind_addr, store, config.max_body_size).await?;
    tracing::info!(addr = %bound_addr, "task service listening");
    handle.await?;
    Ok(())
}
