//! Redirect Server Binary
//!
//! Serves `GET /?host=..&uri=..` with 302 redirects from the store file.

use std::sync::Arc;

use clap::Parser;
use redirect_engine::network::{redirect_router, serve};
use redirect_engine::{Config, LookupService};
use tracing_subscriber::{fmt, EnvFilter};

/// Redirect Server
#[derive(Parser, Debug)]
#[command(name = "redirect-server")]
#[command(about = "Serves HTTP redirects from the redirect library")]
#[command(version)]
struct Args {
    /// Redirect library file
    #[arg(short, long, default_value = "./RedirectLibrary.rdlb")]
    store: String,

    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:5000")]
    listen: String,

    /// Target for request URLs with no entry
    #[arg(short, long, default_value = redirect_engine::config::DEFAULT_FALLBACK_URL)]
    fallback_url: String,

    /// Reload the table on every request instead of caching per file version
    #[arg(long)]
    no_cache: bool,

    /// Request timeout in milliseconds
    #[arg(short, long, default_value = "5000")]
    timeout_ms: u64,
}

#[tokio::main]
async fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,redirect_engine=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("Redirect Server v{}", redirect_engine::VERSION);
    tracing::info!("Store file: {}", args.store);
    tracing::info!("Listen address: {}", args.listen);

    let config = Config::builder()
        .store_path(&args.store)
        .redirect_listen_addr(&args.listen)
        .fallback_url(&args.fallback_url)
        .lookup_cache(!args.no_cache)
        .request_timeout_ms(args.timeout_ms)
        .build();

    let lookup = Arc::new(LookupService::new(&config));

    // Fail fast on an unreadable or corrupt store (also creates a missing one)
    if let Err(e) = lookup.store().load() {
        tracing::error!("Failed to open redirect library: {}", e);
        std::process::exit(1);
    }

    let router = redirect_router(lookup, &config);
    if let Err(e) = serve(router, &config.redirect_listen_addr).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}
