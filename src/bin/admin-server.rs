//! Admin Server Binary
//!
//! Serves the admin API that edits the redirect library.

use std::sync::Arc;

use clap::Parser;
use redirect_engine::network::{admin_router, serve};
use redirect_engine::{AdminService, Config};
use tracing_subscriber::{fmt, EnvFilter};

/// Admin Server
#[derive(Parser, Debug)]
#[command(name = "admin-server")]
#[command(about = "Admin API for adding, editing, and removing redirects")]
#[command(version)]
struct Args {
    /// Redirect library file
    #[arg(short, long, default_value = "./RedirectLibrary.rdlb")]
    store: String,

    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:5001")]
    listen: String,

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

    tracing::info!("Admin Server v{}", redirect_engine::VERSION);
    tracing::info!("Store file: {}", args.store);
    tracing::info!("Listen address: {}", args.listen);

    let config = Config::builder()
        .store_path(&args.store)
        .admin_listen_addr(&args.listen)
        .request_timeout_ms(args.timeout_ms)
        .build();

    let admin = Arc::new(AdminService::new(&config));

    match admin.list() {
        Ok(entries) => tracing::info!("Redirect library holds {} entries", entries.len()),
        Err(e) => {
            tracing::error!("Failed to open redirect library: {}", e);
            std::process::exit(1);
        }
    }

    let router = admin_router(admin, &config);
    if let Err(e) = serve(router, &config.admin_listen_addr).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}
