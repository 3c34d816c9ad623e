//! Network Module
//!
//! HTTP surfaces over the lookup and admin services.
//!
//! ## Architecture
//! - One axum router per process (redirect server, admin server)
//! - Store I/O is synchronous and runs on the blocking pool
//! - Request tracing and timeouts come from tower-http layers

mod admin;
mod redirect;
mod server;

use axum::Json;
use serde::Serialize;

pub use admin::admin_router;
pub use redirect::redirect_router;
pub use server::serve;

/// Body of `GET /health`
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
}

pub(crate) async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: crate::VERSION,
    })
}
