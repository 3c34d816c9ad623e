//! Admin surface
//!
//! `GET /api/redirects` lists the table; `POST /api/redirects` applies one
//! add/update/delete.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::admin::AdminService;
use crate::config::Config;
use crate::error::{RedirectError, Result};
use crate::protocol::{MutationRequest, MutationResponse, RedirectRecord};

/// Build the admin API router
#[allow(deprecated)]
pub fn admin_router(admin: Arc<AdminService>, config: &Config) -> Router {
    Router::new()
        .route("/api/redirects", get(list_redirects).post(mutate_redirects))
        .route("/health", get(super::health))
        .with_state(admin)
        .layer(TimeoutLayer::new(Duration::from_millis(config.request_timeout_ms)))
        .layer(TraceLayer::new_for_http())
}

async fn list_redirects(State(admin): State<Arc<AdminService>>) -> Response {
    match run_blocking(move || admin.list()).await {
        Ok(entries) => {
            let records: Vec<RedirectRecord> = entries.into_iter().map(Into::into).collect();
            Json(records).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Listing redirects failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

async fn mutate_redirects(
    State(admin): State<Arc<AdminService>>,
    Json(request): Json<MutationRequest>,
) -> (StatusCode, Json<MutationResponse>) {
    let action = request.action().ok();

    let result = match request.into_mutation() {
        Ok(mutation) => run_blocking(move || admin.execute(mutation)).await,
        Err(e) => Err(e),
    };

    let status = match &result {
        Err(e) if !e.is_client_error() => {
            tracing::error!(error = %e, "Mutation failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
        _ => StatusCode::OK,
    };

    (status, Json(MutationResponse::from_result(action, &result)))
}

/// Run store I/O on the blocking pool
async fn run_blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| RedirectError::Server(format!("blocking task failed: {}", e)))?
}
