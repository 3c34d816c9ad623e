//! Redirect surface
//!
//! `GET /?host=..&uri=..` answers with a 302 to the stored target or to the
//! fallback URL.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::Config;
use crate::lookup::LookupService;

/// Query string of a redirect request
#[derive(Debug, Deserialize)]
struct RedirectQuery {
    host: Option<String>,
    uri: Option<String>,
}

/// Build the redirect server router
#[allow(deprecated)]
pub fn redirect_router(lookup: Arc<LookupService>, config: &Config) -> Router {
    Router::new()
        .route("/", get(redirect_handler))
        .route("/health", get(super::health))
        .with_state(lookup)
        .layer(TimeoutLayer::new(Duration::from_millis(config.request_timeout_ms)))
        .layer(TraceLayer::new_for_http())
}

async fn redirect_handler(
    State(lookup): State<Arc<LookupService>>,
    Query(query): Query<RedirectQuery>,
) -> Response {
    let (host, uri) = match (query.host, query.uri) {
        (Some(host), Some(uri)) => (host, uri),
        _ => {
            return (StatusCode::BAD_REQUEST, "Both host and uri query parameters are required")
                .into_response();
        }
    };

    let resolved =
        tokio::task::spawn_blocking(move || lookup.redirect_target(&host, &uri)).await;

    match resolved {
        Ok(Ok(target)) => match HeaderValue::try_from(target) {
            Ok(location) => (StatusCode::FOUND, [(header::LOCATION, location)]).into_response(),
            Err(e) => {
                tracing::error!(error = %e, "Stored redirect target is not a valid header value");
                (StatusCode::INTERNAL_SERVER_ERROR, "Invalid redirect target").into_response()
            }
        },
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Lookup failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Redirect library unavailable").into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Lookup task failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
