//! HTTP API server for the tutor directory.

#![allow(missing_docs, reason = "Internal crate with self-explanatory API")]
#![allow(unreachable_pub, reason = "pub items are re-exported")]
#![allow(missing_debug_implementations, reason = "Internal types")]
#![allow(clippy::missing_docs_in_private_items, reason = "Internal crate")]
#![allow(clippy::implicit_return, reason = "Implicit return is idiomatic Rust")]
#![allow(clippy::question_mark_used, reason = "? operator is idiomatic Rust")]
#![allow(clippy::exhaustive_structs, reason = "HTTP types are stable")]
#![allow(clippy::single_call_fn, reason = "Helper functions improve readability")]

pub mod api_error;
mod handlers;
mod query_types;
mod response_types;

use axum::{
    Json, Router,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use aplus_service::{DirectoryQueryService, JobBoardService, RegistrationService};

pub use response_types::VersionResponse;

/// Shared application state for all HTTP handlers.
pub struct AppState {
    /// Cached directory reads, lazy refresh and admin refresh
    pub query_service: Arc<DirectoryQueryService>,
    /// Appends new tutor submissions to the sheet
    pub registration_service: Arc<RegistrationService>,
    /// Job board worksheet
    pub jobs_service: Arc<JobBoardService>,
}

/// Browser origins allowed to call the API. An empty list allows any origin.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(%origin, error = %e, "ignoring invalid CORS origin");
                None
            },
        })
        .collect();
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);
    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(origins))
    }
}

pub fn create_router(state: Arc<AppState>, allowed_origins: &[String]) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/version", get(version))
        .route("/tutors", get(handlers::tutors::list_tutors))
        .route("/tutors/check-id", get(handlers::tutors::check_id))
        .route("/tutors/register", post(handlers::registration::register_tutor))
        .route("/tutors/{id}", get(handlers::tutors::get_tutor))
        .route("/jobs", get(handlers::jobs::list_jobs))
        .route("/api/directory/status", get(handlers::admin::directory_status))
        .route("/api/admin/refresh", post(handlers::admin::admin_refresh))
        .layer(cors_layer(allowed_origins))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn version() -> Json<VersionResponse> {
    Json(VersionResponse { version: env!("CARGO_PKG_VERSION") })
}
