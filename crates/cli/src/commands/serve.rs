use anyhow::Result;
use aplus_http::{AppState, create_router};
use std::net::SocketAddr;
use std::sync::Arc;

use crate::{allowed_origins, build_services};

pub(crate) async fn run(port: u16, host: String) -> Result<()> {
    let services = build_services()?;
    let query_service = services.query;

    // Warm the cache so the first visitor does not pay for the fetch. A failure
    // here is not fatal: requests retry lazily.
    match query_service.refresh().await {
        Ok(report) => tracing::info!(
            accepted = report.accepted,
            rejected = report.rejected,
            "Tutor directory loaded"
        ),
        Err(e) => tracing::warn!("Initial directory load failed: {}", e),
    }

    let state = Arc::new(AppState {
        query_service,
        registration_service: services.registration,
        jobs_service: services.jobs,
    });
    let origins = allowed_origins();
    if origins.is_empty() {
        tracing::info!("APLUS_ALLOWED_ORIGINS not set, allowing any origin");
    }
    let router = create_router(state, &origins);
    let addr = format!("{host}:{port}");
    tracing::info!("Starting HTTP server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router.into_make_service_with_connect_info::<SocketAddr>()).await?;

    Ok(())
}
