use axum::{
    Json,
    extract::{ConnectInfo, State},
};
use std::net::SocketAddr;
use std::sync::Arc;

use aplus_service::DirectoryStatus;

use crate::AppState;
use crate::api_error::ApiError;
use crate::response_types::RefreshResponse;

fn is_localhost(addr: &SocketAddr) -> bool {
    addr.ip().is_loopback()
}

pub async fn directory_status(State(state): State<Arc<AppState>>) -> Json<DirectoryStatus> {
    Json(state.query_service.status().await)
}

/// Force a refetch after the sheet was edited. The new snapshot replaces the
/// old one only if the fetch succeeds.
pub async fn admin_refresh(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<Json<RefreshResponse>, ApiError> {
    if !is_localhost(&addr) {
        tracing::warn!(%addr, "rejected non-local directory refresh");
        return Err(ApiError::Forbidden("admin endpoints are only available locally".to_owned()));
    }
    let report = state.query_service.refresh().await?;
    tracing::info!(
        accepted = report.accepted,
        rejected = report.rejected,
        generation = report.generation,
        "directory refreshed by admin"
    );
    Ok(Json(RefreshResponse { success: true, report }))
}
