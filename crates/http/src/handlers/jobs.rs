use axum::{Json, extract::State};
use std::sync::Arc;

use crate::AppState;
use crate::api_error::ApiError;
use crate::response_types::JobsResponse;

pub async fn list_jobs(
    State(state): State<Arc<AppState>>,
) -> Result<Json<JobsResponse>, ApiError> {
    let jobs = state.jobs_service.list_jobs().await?;
    Ok(Json(JobsResponse { jobs }))
}
