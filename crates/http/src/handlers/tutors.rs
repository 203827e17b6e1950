use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
};
use std::sync::Arc;

use aplus_core::TutorRecord;
use aplus_service::TutorPage;

use crate::AppState;
use crate::api_error::ApiError;
use crate::query_types::{CheckIdQuery, TutorListQuery};
use crate::response_types::CheckIdResponse;

pub async fn list_tutors(
    State(state): State<Arc<AppState>>,
    query: Result<Query<TutorListQuery>, QueryRejection>,
) -> Result<Json<TutorPage>, ApiError> {
    let Query(query) = query?;
    let page = state.query_service.list_tutors(&query.filter(), query.page()).await?;
    Ok(Json(page))
}

pub async fn get_tutor(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<TutorRecord>, ApiError> {
    let tutor = state.query_service.get_tutor(&id).await?;
    Ok(Json(tutor))
}

pub async fn check_id(
    State(state): State<Arc<AppState>>,
    query: Result<Query<CheckIdQuery>, QueryRejection>,
) -> Result<Json<CheckIdResponse>, ApiError> {
    let Query(query) = query?;
    if query.id_card.trim().is_empty() {
        return Err(ApiError::BadRequest("id_card is required".to_owned()));
    }
    let registered = state.query_service.check_id_registered(&query.id_card).await?;
    Ok(Json(CheckIdResponse { id_card: query.id_card, registered }))
}
