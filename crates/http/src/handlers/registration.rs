use axum::{Json, extract::State, extract::rejection::JsonRejection, http::StatusCode};
use std::sync::Arc;

use aplus_service::{RegistrationInput, RegistrationReceipt};

use crate::AppState;
use crate::api_error::ApiError;

pub async fn register_tutor(
    State(state): State<Arc<AppState>>,
    input: Result<Json<RegistrationInput>, JsonRejection>,
) -> Result<(StatusCode, Json<RegistrationReceipt>), ApiError> {
    let Json(input) = input?;
    let receipt = state.registration_service.register(input).await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}
