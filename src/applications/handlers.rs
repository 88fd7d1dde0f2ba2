use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::{instrument, warn};

use super::dto::{ApplicationResponse, ApplyRequest};
use crate::{
    auth::extractors::AuthUser,
    error::{AppError, AppResult},
    response::JsonResponse,
    state::AppState,
};

pub fn apply_routes() -> Router<AppState> {
    Router::new().route("/users/apply", post(apply_job))
}

#[instrument(skip(state, payload))]
pub async fn apply_job(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<ApplyRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<JsonResponse<ApplicationResponse>>)> {
    let Json(payload) = payload.map_err(|e| {
        warn!(error = %e, "invalid apply body");
        AppError::InvalidRequestBody
    })?;

    let receipt = state
        .applications
        .apply(payload.job_id, payload.user_id, user_id)
        .await?;
    Ok((StatusCode::CREATED, Json(JsonResponse::data(receipt.into()))))
}
