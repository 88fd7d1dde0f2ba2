use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, LoginResponse, RegisterRequest, UserResponse},
        extractors::AuthUser,
    },
    error::{AppError, AppResult},
    response::JsonResponse,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/users/me", get(get_me))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<JsonResponse<UserResponse>>)> {
    let Json(payload) = payload.map_err(|e| {
        warn!(error = %e, "invalid register body");
        AppError::InvalidRequestBody
    })?;

    let user = state.accounts.register(payload).await?;
    Ok((StatusCode::CREATED, Json(JsonResponse::data(user.into()))))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Json<LoginResponse>> {
    let Json(payload) = payload.map_err(|e| {
        warn!(error = %e, "invalid login body");
        AppError::InvalidRequestBody
    })?;

    let access_token = state.accounts.login(payload).await?;
    Ok(Json(LoginResponse { access_token }))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<JsonResponse<UserResponse>>> {
    let user = state.accounts.profile(user_id).await?;
    Ok(Json(JsonResponse::data(user.into())))
}
