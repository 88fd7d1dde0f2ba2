use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::{instrument, warn};
use uuid::Uuid;

use super::{
    dto::{CreateJobRequest, JobListItem, JobResponse, JobSearch, UpdateJobQuery},
    repo_types::{JobChanges, NewJob},
};
use crate::{
    auth::extractors::AuthUser,
    error::{AppError, AppResult},
    response::JsonResponse,
    state::AppState,
};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/jobs", get(list_jobs))
        .route("/jobs/:id", get(get_job))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/jobs", post(create_job))
        .route("/jobs/:id/close", put(close_job))
        .route("/jobs/:id/update", put(update_job))
}

fn parse_job_id(raw: &str) -> AppResult<Uuid> {
    raw.parse::<Uuid>().map_err(|_| AppError::IdNotFound)
}

#[instrument(skip(state, search))]
pub async fn list_jobs(
    State(state): State<AppState>,
    search: Result<Query<JobSearch>, QueryRejection>,
) -> AppResult<Json<JsonResponse<Vec<JobListItem>>>> {
    let Query(search) = search.map_err(|e| {
        warn!(error = %e, "invalid job search query");
        AppError::InvalidRequestBody
    })?;
    let jobs = state.jobs.list_available(&search.name).await?;
    let items = jobs.into_iter().map(JobListItem::from).collect();
    Ok(Json(JsonResponse::data(items)))
}

#[instrument(skip(state))]
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<JsonResponse<JobResponse>>> {
    let id = parse_job_id(&id)?;
    let job = state.jobs.get_by_id(id).await?;
    Ok(Json(JsonResponse::data(job.into())))
}

#[instrument(skip(state, payload))]
pub async fn create_job(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<CreateJobRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<JsonResponse<JobResponse>>)> {
    let Json(payload) = payload.map_err(|e| {
        warn!(error = %e, "invalid create job body");
        AppError::InvalidRequestBody
    })?;
    let new_job = NewJob::try_from(payload)?;

    let job = state.jobs.create(new_job, user_id).await?;
    let message = format!("successfully add post job with id {}", job.id);
    Ok((
        StatusCode::CREATED,
        Json(JsonResponse::with_message(message, job.into())),
    ))
}

#[instrument(skip(state))]
pub async fn close_job(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<JsonResponse<JobResponse>>> {
    let id = parse_job_id(&id)?;
    let job = state.jobs.close(id, user_id).await?;
    let message = format!("successfully closed job with id {}", job.id);
    Ok(Json(JsonResponse::with_message(message, job.into())))
}

/// At least one of `quota` / `expDate` must be given; both are written in one
/// transaction.
#[instrument(skip(state, query))]
pub async fn update_job(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
    query: Result<Query<UpdateJobQuery>, QueryRejection>,
) -> AppResult<Json<JsonResponse<JobResponse>>> {
    let id = parse_job_id(&id)?;
    let Query(query) = query.map_err(|e| {
        warn!(error = %e, "invalid update job query");
        AppError::InvalidRequestBody
    })?;
    let job = match (query.quota()?, query.expiry()?) {
        (None, None) => return Err(AppError::InvalidRequestBody),
        (Some(quota), None) => state.jobs.update_quota(id, quota, user_id).await?,
        (None, Some(expiry)) => state.jobs.update_expiry(id, expiry, user_id).await?,
        (quota, expiry_date) => {
            let changes = JobChanges { quota, expiry_date };
            state.jobs.update(id, changes, user_id).await?
        }
    };

    let message = format!("successfully change job with id {id}");
    Ok(Json(JsonResponse::with_message(message, job.into())))
}
