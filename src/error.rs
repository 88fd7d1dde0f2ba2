use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

/// Every failure a client can observe. The display text is the message sent
/// back in the response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AppError {
    #[error("error getting all jobs")]
    GettingJobs,
    #[error("error creating jobs")]
    CreatingJobs,
    #[error("invalid request body")]
    InvalidRequestBody,
    #[error("error finding jobs")]
    FindingJobs,
    #[error("id not found")]
    IdNotFound,
    #[error("record not found")]
    RecordNotFound,
    #[error("error creating users")]
    CreateUsers,
    #[error("error invalid token")]
    InvalidToken,
    #[error("error invalid auth header")]
    InvalidAuthHeader,
    #[error("error job not found")]
    JobNotFound,
    #[error("error unauthorized")]
    Unauthorized,
    #[error("quota is less than zero")]
    InvalidQuota,
    #[error("job quota is exhausted")]
    QuotaExhausted,
    #[error("error job transaction")]
    JobTransaction,
    #[error("error creating apply job")]
    CreateApplyJob,
    #[error("error getting user job")]
    GettingUserJob,
    #[error("already applied to the job")]
    AlreadyApplied,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("error failed login")]
    FailedLogin,
    #[error("invalid date format")]
    InvalidDate,
    #[error("invalid email")]
    InvalidEmail,
    #[error("password too short")]
    PasswordTooShort,
    #[error("error finding users")]
    FindingUsers,
    #[error("request timeout")]
    RequestTimeout,
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::GettingJobs
            | AppError::CreatingJobs
            | AppError::FindingJobs
            | AppError::CreateUsers
            | AppError::JobTransaction
            | AppError::CreateApplyJob
            | AppError::GettingUserJob
            | AppError::FailedLogin
            | AppError::FindingUsers
            | AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::RequestTimeout => StatusCode::REQUEST_TIMEOUT,
            AppError::InvalidToken | AppError::InvalidAuthHeader => StatusCode::UNAUTHORIZED,
            AppError::InvalidRequestBody
            | AppError::IdNotFound
            | AppError::RecordNotFound
            | AppError::JobNotFound
            | AppError::Unauthorized
            | AppError::InvalidQuota
            | AppError::QuotaExhausted
            | AppError::AlreadyApplied
            | AppError::InvalidCredentials
            | AppError::InvalidDate
            | AppError::InvalidEmail
            | AppError::PasswordTooShort => StatusCode::BAD_REQUEST,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            message: self.to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}
