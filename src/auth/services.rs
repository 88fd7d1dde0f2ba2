use lazy_static::lazy_static;
use regex::Regex;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::{
    dto::{LoginRequest, RegisterRequest},
    jwt::JwtKeys,
    password::{hash_password, verify_password},
    repo::UserRepository,
    repo_types::{NewUser, User},
};
use crate::error::{AppError, AppResult};

const MIN_PASSWORD_LEN: usize = 8;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Registration and login on top of a [`UserRepository`].
#[derive(Clone)]
pub struct AccountService<R> {
    repo: R,
    keys: JwtKeys,
}

impl<R: UserRepository> AccountService<R> {
    pub fn new(repo: R, keys: JwtKeys) -> Self {
        Self { repo, keys }
    }

    pub async fn register(&self, payload: RegisterRequest) -> AppResult<User> {
        let email = normalize_email(&payload.email);
        if !is_valid_email(&email) {
            warn!(email = %email, "invalid email");
            return Err(AppError::InvalidEmail);
        }
        if payload.user_password.chars().count() < MIN_PASSWORD_LEN {
            warn!("password too short");
            return Err(AppError::PasswordTooShort);
        }
        let user_name = payload.user_name.trim().to_string();
        let phone = payload.phone.trim().to_string();
        if user_name.is_empty() || phone.is_empty() {
            return Err(AppError::InvalidRequestBody);
        }

        let password_hash = hash_password(&payload.user_password).map_err(|e| {
            error!(error = %e, "hash_password failed");
            AppError::CreateUsers
        })?;

        let user = self
            .repo
            .create(NewUser {
                user_name,
                email,
                phone,
                password_hash,
                current_job: payload.current_job,
                user_age: payload.user_age,
                is_job_poster: payload.is_job_poster,
            })
            .await
            .map_err(|e| {
                error!(error = %e, "create user failed");
                AppError::CreateUsers
            })?;

        info!(user_id = %user.id, email = %user.email, "user registered");
        Ok(user)
    }

    /// Returns a signed access token. Unknown email and wrong password are
    /// reported identically.
    pub async fn login(&self, payload: LoginRequest) -> AppResult<String> {
        let email = normalize_email(&payload.email);

        let user = match self.repo.find_by_email(&email).await {
            Ok(Some(u)) => u,
            Ok(None) => {
                warn!(email = %email, "login unknown email");
                return Err(AppError::InvalidCredentials);
            }
            Err(e) => {
                error!(error = %e, "find_by_email failed");
                return Err(AppError::FailedLogin);
            }
        };

        let ok = verify_password(&payload.password, &user.user_password).map_err(|e| {
            error!(error = %e, user_id = %user.id, "verify_password failed");
            AppError::FailedLogin
        })?;
        if !ok {
            warn!(user_id = %user.id, "login invalid password");
            return Err(AppError::InvalidCredentials);
        }

        let token = self.keys.sign(user.id).map_err(|e| {
            error!(error = %e, "jwt sign failed");
            AppError::FailedLogin
        })?;

        info!(user_id = %user.id, "user logged in");
        Ok(token)
    }

    pub async fn profile(&self, user_id: Uuid) -> AppResult<User> {
        match self.repo.find_by_id(user_id).await {
            Ok(Some(u)) => Ok(u),
            Ok(None) => Err(AppError::RecordNotFound),
            Err(e) => {
                error!(error = %e, %user_id, "find_by_id failed");
                Err(AppError::FindingUsers)
            }
        }
    }
}
