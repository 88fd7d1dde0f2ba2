use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub user_name: String,
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing)]
    pub user_password: String, // Argon2 hash, not exposed in JSON
    pub current_job: Option<String>,
    pub user_age: Option<i32>,
    pub is_job_poster: bool,
    pub created_at: OffsetDateTime,
}

/// Fields needed to insert a user; `password_hash` is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub user_name: String,
    pub email: String,
    pub phone: String,
    pub password_hash: String,
    pub current_job: Option<String>,
    pub user_age: Option<i32>,
    pub is_job_poster: bool,
}
