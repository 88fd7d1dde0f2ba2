use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Job posting as stored in `jobs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Job {
    pub id: Uuid,
    pub job_poster_id: Uuid,
    pub job_name: String,
    pub job_desc: String,
    pub quota: i32,
    pub is_open: bool,
    pub expiry_date: OffsetDateTime,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewJob {
    pub poster_id: Uuid,
    pub name: String,
    pub description: String,
    pub quota: i32,
    pub expiry_date: OffsetDateTime,
}

/// Column changes applied together under one row lock. `None` keeps the
/// stored value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JobChanges {
    pub quota: Option<i32>,
    pub expiry_date: Option<OffsetDateTime>,
}

impl JobChanges {
    pub fn is_empty(&self) -> bool {
        self.quota.is_none() && self.expiry_date.is_none()
    }
}
