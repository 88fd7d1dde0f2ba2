use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::repo_types::{Job, NewJob};
use crate::{error::AppError, timestamp};

#[derive(Debug, Deserialize)]
pub struct CreateJobRequest {
    pub job_poster_id: Uuid,
    pub job_name: String,
    pub job_desc: String,
    pub quota: i32,
    pub expiry_date: String, // "YYYY-MM-DD HH:MM:SS", UTC
}

impl TryFrom<CreateJobRequest> for NewJob {
    type Error = AppError;

    fn try_from(req: CreateJobRequest) -> Result<Self, Self::Error> {
        let name = req.job_name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::InvalidRequestBody);
        }
        let expiry_date = timestamp::parse(&req.expiry_date).map_err(|_| AppError::InvalidDate)?;
        Ok(NewJob {
            poster_id: req.job_poster_id,
            name,
            description: req.job_desc,
            quota: req.quota,
            expiry_date,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct JobSearch {
    #[serde(default)]
    pub name: String,
}

/// `PUT /jobs/:id/update?quota=..&expDate=..`; both kept as text so an empty
/// value reads as absent.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateJobQuery {
    pub quota: Option<String>,
    #[serde(rename = "expDate")]
    pub exp_date: Option<String>,
}

impl UpdateJobQuery {
    pub fn quota(&self) -> Result<Option<i32>, AppError> {
        match non_empty(&self.quota) {
            None => Ok(None),
            Some(q) => q.parse().map(Some).map_err(|_| AppError::InvalidRequestBody),
        }
    }

    pub fn expiry(&self) -> Result<Option<time::OffsetDateTime>, AppError> {
        match non_empty(&self.exp_date) {
            None => Ok(None),
            Some(d) => timestamp::parse(d).map(Some).map_err(|_| AppError::InvalidDate),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[derive(Debug, Serialize)]
pub struct JobListItem {
    pub id: Uuid,
    pub job_poster_id: Uuid,
    pub job_name: String,
    pub job_desc: String,
    pub quota: i32,
}

impl From<Job> for JobListItem {
    fn from(j: Job) -> Self {
        Self {
            id: j.id,
            job_poster_id: j.job_poster_id,
            job_name: j.job_name,
            job_desc: j.job_desc,
            quota: j.quota,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct JobResponse {
    pub id: Uuid,
    pub job_poster_id: Uuid,
    pub job_name: String,
    pub job_desc: String,
    pub quota: i32,
    pub is_open: bool,
    pub expiry_date: String,
}

impl From<Job> for JobResponse {
    fn from(j: Job) -> Self {
        Self {
            id: j.id,
            job_poster_id: j.job_poster_id,
            job_name: j.job_name,
            job_desc: j.job_desc,
            quota: j.quota,
            is_open: j.is_open,
            expiry_date: timestamp::format(j.expiry_date),
        }
    }
}
