use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::timestamp;

#[derive(Debug, Deserialize)]
pub struct ApplyRequest {
    pub user_id: Uuid,
    pub job_id: Uuid,
}

/// What the applicant gets back after a successful apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationReceipt {
    pub job_id: Uuid,
    pub applied_at: OffsetDateTime,
}

#[derive(Debug, Serialize)]
pub struct ApplicationResponse {
    pub job_id: Uuid,
    pub status: &'static str,
    pub message: &'static str,
    pub applied_at: String,
}

impl From<ApplicationReceipt> for ApplicationResponse {
    fn from(r: ApplicationReceipt) -> Self {
        Self {
            job_id: r.job_id,
            status: "Applied",
            message: "Application success",
            applied_at: timestamp::format(r.applied_at),
        }
    }
}
