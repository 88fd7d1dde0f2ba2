use time::OffsetDateTime;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::{
    dto::ApplicationReceipt,
    repo::{ApplicationRepository, ApplyError},
};
use crate::{
    db::StoreError,
    error::{AppError, AppResult},
    jobs::repo::JobRepository,
};

/// "Apply once, only while quota remains", coordinated across the job and
/// application stores.
#[derive(Clone)]
pub struct ApplicationService<J, A> {
    jobs: J,
    applications: A,
}

impl<J, A> ApplicationService<J, A>
where
    J: JobRepository,
    A: ApplicationRepository,
{
    pub fn new(jobs: J, applications: A) -> Self {
        Self { jobs, applications }
    }

    pub async fn apply(
        &self,
        job_id: Uuid,
        applicant_id: Uuid,
        caller_id: Uuid,
    ) -> AppResult<ApplicationReceipt> {
        if applicant_id != caller_id {
            warn!(%caller_id, %applicant_id, "apply on behalf of another user");
            return Err(AppError::Unauthorized);
        }

        let existing = self
            .applications
            .find_by_job_and_user(job_id, applicant_id)
            .await
            .map_err(|e| {
                error!(error = %e, %job_id, "find_by_job_and_user failed");
                AppError::GettingUserJob
            })?;
        if !existing.is_empty() {
            return Err(AppError::AlreadyApplied);
        }

        let job = match self.jobs.find_by_id(job_id).await {
            Ok(Some(job)) => job,
            Ok(None) => return Err(AppError::JobNotFound),
            Err(e) => {
                error!(error = %e, %job_id, "find_by_id failed");
                return Err(AppError::GettingUserJob);
            }
        };
        if job.quota <= 0 {
            return Err(AppError::QuotaExhausted);
        }

        let application = self
            .applications
            .apply(job_id, applicant_id)
            .await
            .map_err(apply_error)?;

        info!(%job_id, user_id = %applicant_id, application_id = %application.id, "applied to job");
        Ok(ApplicationReceipt {
            job_id: application.job_id,
            applied_at: OffsetDateTime::now_utc(),
        })
    }
}

fn apply_error(e: ApplyError) -> AppError {
    match e {
        ApplyError::Quota(StoreError::QuotaExhausted) => AppError::QuotaExhausted,
        ApplyError::Quota(StoreError::NotFound) => AppError::JobNotFound,
        ApplyError::Insert(StoreError::Conflict) => AppError::AlreadyApplied,
        ApplyError::Quota(other) => {
            error!(error = %other, "apply quota transaction failed");
            AppError::JobTransaction
        }
        ApplyError::Insert(other) => {
            error!(error = %other, "apply insert failed");
            AppError::CreateApplyJob
        }
    }
}
