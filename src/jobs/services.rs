use time::OffsetDateTime;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::{
    repo::JobRepository,
    repo_types::{Job, JobChanges, NewJob},
};
use crate::{
    db::StoreError,
    error::{AppError, AppResult},
};

/// Ownership and quota rules for job postings.
#[derive(Clone)]
pub struct JobService<R> {
    repo: R,
}

impl<R: JobRepository> JobService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub async fn list_available(&self, name_filter: &str) -> AppResult<Vec<Job>> {
        self.repo.find_all(name_filter).await.map_err(|e| {
            error!(error = %e, "find_all jobs failed");
            AppError::GettingJobs
        })
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Job> {
        match self.repo.find_by_id(id).await {
            Ok(Some(job)) => Ok(job),
            Ok(None) => Err(AppError::JobNotFound),
            Err(e) => {
                error!(error = %e, job_id = %id, "find_by_id failed");
                Err(AppError::GettingJobs)
            }
        }
    }

    pub async fn create(&self, new_job: NewJob, caller_id: Uuid) -> AppResult<Job> {
        if new_job.poster_id != caller_id {
            warn!(%caller_id, poster_id = %new_job.poster_id, "create job for another poster");
            return Err(AppError::Unauthorized);
        }
        if new_job.quota < 0 {
            return Err(AppError::InvalidQuota);
        }

        let job = self.repo.create(new_job).await.map_err(|e| {
            error!(error = %e, "create job failed");
            AppError::CreatingJobs
        })?;
        info!(job_id = %job.id, poster_id = %job.job_poster_id, "job created");
        Ok(job)
    }

    pub async fn close(&self, id: Uuid, caller_id: Uuid) -> AppResult<Job> {
        self.owned_by(id, caller_id).await?;
        let job = self.repo.close(id).await.map_err(mutation_error)?;
        info!(job_id = %id, "job closed");
        Ok(job)
    }

    pub async fn update_quota(&self, id: Uuid, quota: i32, caller_id: Uuid) -> AppResult<Job> {
        let changes = JobChanges {
            quota: Some(quota),
            ..JobChanges::default()
        };
        self.update(id, changes, caller_id).await
    }

    pub async fn update_expiry(
        &self,
        id: Uuid,
        expiry: OffsetDateTime,
        caller_id: Uuid,
    ) -> AppResult<Job> {
        let changes = JobChanges {
            expiry_date: Some(expiry),
            ..JobChanges::default()
        };
        self.update(id, changes, caller_id).await
    }

    /// Quota and expiry together: either both are stored or neither is.
    pub async fn update(&self, id: Uuid, changes: JobChanges, caller_id: Uuid) -> AppResult<Job> {
        self.owned_by(id, caller_id).await?;
        if changes.is_empty() {
            return Err(AppError::InvalidRequestBody);
        }
        if changes.quota.is_some_and(|q| q < 0) {
            return Err(AppError::InvalidQuota);
        }
        let job = self.repo.update(id, changes).await.map_err(mutation_error)?;
        info!(
            job_id = %id,
            quota = ?changes.quota,
            expiry = ?changes.expiry_date,
            "job updated"
        );
        Ok(job)
    }

    /// Fetches an available job and checks that `caller_id` posted it.
    async fn owned_by(&self, id: Uuid, caller_id: Uuid) -> AppResult<Job> {
        let job = self.get_by_id(id).await?;
        if job.job_poster_id != caller_id {
            warn!(job_id = %id, %caller_id, "caller is not the job poster");
            return Err(AppError::Unauthorized);
        }
        Ok(job)
    }
}

fn mutation_error(e: StoreError) -> AppError {
    match e {
        StoreError::NotFound => AppError::JobNotFound,
        other => {
            error!(error = %other, "job mutation failed");
            AppError::FindingJobs
        }
    }
}
