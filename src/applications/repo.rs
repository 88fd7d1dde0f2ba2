use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    applications::repo_types::Application,
    db::{StoreError, StoreResult},
    jobs::repo::lock_job,
};

/// Which half of the apply transaction failed. Either way nothing was
/// committed.
#[derive(Debug, Error)]
pub enum ApplyError {
    #[error("quota decrement failed: {0}")]
    Quota(StoreError),
    #[error("application insert failed: {0}")]
    Insert(StoreError),
}

#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    async fn find_by_job_and_user(&self, job_id: Uuid, user_id: Uuid)
        -> StoreResult<Vec<Application>>;

    /// Locks the job row, takes one slot of its quota and records the
    /// application, all in one transaction. A quota already at zero yields
    /// `ApplyError::Quota(StoreError::QuotaExhausted)`; a second application
    /// for the same pair yields `ApplyError::Insert(StoreError::Conflict)`.
    async fn apply(&self, job_id: Uuid, user_id: Uuid) -> Result<Application, ApplyError>;
}

#[derive(Clone)]
pub struct PgApplicationRepository {
    db: PgPool,
}

impl PgApplicationRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ApplicationRepository for PgApplicationRepository {
    async fn find_by_job_and_user(
        &self,
        job_id: Uuid,
        user_id: Uuid,
    ) -> StoreResult<Vec<Application>> {
        let rows = sqlx::query_as::<_, Application>(
            r#"
            SELECT id, job_id, user_id, created_at
            FROM user_jobs
            WHERE job_id = $1 AND user_id = $2
            "#,
        )
        .bind(job_id)
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn apply(&self, job_id: Uuid, user_id: Uuid) -> Result<Application, ApplyError> {
        let quota_err = |e: sqlx::Error| ApplyError::Quota(e.into());

        let mut tx = self.db.begin().await.map_err(quota_err)?;

        let quota = lock_job(&mut tx, job_id).await.map_err(ApplyError::Quota)?;
        if quota <= 0 {
            return Err(ApplyError::Quota(StoreError::QuotaExhausted));
        }

        let updated = sqlx::query(
            "UPDATE jobs SET quota = quota - 1, updated_at = NOW() WHERE id = $1 AND quota > 0",
        )
        .bind(job_id)
        .execute(&mut *tx)
        .await
        .map_err(quota_err)?;
        if updated.rows_affected() == 0 {
            return Err(ApplyError::Quota(StoreError::QuotaExhausted));
        }

        let application = sqlx::query_as::<_, Application>(
            r#"
            INSERT INTO user_jobs (id, job_id, user_id)
            VALUES ($1, $2, $3)
            RETURNING id, job_id, user_id, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(job_id)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| ApplyError::Insert(e.into()))?;

        tx.commit()
            .await
            .map_err(|e| ApplyError::Insert(e.into()))?;
        Ok(application)
    }
}
