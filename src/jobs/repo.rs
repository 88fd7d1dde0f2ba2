use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::{
    db::{StoreError, StoreResult},
    jobs::repo_types::{Job, JobChanges, NewJob},
};

#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Open, unexpired jobs whose name contains `name` (case-insensitive).
    async fn find_all(&self, name: &str) -> StoreResult<Vec<Job>>;
    /// The job with `id`, if it is open and unexpired.
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Job>>;
    async fn create(&self, job: NewJob) -> StoreResult<Job>;
    async fn close(&self, id: Uuid) -> StoreResult<Job>;
    /// Writes every present field of `changes` in a single transaction.
    async fn update(&self, id: Uuid, changes: JobChanges) -> StoreResult<Job>;
}

#[derive(Clone)]
pub struct PgJobRepository {
    db: PgPool,
}

impl PgJobRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

const JOB_COLUMNS: &str =
    "id, job_poster_id, job_name, job_desc, quota, is_open, expiry_date, created_at, updated_at";

/// Escapes LIKE metacharacters so the filter matches as a literal substring.
fn like_pattern(filter: &str) -> String {
    let mut out = String::with_capacity(filter.len() + 2);
    out.push('%');
    for c in filter.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('%');
    out
}

/// Takes the row lock on a job inside the caller's transaction.
pub(crate) async fn lock_job(conn: &mut PgConnection, id: Uuid) -> StoreResult<i32> {
    sqlx::query_scalar::<_, i32>("SELECT quota FROM jobs WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(StoreError::NotFound)
}

#[async_trait]
impl JobRepository for PgJobRepository {
    async fn find_all(&self, name: &str) -> StoreResult<Vec<Job>> {
        let sql = format!(
            r#"
            SELECT {JOB_COLUMNS}
            FROM jobs
            WHERE job_name ILIKE $1
              AND expiry_date > NOW()
              AND is_open IS TRUE
            ORDER BY created_at DESC
            "#
        );
        let rows = sqlx::query_as::<_, Job>(&sql)
            .bind(like_pattern(name))
            .fetch_all(&self.db)
            .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Job>> {
        let sql = format!(
            r#"
            SELECT {JOB_COLUMNS}
            FROM jobs
            WHERE id = $1 AND expiry_date > NOW() AND is_open IS TRUE
            "#
        );
        let job = sqlx::query_as::<_, Job>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await?;
        Ok(job)
    }

    async fn create(&self, job: NewJob) -> StoreResult<Job> {
        let sql = format!(
            r#"
            INSERT INTO jobs (id, job_poster_id, job_name, job_desc, quota, is_open, expiry_date)
            VALUES ($1, $2, $3, $4, $5, TRUE, $6)
            RETURNING {JOB_COLUMNS}
            "#
        );
        let created = sqlx::query_as::<_, Job>(&sql)
            .bind(Uuid::new_v4())
            .bind(job.poster_id)
            .bind(&job.name)
            .bind(&job.description)
            .bind(job.quota)
            .bind(job.expiry_date)
            .fetch_one(&self.db)
            .await?;
        Ok(created)
    }

    async fn close(&self, id: Uuid) -> StoreResult<Job> {
        let mut tx = self.db.begin().await?;
        lock_job(&mut tx, id).await?;
        let sql = format!(
            "UPDATE jobs SET is_open = FALSE, updated_at = NOW() WHERE id = $1 RETURNING {JOB_COLUMNS}"
        );
        let job = sqlx::query_as::<_, Job>(&sql)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(job)
    }

    async fn update(&self, id: Uuid, changes: JobChanges) -> StoreResult<Job> {
        let mut tx = self.db.begin().await?;
        lock_job(&mut tx, id).await?;
        let sql = format!(
            r#"
            UPDATE jobs
            SET quota = COALESCE($2, quota),
                expiry_date = COALESCE($3, expiry_date),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {JOB_COLUMNS}
            "#
        );
        let job = sqlx::query_as::<_, Job>(&sql)
            .bind(id)
            .bind(changes.quota)
            .bind(changes.expiry_date)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(job)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::seed_job;
    use time::{Duration, OffsetDateTime};

    #[test]
    fn like_pattern_wraps_and_escapes() {
        assert_eq!(like_pattern(""), "%%");
        assert_eq!(like_pattern("rust"), "%rust%");
        assert_eq!(like_pattern("100%"), "%100\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
        assert_eq!(like_pattern(r"c:\dir"), r"%c:\\dir%");
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs a Postgres DATABASE_URL"]
    async fn negative_quota_is_refused_and_stored_quota_kept(db: PgPool) {
        let job = seed_job(&db, 4).await;
        let repo = PgJobRepository::new(db);

        let changes = JobChanges {
            quota: Some(-1),
            ..JobChanges::default()
        };
        assert!(matches!(
            repo.update(job.id, changes).await,
            Err(StoreError::Database(_))
        ));
        assert_eq!(repo.find_by_id(job.id).await.unwrap().unwrap().quota, 4);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs a Postgres DATABASE_URL"]
    async fn update_sets_quota_and_expiry_in_one_go(db: PgPool) {
        let job = seed_job(&db, 4).await;
        let repo = PgJobRepository::new(db);

        let expiry = OffsetDateTime::now_utc().replace_nanosecond(0).unwrap() + Duration::days(30);
        let updated = repo
            .update(
                job.id,
                JobChanges {
                    quota: Some(7),
                    expiry_date: Some(expiry),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.quota, 7);
        assert_eq!(updated.expiry_date, expiry);
        assert_eq!(updated.job_name, job.job_name);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs a Postgres DATABASE_URL"]
    async fn closed_job_leaves_the_board(db: PgPool) {
        let job = seed_job(&db, 1).await;
        let repo = PgJobRepository::new(db);

        assert!(!repo.close(job.id).await.unwrap().is_open);
        assert!(repo.find_by_id(job.id).await.unwrap().is_none());
        assert!(repo.find_all("").await.unwrap().is_empty());
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs a Postgres DATABASE_URL"]
    async fn mutating_a_missing_job_is_not_found(db: PgPool) {
        let repo = PgJobRepository::new(db);
        assert!(matches!(
            repo.close(Uuid::new_v4()).await,
            Err(StoreError::NotFound)
        ));
    }
}
