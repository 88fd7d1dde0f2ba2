//! In-memory stand-in for the Postgres repositories, used by service tests,
//! plus seeding helpers for the database-backed repository tests.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use async_trait::async_trait;
use sqlx::PgPool;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::{
    applications::{
        repo::{ApplicationRepository, ApplyError},
        repo_types::Application,
    },
    auth::{
        repo::{PgUserRepository, UserRepository},
        repo_types::{NewUser, User},
    },
    db::{StoreError, StoreResult},
    jobs::{
        repo::{JobRepository, PgJobRepository},
        repo_types::{Job, JobChanges, NewJob},
    },
};

#[derive(Default)]
struct Inner {
    users: Vec<User>,
    jobs: HashMap<Uuid, Job>,
    applications: Vec<Application>,
}

/// Implements every repository trait over one shared, mutex-guarded state.
/// Clones share the same data.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap()
    }

    pub fn insert_job(&self, job: Job) {
        self.lock().jobs.insert(job.id, job);
    }

    /// Raw lookup that ignores availability.
    pub fn job(&self, id: Uuid) -> Option<Job> {
        self.lock().jobs.get(&id).cloned()
    }

    pub fn application_count(&self, job_id: Uuid) -> usize {
        self.lock()
            .applications
            .iter()
            .filter(|a| a.job_id == job_id)
            .count()
    }
}

fn is_available(job: &Job, now: OffsetDateTime) -> bool {
    job.is_open && job.expiry_date > now
}

pub fn job_fixture(poster_id: Uuid, name: &str, quota: i32) -> Job {
    let now = OffsetDateTime::now_utc();
    Job {
        id: Uuid::new_v4(),
        job_poster_id: poster_id,
        job_name: name.into(),
        job_desc: format!("{name} description"),
        quota,
        is_open: true,
        expiry_date: now + Duration::days(7),
        created_at: now,
        updated_at: now,
    }
}

pub async fn seed_user(db: &PgPool) -> Uuid {
    let id = Uuid::new_v4();
    PgUserRepository::new(db.clone())
        .create(NewUser {
            user_name: "seed".into(),
            email: format!("{id}@example.com"),
            phone: "0800".into(),
            password_hash: "not-a-real-hash".into(),
            current_job: None,
            user_age: None,
            is_job_poster: true,
        })
        .await
        .expect("seed user")
        .id
}

pub async fn seed_job(db: &PgPool, quota: i32) -> Job {
    let poster_id = seed_user(db).await;
    PgJobRepository::new(db.clone())
        .create(NewJob {
            poster_id,
            name: "Seeded Job".into(),
            description: "seeded".into(),
            quota,
            expiry_date: OffsetDateTime::now_utc() + Duration::days(7),
        })
        .await
        .expect("seed job")
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, user: NewUser) -> StoreResult<User> {
        let mut inner = self.lock();
        if inner.users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::Conflict);
        }
        let created = User {
            id: Uuid::new_v4(),
            user_name: user.user_name,
            email: user.email,
            phone: user.phone,
            user_password: user.password_hash,
            current_job: user.current_job,
            user_age: user.user_age,
            is_job_poster: user.is_job_poster,
            created_at: OffsetDateTime::now_utc(),
        };
        inner.users.push(created.clone());
        Ok(created)
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self.lock().users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.lock().users.iter().find(|u| u.id == id).cloned())
    }
}

#[async_trait]
impl JobRepository for MemoryStore {
    async fn find_all(&self, name: &str) -> StoreResult<Vec<Job>> {
        let now = OffsetDateTime::now_utc();
        let needle = name.to_lowercase();
        Ok(self
            .lock()
            .jobs
            .values()
            .filter(|j| is_available(j, now) && j.job_name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Job>> {
        let now = OffsetDateTime::now_utc();
        Ok(self
            .lock()
            .jobs
            .get(&id)
            .filter(|j| is_available(j, now))
            .cloned())
    }

    async fn create(&self, job: NewJob) -> StoreResult<Job> {
        let now = OffsetDateTime::now_utc();
        let created = Job {
            id: Uuid::new_v4(),
            job_poster_id: job.poster_id,
            job_name: job.name,
            job_desc: job.description,
            quota: job.quota,
            is_open: true,
            expiry_date: job.expiry_date,
            created_at: now,
            updated_at: now,
        };
        self.insert_job(created.clone());
        Ok(created)
    }

    async fn close(&self, id: Uuid) -> StoreResult<Job> {
        self.mutate_job(id, |j| j.is_open = false)
    }

    async fn update(&self, id: Uuid, changes: JobChanges) -> StoreResult<Job> {
        self.mutate_job(id, |j| {
            if let Some(quota) = changes.quota {
                j.quota = quota;
            }
            if let Some(expiry) = changes.expiry_date {
                j.expiry_date = expiry;
            }
        })
    }
}

impl MemoryStore {
    fn mutate_job(&self, id: Uuid, f: impl FnOnce(&mut Job)) -> StoreResult<Job> {
        let mut inner = self.lock();
        let job = inner.jobs.get_mut(&id).ok_or(StoreError::NotFound)?;
        f(job);
        job.updated_at = OffsetDateTime::now_utc();
        Ok(job.clone())
    }
}

#[async_trait]
impl ApplicationRepository for MemoryStore {
    async fn find_by_job_and_user(
        &self,
        job_id: Uuid,
        user_id: Uuid,
    ) -> StoreResult<Vec<Application>> {
        Ok(self
            .lock()
            .applications
            .iter()
            .filter(|a| a.job_id == job_id && a.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn apply(&self, job_id: Uuid, user_id: Uuid) -> Result<Application, ApplyError> {
        let mut inner = self.lock();
        let duplicate = inner
            .applications
            .iter()
            .any(|a| a.job_id == job_id && a.user_id == user_id);

        let job = inner
            .jobs
            .get_mut(&job_id)
            .ok_or(ApplyError::Quota(StoreError::NotFound))?;
        if job.quota <= 0 {
            return Err(ApplyError::Quota(StoreError::QuotaExhausted));
        }
        if duplicate {
            return Err(ApplyError::Insert(StoreError::Conflict));
        }
        job.quota -= 1;

        let application = Application {
            id: Uuid::new_v4(),
            job_id,
            user_id,
            created_at: OffsetDateTime::now_utc(),
        };
        inner.applications.push(application.clone());
        Ok(application)
    }
}
