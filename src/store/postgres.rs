use anyhow::Context;
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use time::{Date, Time};
use tracing::{debug, warn};

use super::{is_unique_violation, Store, StoreError};
use crate::{
    attendance::{self, repo_types::AttendanceRecord},
    auth::{self, repo_types::{NewUser, User}},
    config::DatabaseConfig,
    courses::{self, repo_types::{Course, Enrollment}},
};

/// `Store` backed by PostgreSQL.
///
/// Each call checks a connection out of the pool and opens a transaction on
/// it. Returning early drops the transaction, which rolls it back and hands
/// the connection back to the pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(cfg: &DatabaseConfig) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(cfg.max_connections)
            .connect(&cfg.url)
            .await
            .context("connect to database")?;
        Ok(Self::from_pool(pool))
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("run migrations")?;
        Ok(())
    }
}

#[async_trait]
impl Store for PgStore {
    async fn create_user(&self, user: NewUser) -> Result<i64, StoreError> {
        let mut tx = self.pool.begin().await?;

        if let Some(existing) =
            auth::repo::find_conflicting_id(&mut tx, &user.username, &user.email).await?
        {
            debug!(existing, "username or email taken");
            return Err(StoreError::DuplicateUser);
        }

        let id = match auth::repo::insert_user(&mut tx, &user).await {
            Ok(id) => id,
            Err(e) if is_unique_violation(&e) => {
                warn!("user insert lost a uniqueness race");
                return Err(StoreError::DuplicateUser);
            }
            Err(e) => return Err(e.into()),
        };

        tx.commit().await?;
        Ok(id)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        Ok(auth::repo::find_by_username(&mut conn, username).await?)
    }

    async fn enroll_by_code(
        &self,
        user_id: i64,
        course_code: &str,
        course_name: &str,
    ) -> Result<Enrollment, StoreError> {
        let mut tx = self.pool.begin().await?;

        let course_id = courses::repo::upsert_course_by_code(&mut tx, course_code, course_name).await?;
        let newly_enrolled = courses::repo::insert_enrollment(&mut tx, user_id, course_id).await?;

        tx.commit().await?;
        Ok(Enrollment {
            course_id,
            newly_enrolled,
        })
    }

    async fn courses_for_user(&self, user_id: i64) -> Result<Vec<Course>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        Ok(courses::repo::list_for_user(&mut conn, user_id).await?)
    }

    async fn mark_attendance(
        &self,
        user_id: i64,
        course_id: i64,
        date: Date,
        time: Time,
    ) -> Result<AttendanceRecord, StoreError> {
        let exists = || StoreError::AttendanceExists {
            user_id,
            course_id,
            date,
        };
        let mut tx = self.pool.begin().await?;

        if attendance::repo::find_for_day(&mut tx, user_id, course_id, date)
            .await?
            .is_some()
        {
            return Err(exists());
        }

        let record = attendance::repo::insert_record(&mut tx, user_id, course_id, date, time)
            .await?
            .ok_or_else(exists)?;

        tx.commit().await?;
        Ok(record)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
