//! Persistence seam for the service.
//!
//! Every method runs as one short transaction: it either commits all of its
//! writes or none of them. Uniqueness is decided by the backing store, so a
//! concurrent writer racing past an existence check still surfaces as the
//! matching `StoreError` variant.

use async_trait::async_trait;
use thiserror::Error;
use time::{Date, Time};

use crate::{
    attendance::repo_types::AttendanceRecord,
    auth::repo_types::{NewUser, User},
    courses::repo_types::{Course, Enrollment},
};

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("username or email already exists")]
    DuplicateUser,

    #[error("attendance already marked for user {user_id} in course {course_id} on {date}")]
    AttendanceExists {
        user_id: i64,
        course_id: i64,
        date: Date,
    },

    #[error("user {0} does not exist")]
    UnknownUser(i64),

    #[error("course {0} does not exist")]
    UnknownCourse(i64),

    #[error("{0}")]
    Inconsistent(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait Store: Send + Sync {
    /// Insert a user unless the username or email is taken. Returns the new id.
    async fn create_user(&self, user: NewUser) -> Result<i64, StoreError>;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// Resolve `course_code` to a course (creating it on first use) and link
    /// `user_id` to it. Enrolling twice is not an error.
    async fn enroll_by_code(
        &self,
        user_id: i64,
        course_code: &str,
        course_name: &str,
    ) -> Result<Enrollment, StoreError>;

    async fn courses_for_user(&self, user_id: i64) -> Result<Vec<Course>, StoreError>;

    /// Record a check-in; at most one per user, course and date.
    async fn mark_attendance(
        &self,
        user_id: i64,
        course_id: i64,
        date: Date,
        time: Time,
    ) -> Result<AttendanceRecord, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}
