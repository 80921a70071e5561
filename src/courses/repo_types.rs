use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Course {
    pub id: i64,
    pub course_code: String,
    pub course_name: String,
}

/// Result of linking a user to a course by code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Enrollment {
    pub course_id: i64,
    pub newly_enrolled: bool,
}
