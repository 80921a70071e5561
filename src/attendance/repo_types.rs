use sqlx::FromRow;
use time::{Date, Time};

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct AttendanceRecord {
    pub id: i64,
    pub user_id: i64,
    pub course_id: i64,
    pub attendance_date: Date,
    pub check_in_time: Time,
}
