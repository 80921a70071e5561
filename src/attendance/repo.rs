use sqlx::PgConnection;
use time::{Date, Time};

use crate::attendance::repo_types::AttendanceRecord;

pub async fn find_for_day(
    conn: &mut PgConnection,
    user_id: i64,
    course_id: i64,
    date: Date,
) -> Result<Option<i64>, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        r#"
        SELECT id
          FROM attendance
         WHERE user_id = $1 AND course_id = $2 AND attendance_date = $3
        "#,
    )
    .bind(user_id)
    .bind(course_id)
    .bind(date)
    .fetch_optional(conn)
    .await
}

/// Insert a check-in; `None` when the row for that day already exists.
pub async fn insert_record(
    conn: &mut PgConnection,
    user_id: i64,
    course_id: i64,
    date: Date,
    time: Time,
) -> Result<Option<AttendanceRecord>, sqlx::Error> {
    sqlx::query_as::<_, AttendanceRecord>(
        r#"
        INSERT INTO attendance (user_id, course_id, attendance_date, check_in_time)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (user_id, course_id, attendance_date) DO NOTHING
        RETURNING id, user_id, course_id, attendance_date, check_in_time
        "#,
    )
    .bind(user_id)
    .bind(course_id)
    .bind(date)
    .bind(time)
    .fetch_optional(conn)
    .await
}
