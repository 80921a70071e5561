use sqlx::PgConnection;

use crate::{courses::repo_types::Course, store::StoreError};

/// Insert the course, or return the id of the one already holding `code`.
///
/// `ON CONFLICT DO NOTHING` keeps the surrounding transaction usable when the
/// code exists, so the follow-up lookup runs in the same transaction.
pub async fn upsert_course_by_code(
    conn: &mut PgConnection,
    code: &str,
    name: &str,
) -> Result<i64, StoreError> {
    let inserted = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO courses (course_code, course_name)
        VALUES ($1, $2)
        ON CONFLICT (course_code) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(code)
    .bind(name)
    .fetch_optional(&mut *conn)
    .await?;

    if let Some(id) = inserted {
        return Ok(id);
    }

    sqlx::query_scalar::<_, i64>("SELECT id FROM courses WHERE course_code = $1")
        .bind(code)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| {
            StoreError::Inconsistent(format!(
                "course_code '{code}' conflicted on insert but no existing course was found"
            ))
        })
}

/// Link a user to a course. Returns `false` when the link already existed.
pub async fn insert_enrollment(
    conn: &mut PgConnection,
    user_id: i64,
    course_id: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO user_courses (user_id, course_id)
        VALUES ($1, $2)
        ON CONFLICT (user_id, course_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(course_id)
    .execute(conn)
    .await?;
    Ok(result.rows_affected() == 1)
}

pub async fn list_for_user(conn: &mut PgConnection, user_id: i64) -> Result<Vec<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(
        r#"
        SELECT c.id, c.course_code, c.course_name
          FROM courses c
          JOIN user_courses uc ON c.id = uc.course_id
         WHERE uc.user_id = $1
         ORDER BY c.id
        "#,
    )
    .bind(user_id)
    .fetch_all(conn)
    .await
}
