use sqlx::PgConnection;

use crate::auth::repo_types::{NewUser, User};

/// Id of any user holding this username or this email.
pub async fn find_conflicting_id(
    conn: &mut PgConnection,
    username: &str,
    email: &str,
) -> Result<Option<i64>, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        r#"
        SELECT id
          FROM users
         WHERE username = $1 OR email = $2
         LIMIT 1
        "#,
    )
    .bind(username)
    .bind(email)
    .fetch_optional(conn)
    .await
}

pub async fn insert_user(conn: &mut PgConnection, user: &NewUser) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO users (username, email, password)
        VALUES ($1, $2, $3)
        RETURNING id
        "#,
    )
    .bind(&user.username)
    .bind(&user.email)
    .bind(&user.password_hash)
    .fetch_one(conn)
    .await
}

pub async fn find_by_username(
    conn: &mut PgConnection,
    username: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, email, password, created_at
          FROM users
         WHERE username = $1
        "#,
    )
    .bind(username)
    .fetch_optional(conn)
    .await
}
