//! Server-side session persistence

use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use farmlink_common::db::models::User;
use farmlink_common::Result;

/// Create a session row for the user and return its token
pub async fn create_session(pool: &SqlitePool, user_id: i64) -> Result<String> {
    let token = Uuid::new_v4().to_string();

    sqlx::query("INSERT INTO sessions (token, user_id, created_at) VALUES (?, ?, ?)")
        .bind(&token)
        .bind(user_id)
        .bind(Utc::now().to_rfc3339())
        .execute(pool)
        .await?;

    Ok(token)
}

/// Resolve a session token to its user, if the session is still live
pub async fn find_user(pool: &SqlitePool, token: &str) -> Result<Option<User>> {
    let row = sqlx::query(
        r#"
        SELECT u.id, u.name, u.email, u.password_hash, u.phone, u.role,
               u.village, u.district, u.state, u.pincode, u.profile_image, u.created_at
        FROM sessions s
        JOIN users u ON u.id = s.user_id
        WHERE s.token = ?
        "#,
    )
    .bind(token)
    .fetch_optional(pool)
    .await?;

    row.map(|r| crate::db::users::map_user(&r)).transpose()
}

/// Drop a session; a no-op if the token is already gone
pub async fn delete_session(pool: &SqlitePool, token: &str) -> Result<()> {
    sqlx::query("DELETE FROM sessions WHERE token = ?")
        .bind(token)
        .execute(pool)
        .await?;

    Ok(())
}
