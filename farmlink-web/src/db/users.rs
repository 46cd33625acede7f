//! User account persistence

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use farmlink_common::db::models::{Role, User};
use farmlink_common::{Error, Result};

/// Fields for a new account
#[derive(Debug)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: Option<String>,
    pub role: Role,
    pub village: Option<String>,
    pub district: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    pub profile_image: Option<String>,
}

/// Insert a new account. Fails with `DuplicateEmail` when the address is
/// already taken, whether detected here or by the unique column.
pub async fn create_user(pool: &SqlitePool, new_user: &NewUser) -> Result<User> {
    let result = sqlx::query(
        r#"
        INSERT INTO users (
            name, email, password_hash, phone, role,
            village, district, state, pincode, profile_image, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&new_user.name)
    .bind(&new_user.email)
    .bind(&new_user.password_hash)
    .bind(&new_user.phone)
    .bind(new_user.role.as_str())
    .bind(&new_user.village)
    .bind(&new_user.district)
    .bind(&new_user.state)
    .bind(&new_user.pincode)
    .bind(&new_user.profile_image)
    .bind(Utc::now().to_rfc3339())
    .execute(pool)
    .await;

    let result = match result {
        Ok(r) => r,
        Err(sqlx::Error::Database(db_err)) if db_err.message().contains("users.email") => {
            return Err(Error::DuplicateEmail);
        }
        Err(e) => return Err(e.into()),
    };

    let id = result.last_insert_rowid();
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| Error::Internal(format!("User {} vanished after insert", id)))
}

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>> {
    let row = sqlx::query(
        "SELECT id, name, email, password_hash, phone, role, village, district, state, \
         pincode, profile_image, created_at FROM users WHERE email = ?",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    row.map(|r| map_user(&r)).transpose()
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<User>> {
    let row = sqlx::query(
        "SELECT id, name, email, password_hash, phone, role, village, district, state, \
         pincode, profile_image, created_at FROM users WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.map(|r| map_user(&r)).transpose()
}

pub(crate) fn map_user(row: &SqliteRow) -> Result<User> {
    let role_raw: String = row.get("role");
    let role = Role::parse(&role_raw)
        .ok_or_else(|| Error::Internal(format!("Unknown role in database: {}", role_raw)))?;

    Ok(User {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        phone: row.get("phone"),
        role,
        village: row.get("village"),
        district: row.get("district"),
        state: row.get("state"),
        pincode: row.get("pincode"),
        profile_image: row.get("profile_image"),
        created_at: parse_timestamp(row, "created_at")?,
    })
}

/// RFC 3339 timestamp column
pub(crate) fn parse_timestamp(row: &SqliteRow, column: &str) -> Result<chrono::DateTime<chrono::Utc>> {
    let raw: String = row.get(column);
    chrono::DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&chrono::Utc))
        .map_err(|e| Error::Internal(format!("Failed to parse {}: {}", column, e)))
}
