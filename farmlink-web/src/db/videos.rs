//! Video persistence and engagement (likes, comments, cascading delete)

use chrono::Utc;
use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use farmlink_common::db::models::{Comment, Video};
use farmlink_common::{Error, Result};

/// Fields for a new video record
#[derive(Debug)]
pub struct NewVideo {
    pub farmer_id: i64,
    pub video_path: String,
    pub thumbnail_path: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub expiry_date: String,
}

/// Feed entry: a video plus engagement state computed for the viewing user
/// at query time
#[derive(Debug, Clone, Serialize)]
pub struct FeedEntry {
    #[serde(flatten)]
    pub video: Video,
    pub farmer_name: String,
    pub like_count: i64,
    pub has_liked: bool,
    pub comments: Vec<Comment>,
}

pub async fn insert_video(pool: &SqlitePool, new_video: &NewVideo) -> Result<Video> {
    let result = sqlx::query(
        r#"
        INSERT INTO videos (
            farmer_id, video_path, thumbnail_path, title, description,
            location, expiry_date, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(new_video.farmer_id)
    .bind(&new_video.video_path)
    .bind(&new_video.thumbnail_path)
    .bind(&new_video.title)
    .bind(&new_video.description)
    .bind(&new_video.location)
    .bind(&new_video.expiry_date)
    .bind(Utc::now().to_rfc3339())
    .execute(pool)
    .await?;

    let id = result.last_insert_rowid();
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| Error::Internal(format!("Video {} vanished after insert", id)))
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Video>> {
    let row = sqlx::query(
        "SELECT id, farmer_id, video_path, thumbnail_path, title, description, location, \
         expiry_date, created_at FROM videos WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.map(|r| map_video(&r)).transpose()
}

/// All videos, newest first, with engagement state for `viewer_id`
pub async fn list_feed(pool: &SqlitePool, viewer_id: i64) -> Result<Vec<FeedEntry>> {
    let rows = sqlx::query(
        r#"
        SELECT v.id, v.farmer_id, v.video_path, v.thumbnail_path, v.title, v.description,
               v.location, v.expiry_date, v.created_at,
               COALESCE(u.name, 'Unknown Farmer') AS farmer_name,
               (SELECT COUNT(*) FROM likes l WHERE l.video_id = v.id) AS like_count,
               EXISTS(SELECT 1 FROM likes l WHERE l.video_id = v.id AND l.user_id = ?) AS has_liked
        FROM videos v
        LEFT JOIN users u ON u.id = v.farmer_id
        ORDER BY v.id DESC
        "#,
    )
    .bind(viewer_id)
    .fetch_all(pool)
    .await?;

    let mut feed = Vec::with_capacity(rows.len());
    for row in rows {
        let video = map_video(&row)?;
        let comments = comments_for_video(pool, video.id).await?;
        feed.push(FeedEntry {
            farmer_name: row.get("farmer_name"),
            like_count: row.get("like_count"),
            has_liked: row.get::<i64, _>("has_liked") != 0,
            video,
            comments,
        });
    }

    Ok(feed)
}

/// Toggle the (user, video) like; returns true when the like now exists.
/// The unique index on (user_id, video_id) keeps concurrent toggles from
/// double-inserting.
pub async fn toggle_like(pool: &SqlitePool, user_id: i64, video_id: i64) -> Result<bool> {
    let deleted = sqlx::query("DELETE FROM likes WHERE user_id = ? AND video_id = ?")
        .bind(user_id)
        .bind(video_id)
        .execute(pool)
        .await?;

    if deleted.rows_affected() > 0 {
        return Ok(false);
    }

    sqlx::query("INSERT OR IGNORE INTO likes (user_id, video_id) VALUES (?, ?)")
        .bind(user_id)
        .bind(video_id)
        .execute(pool)
        .await?;

    Ok(true)
}

pub async fn like_count(pool: &SqlitePool, video_id: i64) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM likes WHERE video_id = ?")
        .bind(video_id)
        .fetch_one(pool)
        .await?;

    Ok(count)
}

/// Append a comment with the commenter's display name captured now.
/// Empty or whitespace-only text is a no-op.
pub async fn add_comment(
    pool: &SqlitePool,
    user_id: i64,
    video_id: i64,
    text: &str,
    user_name: &str,
) -> Result<()> {
    if text.trim().is_empty() {
        return Ok(());
    }

    sqlx::query(
        "INSERT INTO comments (user_id, video_id, text, user_name, created_at) \
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(user_id)
    .bind(video_id)
    .bind(text)
    .bind(user_name)
    .bind(Utc::now().to_rfc3339())
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn comments_for_video(pool: &SqlitePool, video_id: i64) -> Result<Vec<Comment>> {
    let rows = sqlx::query(
        "SELECT id, user_id, video_id, text, user_name, created_at FROM comments \
         WHERE video_id = ? ORDER BY id",
    )
    .bind(video_id)
    .fetch_all(pool)
    .await?;

    rows.iter().map(map_comment).collect()
}

/// Delete the video row plus its comments and likes in one transaction.
/// Backing-file cleanup happens at the call site before this runs; an error
/// here rolls back every row deletion.
pub async fn delete_video_records(pool: &SqlitePool, video_id: i64) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM comments WHERE video_id = ?")
        .bind(video_id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM likes WHERE video_id = ?")
        .bind(video_id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM videos WHERE id = ?")
        .bind(video_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(())
}

fn map_video(row: &SqliteRow) -> Result<Video> {
    Ok(Video {
        id: row.get("id"),
        farmer_id: row.get("farmer_id"),
        video_path: row.get("video_path"),
        thumbnail_path: row.get("thumbnail_path"),
        title: row.get("title"),
        description: row.get("description"),
        location: row.get("location"),
        expiry_date: row.get("expiry_date"),
        created_at: crate::db::users::parse_timestamp(row, "created_at")?,
    })
}

fn map_comment(row: &SqliteRow) -> Result<Comment> {
    Ok(Comment {
        id: row.get("id"),
        user_id: row.get("user_id"),
        video_id: row.get("video_id"),
        text: row.get("text"),
        user_name: row.get("user_name"),
        created_at: crate::db::users::parse_timestamp(row, "created_at")?,
    })
}
