//! Video engagement: likes, comments, deletion

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use farmlink_common::Error;

use crate::error::ApiResult;
use crate::extract::CurrentUser;
use crate::services::media::MediaKind;
use crate::{db, AppState};

/// GET|POST /video/like/:video_id
///
/// Toggle, not a set operation: two calls return the like to its original
/// state. POST answers JSON for fetch callers; GET navigates back.
pub async fn like_video(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(video_id): Path<i64>,
    method: Method,
    headers: HeaderMap,
) -> ApiResult<Response> {
    if db::videos::find_by_id(&state.db, video_id).await?.is_none() {
        return Err(Error::NotFound(format!("Video {} not found", video_id)).into());
    }

    let liked = db::videos::toggle_like(&state.db, current.user.id, video_id).await?;
    tracing::debug!(user_id = current.user.id, video_id, liked, "Like toggled");

    if method == Method::POST {
        let likes = db::videos::like_count(&state.db, video_id).await?;
        return Ok(Json(json!({ "status": "success", "liked": liked, "likes": likes })).into_response());
    }

    Ok(Redirect::to(referrer(&headers, "/")).into_response())
}

#[derive(Debug, Deserialize)]
pub struct CommentForm {
    #[serde(default)]
    pub comment: Option<String>,
}

/// POST /video/comment/:video_id
///
/// Empty or absent text is a silent no-op; either way the caller is sent
/// back where it came from.
pub async fn comment_video(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(video_id): Path<i64>,
    headers: HeaderMap,
    Form(form): Form<CommentForm>,
) -> ApiResult<Response> {
    if let Some(text) = form.comment.as_deref().filter(|t| !t.trim().is_empty()) {
        if db::videos::find_by_id(&state.db, video_id).await?.is_none() {
            return Err(Error::NotFound(format!("Video {} not found", video_id)).into());
        }

        db::videos::add_comment(&state.db, current.user.id, video_id, text, &current.user.name)
            .await?;
        tracing::debug!(user_id = current.user.id, video_id, "Comment added");
    }

    Ok(Redirect::to(referrer(&headers, "/")).into_response())
}

/// POST /delete_video/:video_id
///
/// Owner-only. Backing files are removed best-effort first; the row cascade
/// (comments, likes, video) is transactional, and a store error rolls it
/// back and reports a 500.
pub async fn delete_video(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(video_id): Path<i64>,
) -> ApiResult<Response> {
    let video = db::videos::find_by_id(&state.db, video_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Video {} not found", video_id)))?;

    if video.farmer_id != current.user.id {
        return Ok((
            StatusCode::FORBIDDEN,
            Json(json!({ "status": "error", "message": "Unauthorized" })),
        )
            .into_response());
    }

    state.media.remove(MediaKind::Video, &video.video_path);
    state.media.remove(MediaKind::Thumbnail, &video.thumbnail_path);

    if let Err(e) = db::videos::delete_video_records(&state.db, video_id).await {
        tracing::error!(video_id, error = %e, "Video deletion failed");
        return Err(Error::DeletionFailed(e.to_string()).into());
    }

    tracing::info!(video_id, farmer_id = current.user.id, "Video deleted");

    Ok(Json(json!({ "status": "success" })).into_response())
}

fn referrer<'a>(headers: &'a HeaderMap, fallback: &'a str) -> &'a str {
    headers
        .get(header::REFERER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .unwrap_or(fallback)
}

/// Build engagement routes
pub fn engagement_routes() -> Router<AppState> {
    Router::new()
        .route("/video/like/:video_id", get(like_video).post(like_video))
        .route("/video/comment/:video_id", post(comment_video))
        .route("/delete_video/:video_id", post(delete_video))
}
