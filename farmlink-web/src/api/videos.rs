//! Video feeds and uploads

use axum::{
    extract::{Multipart, State},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use farmlink_common::db::models::Role;
use farmlink_common::Error;

use crate::api::FormData;
use crate::error::ApiResult;
use crate::extract::CurrentUser;
use crate::services::media::MediaKind;
use crate::{db, AppState};

/// GET /farmer/videos
///
/// Every farmer sees the whole feed, not just their own uploads.
pub async fn farmer_videos(
    State(state): State<AppState>,
    current: CurrentUser,
) -> ApiResult<Response> {
    if current.user.role != Role::Farmer {
        return Ok(Redirect::to("/login").into_response());
    }

    let videos = db::videos::list_feed(&state.db, current.user.id).await?;
    Ok(Json(json!({ "videos": videos })).into_response())
}

/// GET /user/dashboard
pub async fn user_dashboard(
    State(state): State<AppState>,
    current: CurrentUser,
) -> ApiResult<Response> {
    if current.user.role != Role::User {
        return Ok(Redirect::to("/login").into_response());
    }

    let videos = db::videos::list_feed(&state.db, current.user.id).await?;
    Ok(Json(json!({ "videos": videos })).into_response())
}

/// POST /farmer/upload_video
///
/// Multipart: `video_file` and `thumbnail` are both required in the same
/// request; either missing fails the upload before anything is stored.
pub async fn upload_video(
    State(state): State<AppState>,
    current: CurrentUser,
    multipart: Multipart,
) -> ApiResult<Response> {
    if current.user.role != Role::Farmer {
        return Err(Error::Unauthorized("only farmers can upload videos".to_string()).into());
    }

    let form = FormData::read(multipart).await?;
    let (video_name, video_bytes) = form.require_file("video_file")?;
    let (thumb_name, thumb_bytes) = form.require_file("thumbnail")?;

    let video_path = state.media.save(MediaKind::Video, video_name, video_bytes)?;
    let thumbnail_path = state
        .media
        .save(MediaKind::Thumbnail, thumb_name, thumb_bytes)?;

    let video = db::videos::insert_video(
        &state.db,
        &db::videos::NewVideo {
            farmer_id: current.user.id,
            video_path,
            thumbnail_path,
            title: form.field_owned("title").unwrap_or_default(),
            description: form.field_owned("description").unwrap_or_default(),
            location: current
                .user
                .village
                .clone()
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| "Unknown".to_string()),
            expiry_date: form.field_owned("expiry_date").unwrap_or_default(),
        },
    )
    .await?;

    tracing::info!(video_id = video.id, farmer_id = current.user.id, "Video uploaded");

    Ok(Json(json!({ "status": "success", "message": "Uploaded successfully" })).into_response())
}

/// Build video routes
pub fn video_routes() -> Router<AppState> {
    Router::new()
        .route("/farmer/videos", get(farmer_videos))
        .route("/farmer/upload_video", post(upload_video))
        .route("/user/dashboard", get(user_dashboard))
}
