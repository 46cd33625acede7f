//! Video upload and feed integration tests

mod helpers;

use axum::http::StatusCode;
use farmlink_web::services::media::MediaKind;
use helpers::*;

#[tokio::test]
async fn upload_stores_files_and_row() {
    let t = test_app().await;
    let cookie = signup(&t.app, "farmer", "Asha", "asha@example.com").await;

    let response = upload_video(&t.app, &cookie, "Tomato harvest").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Uploaded successfully");

    let (video_path, thumbnail_path): (String, String) =
        sqlx::query_as("SELECT video_path, thumbnail_path FROM videos")
            .fetch_one(&t.state.db)
            .await
            .unwrap();
    assert!(t.state.media.path_for(MediaKind::Video, &video_path).exists());
    assert!(t
        .state
        .media
        .path_for(MediaKind::Thumbnail, &thumbnail_path)
        .exists());
}

#[tokio::test]
async fn upload_missing_thumbnail_rejected_and_nothing_stored() {
    let t = test_app().await;
    let cookie = signup(&t.app, "farmer", "Asha", "asha@example.com").await;

    let response = post_multipart(
        &t.app,
        "/farmer/upload_video",
        Some(&cookie),
        &[
            Part::Text("title", "Half an upload"),
            Part::File {
                name: "video_file",
                filename: "clip.mp4",
                bytes: b"video-bytes",
            },
        ],
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Missing file: thumbnail");

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM videos")
        .fetch_one(&t.state.db)
        .await
        .unwrap();
    assert_eq!(count, 0);
    // The video part must not be left behind either
    let stored = std::fs::read_dir(t.state.media.root().join("videos"))
        .unwrap()
        .count();
    assert_eq!(stored, 0);
}

#[tokio::test]
async fn upload_with_empty_filename_counts_as_missing() {
    let t = test_app().await;
    let cookie = signup(&t.app, "farmer", "Asha", "asha@example.com").await;

    let response = post_multipart(
        &t.app,
        "/farmer/upload_video",
        Some(&cookie),
        &[
            Part::File {
                name: "video_file",
                filename: "",
                bytes: b"video-bytes",
            },
            Part::File {
                name: "thumbnail",
                filename: "thumb.jpg",
                bytes: b"thumb-bytes",
            },
        ],
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Missing file: video_file");
}

#[tokio::test]
async fn upload_as_consumer_forbidden() {
    let t = test_app().await;
    let cookie = signup(&t.app, "user", "Ravi", "ravi@example.com").await;

    let response = upload_video(&t.app, &cookie, "Not a farmer").await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Unauthorized");
}

#[tokio::test]
async fn feeds_list_newest_first_with_engagement_state() {
    let t = test_app().await;
    let farmer = signup(&t.app, "farmer", "Asha", "asha@example.com").await;
    upload_video(&t.app, &farmer, "First").await;
    upload_video(&t.app, &farmer, "Second").await;

    let consumer = signup(&t.app, "user", "Ravi", "ravi@example.com").await;
    let response = get_with_cookie(&t.app, "/user/dashboard", &consumer).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let videos = body["videos"].as_array().unwrap();
    assert_eq!(videos.len(), 2);
    assert_eq!(videos[0]["title"], "Second");
    assert_eq!(videos[1]["title"], "First");
    assert_eq!(videos[0]["farmer_name"], "Asha");
    assert_eq!(videos[0]["like_count"], 0);
    assert_eq!(videos[0]["has_liked"], false);
    assert_eq!(videos[0]["comments"].as_array().unwrap().len(), 0);

    // Farmers see the same shared feed
    let response = get_with_cookie(&t.app, "/farmer/videos", &farmer).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["videos"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn upload_location_comes_from_village_at_upload_time() {
    let t = test_app().await;

    // The shared signup helper registers with village "Greenfield"
    let with_village = signup(&t.app, "farmer", "Asha", "asha@example.com").await;
    upload_video(&t.app, &with_village, "Village video").await;

    // A farmer without a village falls back to "Unknown"
    let response = post_multipart(
        &t.app,
        "/signup",
        None,
        &[
            Part::Text("role", "farmer"),
            Part::Text("name", "Kiran"),
            Part::Text("email", "kiran@example.com"),
            Part::Text("password", "secret123"),
            Part::Text("confirm_password", "secret123"),
        ],
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let without_village = session_cookie(&response);
    upload_video(&t.app, &without_village, "No village video").await;

    let locations: Vec<(String, String)> =
        sqlx::query_as("SELECT title, location FROM videos ORDER BY id")
            .fetch_all(&t.state.db)
            .await
            .unwrap();
    assert_eq!(
        locations,
        vec![
            ("Village video".to_string(), "Greenfield".to_string()),
            ("No village video".to_string(), "Unknown".to_string()),
        ]
    );
}
