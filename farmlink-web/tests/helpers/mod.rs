//! Shared test plumbing: in-memory database, tempdir media root, request
//! builders for multipart and form bodies.
#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

use farmlink_common::config::AppConfig;
use farmlink_web::services::media::MediaStore;
use farmlink_web::AppState;

const MULTIPART_BOUNDARY: &str = "farmlink-test-boundary";

pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    _root: tempfile::TempDir,
}

pub async fn test_app() -> TestApp {
    let root = tempfile::tempdir().unwrap();
    let config = AppConfig {
        bind_address: "127.0.0.1:0".to_string(),
        root_folder: root.path().to_path_buf(),
        secret_key: "test-secret".to_string(),
        gemini_api_key: None,
        max_upload_bytes: 10 * 1024 * 1024,
    };

    let media = MediaStore::new(config.media_root());
    media.ensure_directories().unwrap();

    // A single connection so every request sees the same in-memory database
    let db = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(":memory:")
        .await
        .unwrap();
    farmlink_common::db::init_tables(&db).await.unwrap();

    let state = AppState::new(db, config, media, None);
    TestApp {
        app: farmlink_web::build_router(state.clone()),
        state,
        _root: root,
    }
}

pub enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        name: &'a str,
        filename: &'a str,
        bytes: &'a [u8],
    },
}

/// Hand-rolled multipart body; returns (content-type, body)
pub fn multipart_body(parts: &[Part]) -> (String, Vec<u8>) {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", MULTIPART_BOUNDARY).as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                name,
                filename,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n",
                        name, filename
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", MULTIPART_BOUNDARY).as_bytes());

    (
        format!("multipart/form-data; boundary={}", MULTIPART_BOUNDARY),
        body,
    )
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

pub async fn get_with_cookie(app: &Router, uri: &str, cookie: &str) -> Response<Body> {
    send(
        app,
        Request::builder()
            .uri(uri)
            .header(header::COOKIE, cookie)
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

pub async fn post_multipart(
    app: &Router,
    uri: &str,
    cookie: Option<&str>,
    parts: &[Part<'_>],
) -> Response<Body> {
    let (content_type, body) = multipart_body(parts);
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, content_type);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    send(app, builder.body(Body::from(body)).unwrap()).await
}

pub async fn post_form(
    app: &Router,
    uri: &str,
    cookie: Option<&str>,
    form: &str,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    send(app, builder.body(Body::from(form.to_string())).unwrap()).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn session_cookie(response: &Response<Body>) -> String {
    response
        .headers()
        .get(header::SET_COOKIE)
        .expect("response should set a session cookie")
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

pub async fn signup_response(app: &Router, role: &str, name: &str, email: &str) -> Response<Body> {
    post_multipart(
        app,
        "/signup",
        None,
        &[
            Part::Text("role", role),
            Part::Text("name", name),
            Part::Text("email", email),
            Part::Text("password", "secret123"),
            Part::Text("confirm_password", "secret123"),
            Part::Text("village", "Greenfield"),
        ],
    )
    .await
}

/// Sign up and return the session cookie
pub async fn signup(app: &Router, role: &str, name: &str, email: &str) -> String {
    let response = signup_response(app, role, name, email).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    session_cookie(&response)
}

/// Upload a small video + thumbnail pair as the given farmer
pub async fn upload_video(app: &Router, cookie: &str, title: &str) -> Response<Body> {
    post_multipart(
        app,
        "/farmer/upload_video",
        Some(cookie),
        &[
            Part::Text("title", title),
            Part::Text("description", "fresh from the field"),
            Part::Text("expiry_date", "2026-09-01"),
            Part::File {
                name: "video_file",
                filename: "clip.mp4",
                bytes: b"video-bytes",
            },
            Part::File {
                name: "thumbnail",
                filename: "thumb.jpg",
                bytes: b"thumb-bytes",
            },
        ],
    )
    .await
}
