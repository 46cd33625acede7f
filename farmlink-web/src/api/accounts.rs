//! Account handlers: signup, login, logout

use axum::{
    extract::{Multipart, State},
    http::header,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Form, Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use farmlink_common::db::models::{Role, User};
use farmlink_common::{auth, Error};

use crate::api::FormData;
use crate::error::{ApiError, ApiResult};
use crate::extract::{CurrentUser, SESSION_COOKIE};
use crate::services::media::MediaKind;
use crate::{db, AppState};

/// GET /signup
///
/// HTML rendering lives elsewhere; this answers with the form contract.
pub async fn signup_page() -> Json<serde_json::Value> {
    Json(json!({
        "page": "signup",
        "method": "POST",
        "fields": [
            "role", "name", "email", "phone", "password", "confirm_password",
            "village", "district", "state", "pincode", "profile_image",
        ],
        "roles": ["farmer", "user"],
    }))
}

/// GET /login
pub async fn login_page() -> Json<serde_json::Value> {
    Json(json!({
        "page": "login",
        "method": "POST",
        "fields": ["email", "password"],
    }))
}

/// POST /signup
///
/// Multipart form with an optional profile image. On success the account is
/// logged in immediately and sent to its role dashboard.
pub async fn signup(State(state): State<AppState>, multipart: Multipart) -> ApiResult<Response> {
    let form = FormData::read(multipart).await?;

    let role = form
        .field("role")
        .and_then(Role::parse)
        .ok_or_else(|| ApiError::BadRequest("Unknown role".to_string()))?;
    let name = form.require_field("name")?;
    let email = form.require_field("email")?;
    let password = form.require_field("password")?;
    let confirm_password = form.require_field("confirm_password")?;

    if password != confirm_password {
        return Err(ApiError::BadRequest("Passwords do not match".to_string()));
    }

    if db::users::find_by_email(&state.db, &email).await?.is_some() {
        return Err(Error::DuplicateEmail.into());
    }

    let profile_image = match form.file("profile_image") {
        Some((file_name, bytes)) => Some(state.media.save(MediaKind::Profile, file_name, bytes)?),
        None => None,
    };

    let password_hash = auth::hash_password(&password)?;
    let user = db::users::create_user(
        &state.db,
        &db::users::NewUser {
            name,
            email,
            password_hash,
            phone: form.field_owned("phone"),
            role,
            village: form.field_owned("village"),
            district: form.field_owned("district"),
            state: form.field_owned("state"),
            pincode: form.field_owned("pincode"),
            profile_image,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, role = %user.role, "Account created");

    start_session(&state, &user).await
}

/// POST /login form
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// POST /login
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> ApiResult<Response> {
    let user = db::users::find_by_email(&state.db, &form.email)
        .await?
        .filter(|u| auth::verify_password(&form.password, &u.password_hash))
        .ok_or(Error::InvalidCredentials)?;

    tracing::info!(user_id = user.id, "Login succeeded");

    start_session(&state, &user).await
}

/// GET /logout
pub async fn logout(State(state): State<AppState>, current: CurrentUser) -> ApiResult<Response> {
    db::sessions::delete_session(&state.db, &current.session_token).await?;

    tracing::info!(user_id = current.user.id, "Logged out");

    let cookie = format!("{}=; Path=/; Max-Age=0", SESSION_COOKIE);
    Ok(([(header::SET_COOKIE, cookie)], Redirect::to("/login")).into_response())
}

/// Issue a session cookie and land the user on their role dashboard
async fn start_session(state: &AppState, user: &User) -> ApiResult<Response> {
    let token = db::sessions::create_session(&state.db, user.id).await?;
    let cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax",
        SESSION_COOKIE,
        auth::encode_session_cookie(&token, &state.config.secret_key)
    );

    Ok((
        [(header::SET_COOKIE, cookie)],
        Redirect::to(user.role.dashboard_path()),
    )
        .into_response())
}

/// Build account routes
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { Redirect::to("/login") }))
        .route("/signup", get(signup_page).post(signup))
        .route("/login", get(login_page).post(login))
        .route("/logout", get(logout))
}
