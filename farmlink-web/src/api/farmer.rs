//! Farmer dashboard: produce analysis and product listing

use axum::{
    extract::{Multipart, Query, State},
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use farmlink_common::db::models::Role;
use farmlink_common::Error;

use crate::api::FormData;
use crate::error::ApiResult;
use crate::extract::CurrentUser;
use crate::services::annotation::{self, CropDetails};
use crate::services::media::MediaKind;
use crate::{db, AppState};

/// GET /farmer/dashboard
pub async fn dashboard(current: CurrentUser) -> ApiResult<Response> {
    if current.user.role != Role::Farmer {
        return Ok(Redirect::to("/login").into_response());
    }

    let languages: Vec<_> = annotation::LANGUAGES
        .iter()
        .map(|(code, name)| json!({ "code": code, "name": name }))
        .collect();

    Ok(Json(json!({
        "user": current.user,
        "languages": languages,
    }))
    .into_response())
}

/// POST /farmer/dashboard
///
/// Multipart: produce image plus category/name/pick_time/temp/language.
/// The product row is only written after the model reply parses cleanly;
/// a failed analysis persists nothing.
pub async fn analyze(
    State(state): State<AppState>,
    current: CurrentUser,
    multipart: Multipart,
) -> ApiResult<Response> {
    if current.user.role != Role::Farmer {
        return Ok(Redirect::to("/login").into_response());
    }

    let form = FormData::read(multipart).await?;
    let (file_name, image) = form.require_file("image")?;

    let client = state
        .annotation
        .as_ref()
        .ok_or_else(|| Error::AnalysisFailed("Gemini API key not configured".to_string()))?;

    let details = CropDetails {
        name: form.field_owned("name").unwrap_or_default(),
        category: form.field_owned("category").unwrap_or_default(),
        pick_time: form.field_owned("pick_time").unwrap_or_default(),
        temperature: form.field_owned("temp").unwrap_or_default(),
        language: annotation::language_name(form.field("language").unwrap_or("en")),
    };

    let stored_image = state.media.save(MediaKind::ProductImage, file_name, image)?;

    let verdict = match client.analyze(image, &details).await {
        Ok(verdict) => verdict,
        Err(e) => {
            tracing::warn!(error = %e, crop = %details.name, "Produce analysis failed");
            state.media.remove(MediaKind::ProductImage, &stored_image);
            return Err(Error::AnalysisFailed(e.to_string()).into());
        }
    };

    let product = db::products::insert_product(
        &state.db,
        &db::products::NewProduct {
            farmer_id: current.user.id,
            image_path: stored_image,
            category: details.category,
            name: details.name,
            pick_time: details.pick_time,
            temperature: details.temperature,
            expiry_prediction: verdict.expiry,
            description: verdict.desc,
            tips: verdict.tips,
        },
    )
    .await?;

    tracing::info!(
        product_id = product.id,
        farmer_id = current.user.id,
        expiry = %product.expiry_prediction,
        "Product analyzed and recorded"
    );

    Ok(Json(json!({ "status": "success", "product": product })).into_response())
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
}

/// GET /farmer/list?search=
pub async fn product_list(
    State(state): State<AppState>,
    current: CurrentUser,
    Query(query): Query<ListQuery>,
) -> ApiResult<Response> {
    if current.user.role != Role::Farmer {
        return Ok(Redirect::to("/login").into_response());
    }

    let products =
        db::products::list_for_farmer(&state.db, current.user.id, query.search.as_deref()).await?;

    Ok(Json(json!({ "products": products })).into_response())
}

/// Build farmer routes
pub fn farmer_routes() -> Router<AppState> {
    Router::new()
        .route("/farmer/dashboard", get(dashboard).post(analyze))
        .route("/farmer/list", get(product_list))
}
