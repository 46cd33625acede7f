//! HTTP API handlers

pub mod accounts;
pub mod engagement;
pub mod farmer;
pub mod health;
pub mod videos;

pub use accounts::account_routes;
pub use engagement::engagement_routes;
pub use farmer::farmer_routes;
pub use health::health_routes;
pub use videos::video_routes;

use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use std::collections::HashMap;

use farmlink_common::Error;

use crate::error::{ApiError, ApiResult};

/// Collected multipart request: text fields plus uploaded files
#[derive(Debug, Default)]
pub(crate) struct FormData {
    fields: HashMap<String, String>,
    files: HashMap<String, (String, Vec<u8>)>,
}

impl FormData {
    /// Drain a multipart stream. A part with an empty filename or empty
    /// body (a file input left blank in the form) is treated as absent.
    pub(crate) async fn read(mut multipart: Multipart) -> ApiResult<Self> {
        let mut data = FormData::default();

        while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            match field.file_name().map(str::to_string) {
                Some(file_name) if !file_name.is_empty() => {
                    let bytes = field.bytes().await.map_err(bad_multipart)?;
                    if !bytes.is_empty() {
                        data.files.insert(name, (file_name, bytes.to_vec()));
                    }
                }
                _ => {
                    let value = field.text().await.map_err(bad_multipart)?;
                    data.fields.insert(name, value);
                }
            }
        }

        Ok(data)
    }

    pub(crate) fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub(crate) fn field_owned(&self, name: &str) -> Option<String> {
        self.field(name)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    }

    pub(crate) fn require_field(&self, name: &str) -> ApiResult<String> {
        self.field_owned(name)
            .ok_or_else(|| ApiError::BadRequest(format!("Missing field: {}", name)))
    }

    pub(crate) fn file(&self, name: &str) -> Option<&(String, Vec<u8>)> {
        self.files.get(name)
    }

    /// Uploaded file the endpoint cannot work without
    pub(crate) fn require_file(&self, name: &str) -> ApiResult<&(String, Vec<u8>)> {
        self.files
            .get(name)
            .ok_or_else(|| ApiError::Common(Error::MissingFile(name.to_string())))
    }
}

fn bad_multipart(err: MultipartError) -> ApiError {
    ApiError::BadRequest(format!("Malformed multipart request: {}", err))
}
