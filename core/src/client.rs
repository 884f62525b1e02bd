//! Stateless HTTP request builder and response parser for the backend.
//!
//! # Design
//! `PetClient` holds only a `base_url` and carries no mutable state between
//! calls. Each endpoint is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! The caller executes the round-trip, keeping this layer deterministic and
//! free of I/O.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::multipart;
use crate::types::{AnalysisResult, DogRecord, MatchResult};

pub const UPLOAD_FIELD: &str = "file";
pub const UPLOAD_CONTENT_TYPE: &str = "image/jpeg";
pub const ANALYZE_FILENAME: &str = "dog_photo.jpg";
pub const MATCH_FILENAME: &str = "nose_photo.jpg";

/// Synchronous, stateless client for the pet-identification API.
#[derive(Debug, Clone)]
pub struct PetClient {
    base_url: String,
}

impl PetClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_analyze(&self, image: &[u8]) -> HttpRequest {
        self.upload("analyze", ANALYZE_FILENAME, image)
    }

    pub fn build_match(&self, image: &[u8]) -> HttpRequest {
        self.upload("match", MATCH_FILENAME, image)
    }

    pub fn build_list_dogs(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/admin/list", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_delete_dog(&self, uid: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            path: format!("{}/admin/delete/{}", self.base_url, urlencoding::encode(uid)),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Reachability probe. The backend has no health endpoint, so this hits
    /// the listing.
    pub fn build_ping(&self) -> HttpRequest {
        self.build_list_dogs()
    }

    pub fn parse_analyze(&self, response: HttpResponse) -> Result<AnalysisResult, ApiError> {
        parse_json(response)
    }

    pub fn parse_match(&self, response: HttpResponse) -> Result<MatchResult, ApiError> {
        parse_json(response)
    }

    pub fn parse_list_dogs(&self, response: HttpResponse) -> Result<Vec<DogRecord>, ApiError> {
        parse_json(response)
    }

    /// Any 2xx counts, whatever the body says.
    pub fn parse_delete_dog(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    pub fn parse_ping(&self, response: HttpResponse) -> bool {
        response.is_success()
    }

    fn upload(&self, endpoint: &str, filename: &str, image: &[u8]) -> HttpRequest {
        let form = multipart::encode_file_part(UPLOAD_FIELD, filename, UPLOAD_CONTENT_TYPE, image);
        HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}/{endpoint}", self.base_url),
            headers: vec![("content-type".to_string(), form.content_type)],
            body: Some(form.body),
        }
    }
}

/// Status check, then JSON decode. A 2xx body carrying an `error` string is
/// still a server failure: the analyze endpoint rejects images that way.
fn parse_json<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response)?;
    let value: Value = serde_json::from_str(&response.body).map_err(|e| ApiError::Parse(e.to_string()))?;
    if let Some(message) = value.get("error").and_then(Value::as_str) {
        return Err(ApiError::Server {
            status: response.status,
            message: message.to_string(),
        });
    }
    serde_json::from_value(value).map_err(|e| ApiError::Parse(e.to_string()))
}

fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::Server {
        status: response.status,
        message: error_message(response),
    })
}

/// Prefer the backend's own `error` / `detail` text over the raw body.
fn error_message(response: &HttpResponse) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(&response.body) {
        for key in ["error", "detail"] {
            if let Some(Value::String(message)) = map.get(key) {
                return message.clone();
            }
        }
    }
    if response.body.trim().is_empty() {
        format!("HTTP {}", response.status)
    } else {
        response.body.clone()
    }
}
