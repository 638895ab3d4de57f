//! API client module for the PhotoMind backend.

mod model;

pub use model::{
    normalize_confidence, normalize_epoch_date, parse_epoch_seconds, HealthStatus, Photo, Tab,
    Tag, TagHit,
};

use futures::future::try_join_all;
use model::{CreateTabRequest, CreateTabResponse, DeepSearchEnvelope, ErrorBody, ListTabsResponse};
use reqwest::multipart::{Form, Part};
use reqwest::Response;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

#[derive(Debug, Error)]
pub enum ApiClientError {
    #[error("Request Error: {0}")]
    RequestError(String),
    #[error("Upload Error: {0}")]
    UploadError(String),
    #[error("Server Error ({status}): {message}")]
    ServerError { status: u16, message: String },
    #[error("Decode Error: {0}")]
    DecodeError(String),
    #[error("Deep Search Payload Error: {0}")]
    DeepSearchPayloadError(String),
    #[error("Other Error: {0}")]
    Other(String),
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL.to_string())
    }

    /// Create a client for a backend at `base_url`, e.g. `http://localhost:5000`.
    pub fn with_base_url(base_url: String) -> Self {
        ApiClient {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[cfg_attr(feature = "trace-spans", tracing::instrument(skip(self)))]
    pub async fn health(&self) -> Result<HealthStatus, ApiClientError> {
        let url = format!("{}/", self.base_url);
        let response = self.client.get(&url)
            .send()
            .await
            .map_err(|e| ApiClientError::RequestError(e.to_string()))?;
        let response = ensure_success(response, "Backend is not healthy").await?;
        decode(response).await
    }

    /// Upload the file at `path` as the multipart field `image`.
    #[cfg_attr(feature = "trace-spans", tracing::instrument(skip(self)))]
    pub async fn upload_image(&self, path: &Path) -> Result<serde_json::Value, ApiClientError> {
        let file_name = path.file_name()
            .and_then(|f| f.to_str())
            .ok_or_else(|| ApiClientError::Other("Invalid file name".into()))?;

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ApiClientError::Other(format!("{}: {}", path.display(), e)))?;

        self.upload_image_bytes(bytes, file_name).await
    }

    pub async fn upload_image_bytes(&self, bytes: Vec<u8>, file_name: &str) -> Result<serde_json::Value, ApiClientError> {
        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(content_type_for(file_name))
            .map_err(|e| ApiClientError::Other(e.to_string()))?;
        let form = Form::new().part("image", part);

        let url = format!("{}/api/upload", self.base_url);
        let response = self.client.post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ApiClientError::RequestError(e.to_string()))?;

        if !response.status().is_success() {
            let message = error_message(response, "Failed to upload image").await;
            tracing::warn!("upload of {} rejected: {}", file_name, message);
            return Err(ApiClientError::UploadError(message));
        }

        tracing::info!("uploaded {}", file_name);
        decode(response).await
    }

    /// Upload every file concurrently. The first failure fails the whole batch.
    pub async fn upload_images(&self, paths: &[PathBuf]) -> Result<Vec<serde_json::Value>, ApiClientError> {
        try_join_all(paths.iter().map(|p| self.upload_image(p))).await
    }

    /// Fetch photos. An empty query asks for the whole collection.
    ///
    /// Dates are rewritten into the local short date format.
    #[cfg_attr(feature = "trace-spans", tracing::instrument(skip(self)))]
    pub async fn search_images(&self, query: &str) -> Result<Vec<Photo>, ApiClientError> {
        let url = format!("{}/api/search", self.base_url);
        let mut request = self.client.get(&url);
        if !query.is_empty() {
            request = request.query(&[("query", query)]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiClientError::RequestError(e.to_string()))?;
        let response = ensure_success(response, "Failed to search images").await?;

        let mut photos: Vec<Photo> = decode(response).await?;
        for photo in &mut photos {
            photo.normalize_date(&chrono::Local);
        }
        Ok(photos)
    }

    /// Resolve a natural-language query into tags.
    #[cfg_attr(feature = "trace-spans", tracing::instrument(skip(self)))]
    pub async fn deep_search(&self, query: &str) -> Result<Vec<TagHit>, ApiClientError> {
        let url = format!("{}/api/deepsearch", self.base_url);
        let response = self.client.get(&url)
            .query(&[("query", query)])
            .send()
            .await
            .map_err(|e| ApiClientError::RequestError(e.to_string()))?;
        let response = ensure_success(response, "Failed to run deep search").await?;

        let body = response.text()
            .await
            .map_err(|e| ApiClientError::RequestError(e.to_string()))?;
        parse_deep_search(&body)
    }

    pub async fn get_tabs(&self) -> Result<Vec<Tab>, ApiClientError> {
        let url = format!("{}/api/tabs", self.base_url);
        let response = self.client.get(&url)
            .send()
            .await
            .map_err(|e| ApiClientError::RequestError(e.to_string()))?;
        let response = ensure_success(response, "Failed to load tabs").await?;

        let list: ListTabsResponse = decode(response).await?;
        Ok(list.tabs)
    }

    pub async fn add_tab(&self, tab_name: &str) -> Result<Tab, ApiClientError> {
        let url = format!("{}/api/tabs", self.base_url);
        let response = self.client.post(&url)
            .json(&CreateTabRequest { tab_name })
            .send()
            .await
            .map_err(|e| ApiClientError::RequestError(e.to_string()))?;
        let response = ensure_success(response, "Failed to create tab").await?;

        let created: CreateTabResponse = decode(response).await?;
        Ok(created.tab)
    }
}

/// Decode a deep search body.
///
/// The backend wraps the tag list as a JSON string inside `results`, so the
/// payload is decoded twice. An already-decoded array is accepted as well.
pub fn parse_deep_search(body: &str) -> Result<Vec<TagHit>, ApiClientError> {
    let envelope: DeepSearchEnvelope = serde_json::from_str(body)
        .map_err(|e| ApiClientError::DecodeError(e.to_string()))?;

    match envelope.results {
        serde_json::Value::String(inner) => serde_json::from_str(&inner)
            .map_err(|e| ApiClientError::DeepSearchPayloadError(e.to_string())),
        value @ serde_json::Value::Array(_) => serde_json::from_value(value)
            .map_err(|e| ApiClientError::DeepSearchPayloadError(e.to_string())),
        other => Err(ApiClientError::DeepSearchPayloadError(format!(
            "expected encoded tag list, got {}",
            other
        ))),
    }
}

/// Content type sent with an upload, from the file extension only.
pub fn content_type_for(file_name: &str) -> &'static str {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("heic") => "image/heic",
        _ => "application/octet-stream",
    }
}

async fn ensure_success(response: Response, fallback: &str) -> Result<Response, ApiClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = error_message(response, fallback).await;
    Err(ApiClientError::ServerError { status: status.as_u16(), message })
}

/// The body's `error` field when present, otherwise `fallback`.
async fn error_message(response: Response, fallback: &str) -> String {
    response.json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.error)
        .unwrap_or_else(|| fallback.to_string())
}

async fn decode<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, ApiClientError> {
    let bytes = response.bytes()
        .await
        .map_err(|e| ApiClientError::RequestError(e.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|e| ApiClientError::DecodeError(e.to_string()))
}
