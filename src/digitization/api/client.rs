// src/digitization/api/client.rs

use std::path::{Path, PathBuf};

use bevy::log::{debug, info, warn};
use image::ImageFormat;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::multipart::{Form, Part};

use super::error::ApiError;
use crate::digitization::document::OcrDocument;
use crate::digitization::payloads::{FeedbackRequest, ValidationCommit, DEFAULT_ZONE_ID};

/// The backend sits behind a tunnel that serves an HTML warning page to browsers
/// unless this header is present.
pub const TUNNEL_WARNING_HEADER: &str = "ngrok-skip-browser-warning";

/// Fallback when neither saved settings nor `AQUAGRID_API_BASE` name a server.
/// Deployed backends live at per-deployment tunnel URLs, so the remote address
/// comes from those two sources and the built-in value is a local dev server.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

pub const UPLOAD_PATH: &str = "/api/v1/registros";
pub const FEEDBACK_PATH: &str = "/api/v1/training/feedback";

pub fn validation_path(document_id: &str) -> String {
    format!("/api/v1/registros/{}/validacion", document_id)
}

pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}

/// A survey photo read from disk and checked to be a decodable image.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub path: PathBuf,
    pub file_name: String,
    pub mime: &'static str,
    pub width: u32,
    pub height: u32,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn load(path: &Path) -> Result<Self, ApiError> {
        let bytes = std::fs::read(path).map_err(|e| ApiError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_bytes(path, bytes)
    }

    pub fn from_bytes(path: &Path, bytes: Vec<u8>) -> Result<Self, ApiError> {
        let invalid = |message: String| ApiError::InvalidImage {
            path: path.to_path_buf(),
            message,
        };
        let format = image::guess_format(&bytes).map_err(|e| invalid(e.to_string()))?;
        let mime = match format {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            other => return Err(invalid(format!("unsupported format {:?}", other))),
        };
        let decoded = image::load_from_memory_with_format(&bytes, format)
            .map_err(|e| invalid(e.to_string()))?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "planilla".to_string());

        Ok(Self {
            path: path.to_path_buf(),
            file_name,
            mime,
            width: decoded.width(),
            height: decoded.height(),
            bytes,
        })
    }
}

/// HTTP client for the OCR backend.
#[derive(Debug, Clone)]
pub struct OcrApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl OcrApiClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(TUNNEL_WARNING_HEADER, HeaderValue::from_static("true"));
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(ApiError::from_transport)?;
        Ok(Self {
            http,
            base_url: normalize_base_url(base_url),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `POST /api/v1/registros` with the image and zone; returns the OCR document.
    pub async fn upload(&self, image: &ImageUpload, zone_id: &str) -> Result<OcrDocument, ApiError> {
        let zone_id = if zone_id.trim().is_empty() { DEFAULT_ZONE_ID } else { zone_id.trim() };
        let part = Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(image.mime)
            .map_err(ApiError::from_transport)?;
        let form = Form::new().part("file", part).text("zona_id", zone_id.to_string());

        info!(
            "Uploading '{}' ({}x{}, {} bytes) for zone {}",
            image.file_name,
            image.width,
            image.height,
            image.bytes.len(),
            zone_id
        );
        let response = self
            .http
            .post(self.url(UPLOAD_PATH))
            .multipart(form)
            .send()
            .await
            .map_err(ApiError::from_transport)?;
        let body = read_success_body(response).await?;

        let document = OcrDocument::from_json(&body).map_err(|e| ApiError::Decode(e.to_string()))?;
        info!(
            "OCR document {:?} received ({:?} shape, {} cells)",
            document.id,
            document.shape,
            document.cells.len()
        );
        Ok(document)
    }

    /// `PUT /api/v1/registros/{id}/validacion` with the full cell list.
    pub async fn commit_validation(
        &self,
        document_id: &str,
        commit: &ValidationCommit,
    ) -> Result<(), ApiError> {
        info!(
            "Committing validation of document {} ({} cells)",
            document_id,
            commit.cambios.len()
        );
        let response = self
            .http
            .put(self.url(&validation_path(document_id)))
            .json(commit)
            .send()
            .await
            .map_err(ApiError::from_transport)?;
        read_success_body(response).await.map(|_| ())
    }

    /// `POST /api/v1/training/feedback` with one record per cell.
    pub async fn submit_feedback(&self, request: &FeedbackRequest) -> Result<(), ApiError> {
        info!(
            "Sending {} corrections for zone {}",
            request.correcciones.len(),
            request.zona_id
        );
        let response = self
            .http
            .post(self.url(FEEDBACK_PATH))
            .json(request)
            .send()
            .await
            .map_err(ApiError::from_transport)?;
        read_success_body(response).await.map(|_| ())
    }

    /// `GET /`. Any HTTP answer means the host is reachable; the status is returned for display.
    pub async fn probe(&self) -> Result<u16, ApiError> {
        let response = self
            .http
            .get(self.url("/"))
            .send()
            .await
            .map_err(ApiError::from_transport)?;
        let status = response.status();
        if !status.is_success() {
            warn!("Connectivity probe to {} answered {}", self.base_url, status);
        }
        Ok(status.as_u16())
    }
}

async fn read_success_body(response: reqwest::Response) -> Result<String, ApiError> {
    let status = response.status();
    let body = response.text().await.map_err(ApiError::from_transport)?;
    if status.is_success() {
        debug!("OCR service answered {} ({} bytes)", status, body.len());
        Ok(body)
    } else {
        warn!("OCR service rejected request with {}: {}", status, body);
        Err(ApiError::rejected(status, &body))
    }
}
