// src/digitization/api/error.rs

use std::path::PathBuf;

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Everything that can go wrong around an OCR backend action.
///
/// Local problems are caught before any request is sent; the rest split into
/// "could not talk to the server" and "the server said no".
#[derive(Error, Debug, Clone)]
pub enum ApiError {
    #[error("Select an image before uploading.")]
    NoFileSelected,
    #[error("There is no document loaded to validate.")]
    NoDocument,
    #[error("The server did not assign an id to this document, so it cannot be validated.")]
    MissingDocumentId,
    #[error("A request of this kind is already in progress.")]
    RequestPending,
    #[error("Could not read {path}: {message}")]
    Io { path: PathBuf, message: String },
    #[error("{path} is not a readable PNG or JPEG image: {message}")]
    InvalidImage { path: PathBuf, message: String },
    #[error("Connection error: could not reach the OCR service ({0}).")]
    Connection(String),
    #[error("Server rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("Unexpected response from the OCR service: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            ApiError::NoFileSelected
                | ApiError::NoDocument
                | ApiError::MissingDocumentId
                | ApiError::RequestPending
                | ApiError::Io { .. }
                | ApiError::InvalidImage { .. }
        )
    }

    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Connection(err.to_string())
        }
    }

    pub(crate) fn rejected(status: StatusCode, body: &str) -> Self {
        ApiError::Rejected {
            status: status.as_u16(),
            message: rejection_message(status, body),
        }
    }
}

/// Best message for a non-2xx response: JSON `detail`, then JSON `message`,
/// then the raw body, then the status line.
pub fn rejection_message(status: StatusCode, body: &str) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        for key in ["detail", "message"] {
            match map.get(key) {
                Some(Value::String(s)) if !s.trim().is_empty() => return s.clone(),
                Some(Value::Null) | None => {}
                Some(Value::String(_)) => {}
                Some(other) => return other.to_string(),
            }
        }
    }

    let text = body.trim();
    if !text.is_empty() {
        return text.to_string();
    }

    match status.canonical_reason() {
        Some(reason) => format!("HTTP {} {}", status.as_u16(), reason),
        None => format!("HTTP {}", status.as_u16()),
    }
}
