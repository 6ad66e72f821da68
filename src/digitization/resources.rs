// src/digitization/resources.rs

use bevy::prelude::Resource;
use chrono::{DateTime, Local};

use super::api::{ApiError, OcrApiClient};
use super::api::client::{normalize_base_url, DEFAULT_BASE_URL};

/// Where the OCR backend lives. Rebuilt from settings whenever they change.
#[derive(Resource, Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
}

impl ApiConfig {
    pub fn new(base_url: &str) -> Self {
        Self { base_url: normalize_base_url(base_url) }
    }

    pub fn client(&self) -> Result<OcrApiClient, ApiError> {
        OcrApiClient::new(&self.base_url)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConnectivityStatus {
    #[default]
    Unknown,
    Checking,
    Online(u16),
    Offline(String),
}

/// Result of the last reachability probe. Display only, never gates anything.
#[derive(Resource, Debug, Clone, Default)]
pub struct ConnectivityState {
    pub status: ConnectivityStatus,
    pub checked_url: Option<String>,
    pub checked_at: Option<DateTime<Local>>,
}

impl ConnectivityState {
    pub fn label(&self) -> String {
        match &self.status {
            ConnectivityStatus::Unknown => "Not checked".to_string(),
            ConnectivityStatus::Checking => "Checking...".to_string(),
            ConnectivityStatus::Online(code) => format!("Online (HTTP {})", code),
            ConnectivityStatus::Offline(_) => "Offline".to_string(),
        }
    }
}
