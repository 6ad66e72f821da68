// src/settings/mod.rs
pub mod io;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::digitization::api::client::{normalize_base_url, DEFAULT_BASE_URL};
use crate::digitization::events::{OperationFeedback, RequestConnectivityProbe};
use crate::digitization::payloads::DEFAULT_ZONE_ID;
use crate::digitization::resources::ApiConfig;
use crate::digitization::workflow::DigitizationState;

/// Overrides the persisted base URL for this run. Also read from `.env`.
pub const BASE_URL_ENV_VAR: &str = "AQUAGRID_API_BASE";

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

#[derive(Resource, Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AppSettings {
    pub base_url: String,
    pub theme: Theme,
    pub default_zone: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            theme: Theme::default(),
            default_zone: DEFAULT_ZONE_ID.to_string(),
        }
    }
}

impl AppSettings {
    /// Base URL to use this run: a non-empty override wins over the saved value.
    pub fn effective_base_url(&self, env_override: Option<&str>) -> String {
        match env_override.map(str::trim).filter(|v| !v.is_empty()) {
            Some(url) => normalize_base_url(url),
            None => normalize_base_url(&self.base_url),
        }
    }
}

pub fn base_url_override() -> Option<String> {
    // A missing .env file is the normal case.
    let _ = dotenvy::dotenv();
    std::env::var(BASE_URL_ENV_VAR).ok()
}

/// Sent after the settings popup changed `AppSettings`; persists and applies them.
#[derive(Event, Debug, Clone)]
pub struct SettingsChanged;

/// What this run took from settings and the environment, so a later save only
/// touches what actually changed.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct AppliedSettings {
    pub base_url_override: Option<String>,
    pub default_zone: String,
}

pub struct SettingsPlugin;

impl Plugin for SettingsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AppSettings>()
            .init_resource::<AppliedSettings>()
            .add_event::<SettingsChanged>()
            .add_systems(Startup, load_settings_on_startup)
            .add_systems(
                Update,
                (apply_changed_settings, persist_changed_settings).chain(),
            );
    }
}

fn load_settings_on_startup(
    mut settings: ResMut<AppSettings>,
    mut applied: ResMut<AppliedSettings>,
    mut api_config: ResMut<ApiConfig>,
    mut state: ResMut<DigitizationState>,
) {
    match io::load_settings_from_file::<AppSettings>() {
        Ok(loaded) => *settings = loaded,
        Err(e) => error!("AppSettings: failed to load settings: {}. Using defaults.", e),
    }

    let env_override = base_url_override();
    if let Some(url) = &env_override {
        info!("AppSettings: {} overrides the OCR base URL with {}", BASE_URL_ENV_VAR, url);
    }
    *api_config = ApiConfig::new(&settings.effective_base_url(env_override.as_deref()));
    state.zone_id = settings.default_zone.clone();
    *applied = AppliedSettings {
        base_url_override: env_override,
        default_zone: settings.default_zone.clone(),
    };
    info!("AppSettings: OCR service at {}", api_config.base_url);
}

/// Pushes saved settings into the running app. The environment override keeps
/// winning over the saved base URL, and a new default zone pre-fills the upload
/// form for the next document (the document under review keeps its own zone).
pub fn apply_changed_settings(
    mut events: EventReader<SettingsChanged>,
    mut settings: ResMut<AppSettings>,
    mut applied: ResMut<AppliedSettings>,
    mut api_config: ResMut<ApiConfig>,
    mut state: ResMut<DigitizationState>,
    mut connectivity_writer: EventWriter<RequestConnectivityProbe>,
) {
    if events.read().last().is_none() {
        return;
    }

    settings.base_url = normalize_base_url(&settings.base_url);
    if settings.base_url.is_empty() {
        settings.base_url = DEFAULT_BASE_URL.to_string();
    }

    let base_url = settings.effective_base_url(applied.base_url_override.as_deref());
    if base_url != api_config.base_url {
        *api_config = ApiConfig::new(&base_url);
        connectivity_writer.write(RequestConnectivityProbe);
    } else if applied.base_url_override.is_some() && base_url != settings.base_url {
        info!(
            "AppSettings: saved base URL {} stays inactive while {} is set",
            settings.base_url, BASE_URL_ENV_VAR
        );
    }

    if settings.default_zone != applied.default_zone {
        applied.default_zone = settings.default_zone.clone();
        state.zone_id = settings.default_zone.clone();
        info!("AppSettings: default zone is now {}", state.zone_id);
    }
}

pub fn persist_changed_settings(
    mut events: EventReader<SettingsChanged>,
    settings: Res<AppSettings>,
    mut feedback_writer: EventWriter<OperationFeedback>,
) {
    if events.read().last().is_none() {
        return;
    }

    match io::save_settings_to_file(&*settings) {
        Ok(()) => {
            feedback_writer.write(OperationFeedback::info("Settings saved"));
        }
        Err(e) => {
            error!("AppSettings: failed to save settings: {}", e);
            feedback_writer.write(OperationFeedback::error(format!(
                "Could not save settings: {}",
                e
            )));
        }
    }
}
