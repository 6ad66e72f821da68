// src/ui/mod.rs
use bevy::prelude::*;
use bevy_egui::EguiContextPass;
use chrono::{DateTime, Duration, Local};

pub mod elements;
pub mod systems;

use elements::app_view::aquagrid_ui;
use systems::{expire_ui_feedback, handle_ui_feedback};

/// How long a status message stays on screen.
pub const FEEDBACK_LIFETIME_SECS: i64 = 6;

#[derive(Resource, Default, Debug, Clone)]
pub struct UiFeedbackState {
    pub last_message: String,
    pub is_error: bool,
    pub shown_at: Option<DateTime<Local>>,
}

impl UiFeedbackState {
    pub fn show(&mut self, message: String, is_error: bool, now: DateTime<Local>) {
        self.last_message = message;
        self.is_error = is_error;
        self.shown_at = Some(now);
    }

    pub fn is_expired(&self, now: DateTime<Local>) -> bool {
        match self.shown_at {
            Some(at) => now - at >= Duration::seconds(FEEDBACK_LIFETIME_SECS),
            None => false,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppView {
    #[default]
    Dashboard,
    Digitization,
}

/// Purely visual state: which page is open, login form text, the settings draft.
#[derive(Resource, Default, Debug, Clone)]
pub struct UiViewState {
    pub view: AppView,
    pub login_user: String,
    pub login_password: String,
    pub show_settings_popup: bool,
    pub settings_draft: Option<crate::settings::AppSettings>,
}

pub struct AppUiPlugin;

impl Plugin for AppUiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<UiFeedbackState>()
            .init_resource::<UiViewState>()
            .add_systems(Update, (handle_ui_feedback, expire_ui_feedback).chain())
            .add_systems(EguiContextPass, aquagrid_ui);

        info!("AppUiPlugin initialized.");
    }
}
