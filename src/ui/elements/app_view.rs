// src/ui/elements/app_view.rs
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::auth::{AuthSession, RequestLogin, RequestLogout};
use crate::digitization::{
    events::{
        RequestConfirmValidation, RequestConnectivityProbe, RequestPickImage,
        RequestResetWorkflow, RequestSubmitFeedback, RequestUploadImage, UpdateGridCell,
    },
    resources::{ApiConfig, ConnectivityState},
    workflow::{DigitizationState, WorkflowStep},
};
use crate::settings::{AppSettings, SettingsChanged, Theme};
use crate::ui::{AppView, UiFeedbackState, UiViewState};

use super::{
    dashboard_view::show_dashboard, feedback_line::show_feedback_line, login::show_login,
    matrix_review::show_matrix_review, settings_popup::show_settings_popup,
    success_step::show_success_step, top_panel::show_top_panel, upload_step::show_upload_step,
};

/// Every request the UI can make. Views only send events; systems do the work.
#[derive(SystemParam)]
pub struct UiEventWriters<'w> {
    pub login: EventWriter<'w, RequestLogin>,
    pub logout: EventWriter<'w, RequestLogout>,
    pub pick_image: EventWriter<'w, RequestPickImage>,
    pub upload: EventWriter<'w, RequestUploadImage>,
    pub update_cell: EventWriter<'w, UpdateGridCell>,
    pub confirm: EventWriter<'w, RequestConfirmValidation>,
    pub submit_feedback: EventWriter<'w, RequestSubmitFeedback>,
    pub reset: EventWriter<'w, RequestResetWorkflow>,
    pub probe: EventWriter<'w, RequestConnectivityProbe>,
    pub settings_changed: EventWriter<'w, SettingsChanged>,
}

pub fn visuals_for(theme: Theme) -> egui::Visuals {
    match theme {
        Theme::Dark => egui::Visuals::dark(),
        Theme::Light => egui::Visuals::light(),
    }
}

#[allow(clippy::too_many_arguments)]
pub fn aquagrid_ui(
    mut contexts: EguiContexts,
    mut view: ResMut<UiViewState>,
    mut settings: ResMut<AppSettings>,
    mut state: ResMut<DigitizationState>,
    auth: Res<AuthSession>,
    connectivity: Res<ConnectivityState>,
    api_config: Res<ApiConfig>,
    ui_feedback: Res<UiFeedbackState>,
    mut writers: UiEventWriters,
) {
    let ctx = contexts.ctx_mut();

    if settings.is_changed() {
        ctx.set_visuals(visuals_for(settings.theme));
    }

    show_feedback_line(ctx, &ui_feedback);

    if !auth.is_logged_in() {
        show_login(ctx, &mut view, &mut writers);
        return;
    }

    show_top_panel(ctx, &mut view, &auth, &connectivity, &api_config, &mut writers);

    if let Some(saved) = show_settings_popup(ctx, &mut view, &settings, &connectivity, &mut writers) {
        *settings = saved;
        writers.settings_changed.write(SettingsChanged);
    }

    egui::CentralPanel::default().show(ctx, |ui| match view.view {
        AppView::Dashboard => show_dashboard(ui),
        AppView::Digitization => match state.step {
            WorkflowStep::Upload => show_upload_step(ui, &mut state, &mut writers),
            WorkflowStep::Validating => show_matrix_review(ui, &state, &mut writers),
            WorkflowStep::Success => show_success_step(ui, &state, &mut writers),
        },
    });
}
