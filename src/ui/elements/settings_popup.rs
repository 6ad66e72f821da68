// src/ui/elements/settings_popup.rs
use bevy_egui::egui;

use crate::digitization::events::RequestConnectivityProbe;
use crate::digitization::resources::ConnectivityState;
use crate::settings::{AppSettings, Theme};
use crate::ui::UiViewState;

use super::app_view::UiEventWriters;

/// Edits a draft copy of the settings; returns it when the user saves.
pub fn show_settings_popup(
    ctx: &egui::Context,
    view: &mut UiViewState,
    settings: &AppSettings,
    connectivity: &ConnectivityState,
    writers: &mut UiEventWriters,
) -> Option<AppSettings> {
    if !view.show_settings_popup {
        view.settings_draft = None;
        return None;
    }

    let mut draft = view.settings_draft.take().unwrap_or_else(|| settings.clone());
    let mut is_window_open = true;
    let mut close_requested = false;
    let mut saved = None;

    egui::Window::new("Settings")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .open(&mut is_window_open)
        .show(ctx, |ui| {
            ui.heading("OCR service");
            ui.label("Base URL:");
            ui.add(egui::TextEdit::singleline(&mut draft.base_url).desired_width(320.0));
            ui.horizontal(|ui| {
                ui.label(format!("Status: {}", connectivity.label()));
                if let Some(at) = connectivity.checked_at {
                    ui.weak(format!("at {}", at.format("%H:%M:%S")));
                }
                if ui.button("Check now").clicked() {
                    writers.probe.write(RequestConnectivityProbe);
                }
            });
            ui.weak("The check uses the saved URL. Save first to test a new one.");

            ui.separator();
            ui.heading("Workflow");
            ui.horizontal(|ui| {
                ui.label("Default zone:");
                ui.add(egui::TextEdit::singleline(&mut draft.default_zone).desired_width(60.0));
            });

            ui.separator();
            ui.heading("Appearance");
            ui.horizontal(|ui| {
                ui.radio_value(&mut draft.theme, Theme::Dark, "Dark");
                ui.radio_value(&mut draft.theme, Theme::Light, "Light");
            });

            ui.separator();
            ui.horizontal(|ui| {
                if ui.button("Save").clicked() {
                    saved = Some(draft.clone());
                    close_requested = true;
                }
                if ui.button("Cancel").clicked() {
                    close_requested = true;
                }
            });
        });

    if !is_window_open || close_requested {
        view.show_settings_popup = false;
        view.settings_draft = None;
    } else {
        view.settings_draft = Some(draft);
    }
    saved
}
