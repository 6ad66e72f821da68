// src/ui/elements/top_panel.rs
use bevy_egui::egui;

use crate::auth::{AuthSession, RequestLogout};
use crate::digitization::resources::{ApiConfig, ConnectivityState, ConnectivityStatus};
use crate::ui::{AppView, UiViewState};

use super::app_view::UiEventWriters;

fn status_color(status: &ConnectivityStatus) -> egui::Color32 {
    match status {
        ConnectivityStatus::Online(_) => egui::Color32::from_rgb(0, 170, 0),
        ConnectivityStatus::Offline(_) => egui::Color32::from_rgb(200, 50, 50),
        ConnectivityStatus::Checking => egui::Color32::from_rgb(210, 160, 0),
        ConnectivityStatus::Unknown => egui::Color32::GRAY,
    }
}

pub fn show_top_panel(
    ctx: &egui::Context,
    view: &mut UiViewState,
    auth: &AuthSession,
    connectivity: &ConnectivityState,
    api_config: &ApiConfig,
    writers: &mut UiEventWriters,
) {
    egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.strong("Aquagrid");
            ui.separator();
            ui.selectable_value(&mut view.view, AppView::Dashboard, "Dashboard");
            ui.selectable_value(&mut view.view, AppView::Digitization, "Digitize sheet");

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Log out").clicked() {
                    writers.logout.write(RequestLogout);
                }
                ui.label(auth.display_name());
                ui.separator();
                if ui.button("⚙ Settings").clicked() {
                    view.show_settings_popup = true;
                }
                let label = ui.colored_label(
                    status_color(&connectivity.status),
                    format!("● {}", connectivity.label()),
                );
                let hover = match &connectivity.status {
                    ConnectivityStatus::Offline(reason) => format!("{}\n{}", api_config.base_url, reason),
                    _ => api_config.base_url.clone(),
                };
                label.on_hover_text(hover);
            });
        });
    });
}
