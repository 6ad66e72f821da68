// src/ui/elements/success_step.rs
use bevy_egui::egui;

use crate::digitization::{events::RequestResetWorkflow, workflow::DigitizationState};

use super::app_view::UiEventWriters;

pub fn show_success_step(ui: &mut egui::Ui, state: &DigitizationState, writers: &mut UiEventWriters) {
    ui.vertical_centered(|ui| {
        ui.add_space(40.0);
        ui.heading("✔ Sheet validated");
        if let Some(session) = state.session() {
            ui.label(format!(
                "Document {} for zone {} was saved with {} corrected cell(s).",
                session.document_id().unwrap_or("(no id)"),
                session.zone_id(),
                session.edited_count()
            ));
        }
        ui.add_space(16.0);
        if ui.button("Digitize another sheet").clicked() {
            writers.reset.write(RequestResetWorkflow);
        }
    });
}
