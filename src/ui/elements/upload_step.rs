// src/ui/elements/upload_step.rs
use bevy_egui::egui;

use crate::digitization::{
    events::{RequestPickImage, RequestUploadImage},
    workflow::DigitizationState,
};

use super::app_view::UiEventWriters;

pub fn show_upload_step(ui: &mut egui::Ui, state: &mut DigitizationState, writers: &mut UiEventWriters) {
    ui.heading("1. Upload survey sheet");
    ui.add_space(8.0);

    ui.add_enabled_ui(!state.upload_pending, |ui| {
        ui.horizontal(|ui| {
            ui.label("Zone:");
            ui.add(egui::TextEdit::singleline(&mut state.zone_id).desired_width(60.0));
        });

        ui.horizontal(|ui| {
            if ui.button("Choose image…").clicked() {
                writers.pick_image.write(RequestPickImage);
            }
            match &state.selected_file {
                Some(path) => {
                    ui.label(path.display().to_string());
                }
                None => {
                    ui.weak("No file selected");
                }
            }
        });
    });

    ui.add_space(8.0);
    ui.horizontal(|ui| {
        let can_upload = state.selected_file.is_some() && !state.upload_pending;
        if ui
            .add_enabled(can_upload, egui::Button::new("Upload and read"))
            .clicked()
        {
            writers.upload.write(RequestUploadImage);
        }
        if state.upload_pending {
            ui.spinner();
            ui.label("Reading sheet…");
        }
    });

    if let Some(error) = &state.last_error {
        ui.add_space(8.0);
        ui.colored_label(egui::Color32::from_rgb(220, 60, 60), error);
    }
}
