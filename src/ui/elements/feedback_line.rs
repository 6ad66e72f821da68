// src/ui/elements/feedback_line.rs
use bevy_egui::egui;

use crate::ui::UiFeedbackState;

pub fn show_feedback_line(ctx: &egui::Context, feedback: &UiFeedbackState) {
    egui::TopBottomPanel::bottom("feedback_line").show(ctx, |ui| {
        ui.horizontal(|ui| {
            if feedback.last_message.is_empty() {
                ui.weak("Ready");
                return;
            }
            let color = if feedback.is_error {
                egui::Color32::from_rgb(220, 60, 60)
            } else {
                ui.visuals().text_color()
            };
            if let Some(at) = feedback.shown_at {
                ui.weak(at.format("%H:%M:%S").to_string());
            }
            ui.colored_label(color, &feedback.last_message);
        });
    });
}
