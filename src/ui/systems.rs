// src/ui/systems.rs
use bevy::prelude::*;
use chrono::Local;

use crate::digitization::events::OperationFeedback;
use crate::ui::UiFeedbackState;

pub fn handle_ui_feedback(
    mut feedback_events: EventReader<OperationFeedback>,
    mut ui_feedback_state: ResMut<UiFeedbackState>,
) {
    let mut last_message = None;
    for event in feedback_events.read() {
        last_message = Some((event.message.clone(), event.is_error));
        // An error must not be hidden by a later info message in the same frame.
        if event.is_error {
            break;
        }
    }
    if let Some((msg, is_error)) = last_message {
        if is_error {
            warn!("UI Feedback (Error): {}", msg);
        } else {
            info!("UI Feedback: {}", msg);
        }
        ui_feedback_state.show(msg, is_error, Local::now());
    }
}

pub fn expire_ui_feedback(mut ui_feedback_state: ResMut<UiFeedbackState>) {
    if ui_feedback_state.shown_at.is_some() && ui_feedback_state.is_expired(Local::now()) {
        ui_feedback_state.clear();
    }
}
