// src/digitization/systems/feedback.rs

use bevy::prelude::*;
use bevy_tokio_tasks::TokioTasksRuntime;

use crate::digitization::{
    api::ApiError,
    events::{FeedbackFinished, OperationFeedback, RequestSubmitFeedback},
    resources::ApiConfig,
    workflow::{Applied, DigitizationState},
};

pub fn handle_feedback_request(
    mut events: EventReader<RequestSubmitFeedback>,
    mut state: ResMut<DigitizationState>,
    config: Res<ApiConfig>,
    runtime: Res<TokioTasksRuntime>,
    mut feedback_writer: EventWriter<OperationFeedback>,
) {
    if events.read().last().is_none() {
        return;
    }

    let (ticket, request) = match state.begin_feedback() {
        Ok(started) => started,
        Err(ApiError::RequestPending) => return,
        Err(err) => {
            feedback_writer.write(OperationFeedback::error(err.to_string()));
            return;
        }
    };

    let corrections = request.correcciones.len();
    let config = config.clone();
    runtime.spawn_background_task(move |mut ctx| async move {
        let result = match config.client() {
            Ok(client) => client.submit_feedback(&request).await,
            Err(err) => Err(err),
        };
        ctx.run_on_main_thread(move |ctx| {
            ctx.world.send_event(FeedbackFinished {
                ticket,
                corrections,
                result,
            });
        })
        .await;
    });
}

pub fn apply_feedback_results(
    mut events: EventReader<FeedbackFinished>,
    mut state: ResMut<DigitizationState>,
    mut feedback_writer: EventWriter<OperationFeedback>,
) {
    for event in events.read() {
        if state.finish_feedback(event.ticket) == Applied::Stale {
            continue;
        }
        match &event.result {
            Ok(()) => {
                feedback_writer.write(OperationFeedback::info(format!(
                    "Corrections sent for training ({} cells)",
                    event.corrections
                )));
            }
            Err(err) => {
                error!("Sending corrections failed: {}", err);
                feedback_writer.write(OperationFeedback::error(format!(
                    "Could not send corrections: {}",
                    err
                )));
            }
        }
    }
}
