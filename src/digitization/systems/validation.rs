// src/digitization/systems/validation.rs

use bevy::prelude::*;
use bevy_tokio_tasks::TokioTasksRuntime;

use crate::auth::AuthSession;
use crate::digitization::{
    api::ApiError,
    events::{OperationFeedback, RequestConfirmValidation, ValidationFinished},
    resources::ApiConfig,
    workflow::{Applied, DigitizationState},
};

pub fn handle_confirm_request(
    mut events: EventReader<RequestConfirmValidation>,
    mut state: ResMut<DigitizationState>,
    auth: Res<AuthSession>,
    config: Res<ApiConfig>,
    runtime: Res<TokioTasksRuntime>,
    mut feedback_writer: EventWriter<OperationFeedback>,
) {
    if events.read().last().is_none() {
        return;
    }

    let (ticket, document_id, commit) = match state.begin_confirm(auth.display_name()) {
        Ok(started) => started,
        Err(ApiError::RequestPending) => {
            debug!("Validation commit already running; ignoring request");
            return;
        }
        Err(err) => {
            state.last_error = Some(err.to_string());
            feedback_writer.write(OperationFeedback::error(err.to_string()));
            return;
        }
    };

    let config = config.clone();
    runtime.spawn_background_task(move |mut ctx| async move {
        let result = match config.client() {
            Ok(client) => client.commit_validation(&document_id, &commit).await,
            Err(err) => Err(err),
        };
        ctx.run_on_main_thread(move |ctx| {
            ctx.world.send_event(ValidationFinished { ticket, result });
        })
        .await;
    });
}

pub fn apply_validation_results(
    mut events: EventReader<ValidationFinished>,
    mut state: ResMut<DigitizationState>,
    mut feedback_writer: EventWriter<OperationFeedback>,
) {
    for event in events.read() {
        if state.finish_confirm(event.ticket, event.result.clone()) == Applied::Stale {
            continue;
        }
        match &event.result {
            Ok(()) => {
                feedback_writer.write(OperationFeedback::info("Sheet validated and saved"));
            }
            Err(err) => {
                error!("Validation commit failed: {}", err);
                feedback_writer.write(OperationFeedback::error(err.to_string()));
            }
        }
    }
}
