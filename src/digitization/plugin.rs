// src/digitization/plugin.rs
use bevy::prelude::*;

use super::events::*;
use super::resources::{ApiConfig, ConnectivityState};
use super::systems::{edits, feedback, probe, upload, validation};
use super::workflow::DigitizationState;

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
enum DigitizationSystemSet {
    /// Requests coming from the UI; may spawn background tasks.
    UserInput,
    /// Results coming back from background tasks.
    ApplyResults,
}

/// Upload, review and commit of survey sheets against the OCR backend.
pub struct DigitizationPlugin;

impl Plugin for DigitizationPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            Update,
            DigitizationSystemSet::ApplyResults.after(DigitizationSystemSet::UserInput),
        );

        app.init_resource::<DigitizationState>()
            .init_resource::<ApiConfig>()
            .init_resource::<ConnectivityState>();

        app.add_event::<RequestPickImage>()
            .add_event::<RequestUploadImage>()
            .add_event::<UploadFinished>()
            .add_event::<UpdateGridCell>()
            .add_event::<RequestConfirmValidation>()
            .add_event::<ValidationFinished>()
            .add_event::<RequestSubmitFeedback>()
            .add_event::<FeedbackFinished>()
            .add_event::<RequestResetWorkflow>()
            .add_event::<RequestConnectivityProbe>()
            .add_event::<ConnectivityProbeFinished>()
            .add_event::<OperationFeedback>();

        // Settings load in Startup first, so the probe sees the configured URL.
        app.add_systems(PostStartup, probe::request_probe_on_startup);

        app.add_systems(
            Update,
            (
                // Reset runs first so a reset and an edit in the same frame leave an empty form.
                edits::handle_reset_workflow,
                edits::handle_grid_cell_updates,
                upload::handle_pick_image_request,
                upload::handle_upload_request,
                validation::handle_confirm_request,
                feedback::handle_feedback_request,
                probe::handle_probe_request,
            )
                .chain()
                .in_set(DigitizationSystemSet::UserInput),
        );

        app.add_systems(
            Update,
            (
                upload::apply_upload_results,
                validation::apply_validation_results,
                feedback::apply_feedback_results,
                probe::apply_probe_results,
            )
                .chain()
                .in_set(DigitizationSystemSet::ApplyResults),
        );

        info!("DigitizationPlugin initialized.");
    }
}
