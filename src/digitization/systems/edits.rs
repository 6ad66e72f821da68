// src/digitization/systems/edits.rs

use bevy::prelude::*;

use crate::digitization::{
    events::{RequestResetWorkflow, UpdateGridCell},
    workflow::DigitizationState,
};

pub fn handle_grid_cell_updates(
    mut events: EventReader<UpdateGridCell>,
    mut state: ResMut<DigitizationState>,
) {
    for event in events.read() {
        if !state.edit_cell(event.pos, event.value.clone()) {
            debug!(
                "Ignoring edit at ({},{}): no document under review",
                event.pos.row(),
                event.pos.col()
            );
        }
    }
}

pub fn handle_reset_workflow(
    mut events: EventReader<RequestResetWorkflow>,
    mut state: ResMut<DigitizationState>,
) {
    if events.read().last().is_some() {
        info!("Resetting digitization workflow");
        state.reset();
    }
}
