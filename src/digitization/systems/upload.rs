// src/digitization/systems/upload.rs

use std::path::PathBuf;

use bevy::prelude::*;
use bevy_tokio_tasks::TokioTasksRuntime;

use crate::digitization::{
    api::{ApiError, ImageUpload},
    document::OcrDocument,
    events::{OperationFeedback, RequestPickImage, RequestUploadImage, UploadFinished},
    resources::ApiConfig,
    workflow::{Applied, DigitizationState},
};

/// Opens the file dialog on the main thread, the same way every picker in the app does.
pub fn handle_pick_image_request(
    mut events: EventReader<RequestPickImage>,
    mut state: ResMut<DigitizationState>,
    mut feedback_writer: EventWriter<OperationFeedback>,
) {
    if events.read().last().is_none() {
        return;
    }
    if state.upload_pending {
        return;
    }

    let picked: Option<PathBuf> = rfd::FileDialog::new()
        .add_filter("Survey photo", &["png", "jpg", "jpeg"])
        .set_title("Select survey sheet image")
        .pick_file();

    match picked {
        Some(path) => {
            info!("Selected image {:?}", path);
            state.selected_file = Some(path);
            state.last_error = None;
        }
        None => {
            feedback_writer.write(OperationFeedback::info("File selection cancelled"));
        }
    }
}

pub fn handle_upload_request(
    mut events: EventReader<RequestUploadImage>,
    mut state: ResMut<DigitizationState>,
    config: Res<ApiConfig>,
    runtime: Res<TokioTasksRuntime>,
    mut feedback_writer: EventWriter<OperationFeedback>,
) {
    if events.read().last().is_none() {
        return;
    }

    let (ticket, path, zone_id) = match state.begin_upload() {
        Ok(started) => started,
        Err(ApiError::RequestPending) => {
            debug!("Upload already running; ignoring request");
            return;
        }
        Err(err) => {
            feedback_writer.write(OperationFeedback::error(err.to_string()));
            return;
        }
    };

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let config = config.clone();
    info!("Spawning upload task for {:?} (zone {})", path, zone_id);

    runtime.spawn_background_task(move |mut ctx| async move {
        let result = run_upload(&config, path, &zone_id).await;
        ctx.run_on_main_thread(move |ctx| {
            ctx.world.send_event(UploadFinished {
                ticket,
                file_name,
                result,
            });
        })
        .await;
    });
}

async fn run_upload(
    config: &ApiConfig,
    path: PathBuf,
    zone_id: &str,
) -> Result<OcrDocument, ApiError> {
    let client = config.client()?;
    let read_path = path.clone();
    let image = tokio::task::spawn_blocking(move || ImageUpload::load(&read_path))
        .await
        .unwrap_or_else(|e| {
            Err(ApiError::Io {
                path,
                message: e.to_string(),
            })
        })?;
    client.upload(&image, zone_id).await
}

pub fn apply_upload_results(
    mut events: EventReader<UploadFinished>,
    mut state: ResMut<DigitizationState>,
    mut feedback_writer: EventWriter<OperationFeedback>,
) {
    for event in events.read() {
        let applied = state.finish_upload(event.ticket, &event.file_name, event.result.clone());
        if applied == Applied::Stale {
            continue;
        }
        match &event.result {
            Ok(document) => {
                feedback_writer.write(OperationFeedback::info(format!(
                    "'{}' processed: {} cells read",
                    event.file_name,
                    document.cells.len()
                )));
            }
            Err(err) => {
                error!("Upload of '{}' failed: {}", event.file_name, err);
                feedback_writer.write(OperationFeedback::error(err.to_string()));
            }
        }
    }
}
