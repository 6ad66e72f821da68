// src/digitization/events.rs

use bevy::prelude::Event;

use super::api::ApiError;
use super::document::OcrDocument;
use super::grid::GridPos;
use super::workflow::RequestTicket;

/// Open the native file dialog to choose a survey photo.
#[derive(Event, Debug, Clone)]
pub struct RequestPickImage;

/// Upload the selected photo to the OCR service.
#[derive(Event, Debug, Clone)]
pub struct RequestUploadImage;

#[derive(Event, Debug, Clone)]
pub struct UploadFinished {
    pub ticket: RequestTicket,
    pub file_name: String,
    pub result: Result<OcrDocument, ApiError>,
}

/// A value typed into the review grid.
#[derive(Event, Debug, Clone)]
pub struct UpdateGridCell {
    pub pos: GridPos,
    pub value: String,
}

/// Commit the reviewed grid as validated.
#[derive(Event, Debug, Clone)]
pub struct RequestConfirmValidation;

#[derive(Event, Debug, Clone)]
pub struct ValidationFinished {
    pub ticket: RequestTicket,
    pub result: Result<(), ApiError>,
}

/// Send the corrections to the training endpoint.
#[derive(Event, Debug, Clone)]
pub struct RequestSubmitFeedback;

#[derive(Event, Debug, Clone)]
pub struct FeedbackFinished {
    pub ticket: RequestTicket,
    pub corrections: usize,
    pub result: Result<(), ApiError>,
}

/// Drop the current document and go back to the upload step.
#[derive(Event, Debug, Clone)]
pub struct RequestResetWorkflow;

/// Check whether the configured backend answers.
#[derive(Event, Debug, Clone)]
pub struct RequestConnectivityProbe;

#[derive(Event, Debug, Clone)]
pub struct ConnectivityProbeFinished {
    pub base_url: String,
    pub result: Result<u16, ApiError>,
}

/// Status line message for the user.
#[derive(Event, Debug, Clone)]
pub struct OperationFeedback {
    pub message: String,
    pub is_error: bool,
}

impl OperationFeedback {
    pub fn info(message: impl Into<String>) -> Self {
        Self { message: message.into(), is_error: false }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { message: message.into(), is_error: true }
    }
}
