// src/digitization/workflow.rs

use std::path::PathBuf;

use bevy::log::{info, warn};
use bevy::prelude::Resource;

use super::api::ApiError;
use super::document::{DocumentShape, OcrDocument};
use super::grid::GridPos;
use super::payloads::{FeedbackRequest, ValidationCommit, DEFAULT_ZONE_ID};
use super::session::ValidationSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkflowStep {
    #[default]
    Upload,
    Validating,
    Success,
}

/// Ties a background request to the workflow it was started from. Resetting the
/// workflow invalidates every outstanding ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket(u64);

/// What the upload screen shows about the last accepted document.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadSummary {
    pub file_name: String,
    pub shape: DocumentShape,
    pub estado: Option<String>,
    pub average_confidence: Option<f64>,
    pub cell_count: usize,
}

/// Whether a finished request still belonged to the current workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Yes,
    Stale,
}

/// The digitization workflow: one document at a time, upload then validate.
#[derive(Resource, Debug)]
pub struct DigitizationState {
    pub step: WorkflowStep,
    pub selected_file: Option<PathBuf>,
    pub zone_id: String,
    pub upload_pending: bool,
    pub commit_pending: bool,
    pub feedback_pending: bool,
    pub last_error: Option<String>,
    pub last_upload: Option<UploadSummary>,
    session: Option<ValidationSession>,
    generation: u64,
}

impl Default for DigitizationState {
    fn default() -> Self {
        Self {
            step: WorkflowStep::Upload,
            selected_file: None,
            zone_id: DEFAULT_ZONE_ID.to_string(),
            upload_pending: false,
            commit_pending: false,
            feedback_pending: false,
            last_error: None,
            last_upload: None,
            session: None,
            generation: 0,
        }
    }
}

impl DigitizationState {
    pub fn with_zone(zone_id: impl Into<String>) -> Self {
        Self {
            zone_id: zone_id.into(),
            ..Default::default()
        }
    }

    pub fn session(&self) -> Option<&ValidationSession> {
        self.session.as_ref()
    }

    fn ticket(&self) -> RequestTicket {
        RequestTicket(self.generation)
    }

    fn is_current(&self, ticket: RequestTicket) -> bool {
        ticket.0 == self.generation
    }

    fn zone_or_default(&self) -> String {
        let zone = self.zone_id.trim();
        if zone.is_empty() {
            DEFAULT_ZONE_ID.to_string()
        } else {
            zone.to_string()
        }
    }

    /// Checks that an upload can start and marks it pending.
    pub fn begin_upload(&mut self) -> Result<(RequestTicket, PathBuf, String), ApiError> {
        if self.upload_pending {
            return Err(ApiError::RequestPending);
        }
        let Some(path) = self.selected_file.clone() else {
            self.last_error = Some(ApiError::NoFileSelected.to_string());
            return Err(ApiError::NoFileSelected);
        };
        self.upload_pending = true;
        self.last_error = None;
        Ok((self.ticket(), path, self.zone_or_default()))
    }

    pub fn finish_upload(
        &mut self,
        ticket: RequestTicket,
        file_name: &str,
        result: Result<OcrDocument, ApiError>,
    ) -> Applied {
        if !self.is_current(ticket) {
            warn!("Dropping upload result for a workflow that was reset");
            return Applied::Stale;
        }
        self.upload_pending = false;
        match result {
            Ok(document) => {
                self.last_upload = Some(UploadSummary {
                    file_name: file_name.to_string(),
                    shape: document.shape,
                    estado: document.estado.clone(),
                    average_confidence: document.average_confidence_or_computed(),
                    cell_count: document.cells.len(),
                });
                let session = ValidationSession::from_document(document, &self.zone_or_default());
                info!(
                    "Document {:?} loaded for validation: {} cells, {} on the grid",
                    session.document_id(),
                    session.cells().len(),
                    session.grid().filled_count()
                );
                self.session = Some(session);
                self.step = WorkflowStep::Validating;
                self.last_error = None;
            }
            Err(err) => {
                self.last_error = Some(err.to_string());
            }
        }
        Applied::Yes
    }

    /// Value edit from the review grid. Ignored unless a document is under review.
    pub fn edit_cell(&mut self, pos: GridPos, value: impl Into<String>) -> bool {
        if self.step != WorkflowStep::Validating {
            return false;
        }
        match self.session.as_mut() {
            Some(session) => {
                session.set_value(pos, value);
                true
            }
            None => false,
        }
    }

    /// Builds the commit for the loaded document and marks it pending.
    pub fn begin_confirm(
        &mut self,
        validated_by: &str,
    ) -> Result<(RequestTicket, String, ValidationCommit), ApiError> {
        if self.commit_pending {
            return Err(ApiError::RequestPending);
        }
        let session = self.session.as_ref().ok_or(ApiError::NoDocument)?;
        let document_id = session
            .document_id()
            .ok_or(ApiError::MissingDocumentId)?
            .to_string();
        let commit = session.commit_payload(validated_by);
        self.commit_pending = true;
        self.last_error = None;
        Ok((self.ticket(), document_id, commit))
    }

    pub fn finish_confirm(&mut self, ticket: RequestTicket, result: Result<(), ApiError>) -> Applied {
        if !self.is_current(ticket) {
            warn!("Dropping validation result for a workflow that was reset");
            return Applied::Stale;
        }
        self.commit_pending = false;
        match result {
            Ok(()) => {
                info!("Validation committed");
                self.step = WorkflowStep::Success;
                self.last_error = None;
            }
            Err(err) => {
                self.last_error = Some(err.to_string());
            }
        }
        Applied::Yes
    }

    pub fn begin_feedback(&mut self) -> Result<(RequestTicket, FeedbackRequest), ApiError> {
        if self.feedback_pending {
            return Err(ApiError::RequestPending);
        }
        let session = self.session.as_ref().ok_or(ApiError::NoDocument)?;
        let request = session.feedback_request();
        self.feedback_pending = true;
        Ok((self.ticket(), request))
    }

    /// Feedback never changes cells or the step; the caller reports the outcome.
    pub fn finish_feedback(&mut self, ticket: RequestTicket) -> Applied {
        if !self.is_current(ticket) {
            return Applied::Stale;
        }
        self.feedback_pending = false;
        Applied::Yes
    }

    /// Back to an empty upload step. Keeps the chosen zone.
    pub fn reset(&mut self) {
        let zone_id = std::mem::take(&mut self.zone_id);
        let generation = self.generation.wrapping_add(1);
        *self = Self {
            zone_id,
            generation,
            ..Default::default()
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digitization::api::stub_server::StubServer;
    use crate::digitization::api::{ImageUpload, OcrApiClient};
    use crate::digitization::cell::RowLabel;

    fn doc(body: &str) -> OcrDocument {
        OcrDocument::from_json(body).unwrap()
    }

    const DOC: &str = r#"{"id": 11, "zona_id": "2", "resultado_ia": {"matriz": [
        {"fila": "Fila 1", "col": 0, "valor": "4", "confianza": 0.9, "ref_id": "R0_C0"},
        {"fila": "Fila 2", "col": 1, "valor": "5", "confianza": 0.6, "ref_id": "R1_C1"},
        {"fila": "Fila 8", "col": 1, "valor": "9", "confianza": 0.9, "ref_id": "R7_C1"}
    ]}}"#;

    fn pos(row: usize, col: usize) -> GridPos {
        GridPos::new(row, col).unwrap()
    }

    #[test]
    fn upload_needs_a_file() {
        let mut state = DigitizationState::default();
        assert!(matches!(state.begin_upload(), Err(ApiError::NoFileSelected)));
        assert!(!state.upload_pending);
        assert!(state.last_error.is_some());
    }

    #[test]
    fn upload_success_moves_to_validation() {
        let mut state = DigitizationState::default();
        state.selected_file = Some(PathBuf::from("hoja.jpg"));
        let (ticket, _, zone) = state.begin_upload().unwrap();
        assert_eq!(zone, "1");
        assert!(state.upload_pending);
        assert!(matches!(state.begin_upload(), Err(ApiError::RequestPending)));

        assert_eq!(state.finish_upload(ticket, "hoja.jpg", Ok(doc(DOC))), Applied::Yes);
        assert_eq!(state.step, WorkflowStep::Validating);
        assert!(!state.upload_pending);
        let session = state.session().unwrap();
        assert_eq!(session.cells().len(), 3);
        assert_eq!(session.grid().filled_count(), 2);
        assert_eq!(state.last_upload.as_ref().unwrap().cell_count, 3);
    }

    #[test]
    fn upload_failure_stays_on_upload_step() {
        let mut state = DigitizationState::default();
        state.selected_file = Some(PathBuf::from("hoja.jpg"));
        let (ticket, _, _) = state.begin_upload().unwrap();
        state.finish_upload(ticket, "hoja.jpg", Err(ApiError::Connection("refused".into())));
        assert_eq!(state.step, WorkflowStep::Upload);
        assert!(state.session().is_none());
        assert!(state.last_error.as_deref().unwrap().starts_with("Connection error"));
    }

    #[test]
    fn results_after_reset_are_dropped() {
        let mut state = DigitizationState::with_zone("3");
        state.selected_file = Some(PathBuf::from("hoja.jpg"));
        let (ticket, _, _) = state.begin_upload().unwrap();
        state.reset();
        assert_eq!(state.zone_id, "3");
        assert!(!state.upload_pending);

        assert_eq!(state.finish_upload(ticket, "hoja.jpg", Ok(doc(DOC))), Applied::Stale);
        assert_eq!(state.step, WorkflowStep::Upload);
        assert!(state.session().is_none());
    }

    #[test]
    fn confirm_requires_document_with_id() {
        let mut state = DigitizationState::default();
        assert!(matches!(state.begin_confirm("admin"), Err(ApiError::NoDocument)));

        state.selected_file = Some(PathBuf::from("hoja.jpg"));
        let (ticket, _, _) = state.begin_upload().unwrap();
        state.finish_upload(ticket, "hoja.jpg", Ok(doc(r#"{"matriz": []}"#)));
        assert!(matches!(state.begin_confirm("admin"), Err(ApiError::MissingDocumentId)));
        assert!(!state.commit_pending);
    }

    #[test]
    fn confirm_failure_keeps_cells_and_step() {
        let mut state = DigitizationState::default();
        state.selected_file = Some(PathBuf::from("hoja.jpg"));
        let (ticket, _, _) = state.begin_upload().unwrap();
        state.finish_upload(ticket, "hoja.jpg", Ok(doc(DOC)));
        state.edit_cell(pos(0, 0), "40");

        let (ticket, id, commit) = state.begin_confirm("admin").unwrap();
        assert_eq!(id, "11");
        assert_eq!(commit.cambios.len(), 3);
        state.finish_confirm(ticket, Err(ApiError::Rejected { status: 500, message: "boom".into() }));
        assert_eq!(state.step, WorkflowStep::Validating);
        assert_eq!(state.session().unwrap().cells()[0].value, "40");
        assert!(state.last_error.as_deref().unwrap().contains("boom"));

        let (ticket, _, _) = state.begin_confirm("admin").unwrap();
        state.finish_confirm(ticket, Ok(()));
        assert_eq!(state.step, WorkflowStep::Success);
        assert!(!state.edit_cell(pos(0, 0), "1"));
    }

    #[test]
    fn feedback_leaves_state_alone() {
        let mut state = DigitizationState::default();
        state.selected_file = Some(PathBuf::from("hoja.jpg"));
        let (ticket, _, _) = state.begin_upload().unwrap();
        state.finish_upload(ticket, "hoja.jpg", Ok(doc(DOC)));
        state.edit_cell(pos(1, 1), "8");

        let (ticket, request) = state.begin_feedback().unwrap();
        assert_eq!(request.zona_id, 2);
        assert_eq!(request.correcciones.len(), 3);
        assert_eq!(request.correcciones[1].valor_original, "5");
        assert_eq!(request.correcciones[1].valor_corregido, "8");
        assert!(matches!(state.begin_feedback(), Err(ApiError::RequestPending)));

        assert_eq!(state.finish_feedback(ticket), Applied::Yes);
        assert!(!state.feedback_pending);
        assert_eq!(state.step, WorkflowStep::Validating);
        assert!(state.begin_feedback().is_ok());
    }

    fn png_bytes() -> Vec<u8> {
        let img = image::RgbImage::new(4, 4);
        let mut out = std::io::Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[tokio::test]
    async fn upload_edit_confirm_round_trip_over_http() {
        let server = StubServer::start(vec![
            (200, DOC),
            (500, r#"{"detail": "base de datos ocupada"}"#),
            (200, r#"{"ok": true}"#),
        ])
        .await;
        let client = OcrApiClient::new(&server.base_url).unwrap();
        let mut state = DigitizationState::default();
        state.selected_file = Some(PathBuf::from("hoja.png"));

        let (ticket, path, zone) = state.begin_upload().unwrap();
        let image = ImageUpload::from_bytes(&path, png_bytes()).unwrap();
        let result = client.upload(&image, &zone).await;
        state.finish_upload(ticket, &image.file_name, result);
        assert_eq!(state.step, WorkflowStep::Validating);
        assert_eq!(state.session().unwrap().grid().filled_count(), 2);

        assert!(state.edit_cell(pos(1, 1), "8"));
        assert!(state.edit_cell(pos(4, 4), "X"));

        let (ticket, id, commit) = state.begin_confirm("admin").unwrap();
        let result = client.commit_validation(&id, &commit).await;
        state.finish_confirm(ticket, result);
        assert_eq!(state.step, WorkflowStep::Validating);
        assert!(state.last_error.as_deref().unwrap().contains("base de datos ocupada"));

        let (ticket, id, commit) = state.begin_confirm("admin").unwrap();
        let result = client.commit_validation(&id, &commit).await;
        state.finish_confirm(ticket, result);
        assert_eq!(state.step, WorkflowStep::Success);

        let requests = server.finish().await;
        assert_eq!(requests.len(), 3);
        let put = &requests[2];
        assert_eq!(put.method, "PUT");
        assert_eq!(put.path, "/api/v1/registros/11/validacion");
        let body = put.body_json();
        assert_eq!(body["comentarios"], "Validado por admin");
        let cambios = body["cambios"].as_array().unwrap();
        assert_eq!(cambios.len(), 4);
        assert_eq!(cambios[1]["valor"], "8");
        assert_eq!(cambios[1]["ref_id"], "R1_C1");
        assert_eq!(cambios[1]["fila"], "Fila 2");
        assert_eq!(cambios[2]["fila"], "Fila 8");
        assert_eq!(cambios[3]["valor"], "X");
        assert_eq!(cambios[3]["confianza"], 1.0);
        assert_eq!(
            state.session().unwrap().cells()[3].row_label,
            RowLabel::Integer(4)
        );
    }
}
