// src/digitization/payloads.rs
// Request bodies sent to the OCR backend.

use serde::{Deserialize, Serialize};

use super::cell::Cell;

/// Fixed submitting user for training feedback.
pub const FEEDBACK_USER_ID: u32 = 1;

/// Zone used when none was chosen or the chosen one isn't numeric.
pub const DEFAULT_ZONE_ID: &str = "1";
const DEFAULT_ZONE_NUMBER: u32 = 1;

/// Body of `PUT /api/v1/registros/{id}/validacion`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationCommit {
    pub cambios: Vec<Cell>,
    pub comentarios: String,
}

impl ValidationCommit {
    pub fn attribution(user: &str) -> String {
        format!("Validado por {}", user)
    }
}

/// One corrected cell for the training endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectionRecord {
    /// Always present, empty when the cell has no reference id.
    pub ref_id: String,
    pub valor_corregido: String,
    pub fila: Option<i64>,
    pub col: i64,
    pub valor_original: String,
}

/// Body of `POST /api/v1/training/feedback`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRequest {
    pub zona_id: u32,
    pub usuario_id: u32,
    pub correcciones: Vec<CorrectionRecord>,
}

/// Numeric zone id for the feedback body; falls back to the default zone.
pub fn numeric_zone_id(zone: &str) -> u32 {
    zone.trim().parse().unwrap_or(DEFAULT_ZONE_NUMBER)
}
