// src/digitization/session.rs

use std::sync::Arc;

use bevy::log::{debug, warn};

use super::cell::Cell;
use super::document::OcrDocument;
use super::grid::{cell_indices, cell_position, DenseGrid, GridPos};
use super::payloads::{
    numeric_zone_id, CorrectionRecord, FeedbackRequest, ValidationCommit, FEEDBACK_USER_ID,
};

/// Cell list as it was when the document loaded. Read-only by construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot(Arc<[Cell]>);

impl Snapshot {
    fn capture(cells: &[Cell]) -> Self {
        Self(Arc::from(cells))
    }

    pub fn cells(&self) -> &[Cell] {
        &self.0
    }

    /// Value the OCR engine gave for a position; the last claimant wins, as in the grid.
    pub fn value_at(&self, row: Option<i64>, col: i64) -> Option<&str> {
        let row = row?;
        self.0
            .iter()
            .rev()
            .find(|cell| {
                let (r, c) = cell_indices(cell);
                r == Some(row) && c == col
            })
            .map(|cell| cell.value.as_str())
    }
}

/// One document under review: the editable flat cell list plus its load-time snapshot.
#[derive(Debug, Clone)]
pub struct ValidationSession {
    document_id: Option<String>,
    zone_id: String,
    cells: Vec<Cell>,
    snapshot: Snapshot,
}

impl ValidationSession {
    pub fn new(document_id: Option<String>, zone_id: impl Into<String>, cells: Vec<Cell>) -> Self {
        let snapshot = Snapshot::capture(&cells);
        Self {
            document_id,
            zone_id: zone_id.into(),
            cells,
            snapshot,
        }
    }

    /// Starts a session for a freshly uploaded document. The zone the server reports wins
    /// over the one the upload was tagged with.
    pub fn from_document(document: OcrDocument, requested_zone: &str) -> Self {
        let zone = document.zone_id.unwrap_or_else(|| requested_zone.to_string());
        Self::new(document.id, zone, document.cells)
    }

    pub fn document_id(&self) -> Option<&str> {
        self.document_id.as_deref()
    }

    pub fn zone_id(&self) -> &str {
        &self.zone_id
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn grid(&self) -> DenseGrid<'_> {
        DenseGrid::build(&self.cells)
    }

    /// Writes a value at a grid position.
    ///
    /// Existing cells keep their confidence, reference id and label text; only the value
    /// changes. A position nobody claimed gets a new user-entered cell.
    pub fn set_value(&mut self, pos: GridPos, value: impl Into<String>) {
        let value = value.into();
        match self.cells.iter().rposition(|cell| cell_position(cell) == Some(pos)) {
            Some(index) => {
                debug!("Editing cell {} ({},{})", index, pos.row(), pos.col());
                self.cells[index].value = value;
            }
            None => {
                debug!("Adding user-entered cell at ({},{})", pos.row(), pos.col());
                self.cells.push(Cell::user_entered(pos.row(), pos.col(), value));
            }
        }
    }

    /// True when the displayed value differs from what the OCR engine read.
    pub fn is_edited(&self, pos: GridPos) -> bool {
        let current = self.grid().get(pos).map(|cell| cell.value.as_str());
        let original = self.snapshot.value_at(Some(pos.row() as i64), pos.col() as i64);
        match (current, original) {
            (Some(now), Some(before)) => now != before,
            (Some(now), None) => !now.is_empty(),
            _ => false,
        }
    }

    pub fn edited_count(&self) -> usize {
        GridPos::all().filter(|pos| self.is_edited(*pos)).count()
    }

    /// Full cell list for the validation commit, including cells outside the grid.
    pub fn commit_payload(&self, validated_by: &str) -> ValidationCommit {
        ValidationCommit {
            cambios: self.cells.clone(),
            comentarios: ValidationCommit::attribution(validated_by),
        }
    }

    /// One record per current cell, paired with the snapshot value at the same position.
    pub fn corrections(&self) -> Vec<CorrectionRecord> {
        self.cells
            .iter()
            .map(|cell| {
                let (row, col) = cell_indices(cell);
                if cell.reference_id.is_none() {
                    warn!(
                        "Cell at row '{}' col {} has no reference id; sending it anyway",
                        cell.row_label.display(),
                        col
                    );
                }
                CorrectionRecord {
                    ref_id: cell.reference_id_or_empty().to_string(),
                    valor_corregido: cell.value.clone(),
                    fila: row,
                    col,
                    valor_original: self.snapshot.value_at(row, col).unwrap_or_default().to_string(),
                }
            })
            .collect()
    }

    pub fn feedback_request(&self) -> FeedbackRequest {
        FeedbackRequest {
            zona_id: numeric_zone_id(&self.zone_id),
            usuario_id: FEEDBACK_USER_ID,
            correcciones: self.corrections(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digitization::cell::RowLabel;

    fn ocr_cell(label: RowLabel, col: i64, value: &str, confidence: f64, ref_id: &str) -> Cell {
        Cell {
            row_label: label,
            column: col,
            value: value.to_string(),
            confidence,
            reference_id: Some(ref_id.to_string()),
        }
    }

    fn pos(row: usize, col: usize) -> GridPos {
        GridPos::new(row, col).unwrap()
    }

    #[test]
    fn edit_preserves_identity_and_confidence() {
        let mut session = ValidationSession::new(
            Some("1".into()),
            "1",
            vec![ocr_cell(RowLabel::Integer(0), 2, "1", 0.6, "R0_C2")],
        );
        session.set_value(pos(0, 2), "7");

        let cell = &session.cells()[0];
        assert_eq!(cell.value, "7");
        assert_eq!(cell.confidence, 0.6);
        assert_eq!(cell.reference_id.as_deref(), Some("R0_C2"));
        assert_eq!(session.cells().len(), 1);
    }

    #[test]
    fn edit_keeps_label_representation() {
        let mut session = ValidationSession::new(
            None,
            "1",
            vec![ocr_cell(RowLabel::Text("Fila 3".into()), 1, "4", 0.9, "R2_C1")],
        );
        session.set_value(pos(2, 1), "5");
        assert_eq!(session.cells()[0].row_label, RowLabel::Text("Fila 3".into()));
        assert_eq!(session.cells()[0].value, "5");
    }

    #[test]
    fn edit_on_empty_position_appends_user_cell() {
        let mut session = ValidationSession::new(None, "1", Vec::new());
        session.set_value(pos(3, 4), "12");

        assert_eq!(session.cells().len(), 1);
        let cell = &session.cells()[0];
        assert_eq!(cell.row_label, RowLabel::Integer(3));
        assert_eq!(cell.column, 4);
        assert_eq!(cell.confidence, 1.0);
        assert_eq!(cell.reference_id, None);
        assert_eq!(session.grid().get(pos(3, 4)).unwrap().value, "12");
    }

    #[test]
    fn edit_targets_the_displayed_duplicate() {
        let mut session = ValidationSession::new(
            None,
            "1",
            vec![
                ocr_cell(RowLabel::Integer(1), 1, "a", 0.9, "first"),
                ocr_cell(RowLabel::Text("Fila 2".into()), 1, "b", 0.9, "second"),
            ],
        );
        session.set_value(pos(1, 1), "c");
        assert_eq!(session.cells()[0].value, "a");
        assert_eq!(session.cells()[1].value, "c");
    }

    #[test]
    fn snapshot_is_not_touched_by_edits() {
        let mut session = ValidationSession::new(
            None,
            "1",
            vec![ocr_cell(RowLabel::Integer(1), 1, "5", 0.9, "R1_C1")],
        );
        session.set_value(pos(1, 1), "8");
        session.set_value(pos(0, 0), "3");
        assert_eq!(session.snapshot().cells().len(), 1);
        assert_eq!(session.snapshot().cells()[0].value, "5");
    }

    #[test]
    fn corrections_pair_current_with_original() {
        let mut session = ValidationSession::new(
            Some("9".into()),
            "4",
            vec![ocr_cell(RowLabel::Integer(1), 1, "5", 0.7, "R1_C1")],
        );
        session.set_value(pos(1, 1), "8");
        session.set_value(pos(2, 2), "X");

        let request = session.feedback_request();
        assert_eq!(request.zona_id, 4);
        assert_eq!(request.usuario_id, 1);
        assert_eq!(request.correcciones.len(), 2);

        let edited = &request.correcciones[0];
        assert_eq!(edited.ref_id, "R1_C1");
        assert_eq!(edited.valor_original, "5");
        assert_eq!(edited.valor_corregido, "8");
        assert_eq!((edited.fila, edited.col), (Some(1), 1));

        let added = &request.correcciones[1];
        assert_eq!(added.ref_id, "");
        assert_eq!(added.valor_original, "");
        assert_eq!(added.valor_corregido, "X");
    }

    #[test]
    fn corrections_match_original_across_label_formats() {
        let mut session = ValidationSession::new(
            None,
            "1",
            vec![ocr_cell(RowLabel::Text("Fila 1".into()), 3, "2", 0.9, "R0_C3")],
        );
        session.set_value(pos(0, 3), "6");
        let records = session.corrections();
        assert_eq!(records[0].fila, Some(0));
        assert_eq!(records[0].valor_original, "2");
    }

    #[test]
    fn out_of_range_cells_survive_into_payloads() {
        let session = ValidationSession::new(
            Some("5".into()),
            "1",
            vec![
                ocr_cell(RowLabel::Text("7".into()), 0, "far", 0.9, "R7_C0"),
                ocr_cell(RowLabel::Text("???".into()), 0, "junk", 0.9, "R?_C0"),
            ],
        );
        assert_eq!(session.grid().filled_count(), 0);

        let commit = session.commit_payload("admin");
        assert_eq!(commit.cambios.len(), 2);
        assert_eq!(commit.cambios[0].value, "far");
        assert_eq!(commit.comentarios, "Validado por admin");

        let records = session.corrections();
        assert_eq!(records[0].fila, Some(7));
        assert_eq!(records[0].valor_original, "far");
        assert_eq!(records[1].fila, None);
        assert_eq!(records[1].valor_original, "");
    }

    #[test]
    fn edited_tracking() {
        let mut session = ValidationSession::new(
            None,
            "1",
            vec![ocr_cell(RowLabel::Integer(0), 0, "1", 0.9, "R0_C0")],
        );
        assert_eq!(session.edited_count(), 0);
        session.set_value(pos(0, 0), "2");
        session.set_value(pos(4, 4), "");
        assert!(session.is_edited(pos(0, 0)));
        assert!(!session.is_edited(pos(4, 4)));
        session.set_value(pos(0, 0), "1");
        assert_eq!(session.edited_count(), 0);
    }

    #[test]
    fn server_zone_wins_over_requested_zone() {
        let doc = OcrDocument::from_json(
            r#"{ "id": 3, "zona_id": 2, "resultado_ia": { "matriz": [] } }"#,
        )
        .unwrap();
        let session = ValidationSession::from_document(doc, "5");
        assert_eq!(session.zone_id(), "2");
        assert_eq!(session.document_id(), Some("3"));

        let legacy = OcrDocument::from_json(r#"{ "matriz": [] }"#).unwrap();
        assert_eq!(ValidationSession::from_document(legacy, "5").zone_id(), "5");
    }

    #[test]
    fn cell_missing_label_and_column_keeps_the_document() {
        let doc = OcrDocument::from_json(
            r#"{ "id": 8, "resultado_ia": { "matriz": [
                { "fila": "Fila 1", "col": 0, "valor": "10", "confianza": 0.95, "ref_id": "R0_C0" },
                { "valor": "??", "confianza": 0.4, "ref_id": "R_LOST" }
            ] } }"#,
        )
        .unwrap();
        assert_eq!(doc.cells.len(), 2);

        let session = ValidationSession::from_document(doc, "1");
        assert_eq!(session.grid().get(pos(0, 0)).map(|c| c.value.as_str()), Some("10"));

        let commit = session.commit_payload("admin");
        assert_eq!(commit.cambios.len(), 2);
        assert_eq!(commit.cambios[1].column, -1);

        let corrections = session.corrections();
        assert_eq!(corrections.len(), 2);
        assert_eq!(corrections[1].ref_id, "R_LOST");
        assert_eq!(corrections[1].fila, None);
        assert_eq!(corrections[1].col, -1);
        assert_eq!(corrections[1].valor_original, "");
    }
}
