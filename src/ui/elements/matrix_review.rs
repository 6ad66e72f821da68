// src/ui/elements/matrix_review.rs
use bevy_egui::egui;
use egui_extras::{Column, TableBuilder};

use crate::dashboard::format_percent;
use crate::digitization::{
    cell::Cell,
    document::DocumentShape,
    events::{RequestConfirmValidation, RequestResetWorkflow, RequestSubmitFeedback, UpdateGridCell},
    grid::{GridPos, GRID_COLS, GRID_ROWS},
    session::ValidationSession,
    workflow::DigitizationState,
};

use super::app_view::UiEventWriters;

/// How a grid slot is highlighted. Edited outranks low confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellTone {
    Empty,
    Normal,
    LowConfidence,
    Edited,
}

pub fn cell_tone(cell: Option<&Cell>, edited: bool) -> CellTone {
    match cell {
        _ if edited => CellTone::Edited,
        None => CellTone::Empty,
        Some(cell) if cell.is_low_confidence() => CellTone::LowConfidence,
        Some(_) => CellTone::Normal,
    }
}

fn tone_fill(tone: CellTone) -> Option<egui::Color32> {
    match tone {
        CellTone::LowConfidence => Some(egui::Color32::from_rgba_unmultiplied(210, 120, 0, 90)),
        CellTone::Edited => Some(egui::Color32::from_rgba_unmultiplied(40, 120, 220, 90)),
        CellTone::Empty | CellTone::Normal => None,
    }
}

fn cell_hover_text(cell: Option<&Cell>, original: Option<&str>) -> String {
    match cell {
        Some(cell) => {
            let mut text = format!("Confidence {}", format_percent(cell.confidence));
            if let Some(reference) = &cell.reference_id {
                text.push_str(&format!("\nRef {}", reference));
            }
            if let Some(original) = original {
                text.push_str(&format!("\nRead as \"{}\"", original));
            }
            text
        }
        None => "Not read by OCR".to_string(),
    }
}

pub fn show_matrix_review(ui: &mut egui::Ui, state: &DigitizationState, writers: &mut UiEventWriters) {
    let Some(session) = state.session() else {
        ui.label("No document loaded.");
        return;
    };

    ui.heading("2. Review the extracted grid");
    show_document_header(ui, state, session);
    ui.add_space(8.0);

    show_grid(ui, session, writers);

    ui.add_space(8.0);
    ui.horizontal(|ui| {
        legend(ui, CellTone::LowConfidence, "low confidence");
        legend(ui, CellTone::Edited, "edited");
    });

    if let Some(error) = &state.last_error {
        ui.add_space(8.0);
        ui.colored_label(egui::Color32::from_rgb(220, 60, 60), error);
    }

    ui.add_space(12.0);
    ui.horizontal(|ui| {
        if ui
            .add_enabled(!state.commit_pending, egui::Button::new("✔ Confirm validation"))
            .clicked()
        {
            writers.confirm.write(RequestConfirmValidation);
        }
        if state.commit_pending {
            ui.spinner();
        }

        if ui
            .add_enabled(
                !state.feedback_pending,
                egui::Button::new("Send corrections for training"),
            )
            .on_hover_text("Sends every cell with its original OCR value")
            .clicked()
        {
            writers.submit_feedback.write(RequestSubmitFeedback);
        }
        if state.feedback_pending {
            ui.spinner();
        }

        ui.separator();
        if ui.button("Discard and start over").clicked() {
            writers.reset.write(RequestResetWorkflow);
        }
    });
}

fn show_document_header(ui: &mut egui::Ui, state: &DigitizationState, session: &ValidationSession) {
    let grid = session.grid();
    ui.horizontal_wrapped(|ui| {
        ui.label(format!("Document {}", session.document_id().unwrap_or("(no id)")));
        ui.separator();
        ui.label(format!("Zone {}", session.zone_id()));
        ui.separator();
        ui.label(format!("{} of {} cells read", grid.filled_count(), GRID_ROWS * GRID_COLS));
        ui.separator();
        ui.label(format!("{} low confidence", grid.low_confidence_count()));
        ui.separator();
        ui.label(format!("{} edited", session.edited_count()));
    });
    if let Some(summary) = &state.last_upload {
        ui.horizontal_wrapped(|ui| {
            ui.weak(&summary.file_name);
            if let Some(estado) = &summary.estado {
                ui.weak(format!("status: {}", estado));
            }
            if let Some(avg) = summary.average_confidence {
                ui.weak(format!("average confidence {}", format_percent(avg)));
            }
            if summary.shape == DocumentShape::Legacy {
                ui.weak("(legacy response format)");
            }
        });
    }
    let outside = session.cells().len().saturating_sub(grid.filled_count());
    if outside > 0 {
        ui.weak(format!(
            "{} cell(s) fall outside the grid or repeat a position; they are still submitted unchanged.",
            outside
        ));
    }
}

fn show_grid(ui: &mut egui::Ui, session: &ValidationSession, writers: &mut UiEventWriters) {
    let grid = session.grid();
    let snapshot = session.snapshot();

    let mut table = TableBuilder::new(ui)
        .striped(false)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .column(Column::exact(60.0));
    for _ in 0..GRID_COLS {
        table = table.column(Column::initial(90.0).at_least(50.0));
    }

    table
        .header(20.0, |mut header| {
            header.col(|_| {});
            for col in 0..GRID_COLS {
                header.col(|ui| {
                    ui.strong(format!("C{}", col + 1));
                });
            }
        })
        .body(|mut body| {
            for row in 0..GRID_ROWS {
                body.row(24.0, |mut table_row| {
                    table_row.col(|ui| {
                        ui.strong(format!("Fila {}", row + 1));
                    });
                    for col in 0..GRID_COLS {
                        let Some(pos) = GridPos::new(row, col) else {
                            continue;
                        };
                        let cell = grid.get(pos);
                        let tone = cell_tone(cell, session.is_edited(pos));
                        let original = snapshot.value_at(Some(row as i64), col as i64);
                        table_row.col(|ui| {
                            let mut text = cell.map(|c| c.value.clone()).unwrap_or_default();
                            let mut edit = egui::TextEdit::singleline(&mut text)
                                .id_salt(("grid_cell", row, col))
                                .desired_width(f32::INFINITY);
                            if let Some(fill) = tone_fill(tone) {
                                edit = edit.background_color(fill);
                            }
                            let response = ui.add(edit).on_hover_text(cell_hover_text(cell, original));
                            if response.changed() {
                                writers.update_cell.write(UpdateGridCell { pos, value: text });
                            }
                        });
                    }
                });
            }
        });
}

fn legend(ui: &mut egui::Ui, tone: CellTone, label: &str) {
    if let Some(fill) = tone_fill(tone) {
        let (rect, _) = ui.allocate_exact_size(egui::vec2(12.0, 12.0), egui::Sense::hover());
        ui.painter().rect_filled(rect, 2.0, fill);
    }
    ui.weak(label);
}
