// src/ui/elements/dashboard_view.rs
use bevy_egui::egui;
use egui_extras::{Column, TableBuilder};

use crate::dashboard::{
    count_by_status, format_percent,
    mock_data::{recent_sheets, zone_summaries, SheetStatus},
    totals,
};

pub fn show_dashboard(ui: &mut egui::Ui) {
    let zones = zone_summaries();
    let sheets = recent_sheets();
    let summary = totals(&zones);

    ui.heading("Operations overview");
    ui.weak("Demo data");
    ui.add_space(8.0);

    ui.horizontal(|ui| {
        stat(ui, "Sheets processed", summary.sheets_processed.to_string());
        stat(ui, "Pending validations", summary.pending_validations.to_string());
        stat(
            ui,
            "Weighted confidence",
            summary
                .weighted_confidence
                .map(format_percent)
                .unwrap_or_else(|| "-".to_string()),
        );
        stat(ui, "Zones below threshold", summary.low_confidence_zones.to_string());
    });

    ui.add_space(12.0);
    ui.strong("Zones");
    ui.push_id("zones_table", |ui| {
        TableBuilder::new(ui)
            .striped(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .column(Column::initial(60.0))
            .column(Column::initial(160.0))
            .column(Column::initial(120.0))
            .column(Column::initial(140.0))
            .column(Column::remainder())
            .header(20.0, |mut header| {
                for title in ["Zone", "Name", "Sheets", "Avg. confidence", "Pending"] {
                    header.col(|ui| {
                        ui.strong(title);
                    });
                }
            })
            .body(|mut body| {
                for zone in &zones {
                    body.row(18.0, |mut row| {
                        row.col(|ui| {
                            ui.label(zone.zone_id.to_string());
                        });
                        row.col(|ui| {
                            ui.label(zone.name);
                        });
                        row.col(|ui| {
                            ui.label(zone.sheets_processed.to_string());
                        });
                        row.col(|ui| {
                            confidence_label(ui, zone.average_confidence);
                        });
                        row.col(|ui| {
                            ui.label(zone.pending_validations.to_string());
                        });
                    });
                }
            });
    });

    ui.add_space(12.0);
    ui.horizontal(|ui| {
        ui.strong("Recent sheets");
        ui.weak(format!(
            "{} validated, {} pending, {} rejected",
            count_by_status(&sheets, SheetStatus::Validated),
            count_by_status(&sheets, SheetStatus::PendingReview),
            count_by_status(&sheets, SheetStatus::Rejected),
        ));
    });
    ui.push_id("recent_sheets_table", |ui| {
        TableBuilder::new(ui)
            .striped(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .column(Column::initial(60.0))
            .column(Column::initial(60.0))
            .column(Column::initial(110.0))
            .column(Column::initial(130.0))
            .column(Column::remainder())
            .header(20.0, |mut header| {
                for title in ["Sheet", "Zone", "Captured", "Status", "Confidence"] {
                    header.col(|ui| {
                        ui.strong(title);
                    });
                }
            })
            .body(|mut body| {
                for sheet in &sheets {
                    body.row(18.0, |mut row| {
                        row.col(|ui| {
                            ui.label(format!("#{}", sheet.sheet_id));
                        });
                        row.col(|ui| {
                            ui.label(sheet.zone_id.to_string());
                        });
                        row.col(|ui| {
                            ui.label(sheet.captured_on.format("%Y-%m-%d").to_string());
                        });
                        row.col(|ui| {
                            ui.label(sheet.status.label());
                        });
                        row.col(|ui| {
                            confidence_label(ui, sheet.average_confidence);
                        });
                    });
                }
            });
    });
}

fn stat(ui: &mut egui::Ui, title: &str, value: String) {
    ui.group(|ui| {
        ui.vertical(|ui| {
            ui.weak(title);
            ui.heading(value);
        });
    });
}

fn confidence_label(ui: &mut egui::Ui, confidence: f64) {
    let text = format_percent(confidence);
    if crate::digitization::cell::is_low_confidence(confidence) {
        ui.colored_label(egui::Color32::from_rgb(210, 120, 0), text);
    } else {
        ui.label(text);
    }
}
