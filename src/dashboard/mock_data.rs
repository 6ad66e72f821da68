// src/dashboard/mock_data.rs
// Demo figures shown on the dashboard. Nothing here comes from the OCR backend.

use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct ZoneSummary {
    pub zone_id: u32,
    pub name: &'static str,
    pub sheets_processed: u32,
    pub average_confidence: f64,
    pub pending_validations: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetStatus {
    Validated,
    PendingReview,
    Rejected,
}

impl SheetStatus {
    pub fn label(&self) -> &'static str {
        match self {
            SheetStatus::Validated => "Validated",
            SheetStatus::PendingReview => "Pending review",
            SheetStatus::Rejected => "Rejected",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecentSheet {
    pub sheet_id: u32,
    pub zone_id: u32,
    pub captured_on: NaiveDate,
    pub status: SheetStatus,
    pub average_confidence: f64,
}

pub fn zone_summaries() -> Vec<ZoneSummary> {
    vec![
        ZoneSummary {
            zone_id: 1,
            name: "Bahía Norte",
            sheets_processed: 148,
            average_confidence: 0.91,
            pending_validations: 6,
        },
        ZoneSummary {
            zone_id: 2,
            name: "Estero Sur",
            sheets_processed: 97,
            average_confidence: 0.87,
            pending_validations: 11,
        },
        ZoneSummary {
            zone_id: 3,
            name: "Canal Central",
            sheets_processed: 63,
            average_confidence: 0.79,
            pending_validations: 14,
        },
        ZoneSummary {
            zone_id: 4,
            name: "Isla Grande",
            sheets_processed: 22,
            average_confidence: 0.94,
            pending_validations: 1,
        },
    ]
}

pub fn recent_sheets() -> Vec<RecentSheet> {
    let day = |m, d| NaiveDate::from_ymd_opt(2024, m, d).unwrap_or_default();
    vec![
        RecentSheet {
            sheet_id: 331,
            zone_id: 1,
            captured_on: day(5, 14),
            status: SheetStatus::Validated,
            average_confidence: 0.93,
        },
        RecentSheet {
            sheet_id: 330,
            zone_id: 3,
            captured_on: day(5, 13),
            status: SheetStatus::PendingReview,
            average_confidence: 0.71,
        },
        RecentSheet {
            sheet_id: 329,
            zone_id: 2,
            captured_on: day(5, 13),
            status: SheetStatus::Validated,
            average_confidence: 0.88,
        },
        RecentSheet {
            sheet_id: 328,
            zone_id: 2,
            captured_on: day(5, 12),
            status: SheetStatus::Rejected,
            average_confidence: 0.42,
        },
        RecentSheet {
            sheet_id: 327,
            zone_id: 4,
            captured_on: day(5, 10),
            status: SheetStatus::Validated,
            average_confidence: 0.96,
        },
    ]
}
