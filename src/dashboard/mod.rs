// src/dashboard/mod.rs

pub mod mock_data;

use mock_data::{RecentSheet, SheetStatus, ZoneSummary};

use crate::digitization::cell::is_low_confidence;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DashboardTotals {
    pub sheets_processed: u32,
    pub pending_validations: u32,
    /// Average confidence weighted by how many sheets each zone processed.
    pub weighted_confidence: Option<f64>,
    pub low_confidence_zones: usize,
}

pub fn totals(zones: &[ZoneSummary]) -> DashboardTotals {
    let sheets_processed = zones.iter().map(|z| z.sheets_processed).sum();
    let pending_validations = zones.iter().map(|z| z.pending_validations).sum();
    DashboardTotals {
        sheets_processed,
        pending_validations,
        weighted_confidence: weighted_average_confidence(zones),
        low_confidence_zones: zones
            .iter()
            .filter(|z| is_low_confidence(z.average_confidence))
            .count(),
    }
}

/// `None` when no zone processed any sheet.
pub fn weighted_average_confidence(zones: &[ZoneSummary]) -> Option<f64> {
    let weight: u32 = zones.iter().map(|z| z.sheets_processed).sum();
    if weight == 0 {
        return None;
    }
    let weighted: f64 = zones
        .iter()
        .map(|z| z.average_confidence * f64::from(z.sheets_processed))
        .sum();
    Some(weighted / f64::from(weight))
}

pub fn count_by_status(sheets: &[RecentSheet], status: SheetStatus) -> usize {
    sheets.iter().filter(|s| s.status == status).count()
}

pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}
