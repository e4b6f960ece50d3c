//! Read-time projections: the resolved schedule grid and the weekly
//! activity distribution. Neither is persisted; both are rebuilt from the
//! record sets on every query.

use serde::Serialize;

use super::Weekday;

/// Column header of the grid: the professional as the table shows them.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridProfessional {
    pub id: i64,
    pub name: String,
    pub initials: String,
}

/// One resolved cell. Always populated: an unanchored (professional, slot)
/// pair carries the neutral fallback kind, never null.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridCell {
    pub professional_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignment_id: Option<i64>,
    pub activity: String,
    pub activity_name: String,
    pub color: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Activity duration over slot duration; 1.0 when they coincide.
    pub span_ratio: f64,
    /// Rendering height in pixels, floored at the minimum cell height.
    pub height: f64,
}

/// One row of the grid, keyed by a base time slot.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridRow {
    pub start_time: String,
    pub end_time: String,
    pub cells: Vec<GridCell>,
}

/// The fully resolved board for one weekday: rows = time slots, columns =
/// professionals, exactly `rows.len() * professionals.len()` cells.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleGrid {
    pub weekday: Weekday,
    pub professionals: Vec<GridProfessional>,
    pub rows: Vec<GridRow>,
}

/// One entry of the weekly activity distribution, sorted descending by
/// occurrence count.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityCount {
    pub activity: String,
    pub name: String,
    pub count: i64,
    pub total_minutes: i64,
}
