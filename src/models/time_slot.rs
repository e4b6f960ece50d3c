//! Time grid model and wall-clock time helpers.
//!
//! Times are same-day "HH:MM" strings with no timezone; durations never
//! cross midnight.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

/// One row of the time grid.
///
/// Base slots are the building blocks the grid is rendered from; non-base
/// slots register composite/custom ranges activities may span.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub id: i64,
    pub start_time: String,
    pub end_time: String,
    /// Granularity in minutes, when the slot was cut from a regular grid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<i64>,
    pub is_base: bool,
}

/// Request body for creating a new time slot.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTimeSlotRequest {
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
    #[serde(default)]
    pub interval: Option<i64>,
    #[serde(default = "default_is_base")]
    pub is_base: bool,
}

fn default_is_base() -> bool {
    true
}

/// Parse an "HH:MM" string into minutes since midnight.
pub fn time_to_minutes(time: &str) -> Option<i64> {
    let parsed = NaiveTime::parse_from_str(time, "%H:%M").ok()?;
    Some(i64::from(parsed.hour()) * 60 + i64::from(parsed.minute()))
}

/// Validate an "HH:MM" string and return it zero-padded.
///
/// Normalization keeps the dedup key an exact string match ("8:05" and
/// "08:05" must be the same slot).
pub fn normalize_time(time: &str) -> Option<String> {
    let parsed = NaiveTime::parse_from_str(time, "%H:%M").ok()?;
    Some(parsed.format("%H:%M").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_to_minutes() {
        assert_eq!(time_to_minutes("08:00"), Some(480));
        assert_eq!(time_to_minutes("00:00"), Some(0));
        assert_eq!(time_to_minutes("17:30"), Some(1050));
        assert_eq!(time_to_minutes("not a time"), None);
        assert_eq!(time_to_minutes("25:00"), None);
    }

    #[test]
    fn test_normalize_time_pads() {
        assert_eq!(normalize_time("8:05").as_deref(), Some("08:05"));
        assert_eq!(normalize_time("13:30").as_deref(), Some("13:30"));
        assert_eq!(normalize_time("13:65"), None);
        assert_eq!(normalize_time(""), None);
    }
}
