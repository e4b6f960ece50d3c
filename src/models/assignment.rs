//! Assignment model: the fact that a professional performs an activity
//! within a time range on a given weekday.

use serde::{Deserialize, Serialize};

/// The 7 fixed day-of-week enumerators. No date/calendar dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Segunda,
    Terca,
    Quarta,
    Quinta,
    Sexta,
    Sabado,
    Domingo,
}

impl Weekday {
    pub fn parse(s: &str) -> Option<Weekday> {
        match s {
            "segunda" => Some(Weekday::Segunda),
            "terca" => Some(Weekday::Terca),
            "quarta" => Some(Weekday::Quarta),
            "quinta" => Some(Weekday::Quinta),
            "sexta" => Some(Weekday::Sexta),
            "sabado" => Some(Weekday::Sabado),
            "domingo" => Some(Weekday::Domingo),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Weekday::Segunda => "segunda",
            Weekday::Terca => "terca",
            Weekday::Quarta => "quarta",
            Weekday::Quinta => "quinta",
            Weekday::Sexta => "sexta",
            Weekday::Sabado => "sabado",
            Weekday::Domingo => "domingo",
        }
    }
}

impl std::fmt::Display for Weekday {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted assignment row.
///
/// `(professionalId, weekday, startTime, endTime)` is the natural dedup key;
/// the store never holds two rows with identical values on all four fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: i64,
    pub professional_id: i64,
    pub weekday: Weekday,
    pub start_time: String,
    pub end_time: String,
    /// Activity kind code; resolved against the catalog at read time.
    pub activity: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub updated_at: String,
}

/// A validated assignment payload, ready to be written. Produced only by
/// the reconciler's validation step; times are normalized "HH:MM".
#[derive(Debug, Clone)]
pub struct NewAssignment {
    pub professional_id: i64,
    pub weekday: Weekday,
    pub start_time: String,
    pub end_time: String,
    pub activity: String,
    pub location: Option<String>,
    pub notes: Option<String>,
}

/// Unvalidated write payload for an assignment.
///
/// Fields default instead of failing deserialization so that shape problems
/// surface as field-level validation errors, not a bare 422.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentDraft {
    #[serde(default)]
    pub professional_id: Option<i64>,
    #[serde(default)]
    pub weekday: String,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
    #[serde(default)]
    pub activity: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Partial patch for updating an assignment by id.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAssignmentRequest {
    #[serde(default)]
    pub professional_id: Option<i64>,
    #[serde(default)]
    pub weekday: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub activity: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// One target cell of a batch paint operation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaintTarget {
    #[serde(default)]
    pub professional_id: Option<i64>,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
}

/// Batch write: paint one activity definition onto N selected cells.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchPaintRequest {
    #[serde(default)]
    pub weekday: String,
    #[serde(default)]
    pub activity: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub targets: Vec<PaintTarget>,
}

/// Per-cell outcome of a batch paint. Failures never roll back the other
/// cells; each outcome carries its target so results stay attributable.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaintOutcome {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub professional_id: Option<i64>,
    pub start_time: String,
    pub end_time: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignment: Option<Assignment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<crate::errors::ErrorDetails>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekday_parse_roundtrip() {
        for day in [
            Weekday::Segunda,
            Weekday::Terca,
            Weekday::Quarta,
            Weekday::Quinta,
            Weekday::Sexta,
            Weekday::Sabado,
            Weekday::Domingo,
        ] {
            assert_eq!(Weekday::parse(day.as_str()), Some(day));
        }
        assert_eq!(Weekday::parse("monday"), None);
        assert_eq!(Weekday::parse(""), None);
    }

    #[test]
    fn test_weekday_serde_uses_lowercase_codes() {
        let json = serde_json::to_string(&Weekday::Terca).unwrap();
        assert_eq!(json, "\"terca\"");
        let day: Weekday = serde_json::from_str("\"sabado\"").unwrap();
        assert_eq!(day, Weekday::Sabado);
    }
}
