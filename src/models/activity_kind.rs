//! Activity kind catalog model.

use serde::{Deserialize, Serialize};

/// A named, colored kind of activity (class, meeting, on-call duty, ...).
///
/// The `code` is the stable key assignments reference; `color` is used only
/// for presentation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityKind {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub color: String,
}

/// Request body for creating a new activity kind.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateActivityKindRequest {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub color: String,
}

/// Request body for updating an existing activity kind.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateActivityKindRequest {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}
