//! Activity kind catalog API endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{ApiResponse, ApiResult};
use crate::errors::{validation_result, FieldError};
use crate::models::{ActivityKind, CreateActivityKindRequest, UpdateActivityKindRequest};
use crate::AppState;

/// GET /api/activity-kinds - List the catalog.
pub async fn list_activity_kinds(State(state): State<AppState>) -> ApiResult<Vec<ActivityKind>> {
    let kinds = state.repo.list_activity_kinds().await?;
    Ok(ApiResponse::new(kinds))
}

/// POST /api/activity-kinds - Create a new activity kind.
pub async fn create_activity_kind(
    State(state): State<AppState>,
    Json(request): Json<CreateActivityKindRequest>,
) -> ApiResult<ActivityKind> {
    let mut fields = Vec::new();
    if request.code.trim().is_empty() {
        fields.push(FieldError::new("code", "Code is required"));
    }
    if request.name.trim().is_empty() {
        fields.push(FieldError::new("name", "Name is required"));
    }
    if request.color.trim().is_empty() {
        fields.push(FieldError::new("color", "Color is required"));
    }
    validation_result((), fields)?;

    let kind = state.repo.create_activity_kind(&request).await?;

    // Resolved names/colors are baked into cached grids
    state.grids.clear().await;

    Ok(ApiResponse::new(kind))
}

/// PUT /api/activity-kinds/:id - Update an activity kind.
pub async fn update_activity_kind(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateActivityKindRequest>,
) -> ApiResult<ActivityKind> {
    let kind = state.repo.update_activity_kind(id, &request).await?;
    state.grids.clear().await;

    Ok(ApiResponse::new(kind))
}

/// DELETE /api/activity-kinds/:id - Delete an activity kind.
///
/// Assignments referencing the code are left alone; the resolver renders
/// them with the neutral fallback from now on.
pub async fn delete_activity_kind(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<()> {
    state.repo.delete_activity_kind(id).await?;
    state.grids.clear().await;

    Ok(ApiResponse::new(()))
}
