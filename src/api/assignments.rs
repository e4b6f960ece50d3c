//! Assignment API endpoints.
//!
//! Creation goes through the reconciler, so a duplicate-key submission
//! merges into the existing row instead of failing or duplicating.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use super::{ApiResponse, ApiResult};
use crate::errors::AppError;
use crate::models::{
    Assignment, AssignmentDraft, BatchPaintRequest, PaintOutcome, UpdateAssignmentRequest, Weekday,
};
use crate::reconcile;
use crate::AppState;

/// Query parameters for listing assignments.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAssignmentsQuery {
    #[serde(default)]
    pub weekday: Option<String>,
    #[serde(default)]
    pub professional_id: Option<i64>,
}

/// GET /api/assignments?weekday=|professionalId= - List assignments for a
/// weekday or a professional.
pub async fn list_assignments(
    State(state): State<AppState>,
    Query(query): Query<ListAssignmentsQuery>,
) -> ApiResult<Vec<Assignment>> {
    if let Some(weekday) = &query.weekday {
        let weekday = Weekday::parse(weekday).ok_or_else(|| {
            AppError::validation_field("weekday", "Weekday must be one of the seven weekday codes")
        })?;
        let assignments = state.repo.list_assignments_by_day(weekday).await?;
        return Ok(ApiResponse::new(assignments));
    }

    if let Some(professional_id) = query.professional_id {
        let assignments = state
            .repo
            .list_assignments_by_professional(professional_id)
            .await?;
        return Ok(ApiResponse::new(assignments));
    }

    Err(AppError::validation_field(
        "weekday",
        "Either weekday or professionalId is required",
    ))
}

/// GET /api/assignments/:id - Get a single assignment.
pub async fn get_assignment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Assignment> {
    let assignment = state
        .repo
        .get_assignment(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Assignment {} not found", id)))?;

    Ok(ApiResponse::new(assignment))
}

/// POST /api/assignments - Create-or-merge an assignment.
pub async fn create_assignment(
    State(state): State<AppState>,
    Json(draft): Json<AssignmentDraft>,
) -> ApiResult<Assignment> {
    let assignment = reconcile::upsert(&state.repo, &draft).await?;

    state.grids.invalidate(assignment.weekday).await;

    Ok(ApiResponse::new(assignment))
}

/// POST /api/assignments/batch - Paint one activity onto N cells.
///
/// Always 200: each cell reports its own outcome.
pub async fn batch_paint_assignments(
    State(state): State<AppState>,
    Json(request): Json<BatchPaintRequest>,
) -> ApiResult<Vec<PaintOutcome>> {
    let outcomes = reconcile::paint(&state.repo, &request).await;

    if outcomes.iter().any(|o| o.success) {
        if let Some(weekday) = Weekday::parse(&request.weekday) {
            state.grids.invalidate(weekday).await;
        }
    }

    Ok(ApiResponse::new(outcomes))
}

/// PUT /api/assignments/:id - Update an assignment.
pub async fn update_assignment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateAssignmentRequest>,
) -> ApiResult<Assignment> {
    let before = state.repo.get_assignment(id).await?;

    let assignment = reconcile::update(&state.repo, id, &request).await?;

    // A weekday change leaves two grids stale
    if let Some(before) = before {
        if before.weekday != assignment.weekday {
            state.grids.invalidate(before.weekday).await;
        }
    }
    state.grids.invalidate(assignment.weekday).await;

    Ok(ApiResponse::new(assignment))
}

/// DELETE /api/assignments/:id - Delete an assignment.
pub async fn delete_assignment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<()> {
    let assignment = state
        .repo
        .get_assignment(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Assignment {} not found", id)))?;

    state.repo.delete_assignment(id).await?;
    state.grids.invalidate(assignment.weekday).await;

    Ok(ApiResponse::new(()))
}
