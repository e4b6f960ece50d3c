//! Time grid API endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{ApiResponse, ApiResult};
use crate::errors::{validation_result, FieldError};
use crate::models::{normalize_time, time_to_minutes, CreateTimeSlotRequest, TimeSlot};
use crate::AppState;

/// GET /api/time-slots - List all slots ascending by start time.
pub async fn list_time_slots(State(state): State<AppState>) -> ApiResult<Vec<TimeSlot>> {
    let slots = state.repo.list_time_slots().await?;
    Ok(ApiResponse::new(slots))
}

/// POST /api/time-slots - Create a new time slot.
pub async fn create_time_slot(
    State(state): State<AppState>,
    Json(request): Json<CreateTimeSlotRequest>,
) -> ApiResult<TimeSlot> {
    let mut fields = Vec::new();

    let start_time = match normalize_time(&request.start_time) {
        Some(time) => time,
        None => {
            fields.push(FieldError::new("startTime", "Time must be in HH:MM format"));
            String::new()
        }
    };
    let end_time = match normalize_time(&request.end_time) {
        Some(time) => time,
        None => {
            fields.push(FieldError::new("endTime", "Time must be in HH:MM format"));
            String::new()
        }
    };
    if let (Some(start), Some(end)) = (time_to_minutes(&start_time), time_to_minutes(&end_time)) {
        if start >= end {
            fields.push(FieldError::new("endTime", "endTime must be after startTime"));
        }
    }
    validation_result((), fields)?;

    let normalized = CreateTimeSlotRequest {
        start_time,
        end_time,
        interval: request.interval,
        is_base: request.is_base,
    };
    let slot = state.repo.create_time_slot(&normalized).await?;

    // Grid rows changed shape
    state.grids.clear().await;

    Ok(ApiResponse::new(slot))
}

/// DELETE /api/time-slots/:id - Delete a time slot.
pub async fn delete_time_slot(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<()> {
    state.repo.delete_time_slot(id).await?;
    state.grids.clear().await;

    Ok(ApiResponse::new(()))
}
