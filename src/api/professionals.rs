//! Professional roster API endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{ApiResponse, ApiResult};
use crate::errors::{validation_result, AppError, FieldError};
use crate::models::{CreateProfessionalRequest, Professional, UpdateProfessionalRequest};
use crate::AppState;

/// GET /api/professionals - List the roster.
pub async fn list_professionals(State(state): State<AppState>) -> ApiResult<Vec<Professional>> {
    let professionals = state.repo.list_professionals().await?;
    Ok(ApiResponse::new(professionals))
}

/// GET /api/professionals/:id - Get a single professional.
pub async fn get_professional(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Professional> {
    let professional = state
        .repo
        .get_professional(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Professional {} not found", id)))?;

    Ok(ApiResponse::new(professional))
}

/// POST /api/professionals - Create a new professional.
pub async fn create_professional(
    State(state): State<AppState>,
    Json(request): Json<CreateProfessionalRequest>,
) -> ApiResult<Professional> {
    let mut fields = Vec::new();
    if request.name.trim().is_empty() {
        fields.push(FieldError::new("name", "Name is required"));
    }
    if request.initials.trim().is_empty() {
        fields.push(FieldError::new("initials", "Initials are required"));
    }
    validation_result((), fields)?;

    let professional = state.repo.create_professional(&request).await?;

    // A new roster column affects every weekday's grid
    state.grids.clear().await;

    Ok(ApiResponse::new(professional))
}

/// PUT /api/professionals/:id - Update a professional.
pub async fn update_professional(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateProfessionalRequest>,
) -> ApiResult<Professional> {
    if let Some(name) = &request.name {
        if name.trim().is_empty() {
            return Err(AppError::validation_field("name", "Name cannot be blank"));
        }
    }
    if let Some(initials) = &request.initials {
        if initials.trim().is_empty() {
            return Err(AppError::validation_field("initials", "Initials cannot be blank"));
        }
    }

    let professional = state.repo.update_professional(id, &request).await?;
    state.grids.clear().await;

    Ok(ApiResponse::new(professional))
}

/// DELETE /api/professionals/:id - Delete a professional.
pub async fn delete_professional(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<()> {
    state.repo.delete_professional(id).await?;
    state.grids.clear().await;

    Ok(ApiResponse::new(()))
}
