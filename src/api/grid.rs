//! Resolved grid and statistics API endpoints.

use axum::extract::{Path, Query, State};
use serde::Deserialize;

use super::{ApiResponse, ApiResult};
use crate::errors::AppError;
use crate::grid;
use crate::models::{ActivityCount, ScheduleGrid, Weekday};
use crate::AppState;

/// GET /api/grid/:weekday - The fully resolved board for one weekday.
pub async fn get_grid(
    State(state): State<AppState>,
    Path(weekday): Path<String>,
) -> ApiResult<ScheduleGrid> {
    let weekday = Weekday::parse(&weekday).ok_or_else(|| {
        AppError::validation_field("weekday", "Weekday must be one of the seven weekday codes")
    })?;

    if let Some(cached) = state.grids.get(weekday).await {
        return Ok(ApiResponse::new(cached));
    }

    let professionals = state.repo.list_professionals().await?;
    let slots = state.repo.list_base_time_slots().await?;
    let assignments = state.repo.list_assignments_by_day(weekday).await?;
    let kinds = state.repo.list_activity_kinds().await?;

    let resolved = grid::build_grid(weekday, &slots, &professionals, &assignments, &kinds);
    state.grids.put(weekday, resolved.clone()).await;

    Ok(ApiResponse::new(resolved))
}

/// Query parameters for the stats endpoint.
#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    #[serde(default)]
    pub limit: Option<usize>,
}

/// GET /api/stats?limit=N - Activity distribution across all weekdays.
pub async fn get_stats(
    State(state): State<AppState>,
    Query(query): Query<StatsQuery>,
) -> ApiResult<Vec<ActivityCount>> {
    let assignments = state.repo.list_assignments().await?;
    let kinds = state.repo.list_activity_kinds().await?;

    let counts = grid::activity_distribution(&assignments, &kinds, query.limit);

    Ok(ApiResponse::new(counts))
}
