//! REST API module.
//!
//! Contains all API routes and handlers. Success payloads ride in a
//! `{success, data}` envelope; failures surface through `AppError`'s
//! response mapping.

mod activity_kinds;
mod assignments;
mod grid;
mod professionals;
mod time_slots;

pub use activity_kinds::*;
pub use assignments::*;
pub use grid::*;
pub use professionals::*;
pub use time_slots::*;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Success response envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Response type that can be either success or error.
pub type ApiResult<T> = Result<ApiResponse<T>, crate::errors::AppError>;
