//! Database repository for CRUD operations.
//!
//! One async method per storage operation; each call is a single round trip
//! against the pool. No multi-step transaction spans components.

use chrono::Utc;
use sqlx::{Row, SqlitePool};

use crate::errors::{AppError, FieldError};
use crate::models::{
    ActivityKind, Assignment, CreateActivityKindRequest, CreateProfessionalRequest,
    CreateTimeSlotRequest, NewAssignment, Professional, TimeSlot, UpdateActivityKindRequest,
    UpdateProfessionalRequest, Weekday,
};

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

/// Whether a sqlx error is a UNIQUE constraint violation.
fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ==================== PROFESSIONAL OPERATIONS ====================

    /// List all professionals in roster order.
    pub async fn list_professionals(&self) -> Result<Vec<Professional>, AppError> {
        let rows = sqlx::query("SELECT id, name, initials, active FROM professionals ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(professional_from_row).collect())
    }

    /// Get a professional by ID.
    pub async fn get_professional(&self, id: i64) -> Result<Option<Professional>, AppError> {
        let row = sqlx::query("SELECT id, name, initials, active FROM professionals WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(professional_from_row))
    }

    /// Create a new professional.
    pub async fn create_professional(
        &self,
        request: &CreateProfessionalRequest,
    ) -> Result<Professional, AppError> {
        let result = sqlx::query("INSERT INTO professionals (name, initials, active) VALUES (?, ?, ?)")
            .bind(&request.name)
            .bind(&request.initials)
            .bind(request.active as i32)
            .execute(&self.pool)
            .await?;

        Ok(Professional {
            id: result.last_insert_rowid(),
            name: request.name.clone(),
            initials: request.initials.clone(),
            active: request.active,
        })
    }

    /// Update a professional.
    pub async fn update_professional(
        &self,
        id: i64,
        request: &UpdateProfessionalRequest,
    ) -> Result<Professional, AppError> {
        let existing = self
            .get_professional(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Professional {} not found", id)))?;

        let name = request.name.as_ref().unwrap_or(&existing.name);
        let initials = request.initials.as_ref().unwrap_or(&existing.initials);
        let active = request.active.unwrap_or(existing.active);

        sqlx::query("UPDATE professionals SET name = ?, initials = ?, active = ? WHERE id = ?")
            .bind(name)
            .bind(initials)
            .bind(active as i32)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(Professional {
            id,
            name: name.clone(),
            initials: initials.clone(),
            active,
        })
    }

    /// Delete a professional.
    pub async fn delete_professional(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM professionals WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Professional {} not found", id)));
        }

        Ok(())
    }

    // ==================== ACTIVITY KIND OPERATIONS ====================

    /// List all activity kinds.
    pub async fn list_activity_kinds(&self) -> Result<Vec<ActivityKind>, AppError> {
        let rows = sqlx::query("SELECT id, code, name, color FROM activity_kinds ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(kind_from_row).collect())
    }

    /// Get an activity kind by ID.
    pub async fn get_activity_kind(&self, id: i64) -> Result<Option<ActivityKind>, AppError> {
        let row = sqlx::query("SELECT id, code, name, color FROM activity_kinds WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(kind_from_row))
    }

    /// Get an activity kind by its stable code.
    pub async fn get_activity_kind_by_code(
        &self,
        code: &str,
    ) -> Result<Option<ActivityKind>, AppError> {
        let row = sqlx::query("SELECT id, code, name, color FROM activity_kinds WHERE code = ?")
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(kind_from_row))
    }

    /// Create a new activity kind. The code must be unique.
    pub async fn create_activity_kind(
        &self,
        request: &CreateActivityKindRequest,
    ) -> Result<ActivityKind, AppError> {
        let result = sqlx::query("INSERT INTO activity_kinds (code, name, color) VALUES (?, ?, ?)")
            .bind(&request.code)
            .bind(&request.name)
            .bind(&request.color)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    AppError::validation_field("code", "Activity code is already in use")
                } else {
                    AppError::from(e)
                }
            })?;

        Ok(ActivityKind {
            id: result.last_insert_rowid(),
            code: request.code.clone(),
            name: request.name.clone(),
            color: request.color.clone(),
        })
    }

    /// Update an activity kind.
    pub async fn update_activity_kind(
        &self,
        id: i64,
        request: &UpdateActivityKindRequest,
    ) -> Result<ActivityKind, AppError> {
        let existing = self
            .get_activity_kind(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Activity kind {} not found", id)))?;

        let code = request.code.as_ref().unwrap_or(&existing.code);
        let name = request.name.as_ref().unwrap_or(&existing.name);
        let color = request.color.as_ref().unwrap_or(&existing.color);

        sqlx::query("UPDATE activity_kinds SET code = ?, name = ?, color = ? WHERE id = ?")
            .bind(code)
            .bind(name)
            .bind(color)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    AppError::validation_field("code", "Activity code is already in use")
                } else {
                    AppError::from(e)
                }
            })?;

        Ok(ActivityKind {
            id,
            code: code.clone(),
            name: name.clone(),
            color: color.clone(),
        })
    }

    /// Delete an activity kind.
    ///
    /// No cascading check: assignments referencing the code keep it and the
    /// resolver falls back to the neutral kind at read time.
    pub async fn delete_activity_kind(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM activity_kinds WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Activity kind {} not found", id)));
        }

        Ok(())
    }

    // ==================== TIME SLOT OPERATIONS ====================

    /// List all time slots ascending by start time.
    pub async fn list_time_slots(&self) -> Result<Vec<TimeSlot>, AppError> {
        let rows = sqlx::query(
            "SELECT id, start_time, end_time, interval_minutes, is_base FROM time_slots ORDER BY start_time, end_time"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(slot_from_row).collect())
    }

    /// List only base (building-block) slots ascending by start time.
    pub async fn list_base_time_slots(&self) -> Result<Vec<TimeSlot>, AppError> {
        let rows = sqlx::query(
            "SELECT id, start_time, end_time, interval_minutes, is_base FROM time_slots WHERE is_base = 1 ORDER BY start_time, end_time"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(slot_from_row).collect())
    }

    /// Create a new time slot.
    pub async fn create_time_slot(
        &self,
        request: &CreateTimeSlotRequest,
    ) -> Result<TimeSlot, AppError> {
        let result = sqlx::query(
            "INSERT INTO time_slots (start_time, end_time, interval_minutes, is_base) VALUES (?, ?, ?, ?)"
        )
        .bind(&request.start_time)
        .bind(&request.end_time)
        .bind(request.interval)
        .bind(request.is_base as i32)
        .execute(&self.pool)
        .await?;

        Ok(TimeSlot {
            id: result.last_insert_rowid(),
            start_time: request.start_time.clone(),
            end_time: request.end_time.clone(),
            interval: request.interval,
            is_base: request.is_base,
        })
    }

    /// Delete a time slot.
    pub async fn delete_time_slot(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM time_slots WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Time slot {} not found", id)));
        }

        Ok(())
    }

    // ==================== ASSIGNMENT OPERATIONS ====================

    /// List every assignment across all weekdays.
    pub async fn list_assignments(&self) -> Result<Vec<Assignment>, AppError> {
        let rows = sqlx::query(
            "SELECT id, professional_id, weekday, start_time, end_time, activity, location, notes, updated_at FROM assignments ORDER BY id"
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(assignment_from_row).collect()
    }

    /// List assignments for one weekday, ascending by start time.
    pub async fn list_assignments_by_day(
        &self,
        weekday: Weekday,
    ) -> Result<Vec<Assignment>, AppError> {
        let rows = sqlx::query(
            "SELECT id, professional_id, weekday, start_time, end_time, activity, location, notes, updated_at FROM assignments WHERE weekday = ? ORDER BY start_time, professional_id"
        )
        .bind(weekday.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(assignment_from_row).collect()
    }

    /// List assignments for one professional across the week.
    pub async fn list_assignments_by_professional(
        &self,
        professional_id: i64,
    ) -> Result<Vec<Assignment>, AppError> {
        let rows = sqlx::query(
            "SELECT id, professional_id, weekday, start_time, end_time, activity, location, notes, updated_at FROM assignments WHERE professional_id = ? ORDER BY weekday, start_time"
        )
        .bind(professional_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(assignment_from_row).collect()
    }

    /// Get an assignment by ID.
    pub async fn get_assignment(&self, id: i64) -> Result<Option<Assignment>, AppError> {
        let row = sqlx::query(
            "SELECT id, professional_id, weekday, start_time, end_time, activity, location, notes, updated_at FROM assignments WHERE id = ?"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(assignment_from_row).transpose()
    }

    /// Find the assignment matching the dedup key, if any.
    pub async fn find_assignment_by_key(
        &self,
        professional_id: i64,
        weekday: Weekday,
        start_time: &str,
        end_time: &str,
    ) -> Result<Option<Assignment>, AppError> {
        let row = sqlx::query(
            "SELECT id, professional_id, weekday, start_time, end_time, activity, location, notes, updated_at FROM assignments WHERE professional_id = ? AND weekday = ? AND start_time = ? AND end_time = ?"
        )
        .bind(professional_id)
        .bind(weekday.as_str())
        .bind(start_time)
        .bind(end_time)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(assignment_from_row).transpose()
    }

    /// Insert a new assignment row.
    ///
    /// A dedup-key collision surfaces as `AppError::Conflict`; the
    /// reconciler treats that as the signal to merge into the existing row.
    pub async fn insert_assignment(
        &self,
        new: &NewAssignment,
    ) -> Result<Assignment, AppError> {
        let now = Utc::now().to_rfc3339();

        let result = sqlx::query(
            "INSERT INTO assignments (professional_id, weekday, start_time, end_time, activity, location, notes, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)"
        )
        .bind(new.professional_id)
        .bind(new.weekday.as_str())
        .bind(&new.start_time)
        .bind(&new.end_time)
        .bind(&new.activity)
        .bind(&new.location)
        .bind(&new.notes)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict(format!(
                    "Assignment already exists for professional {} on {} {}-{}",
                    new.professional_id, new.weekday, new.start_time, new.end_time
                ))
            } else {
                AppError::from(e)
            }
        })?;

        Ok(Assignment {
            id: result.last_insert_rowid(),
            professional_id: new.professional_id,
            weekday: new.weekday,
            start_time: new.start_time.clone(),
            end_time: new.end_time.clone(),
            activity: new.activity.clone(),
            location: new.location.clone(),
            notes: new.notes.clone(),
            updated_at: now,
        })
    }

    /// Replace an assignment's values and refresh its timestamp.
    pub async fn update_assignment(
        &self,
        id: i64,
        new: &NewAssignment,
    ) -> Result<Assignment, AppError> {
        let now = Utc::now().to_rfc3339();

        let result = sqlx::query(
            "UPDATE assignments SET professional_id = ?, weekday = ?, start_time = ?, end_time = ?, activity = ?, location = ?, notes = ?, updated_at = ? WHERE id = ?"
        )
        .bind(new.professional_id)
        .bind(new.weekday.as_str())
        .bind(&new.start_time)
        .bind(&new.end_time)
        .bind(&new.activity)
        .bind(&new.location)
        .bind(&new.notes)
        .bind(&now)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Validation {
                    message: "Another assignment already covers this time range".to_string(),
                    fields: vec![
                        FieldError::new("professionalId", "duplicate assignment key"),
                        FieldError::new("weekday", "duplicate assignment key"),
                        FieldError::new("startTime", "duplicate assignment key"),
                        FieldError::new("endTime", "duplicate assignment key"),
                    ],
                }
            } else {
                AppError::from(e)
            }
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Assignment {} not found", id)));
        }

        Ok(Assignment {
            id,
            professional_id: new.professional_id,
            weekday: new.weekday,
            start_time: new.start_time.clone(),
            end_time: new.end_time.clone(),
            activity: new.activity.clone(),
            location: new.location.clone(),
            notes: new.notes.clone(),
            updated_at: now,
        })
    }

    /// Delete an assignment.
    pub async fn delete_assignment(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM assignments WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Assignment {} not found", id)));
        }

        Ok(())
    }
}

// Helper functions for row conversion

fn professional_from_row(row: &sqlx::sqlite::SqliteRow) -> Professional {
    let active: i32 = row.get("active");
    Professional {
        id: row.get("id"),
        name: row.get("name"),
        initials: row.get("initials"),
        active: active != 0,
    }
}

fn kind_from_row(row: &sqlx::sqlite::SqliteRow) -> ActivityKind {
    ActivityKind {
        id: row.get("id"),
        code: row.get("code"),
        name: row.get("name"),
        color: row.get("color"),
    }
}

fn slot_from_row(row: &sqlx::sqlite::SqliteRow) -> TimeSlot {
    let is_base: i32 = row.get("is_base");
    TimeSlot {
        id: row.get("id"),
        start_time: row.get("start_time"),
        end_time: row.get("end_time"),
        interval: row.get("interval_minutes"),
        is_base: is_base != 0,
    }
}

fn assignment_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Assignment, AppError> {
    let weekday: String = row.get("weekday");
    let weekday = Weekday::parse(&weekday).ok_or_else(|| {
        AppError::Internal(format!("Invalid weekday '{}' in assignments table", weekday))
    })?;

    Ok(Assignment {
        id: row.get("id"),
        professional_id: row.get("professional_id"),
        weekday,
        start_time: row.get("start_time"),
        end_time: row.get("end_time"),
        activity: row.get("activity"),
        location: row.get("location"),
        notes: row.get("notes"),
        updated_at: row.get("updated_at"),
    })
}
