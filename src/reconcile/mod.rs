//! Write reconciliation for assignments.
//!
//! Every write funnels through here: shape validation with field-level
//! detail, reference checks against roster and catalog, and dedup-key
//! resolution. `(professionalId, weekday, startTime, endTime)` identifies a
//! cell; a second write to the same cell merges into the existing row
//! instead of duplicating it. The UNIQUE index backs this up: an insert
//! losing a race surfaces as a conflict and falls back to the update path.

use crate::db::Repository;
use crate::errors::{validation_result, AppError, FieldError};
use crate::models::{
    normalize_time, time_to_minutes, Assignment, AssignmentDraft, BatchPaintRequest,
    NewAssignment, PaintOutcome, UpdateAssignmentRequest, Weekday,
};

/// Create-or-merge an assignment.
///
/// Returns the written row. A caller intending a "create" that lands on an
/// occupied cell gets the merged row back as a success.
pub async fn upsert(repo: &Repository, draft: &AssignmentDraft) -> Result<Assignment, AppError> {
    let new = validate_draft(draft)?;
    check_references(repo, &new).await?;

    if let Some(existing) = repo
        .find_assignment_by_key(new.professional_id, new.weekday, &new.start_time, &new.end_time)
        .await?
    {
        tracing::debug!(
            "Merging write into assignment {} ({} {} {}-{})",
            existing.id,
            new.professional_id,
            new.weekday,
            new.start_time,
            new.end_time
        );
        return repo.update_assignment(existing.id, &new).await;
    }

    match repo.insert_assignment(&new).await {
        Ok(assignment) => Ok(assignment),
        Err(conflict @ AppError::Conflict(_)) => {
            // Lost an insert race on the dedup index; merge into the winner.
            match repo
                .find_assignment_by_key(
                    new.professional_id,
                    new.weekday,
                    &new.start_time,
                    &new.end_time,
                )
                .await?
            {
                Some(existing) => repo.update_assignment(existing.id, &new).await,
                None => Err(conflict),
            }
        }
        Err(e) => Err(e),
    }
}

/// Patch an assignment by id.
///
/// Absent fields keep their current values; the merged result is validated
/// as a whole, so a patch cannot leave the row malformed.
pub async fn update(
    repo: &Repository,
    id: i64,
    patch: &UpdateAssignmentRequest,
) -> Result<Assignment, AppError> {
    let existing = repo
        .get_assignment(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Assignment {} not found", id)))?;

    let merged = AssignmentDraft {
        professional_id: patch.professional_id.or(Some(existing.professional_id)),
        weekday: patch
            .weekday
            .clone()
            .unwrap_or_else(|| existing.weekday.as_str().to_string()),
        start_time: patch
            .start_time
            .clone()
            .unwrap_or_else(|| existing.start_time.clone()),
        end_time: patch
            .end_time
            .clone()
            .unwrap_or_else(|| existing.end_time.clone()),
        activity: patch
            .activity
            .clone()
            .unwrap_or_else(|| existing.activity.clone()),
        location: patch.location.clone().or(existing.location),
        notes: patch.notes.clone().or(existing.notes),
    };

    let new = validate_draft(&merged)?;
    check_references(repo, &new).await?;

    repo.update_assignment(id, &new).await
}

/// Paint one activity definition onto N target cells.
///
/// Each cell is validated and written independently; a failed cell never
/// rolls back the others, and every outcome names its target.
pub async fn paint(repo: &Repository, request: &BatchPaintRequest) -> Vec<PaintOutcome> {
    let mut outcomes = Vec::with_capacity(request.targets.len());

    for target in &request.targets {
        let draft = AssignmentDraft {
            professional_id: target.professional_id,
            weekday: request.weekday.clone(),
            start_time: target.start_time.clone(),
            end_time: target.end_time.clone(),
            activity: request.activity.clone(),
            location: request.location.clone(),
            notes: request.notes.clone(),
        };

        match upsert(repo, &draft).await {
            Ok(assignment) => outcomes.push(PaintOutcome {
                professional_id: target.professional_id,
                start_time: target.start_time.clone(),
                end_time: target.end_time.clone(),
                success: true,
                assignment: Some(assignment),
                error: None,
            }),
            Err(e) => {
                tracing::warn!(
                    "Batch cell ({:?} {}-{}) failed: {}",
                    target.professional_id,
                    target.start_time,
                    target.end_time,
                    e
                );
                outcomes.push(PaintOutcome {
                    professional_id: target.professional_id,
                    start_time: target.start_time.clone(),
                    end_time: target.end_time.clone(),
                    success: false,
                    assignment: None,
                    error: Some(e.to_details()),
                });
            }
        }
    }

    outcomes
}

/// Shape validation. Collects every offending field before rejecting so the
/// caller sees the whole problem at once. Times come back normalized.
pub fn validate_draft(draft: &AssignmentDraft) -> Result<NewAssignment, AppError> {
    let mut fields = Vec::new();

    let professional_id = match draft.professional_id {
        Some(id) if id > 0 => id,
        _ => {
            fields.push(FieldError::new(
                "professionalId",
                "A valid professional id is required",
            ));
            0
        }
    };

    let weekday = match Weekday::parse(&draft.weekday) {
        Some(day) => day,
        None => {
            fields.push(FieldError::new(
                "weekday",
                "Weekday must be one of the seven weekday codes",
            ));
            Weekday::Segunda
        }
    };

    let start_time = match normalize_time(&draft.start_time) {
        Some(time) => time,
        None => {
            fields.push(FieldError::new("startTime", "Time must be in HH:MM format"));
            String::new()
        }
    };

    let end_time = match normalize_time(&draft.end_time) {
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

    let activity = draft.activity.trim().to_string();
    if activity.is_empty() {
        fields.push(FieldError::new("activity", "Activity code is required"));
    }

    validation_result(
        NewAssignment {
            professional_id,
            weekday,
            start_time,
            end_time,
            activity,
            location: clean_optional(&draft.location),
            notes: clean_optional(&draft.notes),
        },
        fields,
    )
}

/// The professional and the activity kind must exist at write time. Kinds
/// deleted later are a read-time fallback concern, not a write error.
async fn check_references(repo: &Repository, new: &NewAssignment) -> Result<(), AppError> {
    if repo.get_professional(new.professional_id).await?.is_none() {
        return Err(AppError::validation_field(
            "professionalId",
            "Unknown professional",
        ));
    }

    if repo.get_activity_kind_by_code(&new.activity).await?.is_none() {
        return Err(AppError::validation_field("activity", "Unknown activity kind"));
    }

    Ok(())
}

fn clean_optional(value: &Option<String>) -> Option<String> {
    value
        .as_ref()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> AssignmentDraft {
        AssignmentDraft {
            professional_id: Some(1),
            weekday: "segunda".to_string(),
            start_time: "08:00".to_string(),
            end_time: "09:30".to_string(),
            activity: "aula".to_string(),
            location: Some("Sala 101".to_string()),
            notes: None,
        }
    }

    #[test]
    fn test_valid_draft_passes() {
        let new = validate_draft(&draft()).unwrap();
        assert_eq!(new.professional_id, 1);
        assert_eq!(new.weekday, Weekday::Segunda);
        assert_eq!(new.start_time, "08:00");
        assert_eq!(new.end_time, "09:30");
        assert_eq!(new.activity, "aula");
        assert_eq!(new.location.as_deref(), Some("Sala 101"));
    }

    #[test]
    fn test_times_are_normalized() {
        let mut d = draft();
        d.start_time = "8:00".to_string();
        d.end_time = "9:30".to_string();

        let new = validate_draft(&d).unwrap();
        assert_eq!(new.start_time, "08:00");
        assert_eq!(new.end_time, "09:30");
    }

    #[test]
    fn test_all_offending_fields_are_collected() {
        let d = AssignmentDraft {
            professional_id: None,
            weekday: "monday".to_string(),
            start_time: "late".to_string(),
            end_time: "later".to_string(),
            activity: "  ".to_string(),
            location: None,
            notes: None,
        };

        let err = validate_draft(&d).unwrap_err();
        match err {
            AppError::Validation { fields, .. } => {
                let names: Vec<&str> = fields.iter().map(|f| f.field.as_str()).collect();
                assert_eq!(
                    names,
                    vec!["professionalId", "weekday", "startTime", "endTime", "activity"]
                );
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_start_must_precede_end() {
        let mut d = draft();
        d.start_time = "10:00".to_string();
        d.end_time = "10:00".to_string();

        let err = validate_draft(&d).unwrap_err();
        match err {
            AppError::Validation { fields, .. } => {
                assert_eq!(fields.len(), 1);
                assert_eq!(fields[0].field, "endTime");
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_optional_text_becomes_none() {
        let mut d = draft();
        d.location = Some("   ".to_string());
        d.notes = Some("".to_string());

        let new = validate_draft(&d).unwrap();
        assert!(new.location.is_none());
        assert!(new.notes.is_none());
    }
}
