//! Schedule grid resolution.
//!
//! Joins the assignment records, the base time grid and the professional
//! roster into a fully populated table. Pure over its inputs: malformed data
//! is a write-time concern, the resolver never errors.

mod cache;
mod stats;

pub use cache::*;
pub use stats::*;

use crate::models::{
    time_to_minutes, ActivityKind, Assignment, GridCell, GridProfessional, GridRow, Professional,
    ScheduleGrid, TimeSlot, Weekday,
};

/// The neutral kind backing every cell with no assignment recorded.
pub const FALLBACK_KIND_CODE: &str = "disponivel";
pub const FALLBACK_KIND_NAME: &str = "Disponível";
pub const FALLBACK_COLOR: &str = "#6b7280";

/// Baseline cell height in pixels; spans scale up from here.
pub const MIN_CELL_HEIGHT: f64 = 70.0;

/// Resolve the board for one weekday.
///
/// Rows follow `slots` order, columns follow `professionals` order, and the
/// result always holds exactly `slots.len() * professionals.len()` cells.
/// An assignment is anchored to the slot sharing its start time (exact
/// match, not range overlap), so a multi-slot activity occupies one cell
/// and stretches visually via its span ratio.
pub fn build_grid(
    weekday: Weekday,
    slots: &[TimeSlot],
    professionals: &[Professional],
    assignments: &[Assignment],
    kinds: &[ActivityKind],
) -> ScheduleGrid {
    let rows = slots
        .iter()
        .map(|slot| GridRow {
            start_time: slot.start_time.clone(),
            end_time: slot.end_time.clone(),
            cells: professionals
                .iter()
                .map(|professional| resolve_cell(weekday, slot, professional, assignments, kinds))
                .collect(),
        })
        .collect();

    ScheduleGrid {
        weekday,
        professionals: professionals
            .iter()
            .map(|p| GridProfessional {
                id: p.id,
                name: p.name.clone(),
                initials: p.initials.clone(),
            })
            .collect(),
        rows,
    }
}

fn resolve_cell(
    weekday: Weekday,
    slot: &TimeSlot,
    professional: &Professional,
    assignments: &[Assignment],
    kinds: &[ActivityKind],
) -> GridCell {
    let anchored = assignments.iter().find(|a| {
        a.professional_id == professional.id
            && a.weekday == weekday
            && a.start_time == slot.start_time
    });

    match anchored {
        Some(assignment) => {
            let (name, color) = resolve_kind(&assignment.activity, kinds);
            let ratio = span_ratio(assignment, slot);

            GridCell {
                professional_id: professional.id,
                assignment_id: Some(assignment.id),
                activity: assignment.activity.clone(),
                activity_name: name,
                color,
                start_time: assignment.start_time.clone(),
                end_time: assignment.end_time.clone(),
                location: assignment.location.clone(),
                notes: assignment.notes.clone(),
                span_ratio: ratio,
                height: cell_height(ratio),
            }
        }
        None => GridCell {
            professional_id: professional.id,
            assignment_id: None,
            activity: FALLBACK_KIND_CODE.to_string(),
            activity_name: FALLBACK_KIND_NAME.to_string(),
            color: FALLBACK_COLOR.to_string(),
            start_time: slot.start_time.clone(),
            end_time: slot.end_time.clone(),
            location: None,
            notes: None,
            span_ratio: 1.0,
            height: MIN_CELL_HEIGHT,
        },
    }
}

/// Look up a kind by code, falling back to the neutral kind when the
/// catalog no longer carries it.
pub fn resolve_kind(code: &str, kinds: &[ActivityKind]) -> (String, String) {
    match kinds.iter().find(|k| k.code == code) {
        Some(kind) => (kind.name.clone(), kind.color.clone()),
        None => (FALLBACK_KIND_NAME.to_string(), FALLBACK_COLOR.to_string()),
    }
}

/// Activity duration over slot duration. 1.0 when the activity fills its
/// anchoring slot exactly, or when either range cannot be measured.
fn span_ratio(assignment: &Assignment, slot: &TimeSlot) -> f64 {
    if assignment.start_time == slot.start_time && assignment.end_time == slot.end_time {
        return 1.0;
    }

    let spans = (
        time_to_minutes(&assignment.start_time),
        time_to_minutes(&assignment.end_time),
        time_to_minutes(&slot.start_time),
        time_to_minutes(&slot.end_time),
    );

    match spans {
        (Some(a_start), Some(a_end), Some(s_start), Some(s_end))
            if a_end > a_start && s_end > s_start =>
        {
            (a_end - a_start) as f64 / (s_end - s_start) as f64
        }
        _ => 1.0,
    }
}

/// Rendering height: the minimum cell height scaled by the span ratio,
/// never below the minimum.
fn cell_height(ratio: f64) -> f64 {
    (MIN_CELL_HEIGHT * ratio).max(MIN_CELL_HEIGHT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn professional(id: i64, name: &str) -> Professional {
        Professional {
            id,
            name: name.to_string(),
            initials: name.chars().take(2).collect::<String>().to_uppercase(),
            active: true,
        }
    }

    fn slot(id: i64, start: &str, end: &str) -> TimeSlot {
        TimeSlot {
            id,
            start_time: start.to_string(),
            end_time: end.to_string(),
            interval: None,
            is_base: true,
        }
    }

    fn assignment(id: i64, professional_id: i64, start: &str, end: &str, activity: &str) -> Assignment {
        Assignment {
            id,
            professional_id,
            weekday: Weekday::Segunda,
            start_time: start.to_string(),
            end_time: end.to_string(),
            activity: activity.to_string(),
            location: None,
            notes: None,
            updated_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    fn kind(id: i64, code: &str, name: &str, color: &str) -> ActivityKind {
        ActivityKind {
            id,
            code: code.to_string(),
            name: name.to_string(),
            color: color.to_string(),
        }
    }

    #[test]
    fn test_grid_is_complete_even_without_assignments() {
        let professionals = vec![professional(1, "Paulo"), professional(2, "Ana")];
        let slots = vec![slot(1, "08:00", "09:00"), slot(2, "09:00", "10:00"), slot(3, "10:00", "11:00")];

        let grid = build_grid(Weekday::Quarta, &slots, &professionals, &[], &[]);

        assert_eq!(grid.rows.len(), 3);
        for row in &grid.rows {
            assert_eq!(row.cells.len(), 2);
            for cell in &row.cells {
                assert_eq!(cell.activity, FALLBACK_KIND_CODE);
                assert_eq!(cell.activity_name, FALLBACK_KIND_NAME);
                assert!(cell.assignment_id.is_none());
                assert_eq!(cell.height, MIN_CELL_HEIGHT);
            }
        }
    }

    #[test]
    fn test_assignment_anchors_to_slot_with_matching_start() {
        let professionals = vec![professional(1, "Paulo")];
        // The activity runs 09:00-11:00; only the 09:00 row may carry it,
        // the 10:00 row it overlaps stays free.
        let slots = vec![slot(1, "08:00", "09:00"), slot(2, "09:00", "10:00"), slot(3, "10:00", "11:00")];
        let assignments = vec![assignment(7, 1, "09:00", "11:00", "aula")];
        let kinds = vec![kind(1, "aula", "Aula", "#3b82f6")];

        let grid = build_grid(Weekday::Segunda, &slots, &professionals, &assignments, &kinds);

        assert!(grid.rows[0].cells[0].assignment_id.is_none());
        assert_eq!(grid.rows[1].cells[0].assignment_id, Some(7));
        assert!(grid.rows[2].cells[0].assignment_id.is_none());
    }

    #[test]
    fn test_span_ratio_doubles_height() {
        let professionals = vec![professional(1, "Paulo")];
        let slots = vec![slot(1, "08:00", "09:00")];
        // 120 minutes over a 60-minute slot
        let assignments = vec![assignment(1, 1, "08:00", "10:00", "aula")];
        let kinds = vec![kind(1, "aula", "Aula", "#3b82f6")];

        let grid = build_grid(Weekday::Segunda, &slots, &professionals, &assignments, &kinds);

        let cell = &grid.rows[0].cells[0];
        assert_eq!(cell.span_ratio, 2.0);
        assert_eq!(cell.height, 140.0);
    }

    #[test]
    fn test_exact_fit_keeps_baseline_height() {
        let professionals = vec![professional(1, "Paulo")];
        let slots = vec![slot(1, "13:30", "15:00")];
        let assignments = vec![assignment(1, 1, "13:30", "15:00", "reuniao")];
        let kinds = vec![kind(1, "reuniao", "Reunião", "#8b5cf6")];

        let grid = build_grid(Weekday::Terca, &slots, &professionals, &assignments, &kinds);

        let cell = &grid.rows[0].cells[0];
        assert_eq!(cell.span_ratio, 1.0);
        assert_eq!(cell.height, MIN_CELL_HEIGHT);
    }

    #[test]
    fn test_short_activity_never_shrinks_below_minimum() {
        let professionals = vec![professional(1, "Paulo")];
        let slots = vec![slot(1, "08:00", "09:00")];
        // 30 minutes over a 60-minute slot: ratio 0.5, height floored
        let assignments = vec![assignment(1, 1, "08:00", "08:30", "plantao")];
        let kinds = vec![kind(1, "plantao", "Plantão", "#22c55e")];

        let grid = build_grid(Weekday::Segunda, &slots, &professionals, &assignments, &kinds);

        let cell = &grid.rows[0].cells[0];
        assert_eq!(cell.span_ratio, 0.5);
        assert_eq!(cell.height, MIN_CELL_HEIGHT);
    }

    #[test]
    fn test_dangling_activity_code_falls_back_but_keeps_text() {
        let professionals = vec![professional(1, "Paulo")];
        let slots = vec![slot(1, "08:00", "09:00")];
        let mut dangling = assignment(1, 1, "08:00", "09:00", "cirurgia");
        dangling.weekday = Weekday::Sexta;
        dangling.location = Some("Sala 3".to_string());
        dangling.notes = Some("Removido do catálogo".to_string());
        // The catalog knows nothing about "cirurgia"
        let kinds = vec![kind(1, "aula", "Aula", "#3b82f6")];

        let grid = build_grid(Weekday::Sexta, &slots, &professionals, &[dangling], &kinds);

        let cell = &grid.rows[0].cells[0];
        assert_eq!(cell.assignment_id, Some(1));
        assert_eq!(cell.activity, "cirurgia");
        assert_eq!(cell.activity_name, FALLBACK_KIND_NAME);
        assert_eq!(cell.color, FALLBACK_COLOR);
        assert_eq!(cell.location.as_deref(), Some("Sala 3"));
        assert_eq!(cell.notes.as_deref(), Some("Removido do catálogo"));
    }

    #[test]
    fn test_assignment_on_other_weekday_is_ignored() {
        let professionals = vec![professional(1, "Paulo")];
        let slots = vec![slot(1, "08:00", "09:00")];
        let assignments = vec![assignment(1, 1, "08:00", "09:00", "aula")];
        let kinds = vec![kind(1, "aula", "Aula", "#3b82f6")];

        let grid = build_grid(Weekday::Domingo, &slots, &professionals, &assignments, &kinds);

        assert!(grid.rows[0].cells[0].assignment_id.is_none());
    }

    #[test]
    fn test_empty_grid_is_valid() {
        let grid = build_grid(Weekday::Segunda, &[], &[], &[], &[]);
        assert!(grid.rows.is_empty());
        assert!(grid.professionals.is_empty());
    }
}
