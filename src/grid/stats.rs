//! Weekly activity distribution.
//!
//! A pure aggregation over the assignment records: group by activity code,
//! count occurrences and sum duration minutes, sort descending for top-N
//! display.

use std::collections::HashMap;

use crate::models::{time_to_minutes, ActivityCount, ActivityKind, Assignment};

/// Aggregate assignments across all weekdays into per-kind totals.
///
/// Display names resolve through the catalog; a dangling code keeps the raw
/// code as its label. `limit` truncates to the top N entries.
pub fn activity_distribution(
    assignments: &[Assignment],
    kinds: &[ActivityKind],
    limit: Option<usize>,
) -> Vec<ActivityCount> {
    let mut totals: HashMap<&str, (i64, i64)> = HashMap::new();

    for assignment in assignments {
        let minutes = match (
            time_to_minutes(&assignment.start_time),
            time_to_minutes(&assignment.end_time),
        ) {
            (Some(start), Some(end)) if end > start => end - start,
            _ => 0,
        };

        let entry = totals.entry(assignment.activity.as_str()).or_insert((0, 0));
        entry.0 += 1;
        entry.1 += minutes;
    }

    let mut counts: Vec<ActivityCount> = totals
        .into_iter()
        .map(|(code, (count, total_minutes))| ActivityCount {
            activity: code.to_string(),
            name: kinds
                .iter()
                .find(|k| k.code == code)
                .map(|k| k.name.clone())
                .unwrap_or_else(|| code.to_string()),
            count,
            total_minutes,
        })
        .collect();

    // Descending by count; ties break on code for a stable listing
    counts.sort_by(|a, b| b.count.cmp(&a.count).then(a.activity.cmp(&b.activity)));

    if let Some(limit) = limit {
        counts.truncate(limit);
    }

    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Weekday;

    fn assignment(professional_id: i64, weekday: Weekday, start: &str, end: &str, activity: &str) -> Assignment {
        Assignment {
            id: 0,
            professional_id,
            weekday,
            start_time: start.to_string(),
            end_time: end.to_string(),
            activity: activity.to_string(),
            location: None,
            notes: None,
            updated_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    fn kind(code: &str, name: &str) -> ActivityKind {
        ActivityKind {
            id: 0,
            code: code.to_string(),
            name: name.to_string(),
            color: "#3b82f6".to_string(),
        }
    }

    #[test]
    fn test_distribution_counts_and_sorts_descending() {
        let assignments = vec![
            assignment(1, Weekday::Segunda, "08:00", "09:00", "aula"),
            assignment(2, Weekday::Segunda, "08:00", "09:30", "aula"),
            assignment(1, Weekday::Quarta, "10:00", "11:00", "aula"),
            assignment(1, Weekday::Terca, "08:00", "10:00", "reuniao"),
            assignment(2, Weekday::Sexta, "14:00", "15:00", "reuniao"),
            assignment(3, Weekday::Sabado, "09:00", "12:00", "plantao"),
        ];
        let kinds = vec![kind("aula", "Aula"), kind("reuniao", "Reunião")];

        let counts = activity_distribution(&assignments, &kinds, None);

        assert_eq!(counts.len(), 3);
        assert_eq!(counts[0].activity, "aula");
        assert_eq!(counts[0].name, "Aula");
        assert_eq!(counts[0].count, 3);
        assert_eq!(counts[0].total_minutes, 60 + 90 + 60);
        assert_eq!(counts[1].activity, "reuniao");
        assert_eq!(counts[1].count, 2);
        // Unknown code keeps the raw code as label
        assert_eq!(counts[2].activity, "plantao");
        assert_eq!(counts[2].name, "plantao");
        assert_eq!(counts[2].total_minutes, 180);
    }

    #[test]
    fn test_distribution_respects_limit() {
        let assignments = vec![
            assignment(1, Weekday::Segunda, "08:00", "09:00", "aula"),
            assignment(1, Weekday::Terca, "08:00", "09:00", "reuniao"),
            assignment(1, Weekday::Quarta, "08:00", "09:00", "estudo"),
        ];

        let counts = activity_distribution(&assignments, &[], Some(2));
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn test_empty_store_yields_empty_distribution() {
        assert!(activity_distribution(&[], &[], None).is_empty());
    }
}
