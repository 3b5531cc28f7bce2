use std::collections::{BTreeMap, BTreeSet};

use chrono::{Duration, NaiveDate};

use crate::models::{DayEntry, FoodPattern};

/// For each distinct food across the full history, count how often a day it
/// was eaten was followed within `delay_days` by an entry rated at or above
/// `severity_threshold`. The scan deliberately ignores any time-range window
/// applied to the aggregate view.
pub fn detect_patterns(
    entries: &[DayEntry],
    delay_days: i64,
    severity_threshold: i32,
) -> Vec<FoodPattern> {
    let delay_days = delay_days.max(1);
    let by_date: BTreeMap<NaiveDate, &DayEntry> =
        entries.iter().map(|entry| (entry.date, entry)).collect();

    let mut occurrences: BTreeMap<&str, BTreeSet<NaiveDate>> = BTreeMap::new();
    for entry in entries {
        for food in &entry.foods {
            occurrences.entry(food.as_str()).or_default().insert(entry.date);
        }
    }

    let mut patterns: Vec<FoodPattern> = occurrences
        .into_iter()
        .map(|(food, dates)| {
            let total_occurrences = dates.len();
            let triggered_reactions = dates
                .iter()
                .filter(|occurrence| {
                    (1..=delay_days).any(|offset| {
                        by_date
                            .get(&(**occurrence + Duration::days(offset)))
                            .and_then(|entry| entry.severity)
                            .is_some_and(|severity| severity >= severity_threshold)
                    })
                })
                .count();
            let probability =
                (triggered_reactions as f64 / total_occurrences as f64 * 100.0).round() as i32;

            FoodPattern {
                food: food.to_string(),
                total_occurrences,
                triggered_reactions,
                probability,
            }
        })
        .collect();

    patterns.sort_by(|a, b| {
        b.probability
            .cmp(&a.probability)
            .then(b.total_occurrences.cmp(&a.total_occurrences))
            .then(a.food.cmp(&b.food))
    });
    patterns
}
