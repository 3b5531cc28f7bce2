use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, Duration, NaiveDate};

use crate::models::{AggregateStats, DayEntry, FoodCount};

/// First date of a window of `window_days` calendar days ending on `today`.
pub fn window_start(window_days: i64, today: NaiveDate) -> NaiveDate {
    today - Duration::days(window_days.max(1) - 1)
}

/// Aggregate the entry set over an optional trailing window. `today` is the
/// reference date for the window so callers control the clock.
pub fn calculate_all(
    entries: &[DayEntry],
    window_days: Option<i64>,
    today: NaiveDate,
) -> AggregateStats {
    let windowed: Vec<&DayEntry> = match window_days {
        Some(days) => {
            let start = window_start(days, today);
            entries
                .iter()
                .filter(|entry| entry.date >= start && entry.date <= today)
                .collect()
        }
        None => entries.iter().collect(),
    };

    let mut severity_sum = 0i64;
    let mut severity_count = 0usize;
    let mut good_days = 0usize;
    let mut bad_days = 0usize;
    let mut distribution: BTreeMap<i32, usize> = (1..=5).map(|severity| (severity, 0)).collect();
    let mut dow_sums = [0i64; 7];
    let mut dow_counts = [0usize; 7];
    let mut food_days: BTreeMap<&str, usize> = BTreeMap::new();

    for entry in &windowed {
        if let Some(severity) = entry.severity {
            severity_sum += severity as i64;
            severity_count += 1;
            *distribution.entry(severity).or_insert(0) += 1;
            match severity {
                1 | 2 => good_days += 1,
                4 | 5 => bad_days += 1,
                _ => {}
            }
            let weekday = entry.date.weekday().num_days_from_monday() as usize;
            dow_sums[weekday] += severity as i64;
            dow_counts[weekday] += 1;
        }

        // The store keeps food names unique per day; the set guards the
        // distinct-days count anyway.
        for food in entry.foods.iter().collect::<BTreeSet<_>>() {
            *food_days.entry(food.as_str()).or_insert(0) += 1;
        }
    }

    let average_severity = if severity_count == 0 {
        0.0
    } else {
        severity_sum as f64 / severity_count as f64
    };

    let mut top_foods: Vec<FoodCount> = food_days
        .into_iter()
        .map(|(food, days)| FoodCount {
            food: food.to_string(),
            days,
        })
        .collect();
    top_foods.sort_by(|a, b| b.days.cmp(&a.days).then(a.food.cmp(&b.food)));

    let mut day_of_week_averages = [0.0f64; 7];
    for weekday in 0..7 {
        if dow_counts[weekday] > 0 {
            day_of_week_averages[weekday] = dow_sums[weekday] as f64 / dow_counts[weekday] as f64;
        }
    }

    AggregateStats {
        total_entries: windowed.len(),
        average_severity,
        good_days,
        bad_days,
        severity_distribution: distribution,
        top_foods,
        day_of_week_averages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn entry(date: NaiveDate, severity: Option<i32>, foods: &[&str]) -> DayEntry {
        let now = Utc::now();
        DayEntry {
            date,
            severity,
            foods: foods.iter().map(|f| f.to_string()).collect(),
            skin_notes: String::new(),
            food_notes: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn empty_entry_set_yields_zeroed_stats() {
        let stats = calculate_all(&[], None, date(2024, 3, 1));
        assert_eq!(stats.total_entries, 0);
        assert_eq!(stats.average_severity, 0.0);
        assert_eq!(stats.good_days, 0);
        assert_eq!(stats.bad_days, 0);
        for severity in 1..=5 {
            assert_eq!(stats.severity_distribution[&severity], 0);
        }
        assert!(stats.top_foods.is_empty());
        assert_eq!(stats.day_of_week_averages, [0.0; 7]);
    }

    #[test]
    fn average_excludes_unrated_entries() {
        let entries = vec![
            entry(date(2024, 1, 1), Some(3), &[]),
            entry(date(2024, 1, 2), None, &["Milk"]),
        ];
        let stats = calculate_all(&entries, None, date(2024, 1, 2));
        assert_eq!(stats.total_entries, 2);
        assert_eq!(stats.average_severity, 3.0);
    }

    #[test]
    fn good_and_bad_days_follow_severity_bands() {
        let entries = vec![
            entry(date(2024, 1, 1), Some(1), &[]),
            entry(date(2024, 1, 2), Some(2), &[]),
            entry(date(2024, 1, 3), Some(3), &[]),
            entry(date(2024, 1, 4), Some(4), &[]),
            entry(date(2024, 1, 5), Some(5), &[]),
        ];
        let stats = calculate_all(&entries, None, date(2024, 1, 5));
        assert_eq!(stats.good_days, 2);
        assert_eq!(stats.bad_days, 2);
        assert_eq!(stats.severity_distribution[&3], 1);
    }

    #[test]
    fn window_includes_exactly_window_days_ending_today() {
        let today = date(2024, 2, 10);
        let entries = vec![
            entry(date(2024, 2, 3), Some(5), &["Old"]),  // 7 days before, excluded
            entry(date(2024, 2, 4), Some(2), &["Edge"]), // 6 days before, included
            entry(date(2024, 2, 10), Some(3), &["Today"]),
        ];
        let stats = calculate_all(&entries, Some(7), today);
        assert_eq!(stats.total_entries, 2);
        assert_eq!(stats.severity_distribution[&5], 0);
        assert!(stats.top_foods.iter().all(|f| f.food != "Old"));
    }

    #[test]
    fn top_foods_rank_by_days_then_alphabetically() {
        let entries = vec![
            entry(date(2024, 1, 1), Some(2), &["Cheese", "Bread"]),
            entry(date(2024, 1, 2), Some(2), &["Cheese", "Apple"]),
            entry(date(2024, 1, 3), Some(2), &["Apple", "Bread"]),
        ];
        let stats = calculate_all(&entries, None, date(2024, 1, 3));
        let ranked: Vec<(&str, usize)> = stats
            .top_foods
            .iter()
            .map(|f| (f.food.as_str(), f.days))
            .collect();
        assert_eq!(ranked, vec![("Apple", 2), ("Bread", 2), ("Cheese", 2)]);
    }

    #[test]
    fn duplicate_food_names_on_one_day_count_once() {
        let entries = vec![entry(date(2024, 1, 1), None, &["Milk", "Milk"])];
        let stats = calculate_all(&entries, None, date(2024, 1, 1));
        assert_eq!(stats.top_foods.len(), 1);
        assert_eq!(stats.top_foods[0].days, 1);
    }

    #[test]
    fn weekday_averages_group_by_monday_indexed_weekday() {
        // 2024-01-01 is a Monday, 2024-01-08 the next one.
        let entries = vec![
            entry(date(2024, 1, 1), Some(2), &[]),
            entry(date(2024, 1, 8), Some(4), &[]),
            entry(date(2024, 1, 2), Some(5), &[]), // Tuesday
            entry(date(2024, 1, 3), None, &[]),    // Wednesday, unrated
        ];
        let stats = calculate_all(&entries, None, date(2024, 1, 8));
        assert_eq!(stats.day_of_week_averages[0], 3.0);
        assert_eq!(stats.day_of_week_averages[1], 5.0);
        assert_eq!(stats.day_of_week_averages[2], 0.0);
    }

    #[test]
    fn window_start_counts_inclusive_days() {
        assert_eq!(window_start(7, date(2024, 2, 10)), date(2024, 2, 4));
        assert_eq!(window_start(1, date(2024, 2, 10)), date(2024, 2, 10));
    }
}
