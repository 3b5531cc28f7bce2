use std::fmt::Write;

use chrono::NaiveDate;

use crate::models::DayEntry;
use crate::{patterns, stats};

const SEVERITY_LABELS: [&str; 5] = ["very good", "good", "average", "bad", "very bad"];
const WEEKDAY_LABELS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

pub fn build_report(
    entries: &[DayEntry],
    window_days: Option<i64>,
    delay_days: i64,
    severity_threshold: i32,
    today: NaiveDate,
) -> String {
    let aggregates = stats::calculate_all(entries, window_days, today);
    let suspects = patterns::detect_patterns(entries, delay_days, severity_threshold);

    let mut output = String::new();
    let window_label = match window_days {
        Some(days) => format!("last {days} days"),
        None => "all recorded days".to_string(),
    };

    let _ = writeln!(output, "# Neuro-Tracker Report");
    let _ = writeln!(output, "Generated for {} (reference date {})", window_label, today);
    let _ = writeln!(output);
    let _ = writeln!(output, "## Overview");
    let _ = writeln!(output, "- Entries: {}", aggregates.total_entries);
    let _ = writeln!(
        output,
        "- Average severity: {:.1}",
        aggregates.average_severity
    );
    let _ = writeln!(output, "- Good days (severity 1-2): {}", aggregates.good_days);
    let _ = writeln!(output, "- Bad days (severity 4-5): {}", aggregates.bad_days);

    let _ = writeln!(output);
    let _ = writeln!(output, "## Severity Distribution");
    let rated: usize = aggregates.severity_distribution.values().sum();
    for (severity, count) in &aggregates.severity_distribution {
        let share = if rated == 0 {
            0.0
        } else {
            *count as f64 / rated as f64 * 100.0
        };
        let _ = writeln!(
            output,
            "- {} ({}): {} days ({:.0}%)",
            severity,
            SEVERITY_LABELS[(*severity - 1) as usize],
            count,
            share
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Most Frequent Foods");
    if aggregates.top_foods.is_empty() {
        let _ = writeln!(output, "No foods recorded for this window.");
    } else {
        for food in aggregates.top_foods.iter().take(10) {
            let _ = writeln!(output, "- {}: {} days", food.food, food.days);
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Average Severity by Weekday");
    for (weekday, label) in WEEKDAY_LABELS.iter().enumerate() {
        let average = aggregates.day_of_week_averages[weekday];
        if average > 0.0 {
            let _ = writeln!(output, "- {label}: {average:.1}");
        } else {
            let _ = writeln!(output, "- {label}: -");
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "## Suspected Trigger Foods (within {} days, severity >= {})",
        delay_days.max(1),
        severity_threshold
    );
    if suspects.is_empty() {
        let _ = writeln!(output, "No foods recorded yet.");
    } else {
        for pattern in suspects.iter().take(10) {
            let _ = writeln!(
                output,
                "- {}: {}% ({} of {} occurrences followed by a flare-up)",
                pattern.food,
                pattern.probability,
                pattern.triggered_reactions,
                pattern.total_occurrences
            );
        }
    }

    output
}

pub fn recent_entries_section(recent: &[DayEntry]) -> String {
    let mut output = String::new();
    let _ = writeln!(output);
    let _ = writeln!(output, "## Recent Entries");

    if recent.is_empty() {
        let _ = writeln!(output, "No entries in this window.");
        return output;
    }

    let mut latest: Vec<&DayEntry> = recent.iter().collect();
    latest.sort_by(|a, b| b.date.cmp(&a.date));
    for entry in latest.iter().take(5) {
        let severity = entry
            .severity
            .map(|s| s.to_string())
            .unwrap_or_else(|| "unrated".to_string());
        let foods = if entry.foods.is_empty() {
            "no foods logged".to_string()
        } else {
            entry.foods.join(", ")
        };
        let _ = writeln!(output, "- {}: severity {}, {}", entry.date, severity, foods);
    }

    output
}
