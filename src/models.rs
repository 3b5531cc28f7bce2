use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// One logged day. `date` is the unique key; `severity` is 1 (best skin
/// condition) to 5 (worst), or absent when the day has not been rated yet.
#[derive(Debug, Clone)]
pub struct DayEntry {
    pub date: NaiveDate,
    pub severity: Option<i32>,
    pub foods: Vec<String>,
    pub skin_notes: String,
    pub food_notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FoodCount {
    pub food: String,
    pub days: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct AggregateStats {
    pub total_entries: usize,
    pub average_severity: f64,
    pub good_days: usize,
    pub bad_days: usize,
    pub severity_distribution: BTreeMap<i32, usize>,
    pub top_foods: Vec<FoodCount>,
    /// Indexed Monday = 0 through Sunday = 6.
    pub day_of_week_averages: [f64; 7],
}

#[derive(Debug, Clone, Serialize)]
pub struct FoodPattern {
    pub food: String,
    pub total_occurrences: usize,
    pub triggered_reactions: usize,
    /// Integer percentage of occurrences followed by a flare-up.
    pub probability: i32,
}
