use anyhow::Context;
use chrono::NaiveDate;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::DayEntry;

pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

pub async fn seed(pool: &PgPool) -> anyhow::Result<()> {
    let entries = vec![
        (
            (2026, 8, 10),
            Some(2),
            vec!["Oatmeal", "Milk", "Banana"],
            "Calm, slight dryness on forearms",
            "",
        ),
        (
            (2026, 8, 11),
            Some(4),
            vec!["Pizza", "Beer"],
            "Red patches on neck after waking up",
            "Late dinner",
        ),
        (
            (2026, 8, 12),
            Some(3),
            vec!["Rice", "Chicken", "Broccoli"],
            "Still itchy but improving",
            "",
        ),
        (
            (2026, 8, 13),
            None,
            vec!["Pasta", "Tomato sauce"],
            "",
            "Forgot to rate the day",
        ),
        (
            (2026, 8, 14),
            Some(5),
            vec!["Milk", "Chocolate"],
            "Worst flare-up this month",
            "",
        ),
        (
            (2026, 8, 15),
            Some(1),
            vec!["Rice", "Salmon"],
            "Skin fully settled",
            "Kept it plain on purpose",
        ),
    ];

    for ((year, month, day), severity, foods, skin_notes, food_notes) in entries {
        let entry_date = NaiveDate::from_ymd_opt(year, month, day).context("invalid seed date")?;
        let foods: Vec<String> = foods.into_iter().map(str::to_string).collect();

        sqlx::query(
            r#"
            INSERT INTO neuro_tracker.entries
            (id, entry_date, severity, foods, skin_notes, food_notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (entry_date) DO UPDATE
            SET severity = EXCLUDED.severity,
                foods = EXCLUDED.foods,
                skin_notes = EXCLUDED.skin_notes,
                food_notes = EXCLUDED.food_notes,
                updated_at = now()
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(entry_date)
        .bind(severity)
        .bind(&foods)
        .bind(skin_notes)
        .bind(food_notes)
        .execute(pool)
        .await?;
    }

    Ok(())
}

pub async fn fetch_all_entries(pool: &PgPool) -> anyhow::Result<Vec<DayEntry>> {
    let rows = sqlx::query(
        "SELECT entry_date, severity, foods, skin_notes, food_notes, created_at, updated_at \
         FROM neuro_tracker.entries \
         ORDER BY entry_date",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(entry_from_row).collect())
}

pub async fn fetch_entries_in_range(
    pool: &PgPool,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> anyhow::Result<Vec<DayEntry>> {
    let rows = sqlx::query(
        "SELECT entry_date, severity, foods, skin_notes, food_notes, created_at, updated_at \
         FROM neuro_tracker.entries \
         WHERE entry_date BETWEEN $1 AND $2 \
         ORDER BY entry_date",
    )
    .bind(start_date)
    .bind(end_date)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(entry_from_row).collect())
}

fn entry_from_row(row: sqlx::postgres::PgRow) -> DayEntry {
    DayEntry {
        date: row.get("entry_date"),
        severity: row.get("severity"),
        foods: row.get("foods"),
        skin_notes: row.get("skin_notes"),
        food_notes: row.get("food_notes"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

pub async fn import_csv(pool: &PgPool, csv_path: &std::path::Path) -> anyhow::Result<usize> {
    #[derive(serde::Deserialize)]
    struct CsvRow {
        entry_date: NaiveDate,
        severity: Option<i32>,
        foods: String,
        skin_notes: Option<String>,
        food_notes: Option<String>,
    }

    let mut reader = csv::Reader::from_path(csv_path)?;
    let mut inserted = 0usize;

    for result in reader.deserialize::<CsvRow>() {
        let row = result?;

        if let Some(severity) = row.severity {
            if !(1..=5).contains(&severity) {
                anyhow::bail!(
                    "severity {} out of range 1-5 for {}",
                    severity,
                    row.entry_date
                );
            }
        }

        let foods = split_food_list(&row.foods);

        let result = sqlx::query(
            r#"
            INSERT INTO neuro_tracker.entries
            (id, entry_date, severity, foods, skin_notes, food_notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (entry_date) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(row.entry_date)
        .bind(row.severity)
        .bind(&foods)
        .bind(row.skin_notes.unwrap_or_default())
        .bind(row.food_notes.unwrap_or_default())
        .execute(pool)
        .await?;

        if result.rows_affected() > 0 {
            inserted += 1;
        }
    }

    Ok(inserted)
}

/// Split a `;`-separated food list, collapsing duplicates while keeping the
/// first-seen order. Names are matched verbatim apart from the separator trim.
fn split_food_list(raw: &str) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    raw.split(';')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .filter(|name| seen.insert(name.to_string()))
        .map(str::to_string)
        .collect()
}
