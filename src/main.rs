use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;

mod db;
mod models;
mod patterns;
mod report;
mod stats;

#[derive(Parser)]
#[command(name = "neuro-tracker")]
#[command(about = "Food and symptom log with trigger pattern detection", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Load realistic seed data
    Seed,
    /// Import day entries from a CSV file
    Import {
        #[arg(long)]
        csv: PathBuf,
    },
    /// Aggregate statistics over a trailing window of days
    Stats {
        /// Number of days ending today; omit for all data
        #[arg(long)]
        window_days: Option<i64>,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Rank foods by how often a flare-up followed their consumption
    Patterns {
        /// Days after consumption to scan for a reaction
        #[arg(long, default_value_t = 2)]
        delay_days: i64,
        /// Minimum severity that counts as a reaction
        #[arg(long, default_value_t = 4)]
        threshold: i32,
        #[arg(long, default_value_t = 10)]
        limit: usize,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Generate a markdown report
    Report {
        #[arg(long)]
        window_days: Option<i64>,
        #[arg(long, default_value_t = 2)]
        delay_days: i64,
        #[arg(long, default_value_t = 4)]
        threshold: i32,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let database_url = std::env::var("DATABASE_URL")
        .context("DATABASE_URL must be set to a Postgres instance")?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .context("failed to connect to Postgres")?;

    match cli.command {
        Commands::InitDb => {
            db::init_db(&pool).await?;
            println!("Schema ready.");
        }
        Commands::Seed => {
            db::seed(&pool).await?;
            println!("Seed data inserted.");
        }
        Commands::Import { csv } => {
            let inserted = db::import_csv(&pool, &csv).await?;
            println!("Inserted {inserted} entries from {}.", csv.display());
        }
        Commands::Stats { window_days, json } => {
            let today = Utc::now().date_naive();
            let entries = db::fetch_all_entries(&pool).await?;
            let aggregates = stats::calculate_all(&entries, window_days, today);

            if json {
                println!("{}", serde_json::to_string_pretty(&aggregates)?);
                return Ok(());
            }

            println!(
                "Entries: {} (average severity {:.1})",
                aggregates.total_entries, aggregates.average_severity
            );
            println!(
                "Good days: {}, bad days: {}",
                aggregates.good_days, aggregates.bad_days
            );
            println!("Severity distribution:");
            for (severity, count) in &aggregates.severity_distribution {
                println!("- {severity}: {count} days");
            }
            println!("Most frequent foods:");
            if aggregates.top_foods.is_empty() {
                println!("- none recorded");
            }
            for food in aggregates.top_foods.iter().take(10) {
                println!("- {}: {} days", food.food, food.days);
            }
        }
        Commands::Patterns {
            delay_days,
            threshold,
            limit,
            json,
        } => {
            let entries = db::fetch_all_entries(&pool).await?;
            let suspects = patterns::detect_patterns(&entries, delay_days, threshold);

            if json {
                println!("{}", serde_json::to_string_pretty(&suspects)?);
                return Ok(());
            }

            if suspects.is_empty() {
                println!("No foods recorded yet.");
                return Ok(());
            }

            println!("Suspected trigger foods:");
            for pattern in suspects.iter().take(limit) {
                println!(
                    "- {}: {}% ({} of {} occurrences followed by a flare-up)",
                    pattern.food,
                    pattern.probability,
                    pattern.triggered_reactions,
                    pattern.total_occurrences
                );
            }
        }
        Commands::Report {
            window_days,
            delay_days,
            threshold,
            out,
        } => {
            let today = Utc::now().date_naive();
            let entries = db::fetch_all_entries(&pool).await?;
            let mut output =
                report::build_report(&entries, window_days, delay_days, threshold, today);

            let start = match window_days {
                Some(days) => stats::window_start(days, today),
                None => entries.first().map(|e| e.date).unwrap_or(today),
            };
            let recent = db::fetch_entries_in_range(&pool, start, today).await?;
            output.push_str(&report::recent_entries_section(&recent));

            std::fs::write(&out, output)?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}
