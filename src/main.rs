// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Carbon-Compare command line front end
//!
//! Compares two activities, saves results to local storage and shows the
//! class ranking.

use anyhow::Context;
use carbon_compare::{
    config::Config,
    db::FileBackend,
    format::{format_emission, format_table_time, format_utc_rfc3339},
    models::{Activity, Category, Comparison, IdentityRegistration, UserStatistics},
    services::{equivalent_trees, Owner},
    AppState,
};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "carbon-compare",
    version,
    about = "Compare the carbon footprint of two activities"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compare two options of the same category
    Compare(CompareArgs),
    /// Compare two options and save the result
    Save {
        #[command(flatten)]
        compare: CompareArgs,
        /// Student ID to save under (guest when omitted)
        #[arg(long)]
        student_id: Option<String>,
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// Register a student (or refresh their display name)
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        student_id: String,
    },
    /// List saved records, most recent first
    Records {
        /// Student ID (guest list when omitted)
        #[arg(long)]
        student_id: Option<String>,
    },
    /// Show statistics for one student or the guest list
    Stats {
        #[arg(long)]
        student_id: Option<String>,
    },
    /// Show the class leaderboard, lowest footprint first
    Leaderboard,
    /// Delete all guest records
    ClearGuests,
    /// List emission factors
    Factors {
        #[arg(long)]
        category: Option<Category>,
    },
}

#[derive(clap::Args)]
struct CompareArgs {
    #[arg(long)]
    category: Category,
    /// First option as ITEM=AMOUNT (e.g. car_small=10)
    #[arg(long, value_parser = parse_option)]
    a: OptionArg,
    /// Second option as ITEM=AMOUNT
    #[arg(long, value_parser = parse_option)]
    b: OptionArg,
}

/// Raw `ITEM=AMOUNT` pair as typed by the user.
#[derive(Debug, Clone)]
struct OptionArg {
    item: String,
    amount: String,
}

impl CompareArgs {
    /// Amounts are passed through unvalidated; the engine clamps bad ones.
    fn activities(&self) -> (Activity, Activity) {
        let make = |arg: &OptionArg| {
            Activity::new(
                self.category,
                arg.item.clone(),
                arg.amount.trim().parse().unwrap_or(f64::NAN),
            )
        };
        (make(&self.a), make(&self.b))
    }
}

fn parse_option(s: &str) -> Result<OptionArg, String> {
    s.split_once('=')
        .map(|(item, amount)| OptionArg {
            item: item.trim().to_string(),
            amount: amount.to_string(),
        })
        .ok_or_else(|| format!("expected ITEM=AMOUNT, got '{}'", s))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;
    let state = AppState::open(config).context("Failed to open storage")?;

    match cli.command {
        Command::Compare(args) => {
            let (a, b) = args.activities();
            let comparison = state.engine.compare(&a, &b);
            print_comparison(&state, &comparison);
        }
        Command::Save {
            compare,
            student_id,
            notes,
        } => {
            let (a, b) = compare.activities();
            let comparison = state.engine.compare(&a, &b);
            print_comparison(&state, &comparison);

            let owner = Owner::from_student_id(student_id.as_deref());
            match state.recorder.save(&comparison, &owner, &notes).await {
                Ok(outcome) => {
                    println!("Saved record {}", outcome.record.id);
                    if let Some(entry) = outcome.ranking {
                        println!(
                            "Running total for {}: {}",
                            entry.display_name,
                            format_emission(entry.running_total_emission)
                        );
                    }
                }
                Err(e) => {
                    let notice = e.notice();
                    eprintln!(
                        "Could not save record ({}){}",
                        notice.error,
                        if notice.retryable {
                            "; please retry"
                        } else {
                            ""
                        }
                    );
                    return Err(e.into());
                }
            }
        }
        Command::Register { name, student_id } => {
            let identity = state
                .store
                .register_identity(IdentityRegistration::new(name, student_id))
                .await?;
            println!(
                "Registered {} ({})",
                identity.display_name, identity.external_id
            );
        }
        Command::Records { student_id } => {
            let records = match student_id.as_deref() {
                Some(id) => state.store.records_for(id).await?,
                None => state.store.guest_records().await?,
            };
            for record in &records {
                println!(
                    "{}  {:<14} {}={} vs {}={}  saved {}  {}",
                    format_utc_rfc3339(record.created_at),
                    record.activity_type,
                    record.option_a.activity.item,
                    format_emission(record.option_a.emission),
                    record.option_b.activity.item,
                    format_emission(record.option_b.emission),
                    format_emission(record.savings),
                    record.notes
                );
            }
            println!("{} record(s)", records.len());
        }
        Command::Stats { student_id } => {
            let records = match student_id.as_deref() {
                Some(id) => state.store.records_for(id).await?,
                None => state.store.guest_records().await?,
            };
            let stats = UserStatistics::from_records(&records);
            println!("Records:        {}", stats.total_records);
            println!("Total emission: {}", format_emission(stats.total_emission));
            println!("Total savings:  {}", format_emission(stats.total_savings));
            println!("Trees (1 yr):   {:.2}", stats.trees_saved);
            for (category, emission) in &stats.emission_by_category {
                println!("  {:<14} {}", category, format_emission(*emission));
            }
        }
        Command::Leaderboard => {
            let leaderboard = state.ranking.leaderboard().await?;
            for (rank, entry) in leaderboard.iter().enumerate() {
                println!(
                    "{:>3}. {:<20} {:<12} {:>12}  {}",
                    rank + 1,
                    entry.display_name,
                    entry.external_id,
                    format_emission(entry.running_total_emission),
                    format_table_time(entry.last_updated)
                );
            }
            let stats = state.ranking.class_stats().await?;
            println!(
                "Class size {}, average {}",
                stats.class_size,
                format_emission(stats.class_average_emission)
            );
        }
        Command::ClearGuests => {
            state.store.clear_guest_records().await?;
            println!("Guest records cleared");
        }
        Command::Factors { category } => {
            let categories = match category {
                Some(category) => vec![category],
                None => Category::ALL.to_vec(),
            };
            for category in categories {
                println!("{}:", category);
                let factors = state.engine.factors();
                for factor in factors.items(category) {
                    println!(
                        "  {:<20} {:>7.3} kg CO2e/{:<4} {}",
                        factor.item,
                        factor.factor,
                        factor.unit,
                        factors.describe(category, &factor.item)
                    );
                }
            }
        }
    }

    Ok(())
}

fn print_comparison(state: &AppState<FileBackend>, comparison: &Comparison) {
    for (label, option) in [("A", &comparison.option_a), ("B", &comparison.option_b)] {
        println!(
            "{}: {} x {} -> {}  ({})",
            label,
            option.activity.item,
            option.activity.amount,
            format_emission(option.emission),
            state
                .engine
                .factors()
                .describe(option.activity.category, &option.activity.item)
        );
    }
    let lower = comparison.lower_option();
    println!(
        "Lower: {} (saves {}, about {:.2} trees for a year)",
        lower.activity.item,
        format_emission(comparison.savings),
        equivalent_trees(comparison.savings)
    );
    let category = comparison.option_a.activity.category;
    for line in state
        .engine
        .reduction_advice(comparison.higher_emission(), category)
    {
        println!("  - {}", line);
    }
}

/// Initialize structured JSON logging on stderr.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("carbon_compare=debug,info"));

    tracing_subscriber::registry().with(filter).with(format).init();
}
