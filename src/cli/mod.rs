use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::application::{LedgerService, LedgerSummary};
use crate::domain::{
    format_cents, Category, City, Currency, ExpenseRecord, RawEntry, DATE_FORMAT, FIXED_RATE,
};
use crate::storage::RecordFilter;

/// Tripledger - Travel Expense Ledger
#[derive(Parser)]
#[command(name = "tripledger")]
#[command(about = "A local-first ledger for road-trip expenses")]
#[command(version)]
pub struct Cli {
    /// Database file path (accepted before or after the subcommand)
    #[arg(
        short,
        long,
        global = true,
        env = "TRIPLEDGER_DB",
        default_value = "tripledger.db"
    )]
    pub database: String,

    /// Enable verbose (debug) logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new ledger
    Init,

    /// Record a new expense
    Add {
        /// Amount in the entry currency (e.g., "100" or "45.60")
        amount: String,

        /// City: hangzhou, shenzhen, hong-kong, in-transit
        #[arg(long)]
        city: String,

        /// Category: dining, lodging, sightseeing, vehicle-energy, toll-parking, shopping, other
        #[arg(short, long)]
        category: String,

        /// Currency of the amount: CNY or HKD (HKD is converted at the fixed rate)
        #[arg(long, default_value = "CNY")]
        currency: String,

        /// Date of the expense (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// What the money was spent on
        #[arg(long)]
        description: Option<String>,

        /// Free-text note
        #[arg(short, long)]
        note: Option<String>,
    },

    /// Show totals, breakdowns and the expense list
    Summary {
        /// Output format: table, json
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// List expenses, newest first
    List {
        /// Filter by city
        #[arg(long)]
        city: Option<String>,

        /// Filter by category
        #[arg(short, long)]
        category: Option<String>,

        /// Filter from date (YYYY-MM-DD)
        #[arg(long)]
        from_date: Option<String>,

        /// Filter to date (YYYY-MM-DD)
        #[arg(long)]
        to_date: Option<String>,

        /// Maximum number of expenses to show
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Export all expenses to CSV
    Export {
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Reload expenses from a CSV export
    Import {
        /// Input file (stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,

        /// Validate without importing
        #[arg(long)]
        dry_run: bool,
    },

    /// Show accepted categories
    Categories,

    /// Show accepted cities
    Cities,
}

impl Cli {
    /// Install the stderr log subscriber. `RUST_LOG` takes precedence over `--verbose`.
    pub fn init_logging(&self) {
        let default_level = if self.verbose { "debug" } else { "warn" };
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Init => {
                let service = LedgerService::open(&self.database).await?;
                let count = service.record_count().await?;
                println!("Ledger ready: {} ({} records)", self.database, count);
            }

            Commands::Add {
                amount,
                city,
                category,
                currency,
                date,
                description,
                note,
            } => {
                let service = LedgerService::open(&self.database).await?;
                let date = date.unwrap_or_else(|| {
                    Local::now().date_naive().format(DATE_FORMAT).to_string()
                });

                let raw = RawEntry::new(date, city, category, amount.as_str(), currency.as_str())
                    .with_description(description.unwrap_or_default())
                    .with_note(note.unwrap_or_default());

                let record = service.submit_entry(raw).await?;

                let converted = Currency::from_str(&currency)
                    .filter(|c| !c.is_base())
                    .map(|c| format!(" ({} {} at {})", amount, c, FIXED_RATE))
                    .unwrap_or_default();
                println!(
                    "Recorded expense: {} {} {} ¥{}{}",
                    record.date.format(DATE_FORMAT),
                    record.city,
                    record.category,
                    format_cents(record.amount_base),
                    converted
                );
            }

            Commands::Summary { format } => {
                let service = LedgerService::open(&self.database).await?;
                let summary = service.get_summary().await?;
                run_summary_command(&summary, &format)?;
            }

            Commands::List {
                city,
                category,
                from_date,
                to_date,
                limit,
            } => {
                let service = LedgerService::open(&self.database).await?;
                let filter = RecordFilter {
                    city: city
                        .map(|s| City::from_str(&s).with_context(|| format!("Unknown city '{}'", s)))
                        .transpose()?,
                    category: category
                        .map(|s| {
                            Category::from_str(&s)
                                .with_context(|| format!("Unknown category '{}'", s))
                        })
                        .transpose()?,
                    from_date: from_date
                        .map(|s| parse_date(&s))
                        .transpose()
                        .context("Invalid from-date")?,
                    to_date: to_date
                        .map(|s| parse_date(&s))
                        .transpose()
                        .context("Invalid to-date")?,
                    limit,
                };

                let records = service.list_records(&filter).await?;
                if records.is_empty() {
                    println!("No expenses found.");
                } else {
                    print_records(records.iter());
                }
            }

            Commands::Export { output } => {
                let service = LedgerService::open(&self.database).await?;
                run_export_command(&service, output.as_deref()).await?;
            }

            Commands::Import { input, dry_run } => {
                let service = LedgerService::open(&self.database).await?;
                run_import_command(&service, input.as_deref(), dry_run).await?;
            }

            Commands::Categories => {
                println!("{:<16} {:<16} LABEL", "CATEGORY", "NAME");
                println!("{}", "-".repeat(44));
                for category in Category::ALL {
                    println!(
                        "{:<16} {:<16} {}",
                        category.as_str(),
                        category.display_name(),
                        category.local_label()
                    );
                }
            }

            Commands::Cities => {
                println!("{:<16} {:<16} LABEL", "CITY", "NAME");
                println!("{}", "-".repeat(44));
                for city in City::ALL {
                    println!(
                        "{:<16} {:<16} {}",
                        city.as_str(),
                        city.display_name(),
                        city.local_label()
                    );
                }
            }
        }

        Ok(())
    }
}

fn run_summary_command(summary: &LedgerSummary, format: &str) -> Result<()> {
    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(summary)?);
        }
        "table" => {
            if summary.is_empty() {
                println!("No expenses recorded yet. Add one with `tripledger add`.");
                return Ok(());
            }

            println!("Total spend:     ¥{}", format_cents(summary.total_spend));
            println!("Trip days:       {}", summary.trip_day_count);
            println!("Vehicle energy:  ¥{}", format_cents(summary.vehicle_energy_spend));
            println!();

            println!("{:<20} {:>12} {:>8}", "CATEGORY", "TOTAL", "PERCENT");
            println!("{}", "-".repeat(42));
            for (category, total) in &summary.spend_by_category {
                println!(
                    "{:<20} {:>12} {:>7.1}%",
                    category.display_name(),
                    format_cents(*total),
                    summary.percentage_of_total(*total)
                );
            }
            println!();

            println!("{:<20} {:>12} {:>8}", "CITY", "TOTAL", "PERCENT");
            println!("{}", "-".repeat(42));
            for (city, total) in &summary.spend_by_city {
                println!(
                    "{:<20} {:>12} {:>7.1}%",
                    city.display_name(),
                    format_cents(*total),
                    summary.percentage_of_total(*total)
                );
            }
            println!();

            print_records(summary.records_newest_first().into_iter());
        }
        _ => {
            anyhow::bail!("Invalid format '{}'. Valid formats: table, json", format);
        }
    }
    Ok(())
}

fn print_records<'a>(records: impl Iterator<Item = &'a ExpenseRecord>) {
    println!(
        "{:<12} {:<12} {:<16} {:>10} DESCRIPTION",
        "DATE", "CITY", "CATEGORY", "AMOUNT"
    );
    println!("{}", "-".repeat(76));
    for record in records {
        println!(
            "{:<12} {:<12} {:<16} {:>10} {}",
            record.date.format(DATE_FORMAT),
            record.city.display_name(),
            record.category.display_name(),
            format_cents(record.amount_base),
            truncate(&record.description, 30)
        );
    }
}

async fn run_export_command(service: &LedgerService, output: Option<&str>) -> Result<()> {
    use crate::io::Exporter;
    use std::fs::File;
    use std::io::{stdout, Write};

    let exporter = Exporter::new(service);

    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    let count = exporter.export_records_csv(writer).await?;
    if output.is_some() {
        eprintln!("Exported {} expenses", count);
    }
    Ok(())
}

async fn run_import_command(
    service: &LedgerService,
    input: Option<&str>,
    dry_run: bool,
) -> Result<()> {
    use crate::io::{ImportOptions, Importer};
    use std::fs::File;
    use std::io::{stdin, Read};

    let importer = Importer::new(service);

    let reader: Box<dyn Read> = match input {
        Some(path) => {
            let file =
                File::open(path).with_context(|| format!("Failed to open input file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdin()),
    };

    let result = importer
        .import_records_csv(reader, ImportOptions { dry_run })
        .await?;

    if dry_run {
        println!("Validation complete");
    } else {
        println!("Import complete");
    }
    println!("  Imported: {}", result.imported);
    println!("  Errors:   {}", result.errors.len());

    if !result.errors.is_empty() {
        println!("\nErrors:");
        for error in result.errors.iter().take(10) {
            println!(
                "  Line {}: {}",
                error.line,
                error
                    .field
                    .as_ref()
                    .map(|f| format!("{}: ", f))
                    .unwrap_or_default()
                    + &error.error
            );
        }
        if result.errors.len() > 10 {
            println!("  ... and {} more errors", result.errors.len() - 10);
        }
    }

    Ok(())
}

/// Truncate to `max_len` characters, counting chars rather than bytes.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

fn parse_date(date_str: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date_str, DATE_FORMAT).context("Date must be in YYYY-MM-DD format")
}
