mod config;
mod db;
mod filter;
mod models;
mod posting;
mod queue;
mod seed;
mod swipe;
mod tui;
mod unlock;
mod vocabulary;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::Config;
use db::{Database, SeedStats};
use filter::{FilterCategory, FilterSelection};
use models::{Job, Listing, Role};
use posting::JobPosting;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tui::truncate;

#[derive(Parser)]
#[command(name = "deck")]
#[command(about = "Swipe through local job and candidate listings and unlock the ones you like")]
struct Cli {
    /// Path to a config.json (defaults to the platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database
    Init,

    /// Load the generated marketplace listings
    Seed {
        /// Replace existing listings
        #[arg(long)]
        force: bool,
    },

    /// List jobs matching the search and filters
    Jobs {
        /// Free-text search over title and location
        #[arg(short, long, default_value = "")]
        query: String,

        /// Filter as category=value, repeatable (e.g. -f industry=Retail)
        #[arg(short, long = "filter")]
        filters: Vec<String>,
    },

    /// List candidates matching the search and filters
    Candidates {
        /// Free-text search over location and skills
        #[arg(short, long, default_value = "")]
        query: String,

        /// Filter as category=value, repeatable (e.g. -f "education=Bachelor's Degree")
        #[arg(short, long = "filter")]
        filters: Vec<String>,
    },

    /// Swipe through listings in the terminal
    Browse {
        /// seeker (browse jobs) or employer (browse candidates)
        role: Role,

        #[arg(short, long, default_value = "")]
        query: String,

        #[arg(short, long = "filter")]
        filters: Vec<String>,
    },

    /// Publish a job listing
    PostJob {
        #[arg(long)]
        title: String,

        /// Legal company name, hidden from seekers when --anonymous
        #[arg(long)]
        company: String,

        #[arg(long)]
        industry: String,

        #[arg(long)]
        location: String,

        /// One of the seeker pay ranges (see `deck filters`)
        #[arg(long)]
        pay: String,

        #[arg(long, default_value = "Full-time")]
        job_type: String,

        #[arg(long)]
        description: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        phone: String,

        /// Show the industry instead of the company name until unlocked
        #[arg(long)]
        anonymous: bool,
    },

    /// Show unlocked listings and when they were unlocked
    Unlocked {
        role: Role,
    },

    /// Show the filter values offered to a role
    Filters {
        #[arg(default_value = "seeker")]
        role: Role,
    },
}

fn parse_filters(args: &[String]) -> Result<FilterSelection> {
    let mut selection = FilterSelection::new();
    for arg in args {
        selection
            .add_arg(arg)
            .with_context(|| format!("Invalid filter '{}'", arg))?;
    }
    Ok(selection)
}

fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn open_db(config: &Config) -> Result<Database> {
    match &config.database {
        Some(path) => Database::open_at(path),
        None => Database::open(),
    }
}

/// Opens the store, creating and seeding it on first use.
fn open_store(config: &Config) -> Result<Database> {
    let db = open_db(config)?;
    db.init()?;
    let stats = db.seed(false)?;
    if stats.jobs + stats.candidates > 0 {
        info!(path = %db.path().display(), "first run, listings seeded");
    }
    Ok(db)
}

/// Creates the tables and loads the generated listings. Reports what was loaded.
fn seed_store(db: &Database, force: bool) -> Result<SeedStats> {
    db.init()?;
    db.seed(force)
}

fn post_job(db: &Database, posting: JobPosting) -> Result<Job> {
    let job = posting
        .into_job(db.next_job_id()?)
        .context("Invalid job posting")?;
    db.add_job(&job)?;
    Ok(job)
}

fn print_filter_summary(filters: &FilterSelection, query: &str, shown: usize, total: usize) {
    if !query.is_empty() || !filters.is_empty() {
        println!(
            "\n{} of {} shown (query '{}', {} filter values)",
            shown,
            total,
            query,
            filters.active_count()
        );
    }
}

fn print_vocabulary(name: &str, values: &[&str]) {
    println!("{}:", name);
    for line in textwrap::wrap(&values.join(", "), 76) {
        println!("  {}", line);
    }
    println!();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    init_logging(&config);

    match cli.command {
        Commands::Init => {
            let db = open_store(&config)?;
            println!("Database initialized at {}", db.path().display());
        }

        Commands::Seed { force } => {
            let db = open_db(&config)?;
            let stats = seed_store(&db, force)?;
            if stats == Default::default() {
                println!("Listings already present. Use --force to replace them.");
            } else {
                println!("Seeded {} jobs and {} candidates", stats.jobs, stats.candidates);
            }
        }

        Commands::Jobs { query, filters } => {
            let selection = parse_filters(&filters)?;
            let db = open_store(&config)?;
            let jobs = db.list_jobs()?;
            let shown = filter::filter_jobs(&jobs, &selection, &query);
            if shown.is_empty() {
                println!("No jobs found.");
            } else {
                println!(
                    "{:<8} {:<30} {:<24} {:<16} {:>12}",
                    "ID", "TITLE", "COMPANY", "LOCATION", "PAY"
                );
                println!("{}", "-".repeat(94));
                for job in &shown {
                    println!(
                        "{:<8} {:<30} {:<24} {:<16} {:>12}",
                        job.id,
                        truncate(&job.title, 28),
                        truncate(&job.public_company(), 22),
                        truncate(job.location.as_deref().unwrap_or("-"), 14),
                        job.pay_range.as_deref().unwrap_or("-"),
                    );
                }
            }
            print_filter_summary(&selection, &query, shown.len(), jobs.len());
        }

        Commands::Candidates { query, filters } => {
            let selection = parse_filters(&filters)?;
            let db = open_store(&config)?;
            let candidates = db.list_candidates()?;
            let shown = filter::filter_candidates(&candidates, &selection, &query);
            if shown.is_empty() {
                println!("No candidates found.");
            } else {
                println!(
                    "{:<8} {:<34} {:<16} {:>5} {:<22}",
                    "ID", "TITLE", "LOCATION", "YEARS", "EDUCATION"
                );
                println!("{}", "-".repeat(89));
                for c in &shown {
                    println!(
                        "{:<8} {:<34} {:<16} {:>5} {:<22}",
                        c.id,
                        truncate(&c.display_title(), 32),
                        truncate(c.location.as_deref().unwrap_or("-"), 14),
                        c.years_experience.to_string(),
                        truncate(c.education.as_deref().unwrap_or("-"), 22),
                    );
                }
            }
            print_filter_summary(&selection, &query, shown.len(), candidates.len());
        }

        Commands::Browse {
            role,
            query,
            filters,
        } => {
            let selection = parse_filters(&filters)?;
            let db = open_store(&config)?;
            match role {
                Role::Seeker => tui::run_browse(
                    &db,
                    role,
                    db.list_jobs()?,
                    selection,
                    query,
                    filter::filter_jobs,
                    &config,
                )?,
                Role::Employer => tui::run_browse(
                    &db,
                    role,
                    db.list_candidates()?,
                    selection,
                    query,
                    filter::filter_candidates,
                    &config,
                )?,
            }
        }

        Commands::PostJob {
            title,
            company,
            industry,
            location,
            pay,
            job_type,
            description,
            email,
            phone,
            anonymous,
        } => {
            let db = open_store(&config)?;
            let job = post_job(
                &db,
                JobPosting {
                    title,
                    company_name: company,
                    industry,
                    location,
                    pay_range: pay,
                    job_type,
                    description,
                    contact_email: email,
                    contact_phone: phone,
                    is_anonymous: anonymous,
                },
            )?;
            println!("Posted {} as {}", job.id, job.headline());
        }

        Commands::Unlocked { role } => {
            let db = open_db(&config)?;
            db.ensure_initialized()?;
            db.init()?;
            let unlocks = db.list_unlocks(role)?;
            if unlocks.is_empty() {
                println!("Nothing unlocked yet.");
            } else {
                println!("{:<10} {:<30} {:>8}", "ID", "UNLOCKED AT", "FEE");
                println!("{}", "-".repeat(50));
                for record in &unlocks {
                    println!(
                        "{:<10} {:<30} {:>8}",
                        record.listing_id,
                        record.unlocked_at,
                        unlock::format_cents(u64::from(record.fee_cents))
                    );
                }
                let spent: u64 = unlocks.iter().map(|r| u64::from(r.fee_cents)).sum();
                println!(
                    "\n{} unlocked, {} spent",
                    unlocks.len(),
                    unlock::format_cents(spent)
                );
            }
        }

        Commands::Filters { role } => {
            println!("Usage: -f <category>=<value>\n");
            print_vocabulary(FilterCategory::Industries.name(), &vocabulary::INDUSTRIES);
            print_vocabulary(FilterCategory::Locations.name(), &vocabulary::LOCATIONS);
            match role {
                Role::Seeker => {
                    print_vocabulary(FilterCategory::PayRanges.name(), &vocabulary::JOB_PAY_RANGES);
                }
                Role::Employer => {
                    print_vocabulary(
                        FilterCategory::PayRanges.name(),
                        &vocabulary::TARGET_PAY_RANGES,
                    );
                    print_vocabulary(
                        FilterCategory::ExperienceLevels.name(),
                        &vocabulary::EXPERIENCE_LEVELS,
                    );
                    print_vocabulary(
                        FilterCategory::EducationLevels.name(),
                        &vocabulary::EDUCATION_LEVELS,
                    );
                    print_vocabulary(FilterCategory::Skills.name(), &vocabulary::SKILLS);
                    print_vocabulary("job type (post-job)", &vocabulary::JOB_TYPES);
                }
            }
        }
    }

    Ok(())
}
