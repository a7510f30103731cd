//! `planner` CLI -- lay out days, find conflicts and expand routines over JSON
//! event lists from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Lanes for one day (events.json is a JSON array of events)
//! planner day --date 2026-03-02 -i events.json
//!
//! # Conflicts on every day, or on one day
//! planner conflicts -i events.json
//! planner conflicts --date 2026-03-02 -i events.json
//!
//! # Free time of a day, only gaps of at least 30 minutes
//! planner free --date 2026-03-02 --min 30 -i events.json
//!
//! # The Monday-first week around a date, and a month grouped by day
//! planner week --date 2026-03-04 -i events.json
//! planner month --date 2026-03-01 -i events.json
//!
//! # Expand a routine template into dated occurrences
//! planner materialize -i routine.json -o occurrences.json
//!
//! # Which overlaps does a candidate list introduce? (exit code 2 with --strict)
//! planner review --against events.json -i candidate.json --strict
//! ```

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use flexi_logger::Logger;
use serde::Serialize;
use std::io::{self, Read};
use std::process;

use planner_engine::calendar::{date_marks, week_sections};
use planner_engine::{
    day_view, find_conflicts_by_day, find_day_conflicts, free_gaps, materialize, month_sections,
    NewConflictPolicy, PlannerConfig, RecurrenceTemplate, Schedule,
};

#[derive(Parser)]
#[command(
    name = "planner",
    version,
    about = "Day planner scheduling engine CLI"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON config file (occurrence cap, default colour, conflict policy)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG wins when set
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Lay out one day's events in side-by-side lanes
    Day {
        #[arg(long, value_parser = parse_date_arg)]
        date: NaiveDate,
        #[command(flatten)]
        io: IoArgs,
    },
    /// Report overlapping events (all days unless --date is given)
    Conflicts {
        #[arg(long, value_parser = parse_date_arg)]
        date: Option<NaiveDate>,
        #[command(flatten)]
        io: IoArgs,
    },
    /// List the free gaps of one day
    Free {
        #[arg(long, value_parser = parse_date_arg)]
        date: NaiveDate,
        /// Minimum gap length in minutes
        #[arg(long)]
        min: Option<i64>,
        #[command(flatten)]
        io: IoArgs,
    },
    /// Show the Monday-first week containing a date
    Week {
        #[arg(long, value_parser = parse_date_arg)]
        date: NaiveDate,
        #[command(flatten)]
        io: IoArgs,
    },
    /// Group a month's events by day, with calendar marks
    Month {
        #[arg(long, value_parser = parse_date_arg)]
        date: NaiveDate,
        #[command(flatten)]
        io: IoArgs,
    },
    /// Expand a routine template into dated occurrences
    Materialize {
        /// Override the occurrence cap
        #[arg(long)]
        cap: Option<usize>,
        #[command(flatten)]
        io: IoArgs,
    },
    /// Report overlaps a candidate event list introduces
    Review {
        /// The currently stored event list
        #[arg(long)]
        against: String,
        /// Which overlaps count as already accepted
        #[arg(long, value_enum)]
        policy: Option<PolicyArg>,
        /// Exit with status 2 when new conflicts are found
        #[arg(long)]
        strict: bool,
        #[command(flatten)]
        io: IoArgs,
    },
}

#[derive(clap::Args)]
struct IoArgs {
    /// Input file (reads from stdin if omitted)
    #[arg(short, long)]
    input: Option<String>,
    /// Output file (writes to stdout if omitted)
    #[arg(short, long)]
    output: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum PolicyArg {
    /// Report overlaps between a stored event and a new one
    Both,
    /// Accept overlaps between a stored event and a new one
    Any,
}

impl From<PolicyArg> for NewConflictPolicy {
    fn from(p: PolicyArg) -> Self {
        match p {
            PolicyArg::Both => NewConflictPolicy::BothPreExisting,
            PolicyArg::Any => NewConflictPolicy::AnyPreExisting,
        }
    }
}

#[derive(Serialize)]
struct MonthView {
    sections: Vec<planner_engine::DaySection>,
    marks: std::collections::BTreeMap<NaiveDate, Vec<String>>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let _logger = Logger::try_with_env_or_str(level)
        .context("Invalid log specification")?
        .log_to_stderr()
        .start()
        .context("Failed to start logger")?;

    let config = load_config(cli.config.as_deref())?;
    log::debug!("effective config: {:?}", config);

    match cli.command {
        Commands::Day { date, io } => {
            let schedule = read_schedule(io.input.as_deref())?;
            let laid = day_view(schedule.events(), date);
            write_json(io.output.as_deref(), &laid)?;
        }
        Commands::Conflicts { date, io } => {
            let schedule = read_schedule(io.input.as_deref())?;
            let conflicts = match date {
                Some(date) => find_day_conflicts(&schedule.events_on(date)),
                None => find_conflicts_by_day(schedule.events()),
            };
            log::info!("{} conflicts", conflicts.len());
            write_json(io.output.as_deref(), &conflicts)?;
        }
        Commands::Free { date, min, io } => {
            let schedule = read_schedule(io.input.as_deref())?;
            let min = min.unwrap_or(config.min_free_gap_minutes);
            let gaps: Vec<_> = free_gaps(&schedule.events_on(date))
                .into_iter()
                .filter(|g| g.duration_minutes >= min)
                .collect();
            write_json(io.output.as_deref(), &gaps)?;
        }
        Commands::Week { date, io } => {
            let schedule = read_schedule(io.input.as_deref())?;
            write_json(io.output.as_deref(), &week_sections(schedule.events(), date))?;
        }
        Commands::Month { date, io } => {
            let schedule = read_schedule(io.input.as_deref())?;
            let sections = month_sections(schedule.events(), date);
            let in_month: Vec<_> = sections
                .iter()
                .flat_map(|s| s.events.iter().cloned())
                .collect();
            let view = MonthView {
                marks: date_marks(&in_month, &config.default_color),
                sections,
            };
            write_json(io.output.as_deref(), &view)?;
        }
        Commands::Materialize { cap, io } => {
            let raw = read_input(io.input.as_deref())?;
            let template = parse_template(&raw, cap, &config)?;
            let occurrences = materialize(&template);
            log::info!(
                "series {}: {} occurrences",
                template.series_id,
                occurrences.len()
            );
            write_json(io.output.as_deref(), &occurrences)?;
        }
        Commands::Review {
            against,
            policy,
            strict,
            io,
        } => {
            let candidate = read_schedule(io.input.as_deref())?;
            let current = read_schedule(Some(&against))?;
            let policy = policy.map(Into::into).unwrap_or(config.conflict_policy);
            let review = current.review(&candidate, policy);
            write_json(io.output.as_deref(), &review)?;
            if strict && !review.is_clean() {
                eprintln!("{} new conflict(s) found", review.new_conflicts.len());
                process::exit(2);
            }
        }
    }

    Ok(())
}

fn parse_date_arg(s: &str) -> std::result::Result<NaiveDate, String> {
    planner_engine::time::parse_date(s).map_err(|e| e.to_string())
}

fn load_config(path: Option<&str>) -> Result<PlannerConfig> {
    match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {}", path))?;
            PlannerConfig::from_json(&raw).with_context(|| format!("Invalid config: {}", path))
        }
        None => Ok(PlannerConfig::default()),
    }
}

/// Parse a routine template, filling the cap from the flag or the config when
/// the document does not set one.
fn parse_template(
    raw: &str,
    cap: Option<usize>,
    config: &PlannerConfig,
) -> Result<RecurrenceTemplate> {
    let mut value: serde_json::Value =
        serde_json::from_str(raw).context("Failed to parse routine template JSON")?;
    if let Some(obj) = value.as_object_mut() {
        match cap {
            Some(cap) => {
                obj.insert("cap".to_string(), cap.into());
            }
            None => {
                obj.entry("cap")
                    .or_insert_with(|| config.occurrence_cap.into());
            }
        }
    }
    serde_json::from_value(value).context("Invalid routine template")
}

fn read_schedule(path: Option<&str>) -> Result<Schedule> {
    let raw = read_input(path)?;
    serde_json::from_str(&raw).context("Failed to parse event list JSON")
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_json<T: Serialize>(path: Option<&str>, value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value)?;
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
