//! `booking` CLI: check a requested booking against a day's bookings.
//!
//! ## Usage
//!
//! ```sh
//! # Absolute intervals (epoch ms) from stdin, decision JSON on stdout
//! echo '{"requested":{"low":150,"high":250},"existing":[{"low":100,"high":200}],
//!        "bounds":{"day_start":0,"day_end":1440}}' | booking check
//!
//! # Wall-clock request from a file, back-to-back bookings allowed
//! booking local -i request.json --overlap half-open --pretty
//!
//! # Print the bounds of a calendar day
//! booking day --date 2026-03-01 --timezone Asia/Kolkata
//! ```
//!
//! Exits 0 when the request is free, 2 when it conflicts, 1 on any error.

use anyhow::{Context, Result};
use booking_engine::day::{self, HOUR_MS};
use booking_engine::suggest::DEFAULT_MAX_SUGGESTIONS;
use booking_engine::{
    ConflictResolver, DayBounds, Interval, LocalRequest, OverlapRule, ResolverConfig,
    SuggestConfig,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::io::{self, Read, Write};
use std::process;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Exit status reported when the requested interval conflicts.
const EXIT_CONFLICT: i32 = 2;

#[derive(Parser)]
#[command(
    name = "booking",
    version,
    about = "Booking conflict checks with same-day slot suggestions"
)]
struct Cli {
    /// Raise log verbosity on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check absolute intervals: {"requested", "existing", "bounds"}
    Check(ResolveArgs),
    /// Check a wall-clock request: {"date", "start_time", "end_time", "timezone", "bookings"}
    Local(ResolveArgs),
    /// Print the bounds of a calendar day in a timezone
    Day {
        /// Date as YYYY-MM-DD
        #[arg(long)]
        date: String,
        /// IANA timezone name
        #[arg(long, default_value = "UTC")]
        timezone: String,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
}

#[derive(Args)]
struct ResolveArgs {
    /// Input file (reads from stdin if omitted)
    #[arg(short, long)]
    input: Option<String>,
    /// Output file (writes to stdout if omitted)
    #[arg(short, long)]
    output: Option<String>,
    /// Whether bookings that only touch at an endpoint conflict
    #[arg(long, value_enum, default_value_t = Overlap::Closed)]
    overlap: Overlap,
    /// Maximum number of same-day suggestions
    #[arg(long, default_value_t = DEFAULT_MAX_SUGGESTIONS)]
    max_suggestions: usize,
    /// Hours after the end of the requested day at which the fallback slot starts
    #[arg(long, default_value_t = 9, value_parser = clap::value_parser!(u8).range(0..24))]
    fallback_hour: u8,
    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

impl ResolveArgs {
    fn resolver(&self) -> ConflictResolver {
        let suggest = SuggestConfig::default()
            .with_max_suggestions(self.max_suggestions)
            .with_fallback_opening_ms(i64::from(self.fallback_hour) * HOUR_MS);
        ConflictResolver::new(ResolverConfig::new(self.overlap.into()).with_suggest(suggest))
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Overlap {
    /// Touching endpoints conflict
    Closed,
    /// Touching endpoints are allowed
    HalfOpen,
}

impl From<Overlap> for OverlapRule {
    fn from(overlap: Overlap) -> Self {
        match overlap {
            Overlap::Closed => OverlapRule::Closed,
            Overlap::HalfOpen => OverlapRule::HalfOpen,
        }
    }
}

/// Input of `booking check`.
#[derive(Deserialize)]
struct CheckRequest {
    requested: Interval,
    #[serde(default)]
    existing: Vec<Interval>,
    bounds: DayBounds,
}

/// Output of `booking day`.
#[derive(Serialize)]
struct DayOutput {
    date: String,
    timezone: String,
    #[serde(flatten)]
    bounds: DayBounds,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let conflict = match cli.command {
        Commands::Check(args) => check(&args)?,
        Commands::Local(args) => check_local(&args)?,
        Commands::Day {
            date,
            timezone,
            pretty,
        } => {
            let tz = day::parse_timezone(&timezone)?;
            let bounds = DayBounds::for_date(day::parse_date(&date)?, tz)?;
            let out = DayOutput {
                date,
                timezone,
                bounds,
            };
            write_output(None, &to_json(&out, pretty)?)?;
            false
        }
    };

    if conflict {
        process::exit(EXIT_CONFLICT);
    }
    Ok(())
}

/// Run `booking check`. Returns whether the request conflicts.
fn check(args: &ResolveArgs) -> Result<bool> {
    let raw = read_input(args.input.as_deref())?;
    let request: CheckRequest =
        serde_json::from_str(&raw).context("Failed to parse check request JSON")?;

    let requested = validated(request.requested).context("Invalid requested interval")?;
    let existing = request
        .existing
        .into_iter()
        .enumerate()
        .map(|(i, interval)| {
            validated(interval).with_context(|| format!("Invalid existing interval at index {i}"))
        })
        .collect::<Result<Vec<_>>>()?;
    let bounds = DayBounds::try_new(request.bounds.day_start, request.bounds.day_end)
        .context("Invalid day bounds")?;

    debug!(%requested, bookings = existing.len(), "checking request");
    let decision = args
        .resolver()
        .check_and_suggest(&requested, &existing, &bounds);
    info!(status = status_label(decision.is_free()), "check finished");

    write_output(args.output.as_deref(), &to_json(&decision, args.pretty)?)?;
    Ok(decision.is_conflict())
}

/// Run `booking local`. Returns whether the request conflicts.
fn check_local(args: &ResolveArgs) -> Result<bool> {
    let raw = read_input(args.input.as_deref())?;
    let request: LocalRequest =
        serde_json::from_str(&raw).context("Failed to parse local request JSON")?;

    debug!(
        date = %request.date,
        location = request.location.as_deref().unwrap_or("-"),
        bookings = request.bookings.len(),
        "checking local request"
    );
    let decision = request
        .check(&args.resolver())
        .context("Invalid local request")?;
    info!(status = status_label(decision.is_free()), "check finished");

    write_output(args.output.as_deref(), &to_json(&decision, args.pretty)?)?;
    Ok(!decision.is_free())
}

fn status_label(free: bool) -> &'static str {
    if free {
        "free"
    } else {
        "conflict"
    }
}

/// Re-run the boundary checks that deserialization skips.
fn validated(interval: Interval) -> booking_engine::error::Result<Interval> {
    let checked = Interval::try_new(interval.low, interval.high)?;
    Ok(match interval.owner {
        Some(owner) => checked.with_owner(owner),
        None => checked,
    })
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
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

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", content).context("Failed to write to stdout")?;
            stdout.flush().context("Failed to flush stdout")?;
        }
    }
    Ok(())
}
