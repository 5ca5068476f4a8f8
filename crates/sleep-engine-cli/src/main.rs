//! `sleepcalc` - compute and classify sleep durations from the command line.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde_json::json;
use sleep_engine::parser::parse_date;
use sleep_engine::{CalculationOptions, CalculatorConfig, SleepCalculator, SleepRecord};
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Debug, Parser)]
#[command(
    name = "sleepcalc",
    about = "Compute sleep duration between a bedtime and a wake-up time",
    version
)]
struct Cli {
    /// JSON calculator configuration (guidelines, defaults).
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Zone wall-clock inputs are read in. Defaults to the system zone.
    #[arg(long, global = true, value_name = "TZ")]
    host_timezone: Option<String>,

    /// Log calculation details to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Calculate and classify one night of sleep.
    Calc {
        /// Bedtime, e.g. "22:30" or "10:30 PM".
        bedtime: String,
        /// Wake-up time, e.g. "07:15" or "6:45 AM".
        wake_up: String,
        /// Target IANA timezone.
        #[arg(long, value_name = "TZ")]
        timezone: Option<String>,
        /// Base date (YYYY-MM-DD).
        #[arg(long, value_name = "DATE", value_parser = parse_date)]
        date: Option<NaiveDate>,
        /// Skip the DST drift adjustment.
        #[arg(long)]
        no_dst: bool,
        /// Print the record and classification as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Show offset and abbreviation for a timezone.
    Timezone {
        /// IANA timezone name.
        timezone: String,
        #[arg(long)]
        json: bool,
    },
    /// Run the reference calculations.
    Demo,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => CalculatorConfig::default(),
    };
    if let Some(host) = cli.host_timezone {
        config.host_timezone = Some(host);
    }
    let calc = SleepCalculator::new(config).context("invalid calculator configuration")?;

    match cli.command {
        Command::Calc {
            bedtime,
            wake_up,
            timezone,
            date,
            no_dst,
            json,
        } => {
            let options = CalculationOptions {
                timezone,
                date,
                handle_dst: !no_dst,
            };
            let record =
                calc.calculate_sleep_duration(bedtime.as_str(), wake_up.as_str(), &options)?;
            if json {
                let validation = calc.validate_sleep_duration(&record);
                let out = json!({ "record": record, "validation": validation });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                print_report(&calc, &record);
            }
        }
        Command::Timezone { timezone, json } => {
            let info = calc.timezone_info(&timezone)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Name: {}", info.name);
                println!("Offset: {} minutes", info.offset);
                println!("Abbreviation: {}", info.abbreviation);
            }
        }
        Command::Demo => {
            let examples = [
                ("22:30", "07:15"),
                ("10:30 PM", "6:45 AM"),
                ("01:00", "06:00"),
            ];
            for (i, (bedtime, wake_up)) in examples.iter().enumerate() {
                let record = calc.calculate_sleep_duration(
                    *bedtime,
                    *wake_up,
                    &CalculationOptions::default(),
                )?;
                println!("Example {}: {} -> {}", i + 1, bedtime, wake_up);
                print_report(&calc, &record);
                println!();
            }
        }
    }

    Ok(())
}

fn print_report(calc: &SleepCalculator, record: &SleepRecord) {
    let validation = calc.validate_sleep_duration(record);
    let timezone = record
        .timezone
        .as_deref()
        .unwrap_or(calc.default_timezone());

    println!("Sleep duration: {}", calc.format_sleep_duration(record));
    println!(
        "Bedtime: {} ({})",
        calc.format_time_in_timezone(record.bedtime.instant, timezone),
        timezone
    );
    println!(
        "Wake-up: {} ({})",
        calc.format_time_in_timezone(record.wake_up_time.instant, timezone),
        timezone
    );
    println!(
        "Status: {} ({:.2} hours)",
        validation.status, validation.total_hours
    );
    println!("Recommendation: {}", validation.recommendation);
}

fn load_config(path: &Path) -> Result<CalculatorConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let config = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;
    debug!(path = %path.display(), "loaded calculator configuration");
    Ok(config)
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    // A subscriber may already be installed; keep whichever came first.
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
