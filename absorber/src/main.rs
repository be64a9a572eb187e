//! # Absorber Binary
//!
//! Command-line front end of the absorber facade device.
//!
//! # Usage
//!
//! ```bash
//! # Print every attribute once
//! absorber --config config/absorber.toml status
//!
//! # Insert / extract the absorber
//! absorber --config config/absorber.toml insert
//! absorber --config config/absorber.toml extract
//!
//! # Poll until Ctrl-C, JSON logs
//! absorber --config config/absorber.toml --json monitor --interval-ms 500
//! ```

use absorber::{Absorber, Attribute, AttributeValue, Command};
use absorber_common::config::AbsorberConfig;
use absorber_common::consts::{DEFAULT_CONFIG_PATH, DEFAULT_MONITOR_INTERVAL_MS};
use absorber_common::endpoint::Quality;
use absorber_plc::TransportRegistry;
use clap::{Parser, Subcommand};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{Level, error, info, warn};
use tracing_subscriber::EnvFilter;

/// Absorber - vacuum absorber facade device
#[derive(Parser, Debug)]
#[command(name = "absorber")]
#[command(author = "RTS007")]
#[command(version)]
#[command(about = "Vacuum absorber facade: water-flow alarms, inserted status, Insert/Extract")]
#[command(long_about = None)]
struct Args {
    /// Path to the device configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Enable verbose logging (overrides the configured log level)
    #[arg(short, long)]
    verbose: bool,

    /// Output logs and attribute dumps in JSON format
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Action,
}

#[derive(Subcommand, Debug)]
enum Action {
    /// Print state, status and every attribute
    Status,
    /// Clear Extract, then assert Insert
    Insert,
    /// Clear Insert, then assert Extract
    Extract,
    /// Poll attributes and log changes until interrupted
    Monitor {
        /// Polling period in milliseconds
        #[arg(long, default_value_t = DEFAULT_MONITOR_INTERVAL_MS)]
        interval_ms: u64,
    },
}

fn main() {
    if let Err(e) = run() {
        error!("absorber failed: {}", e);
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = AbsorberConfig::load_validated(&args.config)?;
    setup_tracing(&args, config.shared.log_level.into());

    info!("Absorber v{} starting...", env!("CARGO_PKG_VERSION"));
    info!("Config: {}", args.config.display());

    let transport = TransportRegistry::with_builtin().create_transport(&config.transport)?;
    let absorber = Absorber::new(&config, Arc::from(transport))?;

    match args.command {
        Action::Status => print_status(&absorber, args.json)?,
        Action::Insert => run_command(&absorber, Command::Insert)?,
        Action::Extract => run_command(&absorber, Command::Extract)?,
        Action::Monitor { interval_ms } => monitor(&absorber, Duration::from_millis(interval_ms))?,
    }
    Ok(())
}

fn run_command(absorber: &Absorber, command: Command) -> Result<(), Box<dyn std::error::Error>> {
    absorber.execute(command)?;
    info!("{} accepted by {}", command, absorber.name());
    Ok(())
}

fn print_status(absorber: &Absorber, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let attributes = absorber.read_attributes();
    if json {
        let map: BTreeMap<&str, AttributeValue> = attributes
            .into_iter()
            .map(|(a, v)| (a.name(), v))
            .collect();
        let doc = serde_json::json!({
            "name": absorber.name(),
            "state": absorber.state(),
            "status": absorber.status(),
            "attributes": map,
        });
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    println!("{}: {} ({})", absorber.name(), absorber.state(), absorber.status());
    for (attribute, value) in attributes {
        println!("  {:<28} {}", attribute.name(), format_value(&value));
    }
    let alarms = absorber.alarm_summary();
    if !alarms.all_clear() {
        println!(
            "  alarms: active={:?} unreliable={:?}",
            alarms.active, alarms.unreliable
        );
    }
    Ok(())
}

fn format_value(value: &AttributeValue) -> String {
    match value.value {
        Some(v) => format!("{v} [{}]", value.quality),
        None => format!("- [{}]", value.quality),
    }
}

fn monitor(absorber: &Absorber, interval: Duration) -> Result<(), Box<dyn std::error::Error>> {
    let running = Arc::new(AtomicBool::new(true));
    let flag = Arc::clone(&running);
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        flag.store(false, Ordering::SeqCst);
    })?;

    info!("Monitoring {} every {:?}", absorber.name(), interval);
    let mut last: BTreeMap<Attribute, (Option<bool>, Quality)> = BTreeMap::new();
    while running.load(Ordering::SeqCst) {
        for (attribute, value) in absorber.read_attributes() {
            let current = (value.value, value.quality);
            if last.insert(attribute, current) != Some(current) {
                if value.quality.is_good() {
                    info!("{} = {}", attribute, format_value(&value));
                } else {
                    warn!("{} = {}", attribute, format_value(&value));
                }
            }
        }
        std::thread::sleep(interval);
    }
    info!("Monitor stopped");
    Ok(())
}

/// Setup tracing subscriber from CLI arguments and the configured level.
fn setup_tracing(args: &Args, configured: Level) {
    let level = if args.verbose { Level::DEBUG } else { configured };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
