//! Drowsiness Monitor - Main Entry Point

use anyhow::Result;
use clap::Parser;
use monitor_cli::{init_logging, run, AppConfig};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "drowsiness-monitor")]
#[command(about = "Blink, yawn and eyes-closed alerting over a face-mesh landmark feed")]
#[command(version)]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON-lines landmark recording (`-` for stdin)
    #[arg(short, long, conflicts_with = "demo")]
    input: Option<String>,

    /// Run the built-in demo script instead of a recording
    #[arg(long)]
    demo: bool,

    /// Pace frames by their timestamps and keep only the freshest one
    #[arg(long)]
    realtime: bool,

    /// Write per-frame snapshots as JSON lines to stdout
    #[arg(long)]
    json: bool,

    /// Enable debug level logging
    #[arg(short, long)]
    debug: bool,

    /// Only log errors
    #[arg(short, long, conflicts_with = "debug")]
    quiet: bool,

    /// Log output format: json, pretty, or compact
    #[arg(long, value_name = "FORMAT")]
    log_format: Option<String>,

    /// Print the effective configuration in TOML format and exit
    #[arg(long)]
    print_config: bool,

    /// Validate configuration and exit
    #[arg(long)]
    validate_config: bool,
}

impl Args {
    fn apply(&self, config: &mut AppConfig) {
        if let Some(input) = &self.input {
            config.feed.input = Some(input.clone());
        }
        if self.demo {
            config.feed.input = None;
        }
        if self.realtime {
            config.feed.realtime = true;
        }
        if self.json {
            config.render.json_snapshots = true;
        }
        if self.debug {
            config.logging.level = "debug".to_string();
        } else if self.quiet {
            config.logging.level = "error".to_string();
        }
        if let Some(format) = &self.log_format {
            config.logging.format = format.clone();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = AppConfig::load(args.config.as_deref())?;
    args.apply(&mut config);

    if args.print_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    init_logging(&config.logging.level, &config.logging.format)?;

    config.validate()?;
    if args.validate_config {
        info!("Configuration is valid");
        return Ok(());
    }

    info!("=== Drowsiness Monitor v{} ===", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(config).await {
        error!("Monitor failed: {:#}", e);
        return Err(e);
    }

    Ok(())
}
