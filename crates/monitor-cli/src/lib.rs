//! Drowsiness Monitor Host
//!
//! Wires a landmark feed, the driver monitor, an alert sink and a renderer
//! into a frame loop.

pub mod config;
pub mod logging;
pub mod render;
pub mod runner;

pub use config::AppConfig;
pub use logging::init_logging;
pub use runner::{replay, run_realtime, run_realtime_until, RunSummary};

use alerting::AlertDispatcher;
use anyhow::Context;
use dms::{DrowsinessMonitor, Renderer};
use landmark_feed::{JsonLinesSource, LandmarkSource, SyntheticSource};
use render::{JsonRenderer, LogRenderer};
use tracing::info;

/// Build the frame source named by the configuration
pub fn build_source(config: &AppConfig) -> anyhow::Result<Box<dyn LandmarkSource>> {
    match &config.feed.input {
        Some(path) => {
            let source = JsonLinesSource::open(path)
                .with_context(|| format!("Failed to open landmark input {}", path))?;
            Ok(Box::new(source))
        }
        None => {
            info!("No input given, running the demo script at {} fps", config.feed.demo_fps);
            Ok(Box::new(SyntheticSource::new(
                SyntheticSource::demo_script(),
                config.feed.demo_fps,
            )))
        }
    }
}

/// Build the renderer named by the configuration
pub fn build_renderer(config: &AppConfig) -> Box<dyn Renderer> {
    if config.render.json_snapshots {
        Box::new(JsonRenderer::stdout())
    } else {
        Box::new(LogRenderer::new(
            config.render.frame_width,
            config.render.frame_height,
        ))
    }
}

/// Run one monitoring session to completion
pub async fn run(config: AppConfig) -> anyhow::Result<RunSummary> {
    config.validate().context("Invalid configuration")?;
    let dispatcher = AlertDispatcher::from_config(config.alert.clone());
    let mut monitor = DrowsinessMonitor::new(config.dms.clone(), dispatcher)
        .context("Invalid monitor configuration")?;
    let mut source = build_source(&config)?;
    let mut renderer = build_renderer(&config);

    let summary = if config.feed.realtime {
        run_realtime(&mut monitor, source, &mut renderer).await?
    } else {
        replay(&mut monitor, &mut source, &mut renderer)?
    };

    summary.log();
    Ok(summary)
}
