//! Headless renderers

use dms::{FrameSnapshot, OverlayPlan, Renderer};
use landmark_feed::LandmarkSet;
use std::io::{self, Write};
use tracing::{debug, warn};

/// Logs the overlay text of every frame at debug level
pub struct LogRenderer {
    width: u32,
    height: u32,
}

impl LogRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Renderer for LogRenderer {
    fn render(&mut self, snapshot: &FrameSnapshot, landmarks: Option<&LandmarkSet>) {
        let mut plan = OverlayPlan::for_snapshot(snapshot);
        if let Some(landmarks) = landmarks {
            plan = plan.with_markers(landmarks, self.width, self.height);
        }

        if plan.texts.is_empty() {
            debug!("No face in frame");
            return;
        }

        let text: Vec<&str> = plan.texts.iter().map(|t| t.text.as_str()).collect();
        debug!(markers = plan.markers.len(), "{}", text.join(" | "));
    }
}

/// Writes each snapshot as one JSON line
pub struct JsonRenderer<W> {
    out: W,
}

impl JsonRenderer<io::Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> JsonRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for JsonRenderer<W> {
    fn render(&mut self, snapshot: &FrameSnapshot, _landmarks: Option<&LandmarkSet>) {
        let result = serde_json::to_writer(&mut self.out, snapshot)
            .map_err(io::Error::from)
            .and_then(|_| self.out.write_all(b"\n"));
        if let Err(e) = result {
            warn!("Failed to write snapshot: {}", e);
        }
    }
}
