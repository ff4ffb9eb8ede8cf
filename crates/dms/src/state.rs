//! Driver state tracking

use crate::alert::AlertMonitor;
use crate::events::EventDetector;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Blink and yawn totals. Only ever incremented, cleared by an explicit reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TemporalCounters {
    pub blink_count: u32,
    pub yawn_count: u32,
}

/// Last frame's signals, kept for edge detection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviousFrame {
    /// Either eye open
    pub eyes_open: bool,
    pub mouth_open: bool,
}

/// Frame bookkeeping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MonitorStats {
    /// Frames with a face that were fully processed
    pub frames_processed: u64,
    /// Frames without a face
    pub idle_frames: u64,
    /// Frames rejected as malformed
    pub malformed_frames: u64,
    /// Times the alert went active
    pub alerts_raised: u64,
}

/// Everything a monitor carries from one frame to the next
#[derive(Debug, Clone)]
pub struct MonitorState {
    pub events: EventDetector,
    pub alert: AlertMonitor,
    pub stats: MonitorStats,
}

impl MonitorState {
    pub fn new(alert_threshold: Duration) -> Self {
        Self {
            events: EventDetector::new(),
            alert: AlertMonitor::new(alert_threshold),
            stats: MonitorStats::default(),
        }
    }

    pub fn counters(&self) -> TemporalCounters {
        self.events.counters()
    }

    /// Reset state (on driver change). Statistics are kept.
    pub fn reset(&mut self) {
        self.events.reset();
        self.alert.reset();
    }
}
