//! Blink and yawn edge detection

use crate::detector::FaceState;
use crate::state::{PreviousFrame, TemporalCounters};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Events detected on a single frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FrameEvents {
    /// Combined eyes went open → closed
    pub blink: bool,
    /// Mouth went closed → open
    pub yawn: bool,
}

impl FrameEvents {
    pub fn any(&self) -> bool {
        self.blink || self.yawn
    }
}

/// Counts blinks and yawns from consecutive face states.
///
/// The first observed frame only seeds the previous state. Call exactly once
/// per new frame; feeding an unchanged state never counts anything.
#[derive(Debug, Clone, Default)]
pub struct EventDetector {
    previous: Option<PreviousFrame>,
    counters: TemporalCounters,
}

impl EventDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, face: &FaceState) -> FrameEvents {
        let current = PreviousFrame {
            eyes_open: face.eyes_open(),
            mouth_open: face.mouth_open(),
        };

        let events = match self.previous.replace(current) {
            None => {
                debug!(
                    "Seeded event detector (eyes_open={}, mouth_open={})",
                    current.eyes_open, current.mouth_open
                );
                FrameEvents::default()
            }
            Some(prev) => FrameEvents {
                blink: prev.eyes_open && !current.eyes_open,
                // Mouth closing is intentionally not an event
                yawn: !prev.mouth_open && current.mouth_open,
            },
        };

        if events.blink {
            self.counters.blink_count += 1;
            info!("Blink detected (total: {})", self.counters.blink_count);
        }
        if events.yawn {
            self.counters.yawn_count += 1;
            info!("Yawn detected (total: {})", self.counters.yawn_count);
        }
        events
    }

    pub fn counters(&self) -> TemporalCounters {
        self.counters
    }

    pub fn previous(&self) -> Option<PreviousFrame> {
        self.previous
    }

    pub fn is_initialized(&self) -> bool {
        self.previous.is_some()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
