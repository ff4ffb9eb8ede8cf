//! Per-frame snapshot handed to renderers

use crate::alert::AlertStatus;
use crate::detector::{EyeState, FaceState, MouthState};
use crate::events::FrameEvents;
use crate::state::TemporalCounters;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Read-only view of the monitor after one frame
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    /// Capture time of the frame
    pub timestamp: Duration,

    /// Whether a face was analysed on this frame
    pub face_detected: bool,

    /// Eye and mouth states (absent when no face was found)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left_eye: Option<EyeState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right_eye: Option<EyeState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mouth: Option<MouthState>,

    pub blink_count: u32,
    pub yawn_count: u32,

    pub alert_status: AlertStatus,

    /// Length of the current both-eyes-closed streak
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eyes_closed_for: Option<Duration>,

    /// Events detected on this frame
    pub events: FrameEvents,
}

impl FrameSnapshot {
    pub(crate) fn with_face(
        timestamp: Duration,
        face: &FaceState,
        counters: TemporalCounters,
        alert_status: AlertStatus,
        eyes_closed_for: Option<Duration>,
        events: FrameEvents,
    ) -> Self {
        Self {
            timestamp,
            face_detected: true,
            left_eye: Some(face.left_eye),
            right_eye: Some(face.right_eye),
            mouth: Some(face.mouth),
            blink_count: counters.blink_count,
            yawn_count: counters.yawn_count,
            alert_status,
            eyes_closed_for,
            events,
        }
    }

    pub(crate) fn idle(
        timestamp: Duration,
        counters: TemporalCounters,
        alert_status: AlertStatus,
        eyes_closed_for: Option<Duration>,
    ) -> Self {
        Self {
            timestamp,
            face_detected: false,
            blink_count: counters.blink_count,
            yawn_count: counters.yawn_count,
            alert_status,
            eyes_closed_for,
            ..Default::default()
        }
    }

    pub fn is_alert_active(&self) -> bool {
        self.alert_status.is_active()
    }

    pub fn counters(&self) -> TemporalCounters {
        TemporalCounters {
            blink_count: self.blink_count,
            yawn_count: self.yawn_count,
        }
    }
}
