//! Driver Monitoring System (DMS)
//!
//! Real-time driver state tracking on top of a face-mesh landmark detector:
//! - Eye and mouth open/closed classification
//! - Blink and yawn counting
//! - Sustained eyes-closed (drowsiness) alert
//! - Overlay description for renderers

pub mod alert;
pub mod analysis;
pub mod annotate;
pub mod config;
pub mod detector;
pub mod events;
pub mod geometry;
pub mod state;

pub use alert::{AlertMonitor, AlertStatus, AlertTransition, AlertUpdate};
pub use analysis::FrameSnapshot;
pub use annotate::{OverlayPlan, Renderer};
pub use config::{DmsConfig, LandmarkPair};
pub use detector::{EyeSide, EyeState, FaceClassifier, FaceState, MouthState};
pub use events::{EventDetector, FrameEvents};
pub use state::{MonitorState, MonitorStats, TemporalCounters};

use alerting::AlertDispatcher;
use landmark_feed::{LandmarkFrame, LandmarkSet};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// What is wrong with a landmark set
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Malformed {
    #[error("landmark {index} missing (set has {len} points)")]
    MissingLandmark { index: usize, len: usize },

    #[error("landmark {index} has a non-finite coordinate")]
    NonFinite { index: usize },
}

/// DMS error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DmsError {
    #[error("Malformed landmark set: {0}")]
    MalformedInput(Malformed),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Driver monitor: one instance per camera stream.
///
/// Frames must be fed in capture order, each exactly once.
pub struct DrowsinessMonitor {
    config: DmsConfig,
    classifier: FaceClassifier,
    state: MonitorState,
    dispatcher: AlertDispatcher,
    last: FrameSnapshot,
}

impl DrowsinessMonitor {
    /// Create a new monitor with configuration and alert dispatch
    pub fn new(config: DmsConfig, dispatcher: AlertDispatcher) -> Result<Self, DmsError> {
        config.validate()?;
        info!(
            "Drowsiness monitor: eye>{}, mouth>{}, alert after {:.1}s",
            config.eye_open_threshold, config.mouth_open_threshold, config.alert_threshold_secs
        );

        Ok(Self {
            classifier: FaceClassifier::new(&config),
            state: MonitorState::new(config.alert_threshold()),
            dispatcher,
            last: FrameSnapshot::default(),
            config,
        })
    }

    /// Analyze a single detector frame
    pub fn analyze(&mut self, frame: &LandmarkFrame) -> Result<FrameSnapshot, DmsError> {
        self.process_faces(&frame.faces, frame.timestamp())
    }

    /// Classify → count events → update alert → notify.
    ///
    /// No faces leaves every counter and the alert untouched. Only the first
    /// face is analysed. A malformed set is rejected before any state changes.
    pub fn process_faces(
        &mut self,
        faces: &[LandmarkSet],
        now: Duration,
    ) -> Result<FrameSnapshot, DmsError> {
        let Some(landmarks) = faces.first() else {
            self.state.stats.idle_frames += 1;
            self.last = FrameSnapshot::idle(
                now,
                self.state.counters(),
                self.state.alert.status(),
                self.state.alert.closed_for(now),
            );
            return Ok(self.last.clone());
        };

        if faces.len() > 1 {
            debug!("{} faces detected, analysing the first", faces.len());
        }

        let face = match self.classifier.classify_face(landmarks) {
            Ok(face) => face,
            Err(e) => {
                self.state.stats.malformed_frames += 1;
                return Err(e);
            }
        };

        let events = self.state.events.update(&face);
        let update = self.state.alert.update(face.both_eyes_closed(), now);

        match update.transition {
            Some(AlertTransition::Raised) => {
                self.state.stats.alerts_raised += 1;
                self.dispatcher.raise(now);
            }
            Some(AlertTransition::Cleared) => self.dispatcher.clear(),
            None if update.status.is_active() => {
                self.dispatcher.tick(now);
            }
            None => {}
        }

        self.state.stats.frames_processed += 1;
        self.last = FrameSnapshot::with_face(
            now,
            &face,
            self.state.counters(),
            update.status,
            update.closed_for,
            events,
        );
        Ok(self.last.clone())
    }

    /// Snapshot of the last processed frame
    pub fn snapshot(&self) -> &FrameSnapshot {
        &self.last
    }

    pub fn counters(&self) -> TemporalCounters {
        self.state.counters()
    }

    pub fn alert_status(&self) -> AlertStatus {
        self.state.alert.status()
    }

    pub fn stats(&self) -> MonitorStats {
        self.state.stats
    }

    pub fn config(&self) -> &DmsConfig {
        &self.config
    }

    pub fn dispatcher(&self) -> &AlertDispatcher {
        &self.dispatcher
    }

    /// Access for acknowledging alerts
    pub fn dispatcher_mut(&mut self) -> &mut AlertDispatcher {
        &mut self.dispatcher
    }

    /// Reset driver state (on driver change)
    pub fn reset(&mut self) {
        info!("Resetting driver state");
        self.state.reset();
        self.dispatcher.clear();
        self.last = FrameSnapshot::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alerting::{AlertConfig, MemorySink};
    use landmark_feed::{Landmark, SyntheticSource};

    fn monitor() -> (DrowsinessMonitor, MemorySink) {
        let sink = MemorySink::new();
        let dispatcher = AlertDispatcher::new(AlertConfig::default(), Box::new(sink.clone()));
        (
            DrowsinessMonitor::new(DmsConfig::default(), dispatcher).unwrap(),
            sink,
        )
    }

    fn ms(ms: u64) -> Duration {
        Duration::from_millis(ms)
    }

    fn face(eyes_open: bool, mouth_open: bool) -> Vec<LandmarkSet> {
        vec![SyntheticSource::face(eyes_open, mouth_open)]
    }

    #[test]
    fn test_rejects_bad_config() {
        let config = DmsConfig {
            mouth_open_threshold: f32::INFINITY,
            ..Default::default()
        };
        assert!(matches!(
            DrowsinessMonitor::new(config, AlertDispatcher::default()),
            Err(DmsError::Config(_))
        ));

        let config = DmsConfig {
            alert_threshold_secs: 1e20,
            ..Default::default()
        };
        assert!(matches!(
            DrowsinessMonitor::new(config, AlertDispatcher::default()),
            Err(DmsError::Config(_))
        ));
    }

    #[test]
    fn test_snapshot_fields() {
        let (mut m, _) = monitor();
        let snap = m.process_faces(&face(true, true), ms(0)).unwrap();
        assert!(snap.face_detected);
        assert_eq!(snap.left_eye, Some(EyeState::Open));
        assert_eq!(snap.right_eye, Some(EyeState::Open));
        assert_eq!(snap.mouth, Some(MouthState::Open));
        assert_eq!(snap.alert_status, AlertStatus::Inactive);
        assert_eq!(m.snapshot(), &snap);
    }

    #[test]
    fn test_sink_notified_once_per_activation() {
        let (mut m, sink) = monitor();
        m.process_faces(&face(true, false), ms(0)).unwrap();
        for t in (100..=5000).step_by(100) {
            m.process_faces(&face(false, false), ms(t)).unwrap();
        }
        assert_eq!(sink.messages(), vec!["Both eyes closed!".to_string()]);
        assert_eq!(m.stats().alerts_raised, 1);

        m.process_faces(&face(true, false), ms(5100)).unwrap();
        assert!(!m.dispatcher().is_active());
        for t in (5200..=8300).step_by(100) {
            m.process_faces(&face(false, false), ms(t)).unwrap();
        }
        assert_eq!(sink.count(), 2);
    }

    #[test]
    fn test_repeat_notifications_while_active() {
        let sink = MemorySink::new();
        let config = AlertConfig {
            repeat_interval_secs: 1.0,
            ..Default::default()
        };
        let mut m = DrowsinessMonitor::new(
            DmsConfig::default(),
            AlertDispatcher::new(config, Box::new(sink.clone())),
        )
        .unwrap();

        for t in (0..=5000).step_by(500) {
            m.process_faces(&face(false, false), ms(t)).unwrap();
        }
        // Raised at 3.0s, reminders at 4.0s and 5.0s
        assert_eq!(sink.count(), 3);
    }

    #[test]
    fn test_malformed_counts_in_stats_only() {
        let (mut m, _) = monitor();
        m.process_faces(&face(true, false), ms(0)).unwrap();
        let before = m.snapshot().clone();

        let short: Vec<LandmarkSet> = vec![(0..10).map(|_| Landmark::new(0.5, 0.5)).collect()];
        assert!(matches!(
            m.process_faces(&short, ms(33)),
            Err(DmsError::MalformedInput(_))
        ));
        assert_eq!(m.snapshot(), &before);
        assert_eq!(m.stats().malformed_frames, 1);

        // Keeps going afterwards
        let snap = m.process_faces(&face(false, false), ms(66)).unwrap();
        assert_eq!(snap.blink_count, 1);
    }

    #[test]
    fn test_only_first_face_used() {
        let (mut m, _) = monitor();
        m.process_faces(&face(true, false), ms(0)).unwrap();
        let faces = vec![
            SyntheticSource::face(true, false),
            SyntheticSource::face(false, true),
        ];
        let snap = m.process_faces(&faces, ms(33)).unwrap();
        assert_eq!(snap.blink_count, 0);
        assert_eq!(snap.yawn_count, 0);
    }

    #[test]
    fn test_reset() {
        let (mut m, _) = monitor();
        m.process_faces(&face(true, false), ms(0)).unwrap();
        m.process_faces(&face(false, true), ms(100)).unwrap();
        m.process_faces(&face(false, true), ms(4000)).unwrap();
        assert!(m.alert_status().is_active());

        m.reset();
        assert_eq!(m.counters(), TemporalCounters::default());
        assert_eq!(m.alert_status(), AlertStatus::Inactive);
        assert!(!m.dispatcher().is_active());

        // First frame after reset only seeds again
        let snap = m.process_faces(&face(false, false), ms(5000)).unwrap();
        assert_eq!(snap.blink_count, 0);
    }

    #[test]
    fn test_analyze_uses_frame_timestamp() {
        let (mut m, _) = monitor();
        let frame = LandmarkFrame::new(9, 1234, face(true, false));
        let snap = m.analyze(&frame).unwrap();
        assert_eq!(snap.timestamp, ms(1234));
    }
}
