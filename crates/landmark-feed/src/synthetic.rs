//! Scripted landmark generator for demos and headless runs

use crate::frame::{Landmark, LandmarkFrame, LandmarkSet};
use crate::mesh;
use crate::source::LandmarkSource;
use crate::FeedError;
use serde::{Deserialize, Serialize};

const EYE_OPEN_GAP: f32 = 0.03;
const EYE_CLOSED_GAP: f32 = 0.005;
const MOUTH_OPEN_GAP: f32 = 0.08;
const MOUTH_CLOSED_GAP: f32 = 0.01;

/// A stretch of time with a fixed facial pose
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub duration_ms: u64,
    pub face_visible: bool,
    pub eyes_open: bool,
    pub mouth_open: bool,
}

impl Segment {
    pub fn awake(duration_ms: u64) -> Self {
        Self {
            duration_ms,
            face_visible: true,
            eyes_open: true,
            mouth_open: false,
        }
    }

    pub fn eyes_closed(duration_ms: u64) -> Self {
        Self {
            eyes_open: false,
            ..Self::awake(duration_ms)
        }
    }

    pub fn yawning(duration_ms: u64) -> Self {
        Self {
            mouth_open: true,
            ..Self::awake(duration_ms)
        }
    }

    pub fn no_face(duration_ms: u64) -> Self {
        Self {
            face_visible: false,
            ..Self::awake(duration_ms)
        }
    }
}

/// Produces full 468-point faces following a script of segments
pub struct SyntheticSource {
    script: Vec<Segment>,
    frame_interval_ms: u64,
    segment: usize,
    elapsed_in_segment: u64,
    timestamp_ms: u64,
    sequence: u64,
}

impl SyntheticSource {
    /// Create a source sampling the script at `fps` frames per second.
    /// Rates above 1000 fps are sampled every millisecond.
    pub fn new(script: Vec<Segment>, fps: u32) -> Self {
        Self {
            script,
            frame_interval_ms: (1000 / fps.max(1)).max(1) as u64,
            segment: 0,
            elapsed_in_segment: 0,
            timestamp_ms: 0,
            sequence: 0,
        }
    }

    /// Two blinks, a yawn, a lost face, then a long closure that trips the alert
    pub fn demo_script() -> Vec<Segment> {
        vec![
            Segment::awake(2000),
            Segment::eyes_closed(200),
            Segment::awake(1500),
            Segment::eyes_closed(150),
            Segment::awake(1000),
            Segment::yawning(1200),
            Segment::awake(800),
            Segment::no_face(500),
            Segment::awake(500),
            Segment::eyes_closed(4000),
            Segment::awake(1500),
        ]
    }

    /// Build one face in the given pose
    pub fn face(eyes_open: bool, mouth_open: bool) -> LandmarkSet {
        let mut face: LandmarkSet = (0..mesh::FACE_MESH_LANDMARKS)
            .map(|_| Landmark::new(0.5, 0.5))
            .collect();

        let eye_gap = if eyes_open { EYE_OPEN_GAP } else { EYE_CLOSED_GAP };
        let mouth_gap = if mouth_open {
            MOUTH_OPEN_GAP
        } else {
            MOUTH_CLOSED_GAP
        };

        face.set(mesh::LEFT_EYE_UPPER, Landmark::new(0.6, 0.4));
        face.set(mesh::LEFT_EYE_LOWER, Landmark::new(0.6, 0.4 + eye_gap));
        face.set(mesh::RIGHT_EYE_UPPER, Landmark::new(0.4, 0.4));
        face.set(mesh::RIGHT_EYE_LOWER, Landmark::new(0.4, 0.4 + eye_gap));
        face.set(mesh::UPPER_LIP, Landmark::new(0.5, 0.7));
        face.set(mesh::LOWER_LIP, Landmark::new(0.5, 0.7 + mouth_gap));
        face
    }
}

impl LandmarkSource for SyntheticSource {
    fn next_frame(&mut self) -> Result<Option<LandmarkFrame>, FeedError> {
        while let Some(segment) = self.script.get(self.segment) {
            if self.elapsed_in_segment >= segment.duration_ms {
                self.segment += 1;
                self.elapsed_in_segment = 0;
                continue;
            }

            let faces = if segment.face_visible {
                vec![Self::face(segment.eyes_open, segment.mouth_open)]
            } else {
                Vec::new()
            };
            let frame = LandmarkFrame::new(self.sequence, self.timestamp_ms, faces);

            self.sequence = self.sequence.wrapping_add(1);
            self.timestamp_ms += self.frame_interval_ms;
            self.elapsed_in_segment += self.frame_interval_ms;
            return Ok(Some(frame));
        }
        Ok(None)
    }
}
