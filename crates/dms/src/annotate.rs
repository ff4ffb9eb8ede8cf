//! Overlay description for frame renderers
//!
//! The monitor never draws. It describes what a display should put on top of
//! the camera image: status text and the landmarks it looked at.

use crate::analysis::FrameSnapshot;
use landmark_feed::{mesh, LandmarkSet};
use serde::{Deserialize, Serialize};

/// RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const RED: Rgb = Rgb(255, 0, 0);
    pub const GREEN: Rgb = Rgb(0, 255, 0);
}

/// Text line anchored at a pixel position (top-left origin)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayText {
    pub text: String,
    pub position: (i32, i32),
    pub color: Rgb,
}

/// Landmark drawn as a dot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marker {
    pub index: usize,
    pub position: (i32, i32),
    pub color: Rgb,
}

/// Landmark index groups outlined on every frame
pub const MARKER_GROUPS: [&[usize]; 3] = [
    &mesh::LEFT_EYE_CONTOUR,
    &mesh::RIGHT_EYE_CONTOUR,
    &mesh::LIPS_CONTOUR,
];

const LINE_X: i32 = 10;
const ALERT_LINE_Y: i32 = 310;
pub const ALERT_TEXT: &str = "Alert: Both Eyes Closed";

/// Everything to draw for one frame
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayPlan {
    pub texts: Vec<OverlayText>,
    pub markers: Vec<Marker>,
}

impl OverlayPlan {
    /// Status text for a snapshot. Frames without a face get no text.
    pub fn for_snapshot(snapshot: &FrameSnapshot) -> Self {
        if !snapshot.face_detected {
            return Self::default();
        }

        let mut texts = Vec::new();
        let mut line = |text: String, y: i32, color: Rgb| {
            texts.push(OverlayText {
                text,
                position: (LINE_X, y),
                color,
            })
        };

        if let Some(left) = snapshot.left_eye {
            line(format!("Left Eye: {}", left.label()), 30, Rgb::WHITE);
        }
        if let Some(right) = snapshot.right_eye {
            line(format!("Right Eye: {}", right.label()), 70, Rgb::WHITE);
        }
        line(format!("Blinks: {}", snapshot.blink_count), 110, Rgb::WHITE);
        line(format!("Yawns: {}", snapshot.yawn_count), 150, Rgb::WHITE);
        if snapshot.is_alert_active() {
            line(ALERT_TEXT.to_string(), ALERT_LINE_Y, Rgb::RED);
        }

        Self {
            texts,
            markers: Vec::new(),
        }
    }

    /// Add eye and lip contour markers projected onto a `width`x`height` image.
    /// Indices the detector did not report are skipped.
    pub fn with_markers(mut self, landmarks: &LandmarkSet, width: u32, height: u32) -> Self {
        self.markers = MARKER_GROUPS
            .iter()
            .flat_map(|group| group.iter())
            .filter_map(|&index| {
                landmarks.get(index).map(|point| Marker {
                    index,
                    position: point.to_pixel(width, height),
                    color: Rgb::GREEN,
                })
            })
            .collect();
        self
    }
}

/// Frame overlay consumer (window, video encoder, log...)
pub trait Renderer {
    fn render(&mut self, snapshot: &FrameSnapshot, landmarks: Option<&LandmarkSet>);
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn render(&mut self, snapshot: &FrameSnapshot, landmarks: Option<&LandmarkSet>) {
        (**self).render(snapshot, landmarks)
    }
}
