//! Landmark frame types

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Normalized face-mesh point. `z` is carried through but never used.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl Landmark {
    /// Create a 2D landmark
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y, z: 0.0 }
    }

    /// Whether both planar coordinates are finite
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Project onto a pixel grid of the given size
    pub fn to_pixel(&self, width: u32, height: u32) -> (i32, i32) {
        (
            (self.x * width as f32) as i32,
            (self.y * height as f32) as i32,
        )
    }
}

/// All landmarks of one detected face in one frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandmarkSet {
    points: Vec<Landmark>,
}

impl LandmarkSet {
    /// Wrap detector output
    pub fn new(points: Vec<Landmark>) -> Self {
        Self { points }
    }

    /// Landmark at `index`, if the detector reported it
    pub fn get(&self, index: usize) -> Option<&Landmark> {
        self.points.get(index)
    }

    /// Replace a single landmark. Returns false when out of range.
    pub fn set(&mut self, index: usize, landmark: Landmark) -> bool {
        match self.points.get_mut(index) {
            Some(slot) => {
                *slot = landmark;
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Landmark> {
        self.points.iter()
    }
}

impl FromIterator<Landmark> for LandmarkSet {
    fn from_iter<I: IntoIterator<Item = Landmark>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// One detector result: every face found in a single camera frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LandmarkFrame {
    /// Frame sequence number
    pub sequence: u64,
    /// Capture timestamp (milliseconds since stream start)
    pub timestamp_ms: u64,
    /// One landmark set per detected face, empty when nobody is in view
    #[serde(default)]
    pub faces: Vec<LandmarkSet>,
}

impl LandmarkFrame {
    /// Create a new landmark frame
    pub fn new(sequence: u64, timestamp_ms: u64, faces: Vec<LandmarkSet>) -> Self {
        Self {
            sequence,
            timestamp_ms,
            faces,
        }
    }

    /// Capture time as a monotonic offset
    pub fn timestamp(&self) -> Duration {
        Duration::from_millis(self.timestamp_ms)
    }

    /// Driver face (first detection)
    pub fn primary_face(&self) -> Option<&LandmarkSet> {
        self.faces.first()
    }

    pub fn has_face(&self) -> bool {
        !self.faces.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_out_of_range() {
        let set = LandmarkSet::new(vec![Landmark::new(0.1, 0.2)]);
        assert_eq!(set.get(0), Some(&Landmark::new(0.1, 0.2)));
        assert_eq!(set.get(1), None);
    }

    #[test]
    fn test_set_replaces_point() {
        let mut set: LandmarkSet = (0..3).map(|_| Landmark::default()).collect();
        assert!(set.set(2, Landmark::new(0.5, 0.5)));
        assert!(!set.set(3, Landmark::new(0.5, 0.5)));
        assert_eq!(set.get(2).map(|p| p.x), Some(0.5));
    }

    #[test]
    fn test_to_pixel() {
        let p = Landmark::new(0.5, 0.25);
        assert_eq!(p.to_pixel(640, 480), (320, 120));
    }

    #[test]
    fn test_frame_json_shape() {
        let json = r#"{"sequence":3,"timestamp_ms":1500,"faces":[[{"x":0.1,"y":0.2},{"x":0.3,"y":0.4,"z":-0.01}]]}"#;
        let frame: LandmarkFrame = serde_json::from_str(json).unwrap();
        assert_eq!(frame.sequence, 3);
        assert_eq!(frame.timestamp(), Duration::from_millis(1500));
        let face = frame.primary_face().unwrap();
        assert_eq!(face.len(), 2);
        assert_eq!(face.get(0).unwrap().z, 0.0);
    }

    #[test]
    fn test_non_finite() {
        assert!(!Landmark::new(f32::NAN, 0.0).is_finite());
        assert!(Landmark::new(0.0, 1.0).is_finite());
    }
}
