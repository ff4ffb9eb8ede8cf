//! Eye and mouth state classification from face-mesh landmarks

use crate::config::{DmsConfig, LandmarkPair};
use crate::geometry::distance;
use crate::{DmsError, Malformed};
use landmark_feed::{Landmark, LandmarkSet};
use serde::{Deserialize, Serialize};

/// Which eye
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EyeSide {
    Left,
    Right,
}

/// Eye state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EyeState {
    Open,
    Closed,
}

impl EyeState {
    pub fn is_open(self) -> bool {
        self == EyeState::Open
    }

    /// Overlay label
    pub fn label(self) -> &'static str {
        match self {
            EyeState::Open => "open",
            EyeState::Closed => "close",
        }
    }
}

/// Mouth state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MouthState {
    Open,
    Closed,
}

impl MouthState {
    pub fn is_open(self) -> bool {
        self == MouthState::Open
    }
}

/// Per-frame classification of one face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceState {
    pub left_eye: EyeState,
    pub right_eye: EyeState,
    pub mouth: MouthState,
}

impl FaceState {
    /// Combined eye signal: open when either eye is open
    pub fn eyes_open(&self) -> bool {
        self.left_eye.is_open() || self.right_eye.is_open()
    }

    pub fn both_eyes_closed(&self) -> bool {
        !self.eyes_open()
    }

    pub fn mouth_open(&self) -> bool {
        self.mouth.is_open()
    }
}

/// Single landmark-pair aperture classifier
#[derive(Debug, Clone)]
pub struct FaceClassifier {
    eye_open_threshold: f32,
    mouth_open_threshold: f32,
    left_eye_pair: LandmarkPair,
    right_eye_pair: LandmarkPair,
    mouth_pair: LandmarkPair,
}

impl FaceClassifier {
    pub fn new(config: &DmsConfig) -> Self {
        Self {
            eye_open_threshold: config.eye_open_threshold,
            mouth_open_threshold: config.mouth_open_threshold,
            left_eye_pair: config.left_eye_pair,
            right_eye_pair: config.right_eye_pair,
            mouth_pair: config.mouth_pair,
        }
    }

    /// Open iff the lid distance exceeds the eye threshold
    pub fn classify_eye(
        &self,
        landmarks: &LandmarkSet,
        side: EyeSide,
    ) -> Result<EyeState, DmsError> {
        let pair = match side {
            EyeSide::Left => self.left_eye_pair,
            EyeSide::Right => self.right_eye_pair,
        };

        if pair_distance(landmarks, pair)? > self.eye_open_threshold {
            Ok(EyeState::Open)
        } else {
            Ok(EyeState::Closed)
        }
    }

    /// Open iff the lip distance exceeds the mouth threshold
    pub fn classify_mouth(&self, landmarks: &LandmarkSet) -> Result<MouthState, DmsError> {
        if pair_distance(landmarks, self.mouth_pair)? > self.mouth_open_threshold {
            Ok(MouthState::Open)
        } else {
            Ok(MouthState::Closed)
        }
    }

    /// Classify both eyes and the mouth; all or nothing
    pub fn classify_face(&self, landmarks: &LandmarkSet) -> Result<FaceState, DmsError> {
        Ok(FaceState {
            left_eye: self.classify_eye(landmarks, EyeSide::Left)?,
            right_eye: self.classify_eye(landmarks, EyeSide::Right)?,
            mouth: self.classify_mouth(landmarks)?,
        })
    }
}

fn pair_distance(landmarks: &LandmarkSet, pair: LandmarkPair) -> Result<f32, DmsError> {
    let upper = landmark(landmarks, pair.upper)?;
    let lower = landmark(landmarks, pair.lower)?;
    Ok(distance(upper, lower))
}

fn landmark(landmarks: &LandmarkSet, index: usize) -> Result<&Landmark, DmsError> {
    let point = landmarks
        .get(index)
        .ok_or(DmsError::MalformedInput(Malformed::MissingLandmark {
            index,
            len: landmarks.len(),
        }))?;
    if !point.is_finite() {
        return Err(DmsError::MalformedInput(Malformed::NonFinite { index }));
    }
    Ok(point)
}

#[cfg(test)]
mod tests {
    use super::*;
    use landmark_feed::SyntheticSource;

    fn classifier() -> FaceClassifier {
        FaceClassifier::new(&DmsConfig::default())
    }

    #[test]
    fn test_open_face() {
        let face = SyntheticSource::face(true, false);
        let state = classifier().classify_face(&face).unwrap();
        assert_eq!(state.left_eye, EyeState::Open);
        assert_eq!(state.right_eye, EyeState::Open);
        assert_eq!(state.mouth, MouthState::Closed);
        assert!(state.eyes_open());
    }

    #[test]
    fn test_closed_eyes_open_mouth() {
        let face = SyntheticSource::face(false, true);
        let state = classifier().classify_face(&face).unwrap();
        assert!(state.both_eyes_closed());
        assert!(state.mouth_open());
    }

    #[test]
    fn test_single_eye_open_counts_as_open() {
        let mut face = SyntheticSource::face(false, false);
        face.set(374, Landmark::new(0.6, 0.45));
        let state = classifier().classify_face(&face).unwrap();
        assert_eq!(state.left_eye, EyeState::Open);
        assert_eq!(state.right_eye, EyeState::Closed);
        assert!(state.eyes_open());
    }

    #[test]
    fn test_threshold_is_strict() {
        let mut face = SyntheticSource::face(true, false);
        face.set(159, Landmark::new(0.0, 0.0));
        face.set(145, Landmark::new(0.0, 0.25));
        let config = DmsConfig {
            eye_open_threshold: 0.25,
            ..Default::default()
        };
        let state = FaceClassifier::new(&config)
            .classify_eye(&face, EyeSide::Right)
            .unwrap();
        assert_eq!(state, EyeState::Closed);
    }

    #[test]
    fn test_undersized_set() {
        let face: LandmarkSet = (0..100).map(|_| Landmark::new(0.5, 0.5)).collect();
        match classifier().classify_face(&face) {
            Err(DmsError::MalformedInput(Malformed::MissingLandmark { index, len })) => {
                assert_eq!(index, 386);
                assert_eq!(len, 100);
            }
            other => panic!("expected malformed input, got {:?}", other),
        }
        // Mouth indices are present
        assert!(classifier().classify_mouth(&face).is_ok());
    }

    #[test]
    fn test_non_finite_point() {
        let mut face = SyntheticSource::face(true, false);
        face.set(13, Landmark::new(f32::NAN, 0.7));
        assert!(matches!(
            classifier().classify_mouth(&face),
            Err(DmsError::MalformedInput(Malformed::NonFinite { index: 13 }))
        ));
    }

    #[test]
    fn test_custom_pairs() {
        let mut face: LandmarkSet = (0..4).map(|_| Landmark::new(0.0, 0.0)).collect();
        face.set(1, Landmark::new(0.0, 0.1));
        face.set(3, Landmark::new(0.0, 0.1));
        let config = DmsConfig {
            left_eye_pair: LandmarkPair::new(0, 1),
            right_eye_pair: LandmarkPair::new(2, 3),
            mouth_pair: LandmarkPair::new(0, 2),
            ..Default::default()
        };
        let state = FaceClassifier::new(&config).classify_face(&face).unwrap();
        assert_eq!(state.left_eye, EyeState::Open);
        assert_eq!(state.right_eye, EyeState::Open);
        assert_eq!(state.mouth, MouthState::Closed);
    }
}
