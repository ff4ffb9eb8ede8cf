//! DMS configuration

use crate::DmsError;
use landmark_feed::mesh;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Two face-mesh indices whose distance measures an aperture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandmarkPair {
    /// Upper lid / upper lip
    pub upper: usize,
    /// Lower lid / lower lip
    pub lower: usize,
}

impl LandmarkPair {
    pub const fn new(upper: usize, lower: usize) -> Self {
        Self { upper, lower }
    }
}

/// DMS configuration
///
/// Thresholds are empirical; recalibrate per camera and lighting setup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DmsConfig {
    /// An eye is open when its lid distance exceeds this (normalized units)
    pub eye_open_threshold: f32,

    /// The mouth is open when its lip distance exceeds this (normalized units)
    pub mouth_open_threshold: f32,

    /// Continuous closure of both eyes before the alert fires (seconds)
    pub alert_threshold_secs: f64,

    /// Landmark pairs
    pub left_eye_pair: LandmarkPair,
    pub right_eye_pair: LandmarkPair,
    pub mouth_pair: LandmarkPair,
}

impl Default for DmsConfig {
    fn default() -> Self {
        Self {
            eye_open_threshold: 0.02,
            mouth_open_threshold: 0.05,
            alert_threshold_secs: 3.0,
            left_eye_pair: LandmarkPair::new(mesh::LEFT_EYE_UPPER, mesh::LEFT_EYE_LOWER),
            right_eye_pair: LandmarkPair::new(mesh::RIGHT_EYE_UPPER, mesh::RIGHT_EYE_LOWER),
            mouth_pair: LandmarkPair::new(mesh::UPPER_LIP, mesh::LOWER_LIP),
        }
    }
}

impl DmsConfig {
    /// Create strict config (alerts sooner)
    pub fn strict() -> Self {
        Self {
            alert_threshold_secs: 2.0,
            ..Default::default()
        }
    }

    /// Create lenient config (alerts later)
    pub fn lenient() -> Self {
        Self {
            alert_threshold_secs: 4.5,
            ..Default::default()
        }
    }

    /// Closure duration that triggers the alert
    ///
    /// Saturates for values `validate` rejects.
    pub fn alert_threshold(&self) -> Duration {
        Duration::try_from_secs_f64(self.alert_threshold_secs).unwrap_or(Duration::MAX)
    }

    /// Smallest landmark set length covering every configured index
    pub fn required_landmarks(&self) -> usize {
        [self.left_eye_pair, self.right_eye_pair, self.mouth_pair]
            .iter()
            .flat_map(|p| [p.upper, p.lower])
            .max()
            .map_or(0, |max| max + 1)
    }

    /// Reject thresholds that cannot be compared against
    pub fn validate(&self) -> Result<(), DmsError> {
        check_threshold("eye_open_threshold", self.eye_open_threshold as f64)?;
        check_threshold("mouth_open_threshold", self.mouth_open_threshold as f64)?;
        check_threshold("alert_threshold_secs", self.alert_threshold_secs)?;
        if Duration::try_from_secs_f64(self.alert_threshold_secs).is_err() {
            return Err(DmsError::Config(format!(
                "alert_threshold_secs is out of range, got {}",
                self.alert_threshold_secs
            )));
        }
        Ok(())
    }
}

fn check_threshold(name: &str, value: f64) -> Result<(), DmsError> {
    if !value.is_finite() || value < 0.0 {
        return Err(DmsError::Config(format!(
            "{} must be a finite non-negative number, got {}",
            name, value
        )));
    }
    Ok(())
}
