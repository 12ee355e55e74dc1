use serde::{Deserialize, Serialize};

use crate::ParamsError;

fn default_focal_length_mm() -> f64 {
    35.0
}

fn default_sensor_width_mm() -> f64 {
    23.5
}

fn default_confidence_threshold() -> f32 {
    0.5
}

fn default_building_height_estimate_m() -> f64 {
    10.0
}

/// Camera intrinsics used for the ground sample distance.
///
/// The defaults describe a generic APS-C body with a 35 mm lens. They are
/// not read from image metadata; override them per camera when known.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraIntrinsics {
    #[serde(default = "default_focal_length_mm")]
    pub focal_length_mm: f64,
    #[serde(default = "default_sensor_width_mm")]
    pub sensor_width_mm: f64,
}

impl Default for CameraIntrinsics {
    fn default() -> Self {
        Self {
            focal_length_mm: default_focal_length_mm(),
            sensor_width_mm: default_sensor_width_mm(),
        }
    }
}

/// Configuration for [`crate::DistanceEstimator`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EstimatorParams {
    /// Detections must score strictly above this to be preferred.
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f32,
    /// Height fed into the fallback `building_estimate` heuristic.
    ///
    /// The heuristic (`pixels * height / 100`) is a placeholder without a
    /// physical derivation. It exists so every estimate carries a metric
    /// value even without calibration data.
    #[serde(default = "default_building_height_estimate_m")]
    pub building_height_estimate_m: f64,
    #[serde(default)]
    pub camera: CameraIntrinsics,
}

impl Default for EstimatorParams {
    fn default() -> Self {
        Self {
            confidence_threshold: default_confidence_threshold(),
            building_height_estimate_m: default_building_height_estimate_m(),
            camera: CameraIntrinsics::default(),
        }
    }
}

impl EstimatorParams {
    pub fn validate(&self) -> Result<(), ParamsError> {
        let cam = &self.camera;
        if !cam.focal_length_mm.is_finite() || cam.focal_length_mm <= 0.0 {
            return Err(ParamsError::InvalidFocalLength(cam.focal_length_mm));
        }
        if !cam.sensor_width_mm.is_finite() || cam.sensor_width_mm <= 0.0 {
            return Err(ParamsError::InvalidSensorWidth(cam.sensor_width_mm));
        }
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(ParamsError::InvalidConfidenceThreshold(
                self.confidence_threshold,
            ));
        }
        if !self.building_height_estimate_m.is_finite() || self.building_height_estimate_m < 0.0 {
            return Err(ParamsError::InvalidBuildingHeight(
                self.building_height_estimate_m,
            ));
        }
        Ok(())
    }
}
