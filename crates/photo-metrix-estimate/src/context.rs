use photo_metrix_core::{GpsFix, Point};
use serde::{Deserialize, Serialize};

use crate::{CameraIntrinsics, EstimatorParams};

/// A segment of known real-world length, picked in pixel space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReferenceCalibration {
    pub distance_m: f64,
    pub points: [Point; 2],
}

/// Real-world scale anchors available for one estimation.
///
/// Built fresh per photo. Optional anchors that are absent simply disable
/// the matching method; the building heuristic is always available.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalibrationContext {
    #[serde(default)]
    pub gps_altitude_m: Option<f64>,
    #[serde(default)]
    pub image_width_px: Option<u32>,
    #[serde(default)]
    pub camera: CameraIntrinsics,
    #[serde(default)]
    pub reference: Option<ReferenceCalibration>,
    pub building_height_estimate_m: f64,
}

impl CalibrationContext {
    /// Context with only the fallback heuristic, taking camera and
    /// building defaults from `params`.
    pub fn new(params: &EstimatorParams) -> Self {
        Self {
            gps_altitude_m: None,
            image_width_px: None,
            camera: params.camera,
            reference: None,
            building_height_estimate_m: params.building_height_estimate_m,
        }
    }

    pub fn with_image_width(mut self, image_width_px: u32) -> Self {
        self.image_width_px = Some(image_width_px);
        self
    }

    pub fn with_gps_altitude(mut self, altitude_m: f64) -> Self {
        self.gps_altitude_m = Some(altitude_m);
        self
    }

    /// Take the altitude from a GPS fix, if the fix carries one.
    pub fn with_gps_fix(mut self, fix: &GpsFix) -> Self {
        self.gps_altitude_m = fix.altitude_m;
        self
    }

    pub fn with_reference(mut self, distance_m: f64, points: [Point; 2]) -> Self {
        self.reference = Some(ReferenceCalibration { distance_m, points });
        self
    }
}
