use std::collections::BTreeMap;
use std::fmt;

use photo_metrix_core::{BoundingBox, Point};
use serde::{Deserialize, Serialize};

/// How a distance value was obtained.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMethod {
    /// Raw pixel distance; carries no real-world unit.
    Pixels,
    GpsCalibrated,
    ReferenceCalibrated,
    BuildingEstimate,
}

impl DistanceMethod {
    /// Preference order when a single metric value is requested.
    pub const BEST_PRIORITY: [DistanceMethod; 3] = [
        DistanceMethod::GpsCalibrated,
        DistanceMethod::ReferenceCalibrated,
        DistanceMethod::BuildingEstimate,
    ];

    /// Key used in serialized reports.
    pub fn as_str(self) -> &'static str {
        match self {
            DistanceMethod::Pixels => "pixels",
            DistanceMethod::GpsCalibrated => "gps_calibrated",
            DistanceMethod::ReferenceCalibrated => "reference_calibrated",
            DistanceMethod::BuildingEstimate => "building_estimate",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            DistanceMethod::Pixels => "Pixels",
            DistanceMethod::GpsCalibrated => "GPS calibrated",
            DistanceMethod::ReferenceCalibrated => "Reference calibrated",
            DistanceMethod::BuildingEstimate => "Estimate",
        }
    }

    #[inline]
    pub fn is_metric(self) -> bool {
        !matches!(self, DistanceMethod::Pixels)
    }
}

impl fmt::Display for DistanceMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of one estimation run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EstimationResult {
    pub pixel_distance: f64,
    /// Every method that could be evaluated, `Pixels` included (in pixels,
    /// all others in meters). Values are not rounded.
    pub distances: BTreeMap<DistanceMethod, f64>,
    pub centers: [Point; 2],
    pub boxes: [BoundingBox; 2],
    pub best: f64,
    pub best_method: DistanceMethod,
    #[serde(default)]
    pub gsd_m_per_px: Option<f64>,
    #[serde(default)]
    pub reference_scale_m_per_px: Option<f64>,
}

impl EstimationResult {
    #[inline]
    pub fn distance(&self, method: DistanceMethod) -> Option<f64> {
        self.distances.get(&method).copied()
    }

    /// Metric estimates in preference order.
    pub fn ranked(&self) -> impl Iterator<Item = (DistanceMethod, f64)> + '_ {
        DistanceMethod::BEST_PRIORITY
            .iter()
            .filter_map(|m| self.distance(*m).map(|d| (*m, d)))
    }
}
