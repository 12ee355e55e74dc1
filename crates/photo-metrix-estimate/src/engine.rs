use std::collections::BTreeMap;

use photo_metrix_core::euclidean_distance;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    select_pair, CalibrationContext, CameraIntrinsics, Detection, DetectionPair, DistanceMethod,
    EstimateError, EstimationResult, EstimatorParams,
};

/// Ground sample distance in meters per pixel:
/// `altitude * sensor_width / (focal_length * image_width)`.
///
/// Returns `None` when the denominator vanishes or the result is not finite.
pub fn ground_sample_distance(
    altitude_m: f64,
    camera: &CameraIntrinsics,
    image_width_px: u32,
) -> Option<f64> {
    let denom = camera.focal_length_mm * f64::from(image_width_px);
    if denom == 0.0 {
        return None;
    }
    let gsd = (altitude_m * camera.sensor_width_mm) / denom;
    gsd.is_finite().then_some(gsd)
}

/// Pixel-to-meter distance estimator.
#[derive(Clone, Debug)]
pub struct DistanceEstimator {
    params: EstimatorParams,
}

impl DistanceEstimator {
    pub fn new(params: EstimatorParams) -> Result<Self, EstimateError> {
        params.validate()?;
        Ok(Self { params })
    }

    #[inline]
    pub fn params(&self) -> &EstimatorParams {
        &self.params
    }

    /// Context seeded with this estimator's camera and fallback defaults.
    pub fn context(&self) -> CalibrationContext {
        CalibrationContext::new(&self.params)
    }

    /// Select a pair from raw detections and estimate its distance.
    ///
    /// Fails with [`EstimateError::InsufficientDetections`] when fewer than
    /// two usable detections exist; no partial result is produced.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, detections, context), fields(detections = detections.len()))
    )]
    pub fn estimate(
        &self,
        detections: &[Detection],
        context: &CalibrationContext,
    ) -> Result<EstimationResult, EstimateError> {
        let pair = select_pair(detections, self.params.confidence_threshold)?;
        Ok(self.estimate_pair(&pair, context))
    }

    /// Estimate the distance between the two endpoints of `pair`.
    pub fn estimate_pair(
        &self,
        pair: &DetectionPair,
        context: &CalibrationContext,
    ) -> EstimationResult {
        let [a, b] = pair.centers();
        let pixel_distance = euclidean_distance(a, b);

        let mut distances = BTreeMap::new();
        distances.insert(DistanceMethod::Pixels, pixel_distance);

        let gsd_m_per_px = gps_scale(context);
        if let Some(gsd) = gsd_m_per_px {
            distances.insert(DistanceMethod::GpsCalibrated, pixel_distance * gsd);
        }

        let reference_scale_m_per_px = reference_scale(context);
        if let Some(scale) = reference_scale_m_per_px {
            distances.insert(DistanceMethod::ReferenceCalibrated, pixel_distance * scale);
        }

        let building = pixel_distance * (context.building_height_estimate_m / 100.0);
        distances.insert(DistanceMethod::BuildingEstimate, building);

        let (best_method, best) = DistanceMethod::BEST_PRIORITY
            .iter()
            .find_map(|m| distances.get(m).map(|d| (*m, *d)))
            .unwrap_or((DistanceMethod::BuildingEstimate, building));

        for (method, value) in &distances {
            log::debug!("{method}: {value:.4}");
        }

        EstimationResult {
            pixel_distance,
            distances,
            centers: pair.centers(),
            boxes: pair.boxes(),
            best,
            best_method,
            gsd_m_per_px,
            reference_scale_m_per_px,
        }
    }
}

impl Default for DistanceEstimator {
    fn default() -> Self {
        Self {
            params: EstimatorParams::default(),
        }
    }
}

fn gps_scale(context: &CalibrationContext) -> Option<f64> {
    let altitude = context.gps_altitude_m?;
    if altitude == 0.0 || !altitude.is_finite() {
        log::debug!("gps altitude {altitude} unusable, skipping gps calibration");
        return None;
    }
    let Some(width) = context.image_width_px else {
        log::warn!("gps altitude present but image width unknown, skipping gps calibration");
        return None;
    };
    let gsd = ground_sample_distance(altitude, &context.camera, width);
    if gsd.is_none() {
        log::warn!("degenerate ground sample distance (image width {width}), skipping gps calibration");
    }
    gsd
}

fn reference_scale(context: &CalibrationContext) -> Option<f64> {
    let reference = context.reference?;
    if reference.distance_m <= 0.0 || !reference.distance_m.is_finite() {
        log::debug!("reference distance {} unusable", reference.distance_m);
        return None;
    }
    let [p, q] = reference.points;
    let ref_pixels = euclidean_distance(p, q);
    if ref_pixels == 0.0 || !ref_pixels.is_finite() {
        log::warn!("reference points coincide, skipping reference calibration");
        return None;
    }
    Some(reference.distance_m / ref_pixels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn gsd_matches_closed_form() {
        let gsd = ground_sample_distance(50.0, &CameraIntrinsics::default(), 4000).expect("gsd");
        assert_relative_eq!(gsd, (50.0 * 23.5) / (35.0 * 4000.0));
    }

    #[test]
    fn gsd_is_none_for_zero_width() {
        assert_eq!(
            ground_sample_distance(50.0, &CameraIntrinsics::default(), 0),
            None
        );
    }

    #[test]
    fn invalid_params_are_rejected_at_construction() {
        let mut params = EstimatorParams::default();
        params.camera.sensor_width_mm = f64::NAN;
        assert!(matches!(
            DistanceEstimator::new(params).unwrap_err(),
            EstimateError::Params(_)
        ));
    }
}
