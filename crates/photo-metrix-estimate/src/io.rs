//! JSON request and report helpers for batch estimation.

use crate::{
    CalibrationContext, Detection, DistanceEstimator, EstimateError, EstimationResult,
    EstimatorParams, ReferenceCalibration,
};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(thiserror::Error, Debug)]
pub enum EstimateIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// One estimation job: detector output plus whatever calibration the
/// caller has for the photo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimateRequest {
    #[serde(default)]
    pub image_path: Option<String>,
    #[serde(default)]
    pub image_width_px: Option<u32>,
    pub detections: Vec<Detection>,
    #[serde(default)]
    pub gps_altitude_m: Option<f64>,
    #[serde(default)]
    pub reference: Option<ReferenceCalibration>,
    #[serde(default)]
    pub params: Option<EstimatorParams>,
    #[serde(default)]
    pub output_path: Option<String>,
}

impl EstimateRequest {
    /// Load a JSON request from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, EstimateIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Resolve the output report path.
    pub fn output_path(&self) -> PathBuf {
        self.output_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("photo_metrix_report.json"))
    }

    /// Estimator parameters, falling back to defaults.
    pub fn build_params(&self) -> EstimatorParams {
        self.params.unwrap_or_default()
    }

    pub fn build_estimator(&self) -> Result<DistanceEstimator, EstimateError> {
        DistanceEstimator::new(self.build_params())
    }

    /// Calibration context for this request.
    pub fn build_context(&self, params: &EstimatorParams) -> CalibrationContext {
        CalibrationContext {
            gps_altitude_m: self.gps_altitude_m,
            image_width_px: self.image_width_px,
            reference: self.reference,
            ..CalibrationContext::new(params)
        }
    }

    /// Run the estimator on this request.
    pub fn run(&self) -> Result<EstimationResult, EstimateError> {
        let estimator = self.build_estimator()?;
        let context = self.build_context(estimator.params());
        estimator.estimate(&self.detections, &context)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimateReport {
    pub request_path: String,
    #[serde(default)]
    pub image_path: Option<String>,
    pub num_detections: usize,
    pub params: EstimatorParams,
    #[serde(default)]
    pub result: Option<EstimationResult>,
    #[serde(default)]
    pub error: Option<String>,
}

impl EstimateReport {
    /// Build a base report from the request.
    pub fn new(req: &EstimateRequest, request_path: &Path) -> Self {
        Self {
            request_path: request_path.to_string_lossy().into_owned(),
            image_path: req.image_path.clone(),
            num_detections: req.detections.len(),
            params: req.build_params(),
            result: None,
            error: None,
        }
    }

    pub fn set_result(&mut self, result: EstimationResult) {
        self.result = Some(result);
        self.error = None;
    }

    pub fn set_error(&mut self, err: EstimateError) {
        self.result = None;
        self.error = Some(err.to_string());
    }

    /// Load a report from JSON on disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, EstimateIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this report to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), EstimateIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
