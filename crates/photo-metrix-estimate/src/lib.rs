//! Distance estimation between two objects in a photo.
//!
//! The estimator turns a pair of detections into a pixel distance and then
//! scales it to meters with every calibration the caller can provide:
//! - GPS altitude plus camera intrinsics (ground sample distance),
//! - a user-supplied reference segment of known length,
//! - an unconditional coarse heuristic, so at least one metric value exists.
//!
//! Object detection and metadata extraction are not part of this crate; the
//! caller feeds their output in as [`Detection`]s and a
//! [`CalibrationContext`].

mod context;
mod detection;
mod engine;
mod error;
mod io;
mod params;
mod result;

pub use context::{CalibrationContext, ReferenceCalibration};
pub use detection::{select_pair, Detection, DetectionPair};
pub use engine::{ground_sample_distance, DistanceEstimator};
pub use error::{EstimateError, ParamsError};
pub use io::{EstimateIoError, EstimateReport, EstimateRequest};
pub use params::{CameraIntrinsics, EstimatorParams};
pub use result::{DistanceMethod, EstimationResult};

pub use photo_metrix_core::{euclidean_distance, BoundingBox, Point};
