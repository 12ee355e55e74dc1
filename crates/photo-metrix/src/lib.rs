//! High-level facade crate for the `photo-metrix-*` workspace.
//!
//! This crate provides:
//! - stable, convenient re-exports of the underlying crates
//! - the boundary to external collaborators (object detector, photo
//!   metadata reader) and an end-to-end [`PhotoAnalyzer`]
//! - (feature-gated) pixel-dimension probing through the `image` crate
//!
//! ## Quickstart
//!
//! ```
//! use photo_metrix::estimate::{BoundingBox, Detection, DistanceEstimator, DistanceMethod};
//!
//! let estimator = DistanceEstimator::default();
//! let detections = vec![
//!     Detection::new(BoundingBox::new(0.0, 0.0, 20.0, 20.0), 0.9),
//!     Detection::new(BoundingBox::new(60.0, 80.0, 80.0, 100.0), 0.8),
//! ];
//! let ctx = estimator.context().with_gps_altitude(50.0).with_image_width(4000);
//! let result = estimator.estimate(&detections, &ctx).unwrap();
//! assert_eq!(result.best_method, DistanceMethod::GpsCalibrated);
//! ```
//!
//! ## API map
//! - `photo_metrix::core`: geometry, GPS/DMS types, GeoJSON export, logging.
//! - `photo_metrix::calibration`: click-driven two-point calibration session.
//! - `photo_metrix::estimate`: distance estimation from detections.
//! - `photo_metrix::analyze`: collaborator traits and [`PhotoAnalyzer`].

pub use photo_metrix_calibration as calibration;
pub use photo_metrix_core as core;
pub use photo_metrix_estimate as estimate;

pub use photo_metrix_calibration::{CalibrationParams, CalibrationSession};
pub use photo_metrix_core::{BoundingBox, GeotaggedPhoto, GpsFix, Point};
pub use photo_metrix_estimate::{
    CalibrationContext, Detection, DistanceEstimator, DistanceMethod, EstimationResult,
    EstimatorParams,
};

pub mod analyze;
#[cfg(feature = "image")]
pub mod probe;

pub use analyze::{
    collect_images, geotag_photos, is_supported_image, AnalyzeError, BoxError, MetadataSource,
    NoMetadata, ObjectDetector, PhotoAnalysis, PhotoAnalyzer, PhotoRequest,
};
