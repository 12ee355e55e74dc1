//! End-to-end photo analysis over external collaborators.
//!
//! Object detection and metadata extraction are provided by the caller
//! through [`ObjectDetector`] and [`MetadataSource`]. Their failures are
//! handled here: a detector failure is surfaced as
//! [`AnalyzeError::Detector`], a metadata failure only disables GPS
//! calibration.

use std::fs;
use std::path::{Path, PathBuf};

use photo_metrix_core::{GeotaggedPhoto, GpsFix};
use photo_metrix_estimate::{
    Detection, DistanceEstimator, EstimateError, EstimationResult, EstimatorParams,
    ReferenceCalibration,
};

#[cfg(feature = "tracing")]
use tracing::instrument;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// File extensions treated as photos when scanning folders.
const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "tif", "tiff"];

/// Produces bounding boxes and confidences for a photo.
pub trait ObjectDetector {
    fn detect(&self, image: &Path) -> Result<Vec<Detection>, BoxError>;
}

/// Reads the GPS fix stored in a photo's metadata.
pub trait MetadataSource {
    /// `Ok(None)` means the photo simply has no GPS data.
    fn gps_fix(&self, image: &Path) -> Result<Option<GpsFix>, BoxError>;
}

/// Metadata source for photos known to carry no GPS data.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoMetadata;

impl MetadataSource for NoMetadata {
    fn gps_fix(&self, _image: &Path) -> Result<Option<GpsFix>, BoxError> {
        Ok(None)
    }
}

impl<F> ObjectDetector for F
where
    F: Fn(&Path) -> Result<Vec<Detection>, BoxError>,
{
    fn detect(&self, image: &Path) -> Result<Vec<Detection>, BoxError> {
        self(image)
    }
}

/// Errors produced by [`PhotoAnalyzer`].
#[derive(thiserror::Error, Debug)]
pub enum AnalyzeError {
    #[error("object detection failed for {path}: {message}")]
    Detector { path: PathBuf, message: String },
    #[error(transparent)]
    Estimate(#[from] EstimateError),
}

/// Per-photo inputs that do not come from collaborators.
#[derive(Clone, Debug, Default)]
pub struct PhotoRequest {
    pub image_path: PathBuf,
    /// Pixel width of the photo. Probed from the file when absent and the
    /// `image` feature is enabled.
    pub image_width_px: Option<u32>,
    pub reference: Option<ReferenceCalibration>,
}

impl PhotoRequest {
    pub fn new(image_path: impl Into<PathBuf>) -> Self {
        Self {
            image_path: image_path.into(),
            ..Self::default()
        }
    }
}

/// Result of analyzing one photo.
#[derive(Clone, Debug)]
pub struct PhotoAnalysis {
    pub image_path: PathBuf,
    pub gps: Option<GpsFix>,
    pub num_detections: usize,
    pub result: EstimationResult,
}

/// Detector + metadata + estimator, wired together.
pub struct PhotoAnalyzer<D, M> {
    estimator: DistanceEstimator,
    detector: D,
    metadata: M,
}

impl<D: ObjectDetector, M: MetadataSource> PhotoAnalyzer<D, M> {
    pub fn new(params: EstimatorParams, detector: D, metadata: M) -> Result<Self, EstimateError> {
        Ok(Self {
            estimator: DistanceEstimator::new(params)?,
            detector,
            metadata,
        })
    }

    #[inline]
    pub fn estimator(&self) -> &DistanceEstimator {
        &self.estimator
    }

    /// Run detection, read metadata and estimate the distance between the
    /// two selected objects.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, request), fields(path = %request.image_path.display()))
    )]
    pub fn analyze(&self, request: &PhotoRequest) -> Result<PhotoAnalysis, AnalyzeError> {
        let path = request.image_path.as_path();
        let detections = self
            .detector
            .detect(path)
            .map_err(|err| AnalyzeError::Detector {
                path: path.to_path_buf(),
                message: err.to_string(),
            })?;
        log::debug!("{} detection(s) in {}", detections.len(), path.display());

        let gps = match self.metadata.gps_fix(path) {
            Ok(fix) => fix,
            Err(err) => {
                log::warn!("metadata unreadable for {}: {err}", path.display());
                None
            }
        };

        let mut context = self.estimator.context();
        context.image_width_px = request.image_width_px.or_else(|| probe_width(path));
        context.reference = request.reference;
        if let Some(fix) = gps.as_ref() {
            context = context.with_gps_fix(fix);
        }

        let result = self.estimator.estimate(&detections, &context)?;
        Ok(PhotoAnalysis {
            image_path: path.to_path_buf(),
            gps,
            num_detections: detections.len(),
            result,
        })
    }

    /// Single best metric distance for a photo.
    pub fn analyze_best(&self, request: &PhotoRequest) -> Result<f64, AnalyzeError> {
        Ok(self.analyze(request)?.result.best)
    }
}

#[cfg(feature = "image")]
fn probe_width(path: &Path) -> Option<u32> {
    match crate::probe::image_width_px(path) {
        Ok(width) => Some(width),
        Err(err) => {
            log::warn!("cannot read dimensions of {}: {err}", path.display());
            None
        }
    }
}

#[cfg(not(feature = "image"))]
fn probe_width(_path: &Path) -> Option<u32> {
    None
}

/// `true` for paths with a photo extension (case-insensitive).
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

/// Photos directly inside `dir`, sorted by path.
pub fn collect_images(dir: impl AsRef<Path>) -> std::io::Result<Vec<PathBuf>> {
    let mut images = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_supported_image(&path) {
            images.push(path);
        }
    }
    images.sort();
    Ok(images)
}

/// Read GPS fixes for a batch of photos.
///
/// Unreadable metadata yields a photo without fix; the batch never fails.
pub fn geotag_photos<M: MetadataSource>(metadata: &M, paths: &[PathBuf]) -> Vec<GeotaggedPhoto> {
    paths
        .iter()
        .map(|path| {
            let fix = metadata.gps_fix(path).unwrap_or_else(|err| {
                log::warn!("metadata unreadable for {}: {err}", path.display());
                None
            });
            GeotaggedPhoto {
                filename: path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                path: path.to_string_lossy().into_owned(),
                fix,
            }
        })
        .collect()
}
