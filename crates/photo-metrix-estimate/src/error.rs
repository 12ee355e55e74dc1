/// Errors returned by the distance estimator.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum EstimateError {
    #[error("at least 2 objects required, found {found}")]
    InsufficientDetections { found: usize },
    #[error("detection center is not finite")]
    NonFiniteCenter,
    #[error(transparent)]
    Params(#[from] ParamsError),
}

/// Invalid estimator configuration.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ParamsError {
    #[error("focal_length_mm must be a finite value > 0 (got {0})")]
    InvalidFocalLength(f64),
    #[error("sensor_width_mm must be a finite value > 0 (got {0})")]
    InvalidSensorWidth(f64),
    #[error("confidence_threshold must be in [0, 1] (got {0})")]
    InvalidConfidenceThreshold(f32),
    #[error("building_height_estimate_m must be a finite value >= 0 (got {0})")]
    InvalidBuildingHeight(f64),
}
