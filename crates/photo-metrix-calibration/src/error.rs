use crate::Prompt;

/// Errors returned by the calibration session.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CalibrationError {
    /// Both reference clicks landed on the same point. The session has been
    /// reset to wait for the first reference point again.
    #[error("invalid calibration: reference distance cannot be zero")]
    InvalidCalibration,
    /// The reference segment overflowed to a non-finite pixel length. The
    /// session has been reset like for [`CalibrationError::InvalidCalibration`].
    #[error("invalid calibration: reference distance {0} px is not finite")]
    NonFiniteReference(f64),
    #[error("point ({x}, {y}) is not finite")]
    NonFinitePoint { x: f64, y: f64 },
    #[error("reference length must be a finite value > 0 (got {0})")]
    InvalidReferenceLength(f64),
}

impl CalibrationError {
    /// Prompt to show for errors that reset the session.
    pub fn prompt(&self) -> Option<Prompt> {
        match self {
            CalibrationError::InvalidCalibration | CalibrationError::NonFiniteReference(_) => {
                Some(Prompt::CalibrationFailed)
            }
            _ => None,
        }
    }
}
