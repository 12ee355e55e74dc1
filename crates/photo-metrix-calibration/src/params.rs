use serde::{Deserialize, Serialize};

use crate::CalibrationError;

fn default_reference_length_m() -> f64 {
    1.0
}

/// Configuration for a calibration session.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalibrationParams {
    /// Real-world length, in meters, of the segment clicked during
    /// calibration.
    #[serde(default = "default_reference_length_m")]
    pub reference_length_m: f64,
}

impl Default for CalibrationParams {
    fn default() -> Self {
        Self {
            reference_length_m: default_reference_length_m(),
        }
    }
}

impl CalibrationParams {
    pub fn validate(&self) -> Result<(), CalibrationError> {
        if !self.reference_length_m.is_finite() || self.reference_length_m <= 0.0 {
            return Err(CalibrationError::InvalidReferenceLength(
                self.reference_length_m,
            ));
        }
        Ok(())
    }
}
