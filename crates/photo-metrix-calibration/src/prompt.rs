use std::fmt;

use photo_metrix_core::Point;
use serde::{Deserialize, Serialize};

/// Severity of a prompt, for picking the notification style.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptLevel {
    Info,
    Success,
    Critical,
}

/// Instruction shown to the user after each transition.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Prompt {
    SelectFirstReferencePoint { reference_length_m: f64 },
    SelectSecondReferencePoint { reference_length_m: f64 },
    CalibrationComplete {
        reference_length_m: f64,
        reference_pixel_distance: f64,
    },
    SelectSecondMeasurePoint,
    MeasurementComplete { distance_m: f64 },
    CalibrationFailed,
}

impl Prompt {
    pub fn level(&self) -> PromptLevel {
        match self {
            Prompt::CalibrationComplete { .. } => PromptLevel::Success,
            Prompt::CalibrationFailed => PromptLevel::Critical,
            _ => PromptLevel::Info,
        }
    }

    /// Short heading for the notification surface.
    pub fn title(&self) -> &'static str {
        match self {
            Prompt::SelectFirstReferencePoint { .. } | Prompt::SelectSecondReferencePoint { .. } => {
                "Step 1: Calibration"
            }
            Prompt::CalibrationComplete { .. } => "Calibration complete",
            Prompt::SelectSecondMeasurePoint | Prompt::MeasurementComplete { .. } => {
                "Step 2: Measurement"
            }
            Prompt::CalibrationFailed => "Error",
        }
    }
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prompt::SelectFirstReferencePoint { reference_length_m } => write!(
                f,
                "Click the first point of your {reference_length_m} m reference."
            ),
            Prompt::SelectSecondReferencePoint { reference_length_m } => write!(
                f,
                "Click the second point of your {reference_length_m} m reference."
            ),
            Prompt::CalibrationComplete {
                reference_length_m,
                reference_pixel_distance,
            } => write!(
                f,
                "{reference_length_m} m reference set to {reference_pixel_distance:.2} px. \
                 Click the first point of the distance to measure."
            ),
            Prompt::SelectSecondMeasurePoint => {
                write!(f, "Click the second point of the distance.")
            }
            Prompt::MeasurementComplete { distance_m } => write!(
                f,
                "Measured distance: {distance_m:.3} m. Click the first point for a new measurement."
            ),
            Prompt::CalibrationFailed => write!(
                f,
                "Calibration distance must be non-zero and finite. Click the first reference point again."
            ),
        }
    }
}

/// Color tag for rendered markers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerColor {
    /// Reference (calibration) clicks.
    Calibration,
    /// Measurement clicks.
    Measurement,
}

/// Request to draw a marker at a clicked position.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarkerRequest {
    pub position: Point,
    pub color: MarkerColor,
}
