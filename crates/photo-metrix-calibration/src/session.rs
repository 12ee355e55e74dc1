use photo_metrix_core::{euclidean_distance, Point};
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{CalibrationError, CalibrationParams, MarkerColor, MarkerRequest, Prompt};

/// Position of a session in the click sequence.
///
/// States past calibration carry `reference_pixel_distance`, which is always
/// strictly positive and finite: a degenerate reference never leaves
/// `AwaitingSecondReferencePoint`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CalibrationState {
    AwaitingFirstReferencePoint,
    AwaitingSecondReferencePoint {
        first: Point,
    },
    AwaitingFirstMeasurePoint {
        reference_pixel_distance: f64,
    },
    AwaitingSecondMeasurePoint {
        reference_pixel_distance: f64,
        first: Point,
    },
}

/// One completed measurement.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Zero-based position in the session history.
    pub index: usize,
    pub from: Point,
    pub to: Point,
    pub pixel_distance: f64,
    pub distance_m: f64,
}

/// What the caller should do after a click.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClickOutcome {
    pub prompt: Prompt,
    /// Remove every marker drawn for earlier outcomes before drawing `marker`.
    pub clear_markers: bool,
    pub marker: Option<MarkerRequest>,
    pub measurement: Option<Measurement>,
}

/// One interactive calibrate-then-measure session.
///
/// The session is owned by whoever drives the clicks; it holds no shared
/// state and is dropped when the interaction ends.
#[derive(Clone, Debug)]
pub struct CalibrationSession {
    params: CalibrationParams,
    state: CalibrationState,
    history: Vec<Measurement>,
}

impl CalibrationSession {
    pub fn new(params: CalibrationParams) -> Result<Self, CalibrationError> {
        params.validate()?;
        Ok(Self {
            params,
            state: CalibrationState::AwaitingFirstReferencePoint,
            history: Vec::new(),
        })
    }

    #[inline]
    pub fn params(&self) -> &CalibrationParams {
        &self.params
    }

    #[inline]
    pub fn state(&self) -> CalibrationState {
        self.state
    }

    /// Pending first click of the current pair, if any.
    pub fn first_point(&self) -> Option<Point> {
        match self.state {
            CalibrationState::AwaitingSecondReferencePoint { first }
            | CalibrationState::AwaitingSecondMeasurePoint { first, .. } => Some(first),
            _ => None,
        }
    }

    /// Pixel length of the reference segment once calibration completed.
    pub fn reference_pixel_distance(&self) -> Option<f64> {
        match self.state {
            CalibrationState::AwaitingFirstMeasurePoint {
                reference_pixel_distance,
            }
            | CalibrationState::AwaitingSecondMeasurePoint {
                reference_pixel_distance,
                ..
            } => Some(reference_pixel_distance),
            _ => None,
        }
    }

    /// Meters per pixel once calibration completed.
    pub fn scale_m_per_px(&self) -> Option<f64> {
        self.reference_pixel_distance()
            .map(|d| self.params.reference_length_m / d)
    }

    #[inline]
    pub fn is_calibrated(&self) -> bool {
        self.reference_pixel_distance().is_some()
    }

    /// Measurements completed since the last reset, oldest first.
    #[inline]
    pub fn history(&self) -> &[Measurement] {
        &self.history
    }

    /// Instruction for the next expected click.
    pub fn prompt(&self) -> Prompt {
        let reference_length_m = self.params.reference_length_m;
        match self.state {
            CalibrationState::AwaitingFirstReferencePoint => {
                Prompt::SelectFirstReferencePoint { reference_length_m }
            }
            CalibrationState::AwaitingSecondReferencePoint { .. } => {
                Prompt::SelectSecondReferencePoint { reference_length_m }
            }
            CalibrationState::AwaitingFirstMeasurePoint {
                reference_pixel_distance,
            } => Prompt::CalibrationComplete {
                reference_length_m,
                reference_pixel_distance,
            },
            CalibrationState::AwaitingSecondMeasurePoint { .. } => {
                Prompt::SelectSecondMeasurePoint
            }
        }
    }

    /// Drop calibration, pending points and history.
    pub fn reset(&mut self) {
        self.state = CalibrationState::AwaitingFirstReferencePoint;
        self.history.clear();
    }

    /// Advance the session with one clicked point.
    ///
    /// A non-finite point is rejected without touching the state. A
    /// zero-length reference segment resets the session and returns
    /// [`CalibrationError::InvalidCalibration`]; a reference that overflows
    /// to a non-finite length resets it too. Use [`CalibrationError::prompt`]
    /// for the message to show after a reset.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self), fields(x = point.x, y = point.y))
    )]
    pub fn handle_click(&mut self, point: Point) -> Result<ClickOutcome, CalibrationError> {
        if !point.x.is_finite() || !point.y.is_finite() {
            return Err(CalibrationError::NonFinitePoint {
                x: point.x,
                y: point.y,
            });
        }

        let outcome = match self.state {
            CalibrationState::AwaitingFirstReferencePoint => {
                self.state = CalibrationState::AwaitingSecondReferencePoint { first: point };
                ClickOutcome {
                    prompt: self.prompt(),
                    clear_markers: true,
                    marker: Some(marker(point, MarkerColor::Calibration)),
                    measurement: None,
                }
            }
            CalibrationState::AwaitingSecondReferencePoint { first } => {
                let reference_pixel_distance = euclidean_distance(first, point);
                if reference_pixel_distance == 0.0 {
                    log::warn!("zero-length calibration segment at ({}, {})", point.x, point.y);
                    self.reset();
                    return Err(CalibrationError::InvalidCalibration);
                }
                if !reference_pixel_distance.is_finite() {
                    log::warn!("calibration segment length overflowed: {reference_pixel_distance}");
                    self.reset();
                    return Err(CalibrationError::NonFiniteReference(reference_pixel_distance));
                }
                log::debug!(
                    "calibrated: {} m = {reference_pixel_distance:.3} px",
                    self.params.reference_length_m
                );
                self.state = CalibrationState::AwaitingFirstMeasurePoint {
                    reference_pixel_distance,
                };
                ClickOutcome {
                    prompt: self.prompt(),
                    clear_markers: false,
                    marker: Some(marker(point, MarkerColor::Calibration)),
                    measurement: None,
                }
            }
            CalibrationState::AwaitingFirstMeasurePoint {
                reference_pixel_distance,
            } => {
                self.state = CalibrationState::AwaitingSecondMeasurePoint {
                    reference_pixel_distance,
                    first: point,
                };
                ClickOutcome {
                    prompt: self.prompt(),
                    clear_markers: true,
                    marker: Some(marker(point, MarkerColor::Measurement)),
                    measurement: None,
                }
            }
            CalibrationState::AwaitingSecondMeasurePoint {
                reference_pixel_distance,
                first,
            } => {
                let pixel_distance = euclidean_distance(first, point);
                let scale = self.params.reference_length_m / reference_pixel_distance;
                let measurement = Measurement {
                    index: self.history.len(),
                    from: first,
                    to: point,
                    pixel_distance,
                    distance_m: pixel_distance * scale,
                };
                log::debug!(
                    "measurement #{}: {pixel_distance:.3} px -> {:.3} m",
                    measurement.index,
                    measurement.distance_m
                );
                self.history.push(measurement);
                self.state = CalibrationState::AwaitingFirstMeasurePoint {
                    reference_pixel_distance,
                };
                ClickOutcome {
                    prompt: Prompt::MeasurementComplete {
                        distance_m: measurement.distance_m,
                    },
                    clear_markers: false,
                    marker: Some(marker(point, MarkerColor::Measurement)),
                    measurement: Some(measurement),
                }
            }
        };
        Ok(outcome)
    }
}

impl Default for CalibrationSession {
    fn default() -> Self {
        Self {
            params: CalibrationParams::default(),
            state: CalibrationState::AwaitingFirstReferencePoint,
            history: Vec::new(),
        }
    }
}

fn marker(position: Point, color: MarkerColor) -> MarkerRequest {
    MarkerRequest { position, color }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_point_is_tracked_between_clicks() {
        let mut session = CalibrationSession::default();
        assert_eq!(session.first_point(), None);
        session.handle_click(Point::new(1.0, 2.0)).expect("click");
        assert_eq!(session.first_point(), Some(Point::new(1.0, 2.0)));
        session.handle_click(Point::new(4.0, 6.0)).expect("click");
        assert_eq!(session.first_point(), None);
        assert_eq!(session.reference_pixel_distance(), Some(5.0));
    }

    #[test]
    fn non_finite_click_leaves_state_untouched() {
        let mut session = CalibrationSession::default();
        session.handle_click(Point::new(0.0, 0.0)).expect("click");
        let before = session.state();
        let err = session
            .handle_click(Point::new(f64::NAN, 1.0))
            .unwrap_err();
        assert!(matches!(err, CalibrationError::NonFinitePoint { .. }));
        assert_eq!(session.state(), before);
    }

    #[test]
    fn invalid_reference_length_is_rejected() {
        let err = CalibrationSession::new(CalibrationParams {
            reference_length_m: 0.0,
        })
        .unwrap_err();
        assert_eq!(err, CalibrationError::InvalidReferenceLength(0.0));
    }

    #[test]
    fn prompt_follows_state() {
        let mut session = CalibrationSession::default();
        assert!(matches!(
            session.prompt(),
            Prompt::SelectFirstReferencePoint { .. }
        ));
        let outcome = session.handle_click(Point::new(0.0, 0.0)).expect("click");
        assert_eq!(outcome.prompt, session.prompt());
        assert!(matches!(
            outcome.prompt,
            Prompt::SelectSecondReferencePoint { .. }
        ));
    }
}
