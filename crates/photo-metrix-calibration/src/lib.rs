//! Manual two-point calibration for measuring distances on a photo.
//!
//! A [`CalibrationSession`] consumes point clicks in a fixed order:
//! - two clicks spanning a segment of known length (the reference),
//! - then pairs of clicks whose distance is reported in meters.
//!
//! After one calibration the session keeps measuring: every second
//! measurement click yields a [`Measurement`] and the session waits for the
//! next pair. Each click also returns a [`Prompt`] for the next action and an
//! optional [`MarkerRequest`] the caller may render.

mod error;
mod params;
mod prompt;
mod session;

pub use error::CalibrationError;
pub use params::CalibrationParams;
pub use prompt::{MarkerColor, MarkerRequest, Prompt, PromptLevel};
pub use session::{CalibrationSession, CalibrationState, ClickOutcome, Measurement};

pub use photo_metrix_core::{euclidean_distance, Point};
