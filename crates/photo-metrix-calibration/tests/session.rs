use approx::assert_relative_eq;
use photo_metrix_calibration::{
    CalibrationError, CalibrationParams, CalibrationSession, CalibrationState, MarkerColor, Point,
    Prompt, PromptLevel,
};

fn calibrated(p1: Point, p2: Point) -> CalibrationSession {
    let mut session = CalibrationSession::default();
    session.handle_click(p1).expect("first reference click");
    session.handle_click(p2).expect("second reference click");
    session
}

#[test]
fn calibrate_then_measure_one_meter() {
    let mut session = calibrated(Point::new(0.0, 0.0), Point::new(3.0, 4.0));
    assert_eq!(session.reference_pixel_distance(), Some(5.0));

    let first = session.handle_click(Point::new(0.0, 0.0)).expect("p3");
    assert!(first.measurement.is_none());
    assert!(first.clear_markers);
    assert_eq!(first.prompt, Prompt::SelectSecondMeasurePoint);

    let second = session.handle_click(Point::new(0.0, 5.0)).expect("p4");
    let m = second.measurement.expect("measurement");
    assert_relative_eq!(m.pixel_distance, 5.0);
    assert_relative_eq!(m.distance_m, 1.0);
    assert!(matches!(
        second.prompt,
        Prompt::MeasurementComplete { distance_m } if (distance_m - 1.0).abs() < 1e-12
    ));
}

#[test]
fn zero_length_reference_resets_session() {
    let mut session = CalibrationSession::default();
    session.handle_click(Point::new(7.0, 7.0)).expect("p1");
    let err = session.handle_click(Point::new(7.0, 7.0)).unwrap_err();

    assert_eq!(err, CalibrationError::InvalidCalibration);
    assert_eq!(err.to_string(), "invalid calibration: reference distance cannot be zero");
    assert_eq!(session.state(), CalibrationState::AwaitingFirstReferencePoint);
    assert_eq!(session.first_point(), None);
    assert_eq!(session.reference_pixel_distance(), None);
    assert!(!session.is_calibrated());

    let prompt = err.prompt().expect("reset prompt");
    assert_eq!(prompt, Prompt::CalibrationFailed);
    assert_eq!(prompt.level(), PromptLevel::Critical);
    assert_eq!(prompt.title(), "Error");
}

#[test]
fn overflowing_reference_resets_session() {
    let mut session = CalibrationSession::default();
    session.handle_click(Point::new(-1e308, 0.0)).expect("p1");
    let err = session.handle_click(Point::new(1e308, 0.0)).unwrap_err();

    assert!(matches!(err, CalibrationError::NonFiniteReference(d) if d.is_infinite()));
    assert_eq!(err.prompt(), Some(Prompt::CalibrationFailed));
    assert_eq!(session.state(), CalibrationState::AwaitingFirstReferencePoint);
    assert_eq!(session.scale_m_per_px(), None);

    // Recalibrating on a sane segment yields finite measurements again.
    session.handle_click(Point::new(0.0, 0.0)).expect("p1");
    session.handle_click(Point::new(0.0, 100.0)).expect("p2");
    session.handle_click(Point::new(0.0, 0.0)).expect("p3");
    let m = session
        .handle_click(Point::new(100.0, 0.0))
        .expect("p4")
        .measurement
        .expect("measurement");
    assert_relative_eq!(m.distance_m, 1.0);
}

#[test]
fn non_resetting_errors_have_no_prompt() {
    let err = CalibrationError::NonFinitePoint {
        x: f64::NAN,
        y: 0.0,
    };
    assert_eq!(err.prompt(), None);
}

#[test]
fn distinct_reference_points_are_accepted() {
    for (p1, p2) in [
        (Point::new(0.0, 0.0), Point::new(0.0, 1e-9)),
        (Point::new(-10.0, 3.0), Point::new(10.0, 3.0)),
        (Point::new(100.5, 200.25), Point::new(99.0, 180.0)),
    ] {
        let session = calibrated(p1, p2);
        let d = session.reference_pixel_distance().expect("calibrated");
        assert!(d > 0.0);
    }
}

#[test]
fn calibration_persists_across_measurements() {
    let mut session = calibrated(Point::new(0.0, 0.0), Point::new(10.0, 0.0));

    session.handle_click(Point::new(0.0, 0.0)).expect("p3");
    let a = session
        .handle_click(Point::new(20.0, 0.0))
        .expect("p4")
        .measurement
        .expect("first measurement");
    assert!(matches!(
        session.state(),
        CalibrationState::AwaitingFirstMeasurePoint { .. }
    ));

    session.handle_click(Point::new(5.0, 5.0)).expect("p3 again");
    let b = session
        .handle_click(Point::new(5.0, 10.0))
        .expect("p4 again")
        .measurement
        .expect("second measurement");

    assert_relative_eq!(a.distance_m, 2.0);
    assert_relative_eq!(b.distance_m, 0.5);
    assert_eq!(a.index, 0);
    assert_eq!(b.index, 1);
    assert_eq!(session.history().len(), 2);
    assert_eq!(session.reference_pixel_distance(), Some(10.0));
}

#[test]
fn reference_length_scales_measurements() {
    let mut session = CalibrationSession::new(CalibrationParams {
        reference_length_m: 2.5,
    })
    .expect("session");
    session.handle_click(Point::new(0.0, 0.0)).expect("p1");
    session.handle_click(Point::new(0.0, 50.0)).expect("p2");
    assert_relative_eq!(session.scale_m_per_px().expect("scale"), 0.05);

    session.handle_click(Point::new(0.0, 0.0)).expect("p3");
    let m = session
        .handle_click(Point::new(30.0, 40.0))
        .expect("p4")
        .measurement
        .expect("measurement");
    assert_relative_eq!(m.distance_m, 2.5);
}

#[test]
fn markers_are_colored_by_phase() {
    let mut session = CalibrationSession::default();
    let colors: Vec<MarkerColor> = [
        Point::new(0.0, 0.0),
        Point::new(1.0, 0.0),
        Point::new(2.0, 0.0),
        Point::new(3.0, 0.0),
    ]
    .into_iter()
    .map(|p| session.handle_click(p).expect("click").marker.expect("marker").color)
    .collect();

    assert_eq!(
        colors,
        vec![
            MarkerColor::Calibration,
            MarkerColor::Calibration,
            MarkerColor::Measurement,
            MarkerColor::Measurement,
        ]
    );
}

#[test]
fn calibration_complete_prompt_is_success() {
    let mut session = CalibrationSession::default();
    session.handle_click(Point::new(0.0, 0.0)).expect("p1");
    let outcome = session.handle_click(Point::new(0.0, 8.0)).expect("p2");
    assert_eq!(outcome.prompt.level(), PromptLevel::Success);
    assert!(outcome.prompt.to_string().contains("8.00 px"));
}

#[test]
fn reset_drops_calibration_and_history() {
    let mut session = calibrated(Point::new(0.0, 0.0), Point::new(1.0, 0.0));
    session.handle_click(Point::new(0.0, 0.0)).expect("p3");
    session.handle_click(Point::new(1.0, 0.0)).expect("p4");
    assert_eq!(session.history().len(), 1);

    session.reset();
    assert_eq!(session.state(), CalibrationState::AwaitingFirstReferencePoint);
    assert!(session.history().is_empty());
}

#[test]
fn outcome_serializes_with_tagged_prompt() {
    let mut session = CalibrationSession::default();
    let outcome = session.handle_click(Point::new(1.0, 2.0)).expect("p1");
    let json = serde_json::to_value(&outcome).expect("serialize");
    assert_eq!(json["prompt"]["kind"], "select_second_reference_point");
    assert_eq!(json["marker"]["color"], "calibration");
}
