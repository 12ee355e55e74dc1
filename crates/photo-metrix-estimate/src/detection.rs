use photo_metrix_core::{BoundingBox, Point};
use serde::{Deserialize, Serialize};

use crate::EstimateError;

/// One object reported by a detector.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub bbox: BoundingBox,
    pub confidence: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Detection {
    pub fn new(bbox: BoundingBox, confidence: f32) -> Self {
        Self {
            bbox,
            confidence,
            label: None,
        }
    }

    #[inline]
    pub fn center(&self) -> Point {
        self.bbox.center()
    }
}

/// The two endpoints of a distance measurement.
///
/// Constructed only through [`DetectionPair::new`], [`DetectionPair::from_points`]
/// or [`select_pair`], all of which guarantee finite centers.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DetectionPair {
    boxes: [BoundingBox; 2],
    centers: [Point; 2],
    confidences: [f32; 2],
}

impl DetectionPair {
    pub fn new(a: &Detection, b: &Detection) -> Result<Self, EstimateError> {
        let centers = [a.center(), b.center()];
        if centers
            .iter()
            .any(|c| !c.x.is_finite() || !c.y.is_finite())
        {
            return Err(EstimateError::NonFiniteCenter);
        }
        Ok(Self {
            boxes: [a.bbox, b.bbox],
            centers,
            confidences: [a.confidence, b.confidence],
        })
    }

    /// Pair from two user-picked points, modeled as zero-size boxes with
    /// full confidence.
    pub fn from_points(a: Point, b: Point) -> Result<Self, EstimateError> {
        let as_detection = |p: Point| Detection::new(BoundingBox::new(p.x, p.y, p.x, p.y), 1.0);
        Self::new(&as_detection(a), &as_detection(b))
    }

    #[inline]
    pub fn centers(&self) -> [Point; 2] {
        self.centers
    }

    #[inline]
    pub fn boxes(&self) -> [BoundingBox; 2] {
        self.boxes
    }

    #[inline]
    pub fn confidences(&self) -> [f32; 2] {
        self.confidences
    }
}

/// Pick the two detections used as measurement endpoints.
///
/// Detections with non-finite boxes or confidences outside `[0, 1]` are
/// dropped first. When at least two
/// detections score strictly above `confidence_threshold`, the two best of
/// those are used; otherwise the two best raw detections are used regardless
/// of threshold. Ties keep detector order.
pub fn select_pair(
    detections: &[Detection],
    confidence_threshold: f32,
) -> Result<DetectionPair, EstimateError> {
    let mut usable: Vec<&Detection> = detections
        .iter()
        .filter(|d| d.bbox.is_finite() && (0.0..=1.0).contains(&d.confidence))
        .collect();
    if usable.len() < detections.len() {
        log::warn!(
            "dropped {} detection(s) with non-finite boxes or invalid confidence",
            detections.len() - usable.len()
        );
    }
    if usable.len() < 2 {
        return Err(EstimateError::InsufficientDetections {
            found: usable.len(),
        });
    }

    // Stable sort: equal scores keep detector order.
    usable.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

    let qualifying: Vec<&Detection> = usable
        .iter()
        .copied()
        .filter(|d| d.confidence > confidence_threshold)
        .collect();

    let chosen = if qualifying.len() >= 2 {
        &qualifying
    } else {
        log::debug!(
            "{} detection(s) above confidence {confidence_threshold}, using top raw detections",
            qualifying.len()
        );
        &usable
    };

    DetectionPair::new(chosen[0], chosen[1])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn det(x: f64, confidence: f32) -> Detection {
        Detection::new(BoundingBox::new(x, 0.0, x + 10.0, 10.0), confidence)
    }

    #[test]
    fn picks_two_highest_qualifying() {
        let dets = vec![det(0.0, 0.6), det(100.0, 0.9), det(200.0, 0.3), det(300.0, 0.8)];
        let pair = select_pair(&dets, 0.5).expect("pair");
        assert_eq!(pair.centers()[0], Point::new(105.0, 5.0));
        assert_eq!(pair.centers()[1], Point::new(305.0, 5.0));
        assert_eq!(pair.confidences(), [0.9, 0.8]);
    }

    #[test]
    fn falls_back_to_raw_when_fewer_than_two_qualify() {
        let dets = vec![det(0.0, 0.2), det(100.0, 0.9), det(200.0, 0.4)];
        let pair = select_pair(&dets, 0.5).expect("pair");
        assert_eq!(pair.confidences(), [0.9, 0.4]);
    }

    #[test]
    fn threshold_is_strict() {
        let dets = vec![det(0.0, 0.5), det(100.0, 0.5), det(200.0, 0.1)];
        let pair = select_pair(&dets, 0.5).expect("pair");
        // Neither clears 0.5, raw top two are the same detections.
        assert_eq!(pair.confidences(), [0.5, 0.5]);
        assert_eq!(pair.centers()[0], Point::new(5.0, 5.0));
    }

    #[test]
    fn single_detection_is_insufficient() {
        let err = select_pair(&[det(0.0, 0.99)], 0.5).unwrap_err();
        assert_eq!(err, EstimateError::InsufficientDetections { found: 1 });
        assert_eq!(err.to_string(), "at least 2 objects required, found 1");
    }

    #[test]
    fn non_finite_boxes_do_not_count() {
        let bad = Detection::new(BoundingBox::new(f64::NAN, 0.0, 1.0, 1.0), 0.99);
        let err = select_pair(&[bad, det(0.0, 0.9)], 0.5).unwrap_err();
        assert_eq!(err, EstimateError::InsufficientDetections { found: 1 });
    }

    #[test]
    fn invalid_confidences_are_dropped() {
        let dets = vec![
            det(0.0, 0.4),
            det(100.0, f32::NAN),
            det(200.0, 0.3),
            det(300.0, 1.5),
        ];
        let pair = select_pair(&dets, 0.5).expect("pair");
        assert_eq!(pair.confidences(), [0.4, 0.3]);
        assert_eq!(pair.centers()[0], Point::new(5.0, 5.0));

        let err = select_pair(&[det(0.0, f32::NAN), det(10.0, 0.9)], 0.5).unwrap_err();
        assert_eq!(err, EstimateError::InsufficientDetections { found: 1 });
    }

    #[test]
    fn from_points_rejects_nan() {
        let err = DetectionPair::from_points(Point::new(f64::NAN, 0.0), Point::new(1.0, 1.0))
            .unwrap_err();
        assert_eq!(err, EstimateError::NonFiniteCenter);
    }
}
