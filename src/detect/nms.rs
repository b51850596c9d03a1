//! Duplicate suppression over raw detector output.
//!
//! Person detectors fire several overlapping boxes per person; greedy
//! non-maximum suppression keeps the highest-weighted representative of
//! each cluster and drops the rest.

use crate::detect::result::Detection;

/// Overlap above which two boxes are considered the same person.
/// Empirical, inherited; tune with care.
pub const DEFAULT_IOU_THRESHOLD: f32 = 0.3;

/// Intersection-over-union of two boxes over their `(x1,y1,x2,y2)`
/// rectangles. A zero-area union yields 0.
pub fn iou(a: &Detection, b: &Detection) -> f32 {
    let x1 = a.x.max(b.x);
    let y1 = a.y.max(b.y);
    let x2 = (a.x + a.width).min(b.x + b.width);
    let y2 = (a.y + a.height).min(b.y + b.height);

    let intersection = if x2 > x1 && y2 > y1 {
        (x2 - x1) * (y2 - y1)
    } else {
        0.0
    };

    let union = a.area() + b.area() - intersection;
    if union > 0.0 {
        intersection / union
    } else {
        0.0
    }
}

/// Greedy NMS: keep the heaviest remaining detection, suppress every
/// remaining box whose IoU with it exceeds `threshold`, repeat.
///
/// The result is a subset of the input (no new geometry). Output order
/// is the keep order: descending weight, ties broken by input index, so
/// identical input always yields identical output.
pub fn suppress_overlaps(detections: &[Detection], threshold: f32) -> Vec<Detection> {
    if detections.is_empty() {
        return Vec::new();
    }

    let mut order: Vec<usize> = (0..detections.len()).collect();
    order.sort_by(|&a, &b| {
        detections[b]
            .weight
            .partial_cmp(&detections[a].weight)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.cmp(&b))
    });

    let mut kept = Vec::new();
    while let Some(best) = order.first().copied() {
        kept.push(detections[best].clone());
        order.retain(|&candidate| {
            candidate != best && iou(&detections[best], &detections[candidate]) <= threshold
        });
    }

    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boxed(x: f32, y: f32, w: f32, h: f32, weight: f32) -> Detection {
        Detection::new(x, y, w, h, weight)
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert!(suppress_overlaps(&[], DEFAULT_IOU_THRESHOLD).is_empty());
    }

    #[test]
    fn disjoint_boxes_all_survive() {
        let input = vec![
            boxed(0.0, 0.0, 10.0, 10.0, 0.9),
            boxed(100.0, 0.0, 10.0, 10.0, 0.5),
            boxed(0.0, 100.0, 10.0, 10.0, 0.7),
        ];

        let output = suppress_overlaps(&input, DEFAULT_IOU_THRESHOLD);
        assert_eq!(output.len(), 3);
        for d in &input {
            assert!(output.contains(d));
        }
    }

    #[test]
    fn identical_boxes_keep_only_the_heavier() {
        let input = vec![
            boxed(10.0, 10.0, 40.0, 80.0, 0.4),
            boxed(10.0, 10.0, 40.0, 80.0, 0.9),
        ];

        let output = suppress_overlaps(&input, DEFAULT_IOU_THRESHOLD);
        assert_eq!(output, vec![boxed(10.0, 10.0, 40.0, 80.0, 0.9)]);
    }

    #[test]
    fn overlap_below_threshold_survives() {
        // IoU of these two is 1/7 ≈ 0.14, under the 0.3 default.
        let input = vec![
            boxed(0.0, 0.0, 20.0, 10.0, 0.9),
            boxed(15.0, 0.0, 20.0, 10.0, 0.8),
        ];

        let output = suppress_overlaps(&input, DEFAULT_IOU_THRESHOLD);
        assert_eq!(output.len(), 2);
    }

    #[test]
    fn suppression_is_greedy_not_transitive() {
        // b overlaps a heavily and c moderately; a and c barely overlap.
        // Greedy NMS keeps a, drops b, then keeps c.
        let a = boxed(0.0, 0.0, 20.0, 20.0, 0.9);
        let b = boxed(5.0, 0.0, 20.0, 20.0, 0.8);
        let c = boxed(16.0, 0.0, 20.0, 20.0, 0.7);

        let output = suppress_overlaps(&[a.clone(), b, c.clone()], DEFAULT_IOU_THRESHOLD);
        assert_eq!(output, vec![a, c]);
    }

    #[test]
    fn output_is_deterministic_for_equal_weights() {
        let input = vec![
            boxed(0.0, 0.0, 10.0, 10.0, 0.5),
            boxed(100.0, 0.0, 10.0, 10.0, 0.5),
            boxed(200.0, 0.0, 10.0, 10.0, 0.5),
        ];

        let first = suppress_overlaps(&input, DEFAULT_IOU_THRESHOLD);
        let second = suppress_overlaps(&input, DEFAULT_IOU_THRESHOLD);
        assert_eq!(first, second);
        assert_eq!(first, input);
    }

    #[test]
    fn zero_area_boxes_do_not_suppress() {
        let input = vec![
            boxed(5.0, 5.0, 0.0, 0.0, 0.9),
            boxed(5.0, 5.0, 0.0, 0.0, 0.1),
        ];

        // Union area is 0, so IoU is defined as 0 and both survive.
        let output = suppress_overlaps(&input, DEFAULT_IOU_THRESHOLD);
        assert_eq!(output.len(), 2);
    }

    #[test]
    fn iou_of_identical_boxes_is_one() {
        let a = boxed(3.0, 4.0, 10.0, 20.0, 0.5);
        assert!((iou(&a, &a) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn iou_of_disjoint_boxes_is_zero() {
        let a = boxed(0.0, 0.0, 10.0, 10.0, 0.5);
        let b = boxed(50.0, 50.0, 10.0, 10.0, 0.5);
        assert_eq!(iou(&a, &b), 0.0);
    }
}
