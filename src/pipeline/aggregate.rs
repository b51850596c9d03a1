//! Zone assignment and tallying.

use std::collections::HashMap;

use crate::detect::Detection;
use crate::geometry::{point_in_polygon, Point};
use crate::zones::Zone;

/// Count detections per zone.
///
/// Every zone starts at 0. Each detection's center point is tested
/// against the zones in their input order and the first containing zone
/// takes the count; a detection belongs to at most one zone. Detections
/// whose center falls in no zone are excluded from all tallies, which
/// is a valid outcome rather than an error.
pub fn count_in_zones(detections: &[Detection], zones: &[Zone]) -> HashMap<String, u32> {
    let mut counts: HashMap<String, u32> =
        zones.iter().map(|zone| (zone.id.clone(), 0)).collect();

    for detection in detections {
        let (cx, cy) = detection.center();
        let center = Point::new(cx, cy);

        for zone in zones {
            if point_in_polygon(center, &zone.coordinates) {
                if let Some(count) = counts.get_mut(&zone.id) {
                    *count += 1;
                }
                break;
            }
        }
    }

    counts
}
