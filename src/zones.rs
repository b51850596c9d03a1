//! Zone model, loading, and geometry normalization.
//!
//! Zones are named polygons authored against some reference resolution
//! that may not match the video being analyzed. `normalize_zones`
//! reconciles the two before any detection work:
//!
//! - no zones at all → a single synthesized full-frame zone
//! - all zones identical and undersized → redistributed into vertical
//!   strips tiling the frame
//! - otherwise undersized → uniformly rescaled to fit the frame
//!
//! Zone order is part of the contract: the aggregator tests zones in
//! input order and the first match wins, so a `Vec<Zone>` is an ordered
//! sequence, never a set.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::geometry::{bounding_extent, Point};

/// Capacity used for density percentages when a zone document omits one.
pub const DEFAULT_MAX_CAPACITY: f64 = 10.0;

/// Zones whose extent spans less than this fraction of either frame
/// dimension are treated as mis-scaled. Empirical, inherited; tune with
/// care.
pub const ZONE_EXTENT_MIN_RATIO: f32 = 0.5;

/// Identity of the zone synthesized when no zones are supplied.
pub const FULL_VIDEO_ZONE_ID: &str = "full-video-zone";
pub const FULL_VIDEO_ZONE_NAME: &str = "Full Video";

/// A named polygonal zone.
///
/// `coordinates` is an ordered vertex sequence forming a simple
/// polygon, closing last→first. At least 3 vertices; `load_zones`
/// rejects anything smaller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    pub id: String,
    pub name: String,
    pub coordinates: Vec<Point>,
    #[serde(default = "default_max_capacity")]
    pub max_capacity: f64,
}

fn default_max_capacity() -> f64 {
    DEFAULT_MAX_CAPACITY
}

/// Load a zone sequence from a JSON document (an array of zones).
pub fn load_zones(path: &Path) -> Result<Vec<Zone>> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read zones file {}: {}", path.display(), e))?;
    let zones: Vec<Zone> = serde_json::from_str(&raw)
        .map_err(|e| anyhow!("invalid zones file {}: {}", path.display(), e))?;
    validate_zones(&zones).with_context(|| format!("zones file {}", path.display()))?;
    Ok(zones)
}

/// Reject degenerate polygons. The geometry layer assumes well-formed
/// input, so malformed zones must not get past loading.
pub fn validate_zones(zones: &[Zone]) -> Result<()> {
    for zone in zones {
        if zone.coordinates.len() < 3 {
            return Err(anyhow!(
                "zone '{}' has {} vertices; a polygon needs at least 3",
                zone.id,
                zone.coordinates.len()
            ));
        }
        if zone.max_capacity <= 0.0 {
            return Err(anyhow!(
                "zone '{}' has non-positive maxCapacity {}",
                zone.id,
                zone.max_capacity
            ));
        }
    }
    Ok(())
}

/// Rectangle zone covering the whole frame.
pub fn full_frame_zone(frame_width: u32, frame_height: u32) -> Zone {
    let w = frame_width as f32;
    let h = frame_height as f32;
    Zone {
        id: FULL_VIDEO_ZONE_ID.to_string(),
        name: FULL_VIDEO_ZONE_NAME.to_string(),
        coordinates: vec![
            Point::new(0.0, 0.0),
            Point::new(w, 0.0),
            Point::new(w, h),
            Point::new(0.0, h),
        ],
        max_capacity: DEFAULT_MAX_CAPACITY,
    }
}

/// Reconcile zone geometry with the actual frame size.
///
/// Runs once per analysis, before streaming. Zones spanning at least
/// [`ZONE_EXTENT_MIN_RATIO`] of both frame dimensions pass through
/// untouched; everything else gets one of the corrective policies
/// described in the module docs. All corrections are logged at warn
/// level.
pub fn normalize_zones(zones: Vec<Zone>, frame_width: u32, frame_height: u32) -> Vec<Zone> {
    if zones.is_empty() {
        log::warn!(
            "no zones defined; creating default '{}' zone covering the {}x{} frame",
            FULL_VIDEO_ZONE_NAME,
            frame_width,
            frame_height
        );
        return vec![full_frame_zone(frame_width, frame_height)];
    }

    let Some((min_x, min_y, max_x, max_y)) =
        bounding_extent(zones.iter().map(|zone| zone.coordinates.as_slice()))
    else {
        return zones;
    };

    let extent_w = max_x - min_x;
    let extent_h = max_y - min_y;
    let fits_frame = extent_w >= frame_width as f32 * ZONE_EXTENT_MIN_RATIO
        && extent_h >= frame_height as f32 * ZONE_EXTENT_MIN_RATIO;
    if fits_frame {
        return zones;
    }

    if zones.len() > 1 && all_identical(&zones) {
        log::warn!(
            "all {} zones share identical {}x{} geometry; distributing them across the {}x{} frame",
            zones.len(),
            extent_w,
            extent_h,
            frame_width,
            frame_height
        );
        return distribute_into_strips(zones, frame_width, frame_height);
    }

    // Uniform rescale preserving relative shape and position.
    let scale = (frame_width as f32 / max_x.max(1.0)).min(frame_height as f32 / max_y.max(1.0));
    log::warn!(
        "zones too small for the frame (extent {}x{}); scaling by {:.2}x to fit {}x{}",
        extent_w,
        extent_h,
        scale,
        frame_width,
        frame_height
    );

    zones
        .into_iter()
        .map(|mut zone| {
            for vertex in &mut zone.coordinates {
                vertex.x = (vertex.x * scale).trunc();
                vertex.y = (vertex.y * scale).trunc();
            }
            zone
        })
        .collect()
}

fn all_identical(zones: &[Zone]) -> bool {
    let first = &zones[0].coordinates;
    zones[1..].iter().all(|zone| &zone.coordinates == first)
}

/// Replace identical zones with equal-width vertical strips spanning the
/// full frame height, in the original order. The last strip absorbs the
/// integer-division remainder so the strips tile `[0, frame_width]`
/// exactly.
fn distribute_into_strips(zones: Vec<Zone>, frame_width: u32, frame_height: u32) -> Vec<Zone> {
    let count = zones.len() as u32;
    let strip_width = frame_width / count;
    let h = frame_height as f32;

    zones
        .into_iter()
        .enumerate()
        .map(|(i, mut zone)| {
            let x_start = (i as u32 * strip_width) as f32;
            let x_end = if i as u32 == count - 1 {
                frame_width as f32
            } else {
                ((i as u32 + 1) * strip_width) as f32
            };
            zone.coordinates = vec![
                Point::new(x_start, 0.0),
                Point::new(x_end, 0.0),
                Point::new(x_end, h),
                Point::new(x_start, h),
            ];
            zone
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone(id: &str, coords: &[(f32, f32)]) -> Zone {
        Zone {
            id: id.to_string(),
            name: id.to_uppercase(),
            coordinates: coords.iter().map(|&(x, y)| Point::new(x, y)).collect(),
            max_capacity: DEFAULT_MAX_CAPACITY,
        }
    }

    fn small_square(id: &str) -> Zone {
        zone(id, &[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)])
    }

    #[test]
    fn empty_input_synthesizes_full_frame_zone() {
        let zones = normalize_zones(vec![], 1280, 720);

        assert_eq!(zones.len(), 1);
        assert_eq!(zones[0].id, FULL_VIDEO_ZONE_ID);
        assert_eq!(zones[0].name, FULL_VIDEO_ZONE_NAME);
        assert_eq!(zones[0].max_capacity, DEFAULT_MAX_CAPACITY);
        assert_eq!(
            zones[0].coordinates,
            vec![
                Point::new(0.0, 0.0),
                Point::new(1280.0, 0.0),
                Point::new(1280.0, 720.0),
                Point::new(0.0, 720.0),
            ]
        );
    }

    #[test]
    fn well_scaled_zones_pass_through_unchanged() {
        let input = vec![
            zone("left", &[(0.0, 0.0), (450.0, 0.0), (450.0, 600.0), (0.0, 600.0)]),
            zone(
                "right",
                &[(450.0, 0.0), (900.0, 0.0), (900.0, 600.0), (450.0, 600.0)],
            ),
        ];

        let output = normalize_zones(input.clone(), 900, 600);
        assert_eq!(output, input);
    }

    #[test]
    fn identical_undersized_zones_become_strips() {
        let input = vec![small_square("a"), small_square("b"), small_square("c")];

        let output = normalize_zones(input, 900, 600);

        assert_eq!(output.len(), 3);
        for (i, z) in output.iter().enumerate() {
            let x_start = 300.0 * i as f32;
            let x_end = 300.0 * (i + 1) as f32;
            assert_eq!(
                z.coordinates,
                vec![
                    Point::new(x_start, 0.0),
                    Point::new(x_end, 0.0),
                    Point::new(x_end, 600.0),
                    Point::new(x_start, 600.0),
                ]
            );
        }
        // Identity survives redistribution.
        assert_eq!(output[0].id, "a");
        assert_eq!(output[2].id, "c");
    }

    #[test]
    fn last_strip_absorbs_rounding_remainder() {
        let input = vec![small_square("a"), small_square("b"), small_square("c")];

        let output = normalize_zones(input, 1000, 500);

        // 1000 / 3 = 333; the last strip runs to 1000, not 999.
        assert_eq!(output[0].coordinates[1].x, 333.0);
        assert_eq!(output[1].coordinates[1].x, 666.0);
        assert_eq!(output[2].coordinates[0].x, 666.0);
        assert_eq!(output[2].coordinates[1].x, 1000.0);
    }

    #[test]
    fn distinct_undersized_zones_scale_uniformly() {
        let input = vec![
            zone("a", &[(0.0, 0.0), (100.0, 0.0), (100.0, 50.0), (0.0, 50.0)]),
            zone(
                "b",
                &[(100.0, 50.0), (200.0, 50.0), (200.0, 100.0), (100.0, 100.0)],
            ),
        ];

        let output = normalize_zones(input, 800, 600);

        // scale = min(800/200, 600/100) = 4
        assert_eq!(
            output[0].coordinates,
            vec![
                Point::new(0.0, 0.0),
                Point::new(400.0, 0.0),
                Point::new(400.0, 200.0),
                Point::new(0.0, 200.0),
            ]
        );
        assert_eq!(output[1].coordinates[2], Point::new(800.0, 400.0));
    }

    #[test]
    fn scaled_vertices_are_integer_truncated() {
        let input = vec![zone(
            "a",
            &[(0.0, 0.0), (8.0, 0.0), (8.0, 3.0), (0.0, 3.0)],
        )];

        let output = normalize_zones(input, 100, 100);

        // scale = min(100/8, 100/3) = 12.5; 3 * 12.5 = 37.5 truncates to 37.
        assert_eq!(output[0].coordinates[2], Point::new(100.0, 37.0));
    }

    #[test]
    fn single_undersized_zone_scales_rather_than_strips() {
        let input = vec![small_square("only")];

        let output = normalize_zones(input, 900, 600);

        // scale = min(900/10, 600/10) = 60
        assert_eq!(output[0].coordinates[2], Point::new(600.0, 600.0));
    }

    #[test]
    fn loader_rejects_degenerate_polygons() {
        let zones = vec![zone("line", &[(0.0, 0.0), (10.0, 10.0)])];
        let err = validate_zones(&zones).unwrap_err();
        assert!(err.to_string().contains("at least 3"));
    }

    #[test]
    fn capacity_defaults_when_absent() {
        let parsed: Vec<Zone> = serde_json::from_str(
            r#"[{
                "id": "gate",
                "name": "Gate",
                "coordinates": [
                    {"x": 0, "y": 0},
                    {"x": 5, "y": 0},
                    {"x": 5, "y": 5}
                ]
            }]"#,
        )
        .expect("parse zones");

        assert_eq!(parsed[0].max_capacity, DEFAULT_MAX_CAPACITY);
    }

    #[test]
    fn capacity_round_trips_with_wire_name() {
        let z = Zone {
            id: "gate".into(),
            name: "Gate".into(),
            coordinates: vec![
                Point::new(0.0, 0.0),
                Point::new(5.0, 0.0),
                Point::new(5.0, 5.0),
            ],
            max_capacity: 25.0,
        };

        let json = serde_json::to_value(&z).expect("serialize zone");
        assert_eq!(json["maxCapacity"], 25.0);
    }
}
