//! Polygon geometry primitives.
//!
//! Everything here is a stateless function over immutable inputs; the
//! zone normalizer and the aggregator are the only consumers.

use serde::{Deserialize, Serialize};

/// A point in a frame's pixel coordinate space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Ray-casting point-in-polygon test.
///
/// Walks each edge `(vertices[j], vertices[i])` with `j` the previous
/// index (wrapping), toggling membership whenever the edge's y-span
/// straddles the point and the point lies left of the edge's x at that
/// height. Points exactly on an edge get whatever the toggle count
/// says; callers must not rely on boundary membership.
pub fn point_in_polygon(point: Point, vertices: &[Point]) -> bool {
    let mut inside = false;
    let mut j = vertices.len().wrapping_sub(1);

    for i in 0..vertices.len() {
        let vi = vertices[i];
        let vj = vertices[j];

        if (vi.y > point.y) != (vj.y > point.y)
            && point.x < (vj.x - vi.x) * (point.y - vi.y) / (vj.y - vi.y) + vi.x
        {
            inside = !inside;
        }

        j = i;
    }

    inside
}

/// Minimal axis-aligned box covering every vertex of every polygon.
///
/// Returns `(min_x, min_y, max_x, max_y)`, or `None` when no vertex
/// exists at all.
pub fn bounding_extent<'a, I>(polygons: I) -> Option<(f32, f32, f32, f32)>
where
    I: IntoIterator<Item = &'a [Point]>,
{
    let mut extent: Option<(f32, f32, f32, f32)> = None;

    for polygon in polygons {
        for vertex in polygon {
            extent = Some(match extent {
                None => (vertex.x, vertex.y, vertex.x, vertex.y),
                Some((min_x, min_y, max_x, max_y)) => (
                    min_x.min(vertex.x),
                    min_y.min(vertex.y),
                    max_x.max(vertex.x),
                    max_y.max(vertex.y),
                ),
            });
        }
    }

    extent
}
