use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::{ON_ROAD_TOLERANCE, PARALLEL_EPSILON, ROAD_END_MARGIN};

/// Author-provided straight road. `start`/`end` are on the XZ ground plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoadSegmentDef {
    pub start: Vec2,
    pub end: Vec2,
    pub width: f32,
}

impl RoadSegmentDef {
    pub fn new(start: Vec2, end: Vec2, width: f32) -> Self {
        Self { start, end, width }
    }

    pub fn length(&self) -> f32 {
        self.start.distance(self.end)
    }
}

/// Structurally significant point on a road, ordered by `t` in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyPoint {
    pub t: f32,
    pub position: Vec2,
}

/// Crossing point of two bounded segments, or `None` when they are parallel
/// (or collinear) or the crossing lies outside either segment.
pub fn segment_intersection(a: &RoadSegmentDef, b: &RoadSegmentDef) -> Option<Vec2> {
    let r = a.end - a.start;
    let s = b.end - b.start;
    let det = r.perp_dot(s);
    if det.abs() < PARALLEL_EPSILON {
        return None;
    }

    let qp = b.start - a.start;
    let t = qp.perp_dot(s) / det;
    let u = qp.perp_dot(r) / det;
    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        Some(a.start + r * t)
    } else {
        None
    }
}

/// All pairwise crossings in the road list, one entry per crossing pair.
pub fn find_intersections(roads: &[RoadSegmentDef]) -> Vec<Vec2> {
    let mut points = Vec::new();
    for (i, a) in roads.iter().enumerate() {
        for b in &roads[i + 1..] {
            if let Some(p) = segment_intersection(a, b) {
                points.push(p);
            }
        }
    }
    points
}

/// Parametric position of `point` on `road` if it lies on the road's interior:
/// within `ON_ROAD_TOLERANCE` of the centre line and more than
/// `ROAD_END_MARGIN` from both ends. Thresholds are absolute world units.
pub fn interior_param(road: &RoadSegmentDef, point: Vec2) -> Option<f32> {
    let len = road.length();
    if len <= f32::EPSILON {
        return None;
    }
    let dir = (road.end - road.start) / len;
    let offset = point - road.start;
    let projection = offset.dot(dir);
    let perpendicular = dir.perp_dot(offset).abs();

    if perpendicular < ON_ROAD_TOLERANCE
        && projection > ROAD_END_MARGIN
        && projection < len - ROAD_END_MARGIN
    {
        Some(projection / len)
    } else {
        None
    }
}

/// Endpoints plus every intersection on this road's interior, sorted by `t`.
pub fn key_points(road: &RoadSegmentDef, intersections: &[Vec2]) -> Vec<KeyPoint> {
    let mut points = vec![
        KeyPoint {
            t: 0.0,
            position: road.start,
        },
        KeyPoint {
            t: 1.0,
            position: road.end,
        },
    ];
    for &p in intersections {
        if let Some(t) = interior_param(road, p) {
            points.push(KeyPoint { t, position: p });
        }
    }
    points.sort_by(|a, b| a.t.total_cmp(&b.t));
    points
}
