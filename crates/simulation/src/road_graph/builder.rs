use std::collections::HashMap;

use bevy::prelude::*;

use crate::config::{RoadGraphConfig, SPACING_SLACK};

use super::geometry::{find_intersections, key_points, RoadSegmentDef};
use super::graph::{RoadGraph, RoadGraphStats, WaypointId, WaypointOptions};

/// Quantized position used to merge coincident nodes. Each coordinate is
/// rounded to the nearest integer with halves going towards +inf, so -0.5
/// and -0.4 share a key.
pub type DedupKey = (i32, i32);

#[inline]
pub fn dedup_key(position: Vec2) -> DedupKey {
    (round_half_up(position.x), round_half_up(position.y))
}

#[inline]
fn round_half_up(v: f32) -> i32 {
    (v + 0.5).floor() as i32
}

/// Number of interpolated waypoints strictly between two key points
/// `length` apart: `floor(length / spacing) - 1`. The key points themselves
/// are not counted. The ratio gets `SPACING_SLACK` (a few f32 ulps) before
/// flooring, so a gap of 99.99999 computed from a crossing still counts as
/// four spacings while a genuinely short gap like 74.99 counts as two.
#[inline]
pub fn intermediate_count(length: f32, spacing: f32) -> usize {
    ((length / spacing + SPACING_SLACK).floor() as i64 - 1).max(0) as usize
}

/// Turns road segment definitions into waypoints with merged intersections.
///
/// Stateless between calls: the intersection list and the position map are
/// local to one `populate`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoadGraphBuilder {
    config: RoadGraphConfig,
}

impl RoadGraphBuilder {
    pub fn new(config: RoadGraphConfig) -> Self {
        assert!(
            config.waypoint_spacing > 0.0,
            "RoadGraphBuilder: waypoint spacing must be positive, got {}",
            config.waypoint_spacing
        );
        Self { config }
    }

    /// Build a fresh graph from `roads`.
    pub fn build(&self, roads: &[RoadSegmentDef]) -> RoadGraph {
        let mut graph = RoadGraph::default();
        self.populate(&mut graph, roads);
        graph
    }

    /// Add the waypoints and edges for `roads` to `graph`.
    /// Panics on an empty road list.
    pub fn populate(&self, graph: &mut RoadGraph, roads: &[RoadSegmentDef]) -> RoadGraphStats {
        assert!(
            !roads.is_empty(),
            "RoadGraphBuilder: no road segments supplied"
        );

        let intersections = find_intersections(roads);
        let mut by_position: HashMap<DedupKey, WaypointId> = HashMap::new();

        for road in roads {
            let keys = key_points(road, &intersections);
            let last = keys.len() - 1;
            let mut chain: Vec<WaypointId> = Vec::with_capacity(keys.len() * 2);

            for (i, key) in keys.iter().enumerate() {
                let interior = i != 0 && i != last;
                chain.push(self.waypoint_at(graph, &mut by_position, key.position, interior));

                if let Some(next) = keys.get(i + 1) {
                    let count = intermediate_count(
                        key.position.distance(next.position),
                        self.config.waypoint_spacing,
                    );
                    for j in 1..=count {
                        let frac = j as f32 / (count + 1) as f32;
                        let p = key.position.lerp(next.position, frac);
                        chain.push(self.waypoint_at(graph, &mut by_position, p, false));
                    }
                }
            }

            for pair in chain.windows(2) {
                if pair[0] != pair[1] {
                    graph.connect_bidirectional(pair[0], pair[1]);
                }
            }
        }

        let stats = graph.stats();
        info!(
            "Road graph built: {} roads, {} crossings, {} waypoints, {} edges",
            roads.len(),
            intersections.len(),
            stats.waypoint_count,
            stats.edge_count
        );
        stats
    }

    /// Reuse the waypoint at `position`'s dedup key or create one. A reused
    /// node that turns out to be an interior key point of this road is a
    /// shared crossing, so it gets flagged.
    fn waypoint_at(
        &self,
        graph: &mut RoadGraph,
        by_position: &mut HashMap<DedupKey, WaypointId>,
        position: Vec2,
        interior: bool,
    ) -> WaypointId {
        let key = dedup_key(position);
        if let Some(&id) = by_position.get(&key) {
            if interior {
                graph.mark_intersection(id);
            }
            return id;
        }
        let id = graph.create_waypoint(
            Vec3::new(position.x, 0.0, position.y),
            WaypointOptions {
                speed_limit: self.config.speed_limit,
                is_intersection: interior,
            },
        );
        by_position.insert(key, id);
        id
    }
}
