mod builder;
mod geometry;
mod graph;

pub use builder::{dedup_key, intermediate_count, DedupKey, RoadGraphBuilder};
pub use geometry::{
    find_intersections, interior_param, key_points, segment_intersection, KeyPoint,
    RoadSegmentDef,
};
pub use graph::{RoadGraph, RoadGraphStats, Waypoint, WaypointId, WaypointOptions};

use bevy::prelude::*;

use crate::config::RoadGraphConfig;

pub struct RoadGraphPlugin;

impl Plugin for RoadGraphPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<RoadGraphConfig>()
            .init_resource::<RoadGraph>();
    }
}
