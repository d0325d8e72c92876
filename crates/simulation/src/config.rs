use bevy::prelude::*;

/// Side length of one collision grid cell in world units.
pub const COLLISION_CELL_SIZE: f32 = 20.0;
/// Edge length of the default square world, centred on the origin.
pub const WORLD_SIZE: f32 = 600.0;
pub const WORLD_HALF_EXTENT: f32 = WORLD_SIZE / 2.0;
/// Vertical extent of the default world bounds. Only X/Z are clamped.
pub const WORLD_FLOOR_Y: f32 = -50.0;
pub const WORLD_CEILING_Y: f32 = 250.0;
/// Padding added around a loaded level's roads and props to form its bounds.
pub const LEVEL_BOUNDS_MARGIN: f32 = 20.0;

/// Distance between interpolated waypoints along a road.
pub const WAYPOINT_SPACING: f32 = 25.0;
/// Fraction of a spacing forgiven when counting intermediates along a gap.
/// Covers f32 rounding in computed crossings, nothing more.
pub const SPACING_SLACK: f32 = 1e-5;
/// Speed limit assigned to every waypoint the builder creates.
pub const DEFAULT_SPEED_LIMIT: f32 = 15.0;

/// Road pairs whose direction determinant is below this are treated as parallel.
pub const PARALLEL_EPSILON: f32 = 1e-4;
/// Max perpendicular distance for an intersection point to count as lying on a road.
pub const ON_ROAD_TOLERANCE: f32 = 1.0;
/// Intersections closer than this to either end of a road are not key points.
pub const ROAD_END_MARGIN: f32 = 1.0;

/// Runtime-tunable parameters for road graph construction.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct RoadGraphConfig {
    pub waypoint_spacing: f32,
    pub speed_limit: f32,
}

impl Default for RoadGraphConfig {
    fn default() -> Self {
        Self {
            waypoint_spacing: WAYPOINT_SPACING,
            speed_limit: DEFAULT_SPEED_LIMIT,
        }
    }
}
