// =============================================================================
// Level construction: road graph, static props and world bounds for the
// hand-authored test city.
// =============================================================================

use bevy::prelude::*;

use crate::collision::{new_level_world, Aabb, MovingObstacles};
use crate::config::{RoadGraphConfig, LEVEL_BOUNDS_MARGIN, WORLD_CEILING_Y, WORLD_FLOOR_Y};
use crate::road_graph::{RoadGraphBuilder, RoadSegmentDef};

/// Marker resource that, when present, causes `init_world` to skip building
/// the test city. Used by the test harness to start from an empty level.
#[derive(Resource)]
pub struct SkipWorldInit;

/// Marker for scene entities spawned as level geometry.
#[derive(Component, Debug, Clone, Copy)]
pub struct LevelProp;

/// Static solid supplied by city construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CityProp {
    Building { center: Vec3, half_extents: Vec3 },
    Post { base: Vec3, radius: f32, height: f32 },
}

impl CityProp {
    fn anchor(&self) -> Vec3 {
        match *self {
            CityProp::Building { center, .. } => center,
            CityProp::Post { base, .. } => base,
        }
    }
}

/// Everything needed to (re)build one level.
#[derive(Debug, Clone, Default)]
pub struct LevelLayout {
    pub roads: Vec<RoadSegmentDef>,
    pub props: Vec<CityProp>,
}

impl LevelLayout {
    /// XZ extent of roads and props plus `LEVEL_BOUNDS_MARGIN`. `None` for
    /// an empty layout.
    pub fn bounds(&self) -> Option<Aabb> {
        let mut points = self
            .roads
            .iter()
            .flat_map(|r| [r.start, r.end])
            .chain(self.props.iter().map(|p| p.anchor().xz()));

        let first = points.next()?;
        let (min, max) = points.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p)));
        let min = min - Vec2::splat(LEVEL_BOUNDS_MARGIN);
        let max = max + Vec2::splat(LEVEL_BOUNDS_MARGIN);
        Some(Aabb::new(
            Vec3::new(min.x, WORLD_FLOOR_Y, min.y),
            Vec3::new(max.x, WORLD_CEILING_Y, max.y),
        ))
    }
}

pub fn init_world(
    mut commands: Commands,
    config: Res<RoadGraphConfig>,
    obstacles: Res<MovingObstacles>,
    skip: Option<Res<SkipWorldInit>>,
) {
    if skip.is_some() {
        return;
    }
    load_level(&mut commands, &obstacles, &config, &test_city_layout());
}

/// Replace the `RoadGraph` and `CollisionWorld` resources with ones built
/// from `layout`. Prop entities are spawned so colliders have owners; their
/// colliders are registered immediately from the spawn position.
pub fn load_level(
    commands: &mut Commands,
    obstacles: &MovingObstacles,
    config: &RoadGraphConfig,
    layout: &LevelLayout,
) {
    let mut collision = new_level_world(obstacles);

    for prop in &layout.props {
        let owner = commands
            .spawn((Transform::from_translation(prop.anchor()), LevelProp))
            .id();
        match *prop {
            CityProp::Building {
                center,
                half_extents,
            } => {
                collision.register_box(owner, Aabb::from_center_half_extents(center, half_extents));
            }
            CityProp::Post {
                base,
                radius,
                height,
            } => {
                collision.register_cylinder(owner, base, radius, height);
            }
        }
    }

    if let Some(bounds) = layout.bounds() {
        collision.update_bounds(bounds);
    }

    if layout.roads.is_empty() {
        warn!("load_level: layout has no roads, keeping an empty road graph");
        commands.insert_resource(crate::road_graph::RoadGraph::default());
    } else {
        let graph = RoadGraphBuilder::new(*config).build(&layout.roads);
        commands.insert_resource(graph);
    }

    info!(
        "Level loaded: {} roads, {} colliders, bounds {:?}..{:?}",
        layout.roads.len(),
        collision.collider_count(),
        collision.bounds().min,
        collision.bounds().max
    );
    commands.insert_resource(collision);
}

// =============================================================================
// Test city: 3x3 street grid, one building per inner block, a lamp post at
// every crossing
// =============================================================================

const STREET_LINES: [f32; 3] = [-100.0, 0.0, 100.0];
const STREET_EXTENT: f32 = 150.0;
const STREET_WIDTH: f32 = 12.0;

/// Six straight roads: three running along X, three along Z.
pub fn test_city_roads() -> Vec<RoadSegmentDef> {
    let along_x = STREET_LINES.iter().map(|&z| {
        RoadSegmentDef::new(
            Vec2::new(-STREET_EXTENT, z),
            Vec2::new(STREET_EXTENT, z),
            STREET_WIDTH,
        )
    });
    let along_z = STREET_LINES.iter().map(|&x| {
        RoadSegmentDef::new(
            Vec2::new(x, -STREET_EXTENT),
            Vec2::new(x, STREET_EXTENT),
            STREET_WIDTH,
        )
    });
    along_x.chain(along_z).collect()
}

pub fn test_city_props() -> Vec<CityProp> {
    let mut props = Vec::new();

    // Inner blocks are centred between street lines
    let heights = [24.0, 40.0, 32.0, 56.0];
    let block_centers = [(-50.0, -50.0), (50.0, -50.0), (-50.0, 50.0), (50.0, 50.0)];
    for ((x, z), h) in block_centers.into_iter().zip(heights) {
        props.push(CityProp::Building {
            center: Vec3::new(x, h / 2.0, z),
            half_extents: Vec3::new(30.0, h / 2.0, 30.0),
        });
    }

    for &x in &STREET_LINES {
        for &z in &STREET_LINES {
            props.push(CityProp::Post {
                base: Vec3::new(x + STREET_WIDTH, 0.0, z + STREET_WIDTH),
                radius: 0.4,
                height: 6.0,
            });
        }
    }

    props
}

pub fn test_city_layout() -> LevelLayout {
    LevelLayout {
        roads: test_city_roads(),
        props: test_city_props(),
    }
}
