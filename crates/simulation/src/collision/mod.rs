mod collider;
mod grid;
mod probe;
mod systems;
mod world;

pub use collider::{Aabb, Collider, ColliderId, ColliderShape};
pub use grid::CellKey;
pub use probe::{DynamicProbe, MovingObstacles, ObstacleSnapshot};
pub use systems::{register_static_colliders, sync_moving_obstacles, MovingObstacle, StaticCollider};
pub use world::{CollisionWorld, RayHit, SphereHit};

use bevy::prelude::*;

/// Build a collision world wired to the shared moving-obstacle probe.
/// Used at startup and whenever a level is (re)loaded.
pub fn new_level_world(obstacles: &MovingObstacles) -> CollisionWorld {
    let mut world = CollisionWorld::default();
    world.register_dynamic_probe(Box::new(obstacles.clone()));
    world
}

pub struct CollisionPlugin;

impl Plugin for CollisionPlugin {
    fn build(&self, app: &mut App) {
        let obstacles = MovingObstacles::default();
        app.insert_resource(new_level_world(&obstacles))
            .insert_resource(obstacles)
            .add_systems(
                FixedUpdate,
                (register_static_colliders, sync_moving_obstacles)
                    .chain()
                    .in_set(crate::SimulationSet::Colliders),
            );
    }
}
