use bevy::prelude::*;

use super::collider::Aabb;
use super::probe::{MovingObstacles, ObstacleSnapshot};
use super::world::CollisionWorld;

/// Static geometry attached to a scene entity. Registered once, from the
/// entity's `Transform` at the time the component is added.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub enum StaticCollider {
    /// Box centred on the entity translation.
    Box { half_extents: Vec3 },
    /// Upright cylinder standing on the entity translation.
    Cylinder { radius: f32, height: f32 },
}

/// A moving obstacle seen by sphere queries through the `MovingObstacles` probe.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct MovingObstacle {
    pub radius: f32,
}

pub fn register_static_colliders(
    mut world: ResMut<CollisionWorld>,
    query: Query<(Entity, &Transform, &StaticCollider), Added<StaticCollider>>,
) {
    let mut added = 0usize;
    for (entity, transform, collider) in &query {
        match *collider {
            StaticCollider::Box { half_extents } => {
                world.register_box(
                    entity,
                    Aabb::from_center_half_extents(transform.translation, half_extents),
                );
            }
            StaticCollider::Cylinder { radius, height } => {
                world.register_cylinder(entity, transform.translation, radius, height);
            }
        }
        added += 1;
    }
    if added > 0 {
        debug!("Registered {} static colliders", added);
    }
}

/// Refresh the shared obstacle snapshots from every `MovingObstacle`,
/// kinematic agents included. Agents skip their own snapshot when resolving
/// movement. Snapshots are taken before movement, so agents see each other
/// at their positions from the start of the tick.
pub fn sync_moving_obstacles(
    obstacles: Res<MovingObstacles>,
    query: Query<(Entity, &Transform, &MovingObstacle)>,
) {
    #[cfg(feature = "trace")]
    let _span = bevy::log::info_span!("sync_moving_obstacles").entered();

    obstacles.replace(query.iter().map(|(owner, transform, obstacle)| ObstacleSnapshot {
        owner,
        position: transform.translation,
        radius: obstacle.radius,
    }));
}
