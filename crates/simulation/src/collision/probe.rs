//! Dynamic collision probes for obstacles that move every tick and cannot be
//! indexed in the static grid (vehicles, other agents).

use std::sync::{Arc, PoisonError, RwLock};

use bevy::prelude::*;

/// A moving obstacle source consulted by sphere queries before the static grid.
pub trait DynamicProbe: Send + Sync + 'static {
    /// Return the owner of whatever overlaps the sphere, if anything.
    fn probe(&self, center: Vec3, radius: f32) -> Option<Entity>;

    /// Same as `probe`, but never reports `exclude`. Used when the querying
    /// agent is itself one of the obstacles this probe tracks.
    fn probe_excluding(&self, center: Vec3, radius: f32, exclude: Entity) -> Option<Entity> {
        self.probe(center, radius).filter(|&owner| owner != exclude)
    }
}

impl<F> DynamicProbe for F
where
    F: Fn(Vec3, f32) -> Option<Entity> + Send + Sync + 'static,
{
    fn probe(&self, center: Vec3, radius: f32) -> Option<Entity> {
        self(center, radius)
    }
}

/// Snapshot of one moving obstacle, treated as an infinite vertical cylinder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObstacleSnapshot {
    pub owner: Entity,
    pub position: Vec3,
    pub radius: f32,
}

/// Shared handle to the set of moving obstacles.
///
/// One clone lives in the `CollisionWorld` as a probe, another is kept as a
/// resource so the sync system can refresh positions every tick without
/// mutable access to the collision world.
#[derive(Resource, Clone, Default)]
pub struct MovingObstacles {
    inner: Arc<RwLock<Vec<ObstacleSnapshot>>>,
}

impl MovingObstacles {
    /// Replace every snapshot with the given set.
    pub fn replace(&self, snapshots: impl IntoIterator<Item = ObstacleSnapshot>) {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        guard.clear();
        guard.extend(snapshots);
    }

    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl MovingObstacles {
    fn first_overlap(&self, center: Vec3, radius: f32, exclude: Option<Entity>) -> Option<Entity> {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        guard
            .iter()
            .filter(|o| Some(o.owner) != exclude)
            .find(|o| {
                let dx = o.position.x - center.x;
                let dz = o.position.z - center.z;
                let reach = o.radius + radius;
                dx * dx + dz * dz < reach * reach
            })
            .map(|o| o.owner)
    }
}

impl DynamicProbe for MovingObstacles {
    fn probe(&self, center: Vec3, radius: f32) -> Option<Entity> {
        self.first_overlap(center, radius, None)
    }

    fn probe_excluding(&self, center: Vec3, radius: f32, exclude: Entity) -> Option<Entity> {
        self.first_overlap(center, radius, Some(exclude))
    }
}
