use bevy::prelude::*;

use crate::config::{
    COLLISION_CELL_SIZE, WORLD_CEILING_Y, WORLD_FLOOR_Y, WORLD_HALF_EXTENT,
};

use super::collider::{Aabb, Collider, ColliderId, ColliderShape};
use super::grid::{CellKey, ColliderGrid};
use super::probe::DynamicProbe;

/// What a sphere query ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SphereHit {
    /// Reported by a dynamic probe.
    Dynamic { owner: Entity },
    /// A registered static collider.
    Static { id: ColliderId, owner: Entity },
}

impl SphereHit {
    pub fn owner(&self) -> Entity {
        match *self {
            SphereHit::Dynamic { owner } | SphereHit::Static { owner, .. } => owner,
        }
    }
}

/// Closest box hit along a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub id: ColliderId,
    pub owner: Entity,
    pub distance: f32,
    pub point: Vec3,
}

/// Static collision geometry for one level plus the probes for moving obstacles.
///
/// Built during level construction and read every tick afterwards. Queries
/// take `&self`, so a shared reference can be used from parallel systems.
/// Loading a new level inserts a fresh `CollisionWorld` instead of clearing
/// this one.
#[derive(Resource)]
pub struct CollisionWorld {
    colliders: Vec<Collider>,
    grid: ColliderGrid,
    probes: Vec<Box<dyn DynamicProbe>>,
    bounds: Aabb,
}

impl Default for CollisionWorld {
    fn default() -> Self {
        Self::new(COLLISION_CELL_SIZE)
    }
}

impl CollisionWorld {
    pub fn new(cell_size: f32) -> Self {
        Self {
            colliders: Vec::new(),
            grid: ColliderGrid::new(cell_size),
            probes: Vec::new(),
            bounds: Self::default_bounds(),
        }
    }

    /// Conservative bounds used until the real city extent is known.
    pub fn default_bounds() -> Aabb {
        Aabb::new(
            Vec3::new(-WORLD_HALF_EXTENT, WORLD_FLOOR_Y, -WORLD_HALF_EXTENT),
            Vec3::new(WORLD_HALF_EXTENT, WORLD_CEILING_Y, WORLD_HALF_EXTENT),
        )
    }

    // -----------------------------------------------------------------------
    // Registration
    // -----------------------------------------------------------------------

    pub fn register_box(&mut self, owner: Entity, aabb: Aabb) -> ColliderId {
        self.register(owner, ColliderShape::Box(aabb))
    }

    /// `base` is a snapshot of the owner's position at registration time; the
    /// collider does not follow the owner afterwards.
    pub fn register_cylinder(
        &mut self,
        owner: Entity,
        base: Vec3,
        radius: f32,
        height: f32,
    ) -> ColliderId {
        self.register(
            owner,
            ColliderShape::Cylinder {
                center: base,
                radius,
                height,
            },
        )
    }

    fn register(&mut self, owner: Entity, shape: ColliderShape) -> ColliderId {
        let id = ColliderId(self.colliders.len() as u32);
        if shape.is_degenerate() {
            debug!("CollisionWorld: degenerate collider {:?} for {:?}", id, owner);
        }
        self.grid.insert(id, &shape.bounds());
        self.colliders.push(Collider { id, shape, owner });
        id
    }

    /// Probes are evaluated in registration order on every sphere query,
    /// before the static grid.
    pub fn register_dynamic_probe(&mut self, probe: Box<dyn DynamicProbe>) {
        self.probes.push(probe);
    }

    pub fn update_bounds(&mut self, bounds: Aabb) {
        if bounds.min.x > bounds.max.x || bounds.min.z > bounds.max.z {
            warn!(
                "CollisionWorld: ignoring inverted world bounds {:?}..{:?}",
                bounds.min, bounds.max
            );
            return;
        }
        self.bounds = bounds;
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// True if `p` is inside any collider indexed in `p`'s own cell.
    /// Neighbouring cells are not searched.
    pub fn check_point(&self, p: Vec3) -> bool {
        self.grid.cell_at(p.x, p.z).iter().any(|id| {
            let shape = &self.colliders[id.0 as usize].shape;
            !shape.is_degenerate() && shape.contains_point(p)
        })
    }

    /// First collider overlapping the sphere, dynamic probes first.
    /// No ordering is guaranteed among static colliders.
    pub fn check_sphere(&self, center: Vec3, radius: f32) -> Option<SphereHit> {
        self.sphere_hit(center, radius, None)
    }

    /// `check_sphere` for a query made on behalf of `exclude`: dynamic
    /// probes never report that entity, so an agent that is also a moving
    /// obstacle does not collide with itself.
    pub fn check_sphere_excluding(
        &self,
        center: Vec3,
        radius: f32,
        exclude: Entity,
    ) -> Option<SphereHit> {
        self.sphere_hit(center, radius, Some(exclude))
    }

    pub(crate) fn sphere_hit(
        &self,
        center: Vec3,
        radius: f32,
        exclude: Option<Entity>,
    ) -> Option<SphereHit> {
        for probe in &self.probes {
            let found = match exclude {
                Some(entity) => probe.probe_excluding(center, radius, entity),
                None => probe.probe(center, radius),
            };
            if let Some(owner) = found {
                return Some(SphereHit::Dynamic { owner });
            }
        }

        let mut checked: Vec<ColliderId> = Vec::new();
        let mut hit = None;
        self.grid.for_each_in_rect(
            center.x - radius,
            center.z - radius,
            center.x + radius,
            center.z + radius,
            |ids| {
                for &id in ids {
                    if checked.contains(&id) {
                        continue;
                    }
                    checked.push(id);
                    let collider = &self.colliders[id.0 as usize];
                    if collider.shape.is_degenerate() {
                        continue;
                    }
                    if collider.shape.intersects_sphere(center, radius) {
                        hit = Some(SphereHit::Static {
                            id,
                            owner: collider.owner,
                        });
                        return false;
                    }
                }
                true
            },
        );
        hit
    }

    /// Closest box along the ray within `max_distance`. Scans every box
    /// collider; cylinders are not considered.
    pub fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit> {
        let dir = direction.normalize_or_zero();
        if dir == Vec3::ZERO || max_distance <= 0.0 {
            return None;
        }

        let mut closest: Option<RayHit> = None;
        for collider in &self.colliders {
            let ColliderShape::Box(aabb) = collider.shape else {
                continue;
            };
            if aabb.is_degenerate() {
                continue;
            }
            let Some(distance) = aabb.ray_distance(origin, dir, max_distance) else {
                continue;
            };
            if closest.map_or(true, |c| distance < c.distance) {
                closest = Some(RayHit {
                    id: collider.id,
                    owner: collider.owner,
                    distance,
                    point: origin + dir * distance,
                });
            }
        }
        closest
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn colliders(&self) -> &[Collider] {
        &self.colliders
    }

    pub fn collider(&self, id: ColliderId) -> Option<&Collider> {
        self.colliders.get(id.0 as usize)
    }

    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    pub fn probe_count(&self) -> usize {
        self.probes.len()
    }

    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    pub fn cell_size(&self) -> f32 {
        self.grid.cell_size()
    }

    pub fn cell_count(&self) -> usize {
        self.grid.cell_count()
    }

    pub fn cells_containing(&self, id: ColliderId) -> Vec<CellKey> {
        self.grid.cells_containing(id)
    }
}
