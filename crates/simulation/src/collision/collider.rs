use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Index of a collider inside its `CollisionWorld`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ColliderId(pub u32);

/// Axis-aligned bounding box in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// True when the box is inverted on some axis or collapses to a single
    /// point. Flat boxes (zero extent on one or two axes) are still solid
    /// for sphere and ray tests.
    pub fn is_degenerate(&self) -> bool {
        let extent = self.max - self.min;
        extent.min_element() < 0.0 || extent == Vec3::ZERO
    }

    /// Strict interior test; points on a face are outside.
    pub fn contains_point(&self, p: Vec3) -> bool {
        p.x > self.min.x
            && p.x < self.max.x
            && p.y > self.min.y
            && p.y < self.max.y
            && p.z > self.min.z
            && p.z < self.max.z
    }

    pub fn closest_point(&self, p: Vec3) -> Vec3 {
        p.max(self.min).min(self.max)
    }

    pub fn intersects_sphere(&self, center: Vec3, radius: f32) -> bool {
        self.closest_point(center).distance_squared(center) < radius * radius
    }

    /// Slab test. `direction` must be normalized; returns the entry distance
    /// along the ray, or 0 when the origin is already inside.
    pub fn ray_distance(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<f32> {
        let mut t_min = 0.0_f32;
        let mut t_max = max_distance;

        for axis in 0..3 {
            let o = origin[axis];
            let d = direction[axis];
            let lo = self.min[axis];
            let hi = self.max[axis];

            if d.abs() < f32::EPSILON {
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / d;
            let mut t0 = (lo - o) * inv;
            let mut t1 = (hi - o) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return None;
            }
        }

        Some(t_min)
    }
}

/// Geometry of a static collider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ColliderShape {
    Box(Aabb),
    /// Upright cylinder standing on `center` (its base), extending `height` up.
    Cylinder { center: Vec3, radius: f32, height: f32 },
}

impl ColliderShape {
    /// World-space AABB used for grid indexing. For cylinders this is the
    /// bounding square of the base circle, extruded to the cylinder height.
    pub fn bounds(&self) -> Aabb {
        match *self {
            ColliderShape::Box(aabb) => aabb,
            ColliderShape::Cylinder {
                center,
                radius,
                height,
            } => Aabb {
                min: Vec3::new(center.x - radius, center.y, center.z - radius),
                max: Vec3::new(center.x + radius, center.y + height, center.z + radius),
            },
        }
    }

    /// Zero-size shapes are accepted at registration but never produce a hit.
    pub fn is_degenerate(&self) -> bool {
        match *self {
            ColliderShape::Box(aabb) => aabb.is_degenerate(),
            ColliderShape::Cylinder { radius, height, .. } => radius <= 0.0 || height <= 0.0,
        }
    }

    pub fn contains_point(&self, p: Vec3) -> bool {
        match *self {
            ColliderShape::Box(aabb) => aabb.contains_point(p),
            ColliderShape::Cylinder {
                center,
                radius,
                height,
            } => {
                let dx = p.x - center.x;
                let dz = p.z - center.z;
                dx * dx + dz * dz < radius * radius && p.y >= center.y && p.y < center.y + height
            }
        }
    }

    /// Sphere overlap. The cylinder branch checks the XZ circle distance and
    /// only compares the sphere centre's Y against the cylinder top; the sphere
    /// radius and the cylinder base play no part vertically.
    pub fn intersects_sphere(&self, sphere_center: Vec3, sphere_radius: f32) -> bool {
        match *self {
            ColliderShape::Box(aabb) => aabb.intersects_sphere(sphere_center, sphere_radius),
            ColliderShape::Cylinder {
                center,
                radius,
                height,
            } => {
                let dx = sphere_center.x - center.x;
                let dz = sphere_center.z - center.z;
                let reach = radius + sphere_radius;
                dx * dx + dz * dz < reach * reach && sphere_center.y < center.y + height
            }
        }
    }
}

/// A registered static collider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    pub id: ColliderId,
    pub shape: ColliderShape,
    /// Scene object this collider was registered for. Diagnostics only.
    pub owner: Entity,
}
