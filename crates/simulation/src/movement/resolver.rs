use bevy::prelude::*;

use crate::collision::CollisionWorld;

impl CollisionWorld {
    /// Furthest position towards `end` a sphere of `radius` can occupy.
    ///
    /// The target is first clamped to the world bounds shrunk by `radius` on
    /// X/Z. If that point is blocked, sliding along X alone and then along Z
    /// alone is attempted (Y stays at `start.y`). When both are blocked the
    /// agent stays at `start`. Never returns a blocked position other than
    /// `start` itself.
    pub fn resolve_movement(&self, start: Vec3, end: Vec3, radius: f32) -> Vec3 {
        self.resolve(start, end, radius, None)
    }

    /// `resolve_movement` for a specific agent. Dynamic probes skip `agent`,
    /// so it can carry a `MovingObstacle` and still move.
    pub fn resolve_agent_movement(
        &self,
        agent: Entity,
        start: Vec3,
        end: Vec3,
        radius: f32,
    ) -> Vec3 {
        self.resolve(start, end, radius, Some(agent))
    }

    fn resolve(&self, start: Vec3, end: Vec3, radius: f32, agent: Option<Entity>) -> Vec3 {
        let blocked = |p: Vec3| self.sphere_hit(p, radius, agent).is_some();

        let target = self.clamp_to_bounds(end, radius);
        if !blocked(target) {
            return target;
        }

        let slide_x = Vec3::new(target.x, start.y, start.z);
        if !blocked(slide_x) {
            return slide_x;
        }

        let slide_z = Vec3::new(start.x, start.y, target.z);
        if !blocked(slide_z) {
            return slide_z;
        }

        start
    }

    /// Clamp X/Z into the world bounds shrunk by `radius`. If the bounds are
    /// narrower than the agent the position is pinned to their centre line.
    pub fn clamp_to_bounds(&self, p: Vec3, radius: f32) -> Vec3 {
        let bounds = self.bounds();
        Vec3::new(
            clamp_axis(p.x, bounds.min.x + radius, bounds.max.x - radius),
            p.y,
            clamp_axis(p.z, bounds.min.z + radius, bounds.max.z - radius),
        )
    }
}

#[inline]
fn clamp_axis(v: f32, lo: f32, hi: f32) -> f32 {
    if lo > hi {
        return (lo + hi) * 0.5;
    }
    v.max(lo).min(hi)
}
