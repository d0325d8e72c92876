//! Builder methods for collider, road and agent setup in integration tests.

use bevy::prelude::*;

use crate::collision::{Aabb, CollisionWorld, MovingObstacle, StaticCollider};
use crate::config::RoadGraphConfig;
use crate::movement::{DesiredPosition, KinematicAgent, MovementBlocked};
use crate::road_graph::{RoadGraph, RoadGraphBuilder, RoadSegmentDef};

use super::TestCity;

/// Roads queued by `with_road` until `build_road_graph` runs.
#[derive(Resource, Default)]
struct PendingRoads(Vec<RoadSegmentDef>);

impl TestCity {
    // -----------------------------------------------------------------------
    // Collision world
    // -----------------------------------------------------------------------

    /// Replace the world bounds.
    pub fn with_bounds(mut self, min: Vec3, max: Vec3) -> Self {
        self.app
            .world_mut()
            .resource_mut::<CollisionWorld>()
            .update_bounds(Aabb::new(min, max));
        self
    }

    /// Register a box directly in the collision world, owned by a fresh
    /// entity. Available immediately, no tick needed.
    pub fn with_box(mut self, center: Vec3, half_extents: Vec3) -> Self {
        let world = self.app.world_mut();
        let owner = world.spawn(Transform::from_translation(center)).id();
        world
            .resource_mut::<CollisionWorld>()
            .register_box(owner, Aabb::from_center_half_extents(center, half_extents));
        self
    }

    /// Register an upright cylinder standing on `base`.
    pub fn with_cylinder(mut self, base: Vec3, radius: f32, height: f32) -> Self {
        let world = self.app.world_mut();
        let owner = world.spawn(Transform::from_translation(base)).id();
        world
            .resource_mut::<CollisionWorld>()
            .register_cylinder(owner, base, radius, height);
        self
    }

    /// Spawn an entity carrying a `StaticCollider`. It is registered by
    /// `register_static_colliders` on the next tick.
    pub fn spawn_static_collider(&mut self, position: Vec3, collider: StaticCollider) -> Entity {
        self.app
            .world_mut()
            .spawn((Transform::from_translation(position), collider))
            .id()
    }

    // -----------------------------------------------------------------------
    // Roads
    // -----------------------------------------------------------------------

    /// Queue a straight road from `from` to `to` (XZ plane).
    pub fn with_road(mut self, from: Vec2, to: Vec2) -> Self {
        let world = self.app.world_mut();
        world.init_resource::<PendingRoads>();
        world
            .resource_mut::<PendingRoads>()
            .0
            .push(RoadSegmentDef::new(from, to, 10.0));
        self
    }

    pub fn with_roads(mut self, roads: &[RoadSegmentDef]) -> Self {
        let world = self.app.world_mut();
        world.init_resource::<PendingRoads>();
        world.resource_mut::<PendingRoads>().0.extend_from_slice(roads);
        self
    }

    /// Build the `RoadGraph` resource from every queued road using the
    /// current `RoadGraphConfig`.
    pub fn build_road_graph(mut self) -> Self {
        let world = self.app.world_mut();
        let roads = world
            .remove_resource::<PendingRoads>()
            .unwrap_or_default()
            .0;
        let config = *world.resource::<RoadGraphConfig>();
        let graph = RoadGraphBuilder::new(config).build(&roads);
        world.insert_resource::<RoadGraph>(graph);
        self
    }

    // -----------------------------------------------------------------------
    // Agents and obstacles
    // -----------------------------------------------------------------------

    /// Spawn a kinematic agent and return its entity.
    pub fn spawn_agent(&mut self, position: Vec3, radius: f32) -> Entity {
        self.app
            .world_mut()
            .spawn((
                Transform::from_translation(position),
                KinematicAgent { radius },
                DesiredPosition::default(),
                MovementBlocked::default(),
            ))
            .id()
    }

    /// Spawn a kinematic agent that other agents collide with.
    pub fn spawn_solid_agent(&mut self, position: Vec3, radius: f32) -> Entity {
        let agent = self.spawn_agent(position, radius);
        self.app
            .world_mut()
            .entity_mut(agent)
            .insert(MovingObstacle { radius });
        agent
    }

    /// Spawn a moving obstacle visible to sphere queries after the next tick.
    pub fn spawn_obstacle(&mut self, position: Vec3, radius: f32) -> Entity {
        self.app
            .world_mut()
            .spawn((Transform::from_translation(position), MovingObstacle { radius }))
            .id()
    }

    /// Set the position an agent tries to reach on the next tick.
    pub fn request_move(&mut self, agent: Entity, target: Vec3) {
        if let Some(mut desired) = self.app.world_mut().get_mut::<DesiredPosition>(agent) {
            desired.0 = Some(target);
        }
    }

    /// Teleport an obstacle; the probe sees it after the next tick.
    pub fn move_obstacle(&mut self, obstacle: Entity, position: Vec3) {
        if let Some(mut transform) = self.app.world_mut().get_mut::<Transform>(obstacle) {
            transform.translation = position;
        }
    }
}
