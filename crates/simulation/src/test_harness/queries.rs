//! Query and simulation-tick methods for `TestCity`.

use bevy::prelude::*;

use crate::collision::CollisionWorld;
use crate::movement::MovementBlocked;
use crate::road_graph::RoadGraph;
use crate::world_init::LevelProp;

use super::TestCity;

impl TestCity {
    // -----------------------------------------------------------------------
    // Simulation
    // -----------------------------------------------------------------------

    /// Run N fixed-update ticks by directly executing the `FixedUpdate`
    /// schedule. This bypasses Bevy's time system entirely, which avoids
    /// issues with `MinimalPlugins` + `ScheduleRunnerPlugin` not advancing
    /// virtual time between updates.
    pub fn tick(&mut self, n: u32) {
        for _ in 0..n {
            self.app.world_mut().run_schedule(FixedUpdate);
        }
    }

    // -----------------------------------------------------------------------
    // Queries (note: Bevy's World::query() requires &mut World)
    // -----------------------------------------------------------------------

    /// Access the ECS world mutably (needed for queries in Bevy).
    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }

    /// Get a reference to any resource.
    pub fn resource<T: Resource>(&self) -> &T {
        self.app.world().resource::<T>()
    }

    pub fn collision(&self) -> &CollisionWorld {
        self.resource::<CollisionWorld>()
    }

    pub fn road_graph(&self) -> &RoadGraph {
        self.resource::<RoadGraph>()
    }

    /// Current translation of an entity. Panics if it has no `Transform`.
    pub fn position(&self, entity: Entity) -> Vec3 {
        self.app
            .world()
            .get::<Transform>(entity)
            .map(|t| t.translation)
            .unwrap_or_else(|| panic!("entity {entity:?} has no Transform"))
    }

    pub fn is_blocked(&self, agent: Entity) -> bool {
        self.app
            .world()
            .get::<MovementBlocked>(agent)
            .is_some_and(|b| b.0)
    }

    /// Count entities spawned as level geometry by `load_level`.
    pub fn level_prop_count(&mut self) -> usize {
        let world = self.app.world_mut();
        world
            .query_filtered::<Entity, With<LevelProp>>()
            .iter(world)
            .count()
    }
}
