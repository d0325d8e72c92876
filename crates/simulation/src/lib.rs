use bevy::prelude::*;

pub mod collision;
pub mod config;
pub mod movement;
pub mod road_graph;
pub mod sim_rng;
pub mod world_init;

#[cfg(test)]
mod integration_tests;
#[cfg(any(test, feature = "bench"))]
pub mod test_harness;

/// Ordering of the simulation's fixed-step work. Collider registration and
/// obstacle snapshots must land before any agent queries the world.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    Colliders,
    Movement,
}

pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            FixedUpdate,
            (SimulationSet::Colliders, SimulationSet::Movement).chain(),
        );

        app.add_plugins((
            sim_rng::SimRngPlugin,
            collision::CollisionPlugin,
            road_graph::RoadGraphPlugin,
            movement::MovementPlugin,
        ));

        app.add_systems(Startup, world_init::init_world);
    }
}
