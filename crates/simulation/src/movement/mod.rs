mod resolver;

use bevy::prelude::*;

use crate::collision::CollisionWorld;

/// A capsule-shaped agent (player, NPC) moved kinematically against the
/// collision world.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct KinematicAgent {
    pub radius: f32,
}

/// Position the agent's controller wants to reach this tick. Consumed by
/// `apply_agent_movement`.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct DesiredPosition(pub Option<Vec3>);

/// Set when the last resolved move ended short of the desired position.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MovementBlocked(pub bool);

/// Resolve every pending desired position and adopt the result as the
/// agent's authoritative translation. Queries only read the collision world,
/// so agents are processed in parallel.
pub fn apply_agent_movement(
    world: Res<CollisionWorld>,
    mut query: Query<(
        Entity,
        &KinematicAgent,
        &mut DesiredPosition,
        &mut Transform,
        Option<&mut MovementBlocked>,
    )>,
) {
    #[cfg(feature = "trace")]
    let _span = bevy::log::info_span!("apply_agent_movement").entered();

    query
        .par_iter_mut()
        .for_each(|(entity, agent, mut desired, mut transform, blocked)| {
            let Some(end) = desired.0.take() else {
                return;
            };
            let resolved =
                world.resolve_agent_movement(entity, transform.translation, end, agent.radius);
            if let Some(mut blocked) = blocked {
                blocked.0 = resolved != end;
            }
            transform.translation = resolved;
        });
}

pub struct MovementPlugin;

impl Plugin for MovementPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            apply_agent_movement.in_set(crate::SimulationSet::Movement),
        );
    }
}
