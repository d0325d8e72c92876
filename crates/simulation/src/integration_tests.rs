//! Integration tests using the `TestCity` harness.
//!
//! These tests spin up a headless Bevy App with `SimulationPlugin` and verify
//! collider registration, obstacle probing and agent movement working
//! together across the fixed-update schedule.

use bevy::prelude::*;

use crate::collision::{CollisionWorld, SphereHit, StaticCollider};
use crate::road_graph::RoadGraph;
use crate::sim_rng::SimRng;
use crate::test_harness::TestCity;
use crate::world_init::test_city_roads;

// ===========================================================================
// 1. Harness bootstrap tests
// ===========================================================================

#[test]
fn empty_city_has_no_colliders() {
    let city = TestCity::new();
    assert_eq!(city.collision().collider_count(), 0);
    // The shared moving-obstacle probe is always wired in
    assert_eq!(city.collision().probe_count(), 1);
}

#[test]
fn empty_city_has_empty_road_graph() {
    let city = TestCity::new();
    assert!(city.road_graph().is_empty());
}

#[test]
fn empty_city_uses_default_bounds() {
    let city = TestCity::new();
    assert_eq!(city.collision().bounds(), CollisionWorld::default_bounds());
}

#[test]
fn ticking_empty_city_does_not_panic() {
    let mut city = TestCity::new();
    city.tick(10);
}

// ===========================================================================
// 2. Static collider registration
// ===========================================================================

#[test]
fn static_collider_component_is_registered_on_tick() {
    let mut city = TestCity::new();
    let wall = city.spawn_static_collider(
        Vec3::new(10.0, 0.0, 0.0),
        StaticCollider::Box {
            half_extents: Vec3::new(1.0, 5.0, 5.0),
        },
    );
    assert_eq!(city.collision().collider_count(), 0);

    city.tick(1);
    assert_eq!(city.collision().collider_count(), 1);
    assert!(city.collision().check_point(Vec3::new(10.0, 2.0, 0.0)));
    assert_eq!(city.collision().colliders()[0].owner, wall);
}

#[test]
fn static_collider_is_registered_only_once() {
    let mut city = TestCity::new();
    city.spawn_static_collider(
        Vec3::new(-20.0, 0.0, 5.0),
        StaticCollider::Cylinder {
            radius: 1.0,
            height: 4.0,
        },
    );
    city.tick(5);
    assert_eq!(city.collision().collider_count(), 1);
    let hit = city.collision().check_sphere(Vec3::new(-20.0, 1.0, 5.5), 0.2);
    assert!(matches!(hit, Some(SphereHit::Static { .. })));
}

// ===========================================================================
// 3. Agent movement
// ===========================================================================

#[test]
fn agent_moves_freely_in_open_space() {
    let mut city = TestCity::new();
    let agent = city.spawn_agent(Vec3::new(0.0, 1.0, 0.0), 0.5);

    city.request_move(agent, Vec3::new(3.0, 1.0, -4.0));
    city.tick(1);

    city.assert_position_near(agent, Vec3::new(3.0, 1.0, -4.0), 1e-5);
    assert!(!city.is_blocked(agent));
}

#[test]
fn agent_without_request_stays_put() {
    let mut city = TestCity::new();
    let agent = city.spawn_agent(Vec3::new(7.0, 1.0, 7.0), 0.5);
    city.tick(3);
    city.assert_position_near(agent, Vec3::new(7.0, 1.0, 7.0), 0.0);
}

#[test]
fn agent_is_stopped_by_wall() {
    let mut city = TestCity::new().with_box(Vec3::new(10.0, 0.0, 0.0), Vec3::new(1.0, 5.0, 5.0));
    let agent = city.spawn_agent(Vec3::ZERO, 0.5);

    city.request_move(agent, Vec3::new(10.0, 0.0, 0.0));
    city.tick(1);

    city.assert_position_near(agent, Vec3::ZERO, 0.0);
    assert!(city.is_blocked(agent));
}

#[test]
fn agent_slides_along_wall() {
    let mut city = TestCity::new().with_box(Vec3::new(5.0, 0.0, 0.0), Vec3::new(1.0, 5.0, 20.0));
    let agent = city.spawn_agent(Vec3::ZERO, 0.5);

    city.request_move(agent, Vec3::new(5.0, 0.0, 5.0));
    city.tick(1);

    city.assert_position_near(agent, Vec3::new(0.0, 0.0, 5.0), 1e-5);
    assert!(city.is_blocked(agent));
    city.assert_clear_of_static(agent, 0.5);
}

#[test]
fn agent_is_clamped_to_bounds() {
    let mut city = TestCity::new().with_bounds(
        Vec3::new(-10.0, -50.0, -10.0),
        Vec3::new(10.0, 250.0, 10.0),
    );
    let agent = city.spawn_agent(Vec3::ZERO, 1.0);

    city.request_move(agent, Vec3::new(100.0, 0.0, -3.0));
    city.tick(1);

    city.assert_position_near(agent, Vec3::new(9.0, 0.0, -3.0), 1e-5);
    city.assert_within_bounds(agent);
}

#[test]
fn agent_passes_over_low_cylinder() {
    // Sphere centre above the cylinder top is not a hit
    let mut city = TestCity::new().with_cylinder(Vec3::new(5.0, 0.0, 0.0), 1.0, 2.0);
    let agent = city.spawn_agent(Vec3::new(0.0, 3.0, 0.0), 0.5);

    city.request_move(agent, Vec3::new(5.0, 3.0, 0.0));
    city.tick(1);
    city.assert_position_near(agent, Vec3::new(5.0, 3.0, 0.0), 1e-5);
}

// ===========================================================================
// 4. Moving obstacles
// ===========================================================================

#[test]
fn moving_obstacle_is_visible_after_tick() {
    let mut city = TestCity::new();
    let obstacle = city.spawn_obstacle(Vec3::new(5.0, 0.0, 0.0), 1.0);

    assert!(city.collision().check_sphere(Vec3::new(5.0, 0.0, 0.0), 0.5).is_none());
    city.tick(1);

    let hit = city.collision().check_sphere(Vec3::new(5.0, 0.0, 0.0), 0.5);
    assert_eq!(hit, Some(SphereHit::Dynamic { owner: obstacle }));
}

#[test]
fn moving_obstacle_blocks_agent_until_it_leaves() {
    let mut city = TestCity::new();
    let obstacle = city.spawn_obstacle(Vec3::new(5.0, 0.0, 0.0), 1.0);
    let agent = city.spawn_agent(Vec3::ZERO, 0.5);

    city.request_move(agent, Vec3::new(5.0, 0.0, 0.0));
    city.tick(1);
    city.assert_position_near(agent, Vec3::ZERO, 0.0);
    assert!(city.is_blocked(agent));

    city.move_obstacle(obstacle, Vec3::new(50.0, 0.0, 50.0));
    city.request_move(agent, Vec3::new(5.0, 0.0, 0.0));
    city.tick(1);
    city.assert_position_near(agent, Vec3::new(5.0, 0.0, 0.0), 1e-5);
    assert!(!city.is_blocked(agent));
}

#[test]
fn solid_agent_is_not_blocked_by_itself() {
    let mut city = TestCity::new();
    let agent = city.spawn_solid_agent(Vec3::ZERO, 1.0);
    city.tick(1);

    city.request_move(agent, Vec3::new(1.0, 0.0, 0.0));
    city.tick(1);
    city.assert_position_near(agent, Vec3::new(1.0, 0.0, 0.0), 1e-5);
    assert!(!city.is_blocked(agent));
}

#[test]
fn solid_agents_block_each_other() {
    let mut city = TestCity::new();
    let a = city.spawn_solid_agent(Vec3::ZERO, 0.5);
    let b = city.spawn_solid_agent(Vec3::new(10.0, 0.0, 0.0), 1.0);

    city.request_move(a, Vec3::new(10.0, 0.0, 0.0));
    city.tick(1);
    city.assert_position_near(a, Vec3::ZERO, 0.0);
    city.assert_position_near(b, Vec3::new(10.0, 0.0, 0.0), 0.0);
    assert!(city.is_blocked(a));

    // B walks into A from the other side
    city.request_move(b, Vec3::new(1.0, 0.0, 0.0));
    city.tick(1);
    city.assert_position_near(b, Vec3::new(10.0, 0.0, 0.0), 0.0);
    assert!(city.is_blocked(b));

    city.request_move(a, Vec3::new(5.0, 0.0, 0.0));
    city.tick(1);
    city.assert_position_near(a, Vec3::new(5.0, 0.0, 0.0), 1e-5);
}

#[test]
fn thin_wall_stops_agent() {
    let mut city = TestCity::new().with_box(Vec3::new(10.0, 0.0, 0.0), Vec3::new(0.0, 5.0, 10.0));
    let agent = city.spawn_agent(Vec3::new(8.0, 0.0, 0.0), 1.0);

    city.request_move(agent, Vec3::new(10.2, 0.0, 0.0));
    city.tick(1);
    city.assert_position_near(agent, Vec3::new(8.0, 0.0, 0.0), 0.0);
    assert!(city.is_blocked(agent));
}

#[test]
fn despawned_obstacle_disappears_from_probe() {
    let mut city = TestCity::new();
    let obstacle = city.spawn_obstacle(Vec3::new(5.0, 0.0, 0.0), 1.0);
    city.tick(1);
    assert!(city.world_mut().despawn(obstacle));
    city.tick(1);
    assert!(city.collision().check_sphere(Vec3::new(5.0, 0.0, 0.0), 0.5).is_none());
}

// ===========================================================================
// 5. Road graph and level lifecycle
// ===========================================================================

#[test]
fn harness_builds_road_graph_from_queued_roads() {
    let city = TestCity::new()
        .with_road(Vec2::new(-50.0, 0.0), Vec2::new(50.0, 0.0))
        .with_road(Vec2::new(0.0, -50.0), Vec2::new(0.0, 50.0))
        .build_road_graph();

    city.assert_waypoint_count(9);
    city.assert_road_graph_connected();
}

#[test]
fn test_city_init_loads_roads_and_props() {
    let mut city = TestCity::with_test_city();

    city.assert_waypoint_count(69);
    city.assert_road_graph_connected();
    assert_eq!(city.collision().collider_count(), 13);
    assert_eq!(city.level_prop_count(), 13);
    assert_eq!(city.collision().probe_count(), 1);

    let bounds = city.collision().bounds();
    assert_eq!(bounds.min.x, -170.0);
    assert_eq!(bounds.max.z, 170.0);
}

#[test]
fn test_city_harness_roads_match_init() {
    let from_harness = TestCity::new().with_roads(&test_city_roads()).build_road_graph();
    let from_init = TestCity::with_test_city();
    assert_eq!(
        from_harness.road_graph().stats(),
        from_init.road_graph().stats()
    );
}

#[test]
fn agent_walking_through_test_city_never_enters_buildings() {
    let mut city = TestCity::with_test_city();
    let agent = city.spawn_agent(Vec3::new(0.0, 1.0, 0.0), 0.5);

    for step in 1..=30 {
        let d = step as f32 * 3.0;
        city.request_move(agent, Vec3::new(d, 1.0, d));
        city.tick(1);
        city.assert_clear_of_static(agent, 0.5);
        city.assert_within_bounds(agent);
    }
}

#[test]
fn obstacles_survive_level_reload() {
    // A level load swaps the collision world but keeps the shared probe
    let mut city = TestCity::with_test_city();
    let obstacle = city.spawn_obstacle(Vec3::new(0.0, 0.0, 0.0), 1.0);
    city.tick(1);
    let hit = city.collision().check_sphere(Vec3::ZERO, 0.5);
    assert_eq!(hit.map(|h| h.owner()), Some(obstacle));
}

#[test]
fn random_waypoint_is_deterministic_under_sim_rng() {
    let mut city = TestCity::with_test_city();
    let pick = |city: &mut TestCity| {
        city.world_mut().insert_resource(SimRng::from_seed_u64(7));
        city.world_mut()
            .resource_scope(|world, mut rng: Mut<SimRng>| {
                world
                    .resource::<RoadGraph>()
                    .random_waypoint(&mut rng.0)
                    .map(|w| w.id)
            })
    };
    let first = pick(&mut city);
    let second = pick(&mut city);
    assert!(first.is_some());
    assert_eq!(first, second);
}
