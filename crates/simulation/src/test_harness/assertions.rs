//! Assertion helpers for `TestCity` integration tests.

use bevy::prelude::*;

use super::TestCity;

impl TestCity {
    // -----------------------------------------------------------------------
    // Assertions
    // -----------------------------------------------------------------------

    /// Assert an entity sits within `tolerance` of `expected`.
    pub fn assert_position_near(&self, entity: Entity, expected: Vec3, tolerance: f32) {
        let actual = self.position(entity);
        assert!(
            actual.distance(expected) <= tolerance,
            "Expected {entity:?} near {expected:?}, found {actual:?}"
        );
    }

    /// Assert that a sphere placed at the entity's position overlaps nothing
    /// static.
    pub fn assert_clear_of_static(&self, entity: Entity, radius: f32) {
        let p = self.position(entity);
        let hit = self.collision().check_sphere(p, radius);
        assert!(
            !matches!(hit, Some(crate::collision::SphereHit::Static { .. })),
            "Expected {entity:?} at {p:?} clear of static geometry, hit {hit:?}"
        );
    }

    /// Assert the entity lies inside the world bounds on X and Z.
    pub fn assert_within_bounds(&self, entity: Entity) {
        let p = self.position(entity);
        let b = self.collision().bounds();
        assert!(
            p.x >= b.min.x && p.x <= b.max.x && p.z >= b.min.z && p.z <= b.max.z,
            "Expected {entity:?} at {p:?} inside bounds {:?}..{:?}",
            b.min,
            b.max
        );
    }

    pub fn assert_road_graph_connected(&self) {
        let graph = self.road_graph();
        assert!(
            graph.is_connected(),
            "Expected a connected road graph ({} waypoints)",
            graph.len()
        );
    }

    pub fn assert_waypoint_count(&self, expected: usize) {
        let actual = self.road_graph().len();
        assert_eq!(actual, expected, "Expected {expected} waypoints, got {actual}");
    }
}
