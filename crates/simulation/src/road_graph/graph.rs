use std::collections::BTreeSet;

use bevy::prelude::*;
use pathfinding::prelude::bfs_reach;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WaypointId(pub u32);

/// A node of the drivable road graph.
///
/// **Determinism**: `connections` is a `BTreeSet`, so neighbours iterate in id
/// order regardless of the order edges were added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub id: WaypointId,
    pub position: Vec3,
    pub speed_limit: f32,
    pub is_intersection: bool,
    pub connections: BTreeSet<WaypointId>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaypointOptions {
    pub speed_limit: f32,
    pub is_intersection: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoadGraphStats {
    pub waypoint_count: usize,
    /// Undirected edges; each bidirectional connection counts once.
    pub edge_count: usize,
}

/// Waypoint store consumed by the traffic scheduler and spawn placement.
///
/// Ids are dense indices into `waypoints`; waypoints are never removed while
/// the level is alive.
#[derive(Resource, Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoadGraph {
    waypoints: Vec<Waypoint>,
}

impl RoadGraph {
    /// Always appends a new waypoint. Position dedup is the builder's job.
    pub fn create_waypoint(&mut self, position: Vec3, options: WaypointOptions) -> WaypointId {
        let id = WaypointId(self.waypoints.len() as u32);
        self.waypoints.push(Waypoint {
            id,
            position,
            speed_limit: options.speed_limit,
            is_intersection: options.is_intersection,
            connections: BTreeSet::new(),
        });
        id
    }

    /// Add `b` to `a`'s connections and `a` to `b`'s. Repeating the call is a
    /// no-op. Panics if either id was never created.
    pub fn connect_bidirectional(&mut self, a: WaypointId, b: WaypointId) {
        self.assert_known(a);
        self.assert_known(b);
        debug_assert_ne!(a, b, "RoadGraph: refusing to connect {a:?} to itself");
        self.waypoints[a.0 as usize].connections.insert(b);
        self.waypoints[b.0 as usize].connections.insert(a);
    }

    /// Flag an existing waypoint as a shared crossing point.
    pub fn mark_intersection(&mut self, id: WaypointId) {
        self.assert_known(id);
        self.waypoints[id.0 as usize].is_intersection = true;
    }

    fn assert_known(&self, id: WaypointId) {
        assert!(
            (id.0 as usize) < self.waypoints.len(),
            "RoadGraph: unknown waypoint {:?} ({} waypoints)",
            id,
            self.waypoints.len()
        );
    }

    pub fn get(&self, id: WaypointId) -> Option<&Waypoint> {
        self.waypoints.get(id.0 as usize)
    }

    pub fn all_waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// Uniform pick over all waypoints, `None` when the graph is empty.
    pub fn random_waypoint<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Waypoint> {
        self.waypoints.choose(rng)
    }

    /// Closest waypoint on the XZ plane.
    pub fn nearest_waypoint(&self, position: Vec3) -> Option<&Waypoint> {
        self.waypoints.iter().min_by(|a, b| {
            a.position
                .xz()
                .distance_squared(position.xz())
                .total_cmp(&b.position.xz().distance_squared(position.xz()))
        })
    }

    pub fn stats(&self) -> RoadGraphStats {
        let directed: usize = self.waypoints.iter().map(|w| w.connections.len()).sum();
        RoadGraphStats {
            waypoint_count: self.waypoints.len(),
            edge_count: directed / 2,
        }
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Every waypoint reachable from `start` via connections, `start` included.
    pub fn reachable_from(&self, start: WaypointId) -> Vec<WaypointId> {
        self.assert_known(start);
        bfs_reach(start, |id| {
            self.waypoints[id.0 as usize]
                .connections
                .iter()
                .copied()
                .collect::<Vec<_>>()
        })
        .collect()
    }

    /// True when every waypoint can reach every other one. An empty graph is
    /// trivially connected.
    pub fn is_connected(&self) -> bool {
        match self.waypoints.first() {
            None => true,
            Some(first) => self.reachable_from(first.id).len() == self.waypoints.len(),
        }
    }
}
