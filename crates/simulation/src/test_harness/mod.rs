//! # TestCity: headless integration test harness
//!
//! Provides a fluent builder that wraps `bevy::app::App` + `SimulationPlugin`
//! for running integration tests without a window or renderer.

mod assertions;
mod queries;
mod setup;

use bevy::app::App;
use bevy::prelude::*;

use crate::world_init::SkipWorldInit;
use crate::SimulationPlugin;

/// A headless Bevy App wrapping `SimulationPlugin` for integration testing.
///
/// Use builder methods to set up colliders, roads and agents, then call
/// `tick()` to advance the simulation and query/assert on the resulting ECS
/// state.
pub struct TestCity {
    app: App,
}

impl TestCity {
    // -----------------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------------

    /// Create a new **empty** level: no colliders, an empty road graph and
    /// the default world bounds. The test city is NOT loaded.
    pub fn new() -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);

        // Insert the marker BEFORE SimulationPlugin so init_world skips.
        app.insert_resource(SkipWorldInit);
        app.add_plugins(SimulationPlugin);

        // Run one update so Startup systems execute (init_world will no-op).
        app.update();

        Self { app }
    }

    /// Create a level with the full test city loaded by `init_world`:
    /// the street grid, its road graph, buildings and lamp posts.
    pub fn with_test_city() -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(SimulationPlugin);
        // Run one update so Startup systems execute (init_world runs fully).
        app.update();

        Self { app }
    }
}

impl Default for TestCity {
    fn default() -> Self {
        Self::new()
    }
}
