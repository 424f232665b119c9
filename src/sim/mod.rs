//! Deterministic simulation module
//!
//! All meadow logic lives here. This module must be pure and deterministic:
//! - One tick per frame, no catch-up
//! - Seeded RNG only
//! - Stable iteration order (creation order)
//! - No rendering or platform dependencies; visuals go through `SceneGraph`

pub mod bee;
pub mod hive;
pub mod scene;
pub mod state;
pub mod terrain;
pub mod tick;

pub use bee::{Bee, BeeLeg, BeeStep, FlightFrame, SpawnResult, Swarm};
pub use hive::{CollapseStage, Hive, HivePhase};
pub use scene::{NodeId, NodeKind, RecordingScene, SceneEvent, SceneGraph, SceneNode, Transform};
pub use state::{SimClock, SimEvent, SimulationState};
pub use terrain::{Cloud, PuffPair, Tree, populate_clouds, populate_trees};
pub use tick::{drift_clouds, tick};
