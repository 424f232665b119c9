//! Simulation state and construction
//!
//! Everything the per-frame tick reads or writes lives in one aggregate.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bee::Swarm;
use super::hive::{Hive, HivePhase};
use super::scene::SceneGraph;
use super::terrain::{self, Cloud, Tree};
use crate::error::SimError;
use crate::tuning::Tuning;

/// Something noteworthy that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    BeeSpawned { bee: u32, tree: usize },
    /// Every tree has a bee; no more spawns
    SpawnCapReached { bees: u32 },
    PayloadPicked { bee: u32 },
    PayloadDelivered { bee: u32 },
    /// Delivery enlarged the hive to this x/z scale
    HiveGrew { scale: f32 },
    HivePhaseChanged { phase: HivePhase },
    /// Collapse finished; the hive no longer changes
    HiveInert,
}

/// Simulation time as handed in by the frame source
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimClock {
    pub elapsed_secs: f32,
    pub frame: u64,
}

impl SimClock {
    /// Record this frame's elapsed time
    pub fn advance(&mut self, elapsed_secs: f32) {
        self.elapsed_secs = elapsed_secs;
        self.frame += 1;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationState {
    pub seed: u64,
    pub tuning: Tuning,
    pub clock: SimClock,
    /// Ordered; tree N is bound to bee N
    pub trees: Vec<Tree>,
    pub clouds: Vec<Cloud>,
    pub hive: Hive,
    pub swarm: Swarm,
    /// Events from the most recent tick
    pub events: Vec<SimEvent>,
    /// Set once the inert event has fired
    pub hive_settled: bool,
}

impl SimulationState {
    /// Validate the tuning, then populate the meadow into `scene`
    pub fn new(seed: u64, tuning: Tuning, scene: &mut impl SceneGraph) -> Result<Self, SimError> {
        tuning.validate()?;
        let mut rng = Pcg32::seed_from_u64(seed);

        terrain::place_set_pieces(scene, &tuning);
        let clouds = terrain::populate_clouds(&mut rng, scene, &tuning);
        let trees = terrain::populate_trees(&mut rng, scene, &tuning)?;
        let hive = Hive::spawn(scene, &tuning);
        let swarm = Swarm::new(&tuning);

        log::info!(
            "Meadow ready (seed {}): {} clouds, {} trees",
            seed,
            clouds.len(),
            trees.len()
        );

        Ok(Self {
            seed,
            tuning,
            clock: SimClock::default(),
            trees,
            clouds,
            hive,
            swarm,
            events: Vec::new(),
            hive_settled: false,
        })
    }

    pub fn phase(&self) -> HivePhase {
        self.hive.phase
    }

    pub fn push_event(&mut self, event: SimEvent) {
        match event {
            SimEvent::HivePhaseChanged { .. } | SimEvent::HiveInert | SimEvent::SpawnCapReached { .. } => {
                log::info!("{:?} at t={:.2}s", event, self.clock.elapsed_secs)
            }
            _ => log::debug!("{:?}", event),
        }
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::scene::{NodeKind, RecordingScene};

    #[test]
    fn test_new_populates_scene() {
        let mut scene = RecordingScene::new();
        let state = SimulationState::new(5, Tuning::default(), &mut scene).expect("state builds");
        assert_eq!(state.trees.len(), 200);
        assert_eq!(state.clouds.len(), 15);
        assert_eq!(state.phase(), HivePhase::Growing);
        assert!(state.swarm.bees.is_empty());
        assert_eq!(scene.count(NodeKind::Hive), 1);
        assert_eq!(scene.count(NodeKind::Windmill), 1);
        assert_eq!(scene.count(NodeKind::Leaves), 200);
    }

    #[test]
    fn test_invalid_tuning_rejected_before_placement() {
        let mut scene = RecordingScene::new();
        let tuning = Tuning {
            tree_count: 0,
            ..Default::default()
        };
        assert!(SimulationState::new(5, tuning, &mut scene).is_err());
        assert!(scene.is_empty());
    }
}
