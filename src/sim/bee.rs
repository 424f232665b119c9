//! Bee lifecycle: spawning on a cadence and the per-bee foraging loop
//!
//! Each bee shuttles between the hive and the one tree it was bound to at
//! creation. The outbound leg steers toward the tree; the return leg
//! applies the same tree-ward direction negated, which retraces the
//! straight line back to the hive.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::scene::{NodeId, NodeKind, SceneGraph, Transform};
use crate::consts::{BEE_SCALE, PAYLOAD_SCALE};
use crate::tuning::Tuning;
use crate::{planar_direction, planar_distance};

/// Which leg of the round trip a bee is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BeeLeg {
    /// Empty-handed, flying to its tree
    Returning,
    /// Carrying payload back to the hive
    Delivering,
}

/// Outcome of one bee update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeeStep {
    Flying,
    /// Reached the tree this frame and picked up payload
    PickedUp,
    /// Reached the hive this frame with payload
    Delivered,
}

/// Per-frame inputs shared by every bee
#[derive(Debug, Clone, Copy)]
pub struct FlightFrame {
    pub hive: Vec3,
    pub speed: f32,
    /// Bobbing altitude for this frame
    pub altitude: f32,
    pub tree_arrival: f32,
    pub hive_arrival: f32,
    pub payload_drop: f32,
}

impl FlightFrame {
    pub fn new(tuning: &Tuning, speed: f32, elapsed_secs: f32) -> Self {
        Self {
            hive: tuning.hive_position,
            speed,
            altitude: bob_altitude(tuning, elapsed_secs),
            tree_arrival: tuning.tree_arrival_radius,
            hive_arrival: tuning.hive_arrival_radius,
            payload_drop: tuning.payload_drop,
        }
    }
}

/// Cosmetic vertical oscillation around the hive's starting height
#[inline]
pub fn bob_altitude(tuning: &Tuning, elapsed_secs: f32) -> f32 {
    tuning.hive_position.y + tuning.bob_amplitude * (tuning.bob_frequency * elapsed_secs).cos()
}

/// A foraging bee. Never destroyed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bee {
    pub id: u32,
    pub node: NodeId,
    pub position: Vec3,
    /// Index into the tree list, fixed at creation
    pub target: usize,
    pub carrying: bool,
    /// Present iff `carrying` once an update completes
    pub payload: Option<NodeId>,
}

impl Bee {
    /// Create a bee at the hive, bound to tree `target`
    pub fn spawn(scene: &mut impl SceneGraph, id: u32, target: usize, hive: Vec3) -> Self {
        let node = scene.add_node(
            NodeKind::Bee,
            Transform::at(hive)
                .with_scale(Vec3::from_array(BEE_SCALE))
                .with_rotation(Vec3::new(0.0, 0.0, std::f32::consts::FRAC_PI_2)),
        );
        Self {
            id,
            node,
            position: hive,
            target,
            carrying: false,
            payload: None,
        }
    }

    pub fn leg(&self) -> BeeLeg {
        if self.carrying {
            BeeLeg::Delivering
        } else {
            BeeLeg::Returning
        }
    }

    /// Advance one frame toward (or back from) `tree`.
    ///
    /// Arrival checks run before movement: the tree first, then the hive.
    pub fn step(&mut self, scene: &mut impl SceneGraph, tree: Vec3, frame: &FlightFrame) -> BeeStep {
        let mut outcome = BeeStep::Flying;
        if planar_distance(self.position, tree) < frame.tree_arrival {
            if !self.carrying {
                outcome = BeeStep::PickedUp;
            }
            self.carrying = true;
        } else if planar_distance(self.position, frame.hive) < frame.hive_arrival {
            if self.carrying {
                outcome = BeeStep::Delivered;
            }
            self.carrying = false;
        }

        let dir = planar_direction(self.position, tree);
        if self.carrying {
            self.position -= dir * frame.speed;
        } else {
            self.position += dir * frame.speed;
        }
        self.position.y = frame.altitude;
        scene.set_position(self.node, self.position);

        let payload_at = self.position - Vec3::Y * frame.payload_drop;
        match (self.carrying, self.payload) {
            (true, Some(payload)) => scene.set_position(payload, payload_at),
            (true, None) => {
                self.payload = Some(scene.add_node(
                    NodeKind::Payload,
                    Transform::at(payload_at).with_scale(Vec3::from_array(PAYLOAD_SCALE)),
                ));
            }
            (false, Some(payload)) => {
                scene.remove_node(payload);
                self.payload = None;
            }
            (false, None) => {}
        }

        outcome
    }
}

/// All bees plus the swarm-wide speed and spawn bookkeeping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Swarm {
    pub bees: Vec<Bee>,
    /// Current flight speed shared by all bees
    pub speed: f32,
    /// Bees spawned so far
    pub spawn_count: u32,
    /// Set once the assignment policy refuses further spawns
    pub capped: bool,
}

impl Swarm {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            bees: Vec::new(),
            speed: tuning.bee_speed,
            spawn_count: 0,
            capped: false,
        }
    }

    /// A spawn is due once the whole-second clock passes the next threshold
    pub fn spawn_due(&self, tuning: &Tuning, elapsed_secs: f32) -> bool {
        !self.capped && elapsed_secs.floor() > tuning.spawn_interval_secs * self.spawn_count as f32
    }

    /// Spawn at most one bee if due. None when no spawn was due.
    pub fn try_spawn(
        &mut self,
        scene: &mut impl SceneGraph,
        tuning: &Tuning,
        tree_count: usize,
        elapsed_secs: f32,
    ) -> Option<SpawnResult> {
        if !self.spawn_due(tuning, elapsed_secs) {
            return None;
        }
        let Some(target) = tuning.assignment.tree_for(self.spawn_count as usize, tree_count) else {
            self.capped = true;
            return Some(SpawnResult::Capped);
        };

        let id = self.spawn_count;
        self.bees.push(Bee::spawn(scene, id, target, tuning.hive_position));
        self.spawn_count += 1;
        Some(SpawnResult::Spawned { bee: id, tree: target })
    }

    /// Slow every bee; applied once per collapsing frame
    pub fn decay_speed(&mut self, factor: f32) {
        self.speed *= factor;
    }

    pub fn carrying(&self) -> usize {
        self.bees.iter().filter(|b| b.carrying).count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnResult {
    Spawned { bee: u32, tree: usize },
    /// No tree left to bind; spawning has stopped
    Capped,
}
