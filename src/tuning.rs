//! Data-driven simulation constants
//!
//! Every knob defaults to the matching value in [`crate::consts`]. JSON
//! overrides may be partial: missing fields keep their defaults.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SimError;

/// What to do once every tree already has a bee bound to it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AssignmentPolicy {
    /// Stop spawning when spawn count reaches tree count
    #[default]
    Cap,
    /// Keep spawning; bee N forages at tree N mod tree count
    Cycle,
}

impl AssignmentPolicy {
    /// Tree index for the bee created at `spawn_index`, or None if no bee
    /// may be spawned
    pub fn tree_for(&self, spawn_index: usize, tree_count: usize) -> Option<usize> {
        if tree_count == 0 {
            return None;
        }
        match self {
            AssignmentPolicy::Cap => (spawn_index < tree_count).then_some(spawn_index),
            AssignmentPolicy::Cycle => Some(spawn_index % tree_count),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Clouds ===
    pub cloud_count: usize,
    pub cloud_height: (f32, f32),
    pub cloud_puffs: (u32, u32),
    pub cloud_extent: f32,
    pub puff_spacing: f32,
    pub puff_scale_x: (f32, f32),
    pub puff_scale_y: (f32, f32),
    pub puff_scale_z: (f32, f32),
    pub puff_base_scale_y: f32,
    pub cloud_drift_base: f32,
    pub cloud_drift_step: f32,

    // === Trees ===
    pub tree_count: usize,
    pub tree_extent: f32,
    pub trunk_height: f32,
    pub leaf_offset: f32,
    pub windmill_position: Vec3,
    pub exclusion_radius: f32,
    /// Rejection-sampling bound per tree
    pub max_placement_attempts: u32,

    // === Hive ===
    pub hive_position: Vec3,
    pub hive_initial_scale: Vec3,
    pub hive_growth_factor: f32,
    pub hive_anchor_drop: f32,
    pub hive_full_scale: f32,
    pub hive_sink_floor: f32,
    pub hive_sink_step: f32,
    pub hive_deflate_step: f32,
    pub hive_min_scale_y: f32,

    // === Bees ===
    pub spawn_interval_secs: f32,
    pub bee_speed: f32,
    pub tree_arrival_radius: f32,
    pub hive_arrival_radius: f32,
    pub bob_amplitude: f32,
    pub bob_frequency: f32,
    pub bee_speed_decay: f32,
    pub payload_drop: f32,
    pub assignment: AssignmentPolicy,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            cloud_count: CLOUD_COUNT,
            cloud_height: (CLOUD_MIN_HEIGHT, CLOUD_MAX_HEIGHT),
            cloud_puffs: (CLOUD_MIN_PUFFS, CLOUD_MAX_PUFFS),
            cloud_extent: CLOUD_EXTENT,
            puff_spacing: PUFF_SPACING,
            puff_scale_x: PUFF_SCALE_X,
            puff_scale_y: PUFF_SCALE_Y,
            puff_scale_z: PUFF_SCALE_Z,
            puff_base_scale_y: PUFF_BASE_SCALE_Y,
            cloud_drift_base: CLOUD_DRIFT_BASE,
            cloud_drift_step: CLOUD_DRIFT_STEP,

            tree_count: TREE_COUNT,
            tree_extent: TREE_EXTENT,
            trunk_height: TRUNK_HEIGHT,
            leaf_offset: LEAF_OFFSET,
            windmill_position: Vec3::new(WINDMILL_X, 0.0, WINDMILL_Z),
            exclusion_radius: WINDMILL_EXCLUSION_RADIUS,
            max_placement_attempts: MAX_PLACEMENT_ATTEMPTS,

            hive_position: Vec3::from_array(HIVE_POSITION),
            hive_initial_scale: Vec3::from_array(HIVE_INITIAL_SCALE),
            hive_growth_factor: HIVE_GROWTH_FACTOR,
            hive_anchor_drop: HIVE_ANCHOR_DROP,
            hive_full_scale: HIVE_FULL_SCALE,
            hive_sink_floor: HIVE_SINK_FLOOR,
            hive_sink_step: HIVE_SINK_STEP,
            hive_deflate_step: HIVE_DEFLATE_STEP,
            hive_min_scale_y: HIVE_MIN_SCALE_Y,

            spawn_interval_secs: SPAWN_INTERVAL_SECS,
            bee_speed: BEE_SPEED,
            tree_arrival_radius: TREE_ARRIVAL_RADIUS,
            hive_arrival_radius: HIVE_ARRIVAL_RADIUS,
            bob_amplitude: BOB_AMPLITUDE,
            bob_frequency: BOB_FREQUENCY,
            bee_speed_decay: BEE_SPEED_DECAY,
            payload_drop: PAYLOAD_DROP,
            assignment: AssignmentPolicy::Cap,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override and validate it
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject configurations the simulation cannot run sensibly.
    ///
    /// The exclusion check keeps the tree rejection loop terminating in
    /// practice: the disc may cover at most half of the sampling square.
    pub fn validate(&self) -> Result<(), SimError> {
        fn ordered(name: &str, (lo, hi): (f32, f32)) -> Result<(), SimError> {
            if lo.is_finite() && hi.is_finite() && lo <= hi {
                Ok(())
            } else {
                Err(SimError::InvalidTuning(format!(
                    "{name} range [{lo}, {hi}] is not ordered"
                )))
            }
        }
        fn positive(name: &str, value: f32) -> Result<(), SimError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(SimError::InvalidTuning(format!("{name} must be positive, got {value}")))
            }
        }

        ordered("cloud_height", self.cloud_height)?;
        ordered("puff_scale_x", self.puff_scale_x)?;
        ordered("puff_scale_y", self.puff_scale_y)?;
        ordered("puff_scale_z", self.puff_scale_z)?;
        if self.cloud_puffs.0 == 0 || self.cloud_puffs.0 > self.cloud_puffs.1 {
            return Err(SimError::InvalidTuning(format!(
                "cloud_puffs range [{}, {}] is invalid",
                self.cloud_puffs.0, self.cloud_puffs.1
            )));
        }
        positive("cloud_extent", self.cloud_extent)?;
        positive("tree_extent", self.tree_extent)?;
        positive("spawn_interval_secs", self.spawn_interval_secs)?;
        positive("bee_speed", self.bee_speed)?;
        positive("tree_arrival_radius", self.tree_arrival_radius)?;
        positive("hive_arrival_radius", self.hive_arrival_radius)?;
        positive("hive_sink_step", self.hive_sink_step)?;
        positive("hive_deflate_step", self.hive_deflate_step)?;

        if self.tree_count == 0 {
            return Err(SimError::InvalidTuning("tree_count must be at least 1".into()));
        }
        if self.max_placement_attempts == 0 {
            return Err(SimError::InvalidTuning(
                "max_placement_attempts must be at least 1".into(),
            ));
        }
        if !(self.hive_growth_factor > 1.0) {
            return Err(SimError::InvalidTuning(format!(
                "hive_growth_factor must exceed 1, got {}",
                self.hive_growth_factor
            )));
        }
        if !(self.bee_speed_decay > 0.0 && self.bee_speed_decay <= 1.0) {
            return Err(SimError::InvalidTuning(format!(
                "bee_speed_decay must lie in (0, 1], got {}",
                self.bee_speed_decay
            )));
        }
        if self.hive_initial_scale.x != self.hive_initial_scale.z {
            return Err(SimError::InvalidTuning(
                "hive_initial_scale must have equal x and z".into(),
            ));
        }

        let side = 2.0 * self.tree_extent;
        let disc = std::f32::consts::PI * self.exclusion_radius * self.exclusion_radius;
        if self.exclusion_radius < 0.0 || disc > 0.5 * side * side {
            return Err(SimError::InvalidTuning(format!(
                "exclusion radius {} leaves too little room in a {side}x{side} sampling square",
                self.exclusion_radius
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "tree_count": 12, "assignment": "Cycle" }"#)
            .expect("partial tuning should parse");
        assert_eq!(tuning.tree_count, 12);
        assert_eq!(tuning.assignment, AssignmentPolicy::Cycle);
        assert_eq!(tuning.cloud_count, CLOUD_COUNT);
        assert_eq!(tuning.hive_position, Vec3::from_array(HIVE_POSITION));
    }

    #[test]
    fn test_oversized_exclusion_rejected() {
        let tuning = Tuning {
            exclusion_radius: 100.0,
            ..Default::default()
        };
        assert!(matches!(tuning.validate(), Err(SimError::InvalidTuning(_))));
    }

    #[test]
    fn test_inverted_range_rejected() {
        let tuning = Tuning {
            puff_scale_x: (1.3, 0.7),
            ..Default::default()
        };
        assert!(tuning.validate().is_err());
    }

    #[test]
    fn test_bad_json_is_parse_error() {
        assert!(matches!(Tuning::from_json("{ not json"), Err(SimError::Parse(_))));
    }

    #[test]
    fn test_assignment_policies() {
        assert_eq!(AssignmentPolicy::Cap.tree_for(3, 5), Some(3));
        assert_eq!(AssignmentPolicy::Cap.tree_for(5, 5), None);
        assert_eq!(AssignmentPolicy::Cycle.tree_for(7, 5), Some(2));
        assert_eq!(AssignmentPolicy::Cycle.tree_for(0, 0), None);
    }
}
