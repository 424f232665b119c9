//! Hive Meadow - a procedurally populated meadow with a foraging bee swarm
//!
//! Core modules:
//! - `sim`: Deterministic simulation (placement, bees, hive growth)
//! - `platform`: Frame clock and frame loop (Render/Clock service seam)
//! - `tuning`: Data-driven simulation constants
//! - `settings`: Host settings (seed, headless run length)

pub mod error;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::SimError;
pub use settings::Settings;
pub use tuning::{AssignmentPolicy, Tuning};

use glam::Vec3;

/// Simulation constants (defaults for [`Tuning`])
pub mod consts {
    /// Raw clock timestamps arrive in milliseconds
    pub const MS_TO_SECS: f64 = 0.001;
    /// Below this planar magnitude a direction is treated as zero
    pub const DIRECTION_EPSILON: f32 = 1e-6;
    /// Placement grid cells per unit: positions land on whole units, scales on tenths
    pub const POSITION_GRID: f32 = 1.0;
    pub const SCALE_GRID: f32 = 10.0;

    /// Clouds
    pub const CLOUD_COUNT: usize = 15;
    pub const CLOUD_MIN_HEIGHT: f32 = 15.0;
    pub const CLOUD_MAX_HEIGHT: f32 = 20.0;
    pub const CLOUD_MIN_PUFFS: u32 = 2;
    pub const CLOUD_MAX_PUFFS: u32 = 5;
    /// Clouds spawn and wrap within [-extent, extent] on x and z
    pub const CLOUD_EXTENT: f32 = 60.0;
    /// Horizontal gap between consecutive puffs of one cloud
    pub const PUFF_SPACING: f32 = 2.0;
    pub const PUFF_SCALE_X: (f32, f32) = (0.7, 1.3);
    pub const PUFF_SCALE_Y: (f32, f32) = (0.5, 1.5);
    pub const PUFF_SCALE_Z: (f32, f32) = (0.8, 1.2);
    /// Flattened, inverted shadow under each puff
    pub const PUFF_BASE_SCALE_Y: f32 = -0.1;
    /// Drift speed = base + step * creation index (parallax)
    pub const CLOUD_DRIFT_BASE: f32 = 0.002;
    pub const CLOUD_DRIFT_STEP: f32 = 0.0005;

    /// Trees
    pub const TREE_COUNT: usize = 200;
    pub const TREE_EXTENT: f32 = 70.0;
    pub const TRUNK_HEIGHT: f32 = 2.0;
    pub const LEAF_OFFSET: f32 = 2.0;
    pub const TRUNK_SCALE: [f32; 3] = [0.3, 2.0, 0.3];
    pub const LEAF_SCALE: [f32; 3] = [1.0, 2.0, 1.0];
    pub const MAX_PLACEMENT_ATTEMPTS: u32 = 10_000;

    /// Windmill (trees keep clear of it)
    pub const WINDMILL_X: f32 = 3.5;
    pub const WINDMILL_Z: f32 = 0.0;
    pub const WINDMILL_EXCLUSION_RADIUS: f32 = 15.0;

    /// Ground slab
    pub const GROUND_SCALE: [f32; 3] = [100.0, 0.1, 100.0];

    /// Hive
    pub const HIVE_POSITION: [f32; 3] = [0.05, 3.4, 2.3];
    pub const HIVE_INITIAL_SCALE: [f32; 3] = [0.5, 0.6, 0.5];
    pub const CONNECTOR_POSITION: [f32; 3] = [0.05, 4.04, 2.3];
    pub const CONNECTOR_SCALE: [f32; 3] = [0.01, 0.1, 0.01];
    /// Uniform scale multiplier per delivery
    pub const HIVE_GROWTH_FACTOR: f32 = 1.05;
    /// Offset drop per delivery, multiplied by the new y-scale
    pub const HIVE_ANCHOR_DROP: f32 = 0.045;
    /// Growing while scale.x <= this
    pub const HIVE_FULL_SCALE: f32 = 1.0;
    /// Collapse: sink only while offset >= this
    pub const HIVE_SINK_FLOOR: f32 = 1.0;
    pub const HIVE_SINK_STEP: f32 = 0.05;
    pub const HIVE_DEFLATE_STEP: f32 = 0.08;
    pub const HIVE_MIN_SCALE_Y: f32 = 0.1;

    /// Bees
    pub const SPAWN_INTERVAL_SECS: f32 = 3.0;
    pub const BEE_SPEED: f32 = 0.07;
    pub const BEE_SCALE: [f32; 3] = [0.03, 0.05, 0.03];
    pub const TREE_ARRIVAL_RADIUS: f32 = 1.0;
    pub const HIVE_ARRIVAL_RADIUS: f32 = 0.1;
    pub const BOB_AMPLITUDE: f32 = 0.3;
    pub const BOB_FREQUENCY: f32 = 3.0;
    /// Per-frame speed multiplier once the hive collapses
    pub const BEE_SPEED_DECAY: f32 = 0.99;
    pub const PAYLOAD_DROP: f32 = 0.1;
    pub const PAYLOAD_SCALE: [f32; 3] = [0.05, 0.1, 0.05];
}

/// Planar Euclidean distance between (x1, z1) and (x2, z2)
#[inline]
pub fn distance(x1: f32, z1: f32, x2: f32, z2: f32) -> f32 {
    let dx = x1 - x2;
    let dz = z1 - z2;
    (dx * dx + dz * dz).sqrt()
}

/// Distance between two points ignoring the vertical axis
#[inline]
pub fn planar_distance(a: Vec3, b: Vec3) -> f32 {
    distance(a.x, a.z, b.x, b.z)
}

/// Unit x/z direction from `from` toward `to` (y = 0).
///
/// Returns `Vec3::ZERO` when the points coincide on the plane, so callers
/// never see a non-finite step.
#[inline]
pub fn planar_direction(from: Vec3, to: Vec3) -> Vec3 {
    let delta = Vec3::new(to.x - from.x, 0.0, to.z - from.z);
    let mag = delta.length();
    if mag < consts::DIRECTION_EPSILON {
        Vec3::ZERO
    } else {
        delta / mag
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_ignores_height() {
        let a = Vec3::new(0.0, 100.0, 0.0);
        let b = Vec3::new(3.0, -7.0, 4.0);
        assert!((planar_distance(a, b) - 5.0).abs() < 1e-6);
        assert!((distance(0.0, 0.0, 3.0, 4.0) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_direction_is_unit_and_flat() {
        let dir = planar_direction(Vec3::new(1.0, 2.0, 1.0), Vec3::new(4.0, 9.0, 5.0));
        assert!((dir.length() - 1.0).abs() < 1e-6);
        assert_eq!(dir.y, 0.0);
        assert!((dir.x - 0.6).abs() < 1e-6);
        assert!((dir.z - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_direction_zero_when_coincident() {
        let p = Vec3::new(2.0, 1.0, -3.0);
        let dir = planar_direction(p, Vec3::new(2.0, 8.0, -3.0));
        assert_eq!(dir, Vec3::ZERO);
        assert!(dir.is_finite());
    }
}
