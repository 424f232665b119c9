//! Procedural placement of clouds, trees and the static set pieces
//!
//! Placement draws from the state's seeded RNG only, so a seed always
//! produces the same meadow.

use glam::Vec3;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::scene::{NodeId, NodeKind, SceneGraph, Transform};
use crate::consts::*;
use crate::error::SimError;
use crate::planar_distance;
use crate::tuning::Tuning;

/// A tree: trunk with a leaf canopy directly above it. Immutable after
/// placement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tree {
    pub trunk: NodeId,
    pub leaves: NodeId,
    pub trunk_position: Vec3,
    pub leaf_position: Vec3,
}

/// A puff and its flattened shadow copy.
///
/// `position` and the horizontal scale are shared by both nodes; only the
/// y-scale differs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PuffPair {
    pub puff: NodeId,
    pub base: NodeId,
    pub position: Vec3,
    pub puff_scale: Vec3,
    pub base_scale: Vec3,
}

/// A drifting cloud
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cloud {
    pub puffs: Vec<PuffPair>,
    /// x advance per frame, grows with creation order
    pub drift_speed: f32,
}

impl Cloud {
    /// Advance every puff by one frame of drift, wrapping past the bound.
    ///
    /// The wrap check runs before the advance, so a puff may sit up to one
    /// step beyond `bound` for a single frame.
    pub fn drift(&mut self, scene: &mut impl SceneGraph, bound: f32) {
        for pair in &mut self.puffs {
            if pair.position.x > bound {
                pair.position.x = -bound;
            }
            pair.position.x += self.drift_speed;
            scene.set_position(pair.puff, pair.position);
            scene.set_position(pair.base, pair.position);
        }
    }
}

/// Uniform draw from `[lo, hi]` restricted to multiples of `1 / per_unit`
fn on_grid(rng: &mut Pcg32, (lo, hi): (f32, f32), per_unit: f32) -> f32 {
    let lo = (lo * per_unit).round() as i32;
    let hi = (hi * per_unit).round() as i32;
    rng.random_range(lo..=hi.max(lo)) as f32 / per_unit
}

/// Place the ground slab and the windmill
pub fn place_set_pieces(scene: &mut impl SceneGraph, tuning: &Tuning) {
    scene.add_node(
        NodeKind::Ground,
        Transform::default().with_scale(Vec3::from_array(GROUND_SCALE)),
    );
    scene.add_node(
        NodeKind::Windmill,
        Transform::at(tuning.windmill_position)
            .with_rotation(Vec3::new(0.0, -std::f32::consts::FRAC_PI_2, 0.0)),
    );
}

/// Build one cloud. `index` is its creation order.
pub fn make_cloud(
    rng: &mut Pcg32,
    scene: &mut impl SceneGraph,
    tuning: &Tuning,
    index: usize,
) -> Cloud {
    let extent = tuning.cloud_extent;
    let height = on_grid(rng, tuning.cloud_height, POSITION_GRID);
    let puff_count = rng.random_range(tuning.cloud_puffs.0..=tuning.cloud_puffs.1);
    let base_x = on_grid(rng, (-extent, extent), POSITION_GRID);
    let base_z = on_grid(rng, (-extent, extent), POSITION_GRID);

    let puffs = (0..puff_count)
        .map(|i| {
            let position = Vec3::new(base_x + tuning.puff_spacing * i as f32, height, base_z);
            let puff_scale = Vec3::new(
                on_grid(rng, tuning.puff_scale_x, SCALE_GRID),
                on_grid(rng, tuning.puff_scale_y, SCALE_GRID),
                on_grid(rng, tuning.puff_scale_z, SCALE_GRID),
            );
            let base_scale = Vec3::new(puff_scale.x, tuning.puff_base_scale_y, puff_scale.z);

            PuffPair {
                puff: scene.add_node(NodeKind::Puff, Transform::at(position).with_scale(puff_scale)),
                base: scene.add_node(
                    NodeKind::PuffBase,
                    Transform::at(position).with_scale(base_scale),
                ),
                position,
                puff_scale,
                base_scale,
            }
        })
        .collect();

    Cloud {
        puffs,
        drift_speed: tuning.cloud_drift_base + tuning.cloud_drift_step * index as f32,
    }
}

pub fn populate_clouds(rng: &mut Pcg32, scene: &mut impl SceneGraph, tuning: &Tuning) -> Vec<Cloud> {
    (0..tuning.cloud_count)
        .map(|i| make_cloud(rng, scene, tuning, i))
        .collect()
}

/// Rejection-sample a tree site outside the windmill's exclusion disc.
///
/// Bounded by `max_placement_attempts`; [`Tuning::validate`] keeps the disc
/// small enough that the bound is never reached in practice.
pub fn sample_tree_site(rng: &mut Pcg32, tuning: &Tuning, tree: usize) -> Result<Vec3, SimError> {
    let extent = tuning.tree_extent;
    for _ in 0..tuning.max_placement_attempts {
        let site = Vec3::new(
            on_grid(rng, (-extent, extent), POSITION_GRID),
            tuning.trunk_height,
            on_grid(rng, (-extent, extent), POSITION_GRID),
        );
        if planar_distance(site, tuning.windmill_position) >= tuning.exclusion_radius {
            return Ok(site);
        }
    }
    Err(SimError::PlacementExhausted {
        tree,
        attempts: tuning.max_placement_attempts,
    })
}

/// Place every tree. Order matters: tree N is foraged by bee N.
pub fn populate_trees(
    rng: &mut Pcg32,
    scene: &mut impl SceneGraph,
    tuning: &Tuning,
) -> Result<Vec<Tree>, SimError> {
    let mut trees = Vec::with_capacity(tuning.tree_count);
    for i in 0..tuning.tree_count {
        let trunk_position = sample_tree_site(rng, tuning, i)?;
        let leaf_position = trunk_position + Vec3::Y * tuning.leaf_offset;
        trees.push(Tree {
            trunk: scene.add_node(
                NodeKind::Trunk,
                Transform::at(trunk_position).with_scale(Vec3::from_array(TRUNK_SCALE)),
            ),
            leaves: scene.add_node(
                NodeKind::Leaves,
                Transform::at(leaf_position).with_scale(Vec3::from_array(LEAF_SCALE)),
            ),
            trunk_position,
            leaf_position,
        });
    }
    log::info!("Placed {} trees and cleared the windmill", trees.len());
    Ok(trees)
}
