//! Hive growth tracker
//!
//! The hive swells a little with every delivery until it is full, then
//! collapses in two stages: it sinks, then deflates until inert.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::scene::{NodeId, NodeKind, SceneGraph, Transform};
use crate::tuning::Tuning;

/// Hive lifecycle phase. The transition is one-way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HivePhase {
    /// Accepting deliveries (scale.x <= full scale)
    Growing,
    /// Full; sinking and deflating every frame
    Collapsing,
}

/// What a collapse step did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollapseStage {
    /// Offset dropped, scale untouched
    Sinking,
    /// Offset and y-scale both dropped
    Deflating,
    /// Nothing left to do
    Inert,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hive {
    pub node: NodeId,
    /// Fixed x/z anchor; only y moves
    pub anchor: Vec3,
    /// Invariant: scale.x == scale.z
    pub scale: Vec3,
    pub offset_y: f32,
    pub phase: HivePhase,
    /// Deliveries that enlarged the hive
    pub deliveries: u32,
    growth_factor: f32,
    anchor_drop: f32,
    full_scale: f32,
    sink_floor: f32,
    sink_step: f32,
    deflate_step: f32,
    min_scale_y: f32,
}

impl Hive {
    /// Create the hive (and its connector stalk) in the scene
    pub fn spawn(scene: &mut impl SceneGraph, tuning: &Tuning) -> Self {
        use crate::consts::{CONNECTOR_POSITION, CONNECTOR_SCALE};

        scene.add_node(
            NodeKind::Connector,
            Transform::at(Vec3::from_array(CONNECTOR_POSITION))
                .with_scale(Vec3::from_array(CONNECTOR_SCALE)),
        );
        let node = scene.add_node(
            NodeKind::Hive,
            Transform::at(tuning.hive_position).with_scale(tuning.hive_initial_scale),
        );
        Self::with_node(node, tuning)
    }

    /// Tracker bound to an existing node
    pub fn with_node(node: NodeId, tuning: &Tuning) -> Self {
        Self {
            node,
            anchor: tuning.hive_position,
            scale: tuning.hive_initial_scale,
            offset_y: tuning.hive_position.y,
            phase: HivePhase::Growing,
            deliveries: 0,
            growth_factor: tuning.hive_growth_factor,
            anchor_drop: tuning.hive_anchor_drop,
            full_scale: tuning.hive_full_scale,
            sink_floor: tuning.hive_sink_floor,
            sink_step: tuning.hive_sink_step,
            deflate_step: tuning.hive_deflate_step,
            min_scale_y: tuning.hive_min_scale_y,
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::new(self.anchor.x, self.offset_y, self.anchor.z)
    }

    pub fn is_growing(&self) -> bool {
        self.phase == HivePhase::Growing
    }

    /// No further collapse updates will change anything
    pub fn is_inert(&self) -> bool {
        self.phase == HivePhase::Collapsing
            && self.offset_y < self.sink_floor
            && self.scale.y <= self.min_scale_y
    }

    /// Enlarge uniformly for one delivery and drop the offset so the base
    /// stays put.
    pub fn grow(&mut self) {
        self.scale *= self.growth_factor;
        self.offset_y -= self.scale.y * self.anchor_drop;
        self.deliveries += 1;
    }

    /// Latch the phase from the current scale. Returns the new phase on the
    /// frame it changes.
    pub fn refresh_phase(&mut self) -> Option<HivePhase> {
        if self.phase == HivePhase::Growing && self.scale.x > self.full_scale {
            self.phase = HivePhase::Collapsing;
            return Some(self.phase);
        }
        None
    }

    /// One frame of collapse: sink while high, then sink and deflate.
    pub fn collapse_step(&mut self) -> CollapseStage {
        if self.offset_y >= self.sink_floor {
            self.offset_y -= self.sink_step;
            CollapseStage::Sinking
        } else if self.scale.y > self.min_scale_y {
            self.offset_y -= self.sink_step;
            self.scale.y -= self.deflate_step;
            CollapseStage::Deflating
        } else {
            CollapseStage::Inert
        }
    }

    /// Push position and scale to the scene node
    pub fn sync(&self, scene: &mut impl SceneGraph) {
        scene.set_position(self.node, self.position());
        scene.set_scale(self.node, self.scale);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hive() -> Hive {
        Hive::with_node(NodeId(0), &Tuning::default())
    }

    #[test]
    fn test_grow_is_uniform_and_anchored() {
        let mut hive = hive();
        let before = hive.offset_y;
        hive.grow();
        assert!((hive.scale.x - 0.525).abs() < 1e-6);
        assert!((hive.scale.y - 0.63).abs() < 1e-6);
        assert_eq!(hive.scale.x, hive.scale.z);
        assert!((before - hive.offset_y - 0.63 * 0.045).abs() < 1e-6);
    }

    #[test]
    fn test_fifteen_deliveries_fill_the_hive() {
        // 0.5 * 1.05^14 ~= 0.990 is still growing; the 15th pushes past 1
        let mut hive = hive();
        let mut last = hive.scale.x;
        for i in 0..15 {
            assert!(hive.is_growing(), "still growing before delivery {i}");
            hive.grow();
            assert!(hive.scale.x > last);
            assert_eq!(hive.scale.x, hive.scale.z);
            last = hive.scale.x;
            if i < 14 {
                assert_eq!(hive.refresh_phase(), None);
            }
        }
        assert!(hive.scale.x > 1.0);
        // Phase only flips when next evaluated
        assert_eq!(hive.phase, HivePhase::Growing);
        assert_eq!(hive.refresh_phase(), Some(HivePhase::Collapsing));
        assert_eq!(hive.refresh_phase(), None);
        assert_eq!(hive.phase, HivePhase::Collapsing);
    }

    #[test]
    fn test_collapse_sinks_then_deflates_then_stops() {
        let mut hive = hive();
        hive.phase = HivePhase::Collapsing;
        hive.scale = Vec3::new(1.01, 0.5, 1.01);

        let mut frames = 0;
        let mut saw_deflate = false;
        loop {
            let scale_before = hive.scale.y;
            match hive.collapse_step() {
                CollapseStage::Sinking => assert_eq!(hive.scale.y, scale_before),
                CollapseStage::Deflating => saw_deflate = true,
                CollapseStage::Inert => break,
            }
            frames += 1;
            assert!(frames < 200, "collapse must terminate");
        }

        assert!(saw_deflate);
        assert!(hive.scale.y <= 0.1);
        assert!(hive.is_inert());

        let settled = (hive.offset_y, hive.scale);
        assert_eq!(hive.collapse_step(), CollapseStage::Inert);
        assert_eq!((hive.offset_y, hive.scale), settled);
    }

    #[test]
    fn test_sync_pushes_transform() {
        use crate::sim::scene::RecordingScene;

        let tuning = Tuning::default();
        let mut scene = RecordingScene::new();
        let mut hive = Hive::spawn(&mut scene, &tuning);
        assert_eq!(scene.count(NodeKind::Connector), 1);

        hive.grow();
        hive.sync(&mut scene);
        let node = scene.get(hive.node).expect("hive node");
        assert_eq!(node.transform.scale, hive.scale);
        assert_eq!(node.transform.position, hive.position());
        assert_eq!(node.transform.position.x, tuning.hive_position.x);
    }
}
