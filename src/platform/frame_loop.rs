//! Frame loop driven by the host's frame callback
//!
//! The host calls [`FrameLoop::on_frame`] once per display refresh and
//! re-registers for the next callback while it returns `true`. Stopping is
//! just declining to re-register.

use crate::error::SimError;
use crate::settings::Settings;
use crate::sim::{SceneGraph, SimulationState, tick};

use super::time::FrameClock;

/// Frames between periodic summary log lines
const SUMMARY_INTERVAL_FRAMES: u64 = 600;

pub struct FrameLoop<S: SceneGraph> {
    pub state: SimulationState,
    pub scene: S,
    clock: FrameClock,
    running: bool,
}

impl<S: SceneGraph> FrameLoop<S> {
    /// Populate the meadow into `scene` and get ready for the first frame
    pub fn new(seed: u64, settings: &Settings, mut scene: S) -> Result<Self, SimError> {
        let state = SimulationState::new(seed, settings.tuning.clone(), &mut scene)?;
        Ok(Self {
            state,
            scene,
            clock: FrameClock::new(),
            running: true,
        })
    }

    /// Run exactly one tick for this frame. Returns whether the host should
    /// schedule another.
    pub fn on_frame(&mut self, timestamp_ms: f64) -> bool {
        if !self.running {
            return false;
        }
        let elapsed = self.clock.sample(timestamp_ms);
        tick(&mut self.state, &mut self.scene, elapsed);

        if self.clock.frames() % SUMMARY_INTERVAL_FRAMES == 0 {
            self.log_summary();
        }
        true
    }

    /// Stop re-scheduling after the current frame
    pub fn stop(&mut self) {
        if self.running {
            log::info!("Frame loop stopped after {} frames", self.clock.frames());
        }
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn frames(&self) -> u64 {
        self.clock.frames()
    }

    pub fn log_summary(&self) {
        let state = &self.state;
        log::info!(
            "t={:.1}s bees={} carrying={} hive={:?} scale=({:.3}, {:.3}) speed={:.4}",
            state.clock.elapsed_secs,
            state.swarm.bees.len(),
            state.swarm.carrying(),
            state.hive.phase,
            state.hive.scale.x,
            state.hive.scale.y,
            state.swarm.speed,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{NodeKind, RecordingScene, SceneEvent};
    use crate::tuning::Tuning;

    fn settings() -> Settings {
        Settings {
            tuning: Tuning {
                tree_count: 10,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_one_tick_per_frame() {
        let mut frame_loop = FrameLoop::new(3, &settings(), RecordingScene::new()).unwrap();
        // Large gap between timestamps still advances a single tick
        assert!(frame_loop.on_frame(16.0));
        assert!(frame_loop.on_frame(10_000.0));
        assert_eq!(frame_loop.state.clock.frame, 2);
        assert_eq!(frame_loop.state.swarm.bees.len(), 1);
        assert_eq!(frame_loop.frames(), 2);
    }

    #[test]
    fn test_backwards_timestamp_holds_sim_time() {
        let mut frame_loop = FrameLoop::new(3, &settings(), RecordingScene::new()).unwrap();
        frame_loop.on_frame(2000.0);
        frame_loop.on_frame(1500.0);
        assert_eq!(frame_loop.state.clock.elapsed_secs, 2.0);
        assert_eq!(frame_loop.state.clock.frame, 2);
    }

    #[test]
    fn test_stop_ends_rescheduling() {
        let mut frame_loop = FrameLoop::new(3, &settings(), RecordingScene::new()).unwrap();
        assert!(frame_loop.on_frame(0.0));
        frame_loop.stop();
        assert!(!frame_loop.is_running());
        assert!(!frame_loop.on_frame(16.0));
        assert_eq!(frame_loop.state.clock.frame, 1);
    }

    #[test]
    fn test_scene_events_flow_to_host() {
        let mut frame_loop = FrameLoop::new(3, &settings(), RecordingScene::new()).unwrap();
        let setup = frame_loop.scene.drain_events();
        assert!(setup.iter().all(|e| matches!(e, SceneEvent::Added { .. })));

        frame_loop.on_frame(1000.0);
        let events = frame_loop.scene.drain_events();
        assert!(events.iter().any(|e| matches!(
            e,
            SceneEvent::Added { kind: NodeKind::Bee, .. }
        )));
        assert!(events.iter().any(|e| matches!(e, SceneEvent::Moved { .. })));
    }
}
