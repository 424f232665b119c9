//! Scene graph seam
//!
//! The simulation never renders. It creates, moves and removes opaque nodes
//! through [`SceneGraph`]; a host renderer decides what each [`NodeKind`]
//! looks like.

use std::collections::BTreeMap;

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Opaque handle to a visual node
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

/// What a node depicts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    Ground,
    Windmill,
    Trunk,
    Leaves,
    /// Upper rounded half of a cloud puff
    Puff,
    /// Flattened shadow copy beneath a puff
    PuffBase,
    Connector,
    Hive,
    Bee,
    Payload,
}

/// Node placement (rotation is Euler radians, XYZ)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub scale: Vec3,
    pub rotation: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            scale: Vec3::ONE,
            rotation: Vec3::ZERO,
        }
    }
}

impl Transform {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }
}

/// Consumed scene graph API
pub trait SceneGraph {
    fn add_node(&mut self, kind: NodeKind, transform: Transform) -> NodeId;
    fn remove_node(&mut self, id: NodeId);
    fn set_position(&mut self, id: NodeId, position: Vec3);
    fn set_scale(&mut self, id: NodeId, scale: Vec3);
    fn set_rotation(&mut self, id: NodeId, rotation: Vec3);
}

/// A live node in a [`RecordingScene`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneNode {
    pub kind: NodeKind,
    pub transform: Transform,
}

/// Change notification for a host renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SceneEvent {
    Added { id: NodeId, kind: NodeKind, transform: Transform },
    Removed { id: NodeId },
    Moved { id: NodeId, transform: Transform },
}

/// In-memory scene graph that keeps every node and logs changes.
///
/// Repeated updates to the same node within one drain window collapse into
/// a single `Moved` event.
#[derive(Debug, Default)]
pub struct RecordingScene {
    nodes: BTreeMap<NodeId, SceneNode>,
    events: Vec<SceneEvent>,
    /// Index into `events` of the latest `Added`/`Moved` for each node
    pending: BTreeMap<NodeId, usize>,
    next_id: u32,
}

impl RecordingScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of live nodes of a kind
    pub fn count(&self, kind: NodeKind) -> usize {
        self.nodes.values().filter(|n| n.kind == kind).count()
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &SceneNode)> {
        self.nodes.iter().map(|(id, node)| (*id, node))
    }

    /// Take all changes since the last drain
    pub fn drain_events(&mut self) -> Vec<SceneEvent> {
        self.pending.clear();
        std::mem::take(&mut self.events)
    }

    /// Serialize pending changes for a JS renderer and clear them
    pub fn drain_events_json(&mut self) -> serde_json::Result<String> {
        let events = self.drain_events();
        serde_json::to_string(&events)
    }

    fn update(&mut self, id: NodeId, apply: impl FnOnce(&mut Transform)) {
        let Some(node) = self.nodes.get_mut(&id) else {
            log::warn!("Update for unknown scene node {:?}", id);
            return;
        };
        apply(&mut node.transform);
        let transform = node.transform;

        match self.pending.get(&id).and_then(|&i| self.events.get_mut(i)) {
            Some(SceneEvent::Added { transform: t, .. } | SceneEvent::Moved { transform: t, .. }) => {
                *t = transform;
            }
            _ => {
                self.pending.insert(id, self.events.len());
                self.events.push(SceneEvent::Moved { id, transform });
            }
        }
    }
}

impl SceneGraph for RecordingScene {
    fn add_node(&mut self, kind: NodeKind, transform: Transform) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, SceneNode { kind, transform });
        self.pending.insert(id, self.events.len());
        self.events.push(SceneEvent::Added { id, kind, transform });
        id
    }

    fn remove_node(&mut self, id: NodeId) {
        if self.nodes.remove(&id).is_none() {
            return;
        }
        match self.pending.remove(&id) {
            // A move the host has not seen yet becomes the removal
            Some(index) if matches!(self.events[index], SceneEvent::Moved { .. }) => {
                self.events[index] = SceneEvent::Removed { id };
            }
            _ => self.events.push(SceneEvent::Removed { id }),
        }
    }

    fn set_position(&mut self, id: NodeId, position: Vec3) {
        self.update(id, |t| t.position = position);
    }

    fn set_scale(&mut self, id: NodeId, scale: Vec3) {
        self.update(id, |t| t.scale = scale);
    }

    fn set_rotation(&mut self, id: NodeId, rotation: Vec3) {
        self.update(id, |t| t.rotation = rotation);
    }
}
