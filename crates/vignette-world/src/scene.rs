//! Scene host boundary
//!
//! The world core decides which renderables exist, where they sit, and how their
//! transforms change. Whatever draws them implements [`SceneHost`]. [`SceneGraph`] is
//! the in-memory host used by the headless driver and the tests.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::trace;
use vignette_core::{EntityId, Transform};

use crate::chunk::ChunkCoord;
use crate::content::{GrassBatch, RockInstance, TreeInstance};

/// What a scene node draws
#[derive(Debug, Clone)]
pub enum Renderable {
    /// Plain grouping node
    Group,
    /// Root of one streamed chunk
    Chunk(ChunkCoord),
    /// Wind-reactive grass line segments, shared with the generator output
    Grass(Arc<GrassBatch>),
    Rock(RockInstance),
    Tree(TreeInstance),
    Sun,
    Moon,
    SkyDome,
    StarField,
    Ground,
    /// The landmark statue; its geometry is built elsewhere
    Landmark,
}

/// A node to attach to a scene host
#[derive(Debug, Clone)]
pub struct SceneNode {
    pub renderable: Renderable,
    pub transform: Transform,
}

impl SceneNode {
    pub fn new(renderable: Renderable, transform: Transform) -> Self {
        Self {
            renderable,
            transform,
        }
    }

    pub fn group() -> Self {
        Self::new(Renderable::Group, Transform::default())
    }
}

/// Receiver of scene mutations from the world core
pub trait SceneHost {
    /// Attach a node under `parent` (or at the scene root) and return its id
    fn attach(&mut self, parent: Option<EntityId>, node: SceneNode) -> EntityId;

    /// Detach a node and everything below it
    fn detach(&mut self, id: EntityId);

    /// Replace a node's local transform
    fn set_transform(&mut self, id: EntityId, transform: Transform);
}

#[derive(Debug)]
struct SceneEntry {
    node: SceneNode,
    parent: Option<EntityId>,
    children: Vec<EntityId>,
}

/// In-memory scene tree
#[derive(Debug, Default)]
pub struct SceneGraph {
    entries: HashMap<EntityId, SceneEntry>,
    roots: Vec<EntityId>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of attached nodes
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn node(&self, id: EntityId) -> Option<&SceneNode> {
        self.entries.get(&id).map(|e| &e.node)
    }

    pub fn parent(&self, id: EntityId) -> Option<EntityId> {
        self.entries.get(&id).and_then(|e| e.parent)
    }

    pub fn children(&self, id: EntityId) -> &[EntityId] {
        self.entries
            .get(&id)
            .map(|e| e.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn roots(&self) -> &[EntityId] {
        &self.roots
    }

    /// Count nodes whose renderable matches the predicate
    pub fn count(&self, predicate: impl Fn(&Renderable) -> bool) -> usize {
        self.entries
            .values()
            .filter(|e| predicate(&e.node.renderable))
            .count()
    }

    /// Iterate all nodes
    pub fn nodes(&self) -> impl Iterator<Item = (EntityId, &SceneNode)> {
        self.entries.iter().map(|(id, e)| (*id, &e.node))
    }

    /// Compose transforms from the root down to `id`
    pub fn world_transform(&self, id: EntityId) -> Option<glam::Mat4> {
        let entry = self.entries.get(&id)?;
        let local = entry.node.transform.matrix();
        match entry.parent {
            Some(parent) => Some(self.world_transform(parent)? * local),
            None => Some(local),
        }
    }

    fn remove_recursive(&mut self, id: EntityId) {
        if let Some(entry) = self.entries.remove(&id) {
            for child in entry.children {
                self.remove_recursive(child);
            }
        }
    }
}

impl SceneHost for SceneGraph {
    fn attach(&mut self, parent: Option<EntityId>, node: SceneNode) -> EntityId {
        let id = EntityId::new();
        let parent = parent.filter(|p| self.entries.contains_key(p));
        match parent {
            Some(p) => {
                if let Some(entry) = self.entries.get_mut(&p) {
                    entry.children.push(id);
                }
            }
            None => self.roots.push(id),
        }
        self.entries.insert(
            id,
            SceneEntry {
                node,
                parent,
                children: Vec::new(),
            },
        );
        id
    }

    fn detach(&mut self, id: EntityId) {
        let Some(parent) = self.entries.get(&id).map(|e| e.parent) else {
            trace!("detach of unknown node {:?}", id);
            return;
        };
        match parent {
            Some(p) => {
                if let Some(entry) = self.entries.get_mut(&p) {
                    entry.children.retain(|c| *c != id);
                }
            }
            None => self.roots.retain(|r| *r != id),
        }
        self.remove_recursive(id);
    }

    fn set_transform(&mut self, id: EntityId, transform: Transform) {
        match self.entries.get_mut(&id) {
            Some(entry) => entry.node.transform = transform,
            None => trace!("set_transform on unknown node {:?}", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_attach_and_detach_subtree() {
        let mut scene = SceneGraph::new();
        let root = scene.attach(None, SceneNode::group());
        let child = scene.attach(Some(root), SceneNode::group());
        let grandchild = scene.attach(Some(child), SceneNode::new(Renderable::Sun, Transform::default()));
        let other = scene.attach(None, SceneNode::new(Renderable::Ground, Transform::default()));

        assert_eq!(scene.len(), 4);
        assert_eq!(scene.children(root), &[child]);
        assert_eq!(scene.parent(grandchild), Some(child));

        scene.detach(child);
        assert_eq!(scene.len(), 2);
        assert!(!scene.contains(grandchild));
        assert!(scene.children(root).is_empty());
        assert_eq!(scene.roots(), &[root, other]);
    }

    #[test]
    fn test_world_transform_composes_parents() {
        let mut scene = SceneGraph::new();
        let parent = scene.attach(
            None,
            SceneNode::new(Renderable::Group, Transform::from_position(Vec3::new(60.0, 0.0, 0.0))),
        );
        let child = scene.attach(
            Some(parent),
            SceneNode::new(Renderable::Group, Transform::from_position(Vec3::new(1.0, 2.0, 3.0))),
        );
        let world = scene.world_transform(child).unwrap();
        assert_eq!(world.col(3).truncate(), Vec3::new(61.0, 2.0, 3.0));
    }

    #[test]
    fn test_unknown_ids_are_ignored() {
        let mut scene = SceneGraph::new();
        let ghost = EntityId::new();
        scene.detach(ghost);
        scene.set_transform(ghost, Transform::default());
        assert!(scene.is_empty());
    }

    #[test]
    fn test_attach_under_missing_parent_goes_to_root() {
        let mut scene = SceneGraph::new();
        let id = scene.attach(Some(EntityId::new()), SceneNode::group());
        assert_eq!(scene.roots(), &[id]);
        assert_eq!(scene.parent(id), None);
    }
}
