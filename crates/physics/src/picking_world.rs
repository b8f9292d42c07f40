//! Collider storage for ray picking.

use glam::Vec3;
use rapier3d::prelude::*;

/// Set of pickable spheres plus the query pipeline used to ray cast against them.
///
/// There is no simulation: colliders are moved explicitly with
/// [`PickingWorld::set_position`] and the query pipeline is rebuilt with
/// [`PickingWorld::refresh`] before casting.
pub struct PickingWorld {
    /// Always empty; the query API needs a body set to resolve collider parents.
    pub rigid_body_set: RigidBodySet,
    pub collider_set: ColliderSet,
    pub query_pipeline: QueryPipeline,
    /// Collider handle per pick index.
    handles: Vec<ColliderHandle>,
    /// Set when a collider moved since the last refresh.
    stale: bool,
}

impl Default for PickingWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PickingWorld {
    pub fn new() -> Self {
        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            query_pipeline: QueryPipeline::new(),
            handles: Vec::new(),
            stale: false,
        }
    }

    /// Add a pickable sphere and return its pick index. Indices are assigned
    /// sequentially from zero in insertion order.
    pub fn add_sphere(&mut self, position: Vec3, radius: f32) -> usize {
        let index = self.handles.len();
        let collider = ColliderBuilder::ball(radius)
            .translation(vector![position.x, position.y, position.z])
            .user_data(index as u128)
            .build();
        let handle = self.collider_set.insert(collider);
        self.handles.push(handle);
        self.stale = true;
        index
    }

    /// Move the sphere with the given pick index.
    pub fn set_position(&mut self, index: usize, position: Vec3) {
        let Some(handle) = self.handles.get(index) else {
            log::warn!("set_position on unknown pick index {}", index);
            return;
        };
        if let Some(collider) = self.collider_set.get_mut(*handle) {
            collider.set_translation(vector![position.x, position.y, position.z]);
            self.stale = true;
        }
    }

    /// Rebuild the query pipeline if anything moved since the last refresh.
    pub fn refresh(&mut self) {
        if self.stale {
            self.query_pipeline.update(&self.collider_set);
            self.stale = false;
        }
    }

    /// Number of pickable spheres.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Pick index stored on a collider.
    pub(crate) fn index_of(&self, handle: ColliderHandle) -> Option<usize> {
        self.collider_set.get(handle).map(|c| c.user_data as usize)
    }
}
