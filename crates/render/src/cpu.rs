use splitcube_common::{Aabb, Ray, VolumeId};
use splitcube_kernel::{Pose, Volume, VolumePose};
use std::collections::{BTreeMap, HashMap};

use crate::adapter::SceneAdapter;
use crate::camera::Camera;

/// Brute-force scene adapter with no GPU behind it.
///
/// Keeps one axis-aligned box per registered volume and answers ray queries
/// with a linear slab test. Good enough for the CLI and for tests; a real
/// backend would keep its own acceleration structure.
#[derive(Debug, Default)]
pub struct CpuSceneAdapter {
    pub camera: Camera,
    boxes: BTreeMap<VolumeId, Aabb>,
    poses: HashMap<VolumeId, Pose>,
    syncs: usize,
}

impl CpuSceneAdapter {
    pub fn new(camera: Camera) -> Self {
        Self {
            camera,
            ..Default::default()
        }
    }

    /// Number of registered volumes.
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    pub fn contains(&self, id: VolumeId) -> bool {
        self.boxes.contains_key(&id)
    }

    /// How many times `sync` has been called.
    pub fn sync_count(&self) -> usize {
        self.syncs
    }

    pub fn pose(&self, id: VolumeId) -> Option<Pose> {
        self.poses.get(&id).copied()
    }
}

impl SceneAdapter for CpuSceneAdapter {
    fn intersect(&self, ray: &Ray) -> Option<VolumeId> {
        let mut best: Option<(f32, VolumeId)> = None;
        for (&id, bounds) in &self.boxes {
            let Some(t) = bounds.intersect_ray(ray) else {
                continue;
            };
            // Strict comparison keeps the lower id on ties.
            if best.is_none_or(|(best_t, _)| t < best_t) {
                best = Some((t, id));
            }
        }
        best.map(|(_, id)| id)
    }

    fn sync(&mut self, added: &[Volume], removed: &[VolumeId]) {
        for id in removed {
            self.boxes.remove(id);
            self.poses.remove(id);
        }
        for volume in added {
            self.boxes.insert(volume.id, volume.bounds());
            self.poses.insert(volume.id, volume.pose);
        }
        self.syncs += 1;
        tracing::trace!(
            added = added.len(),
            removed = removed.len(),
            total = self.boxes.len(),
            "scene sync"
        );
    }

    fn project_pointer(&self, screen_x: f32, screen_y: f32) -> Ray {
        self.camera.ray_from_screen(screen_x, screen_y)
    }

    fn apply_poses(&mut self, poses: &[VolumePose]) {
        for p in poses {
            if let Some(slot) = self.poses.get_mut(&p.id) {
                *slot = p.pose;
            }
        }
    }
}
