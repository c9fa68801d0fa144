//! Scripted scene adapter for unit tests.

use glam::Vec3;
use splitcube_common::{Ray, VolumeId};
use splitcube_kernel::{Volume, VolumePose};
use splitcube_render::SceneAdapter;
use std::collections::BTreeSet;

/// Returns whatever `next_hit` says, provided the id is registered, and
/// records every sync.
#[derive(Debug, Default)]
pub struct FakeAdapter {
    pub next_hit: Option<VolumeId>,
    pub registered: BTreeSet<VolumeId>,
    pub syncs: Vec<(usize, Vec<VolumeId>)>,
    pub pose_batches: usize,
    /// Ignore registration and return `next_hit` verbatim (stale adapter).
    pub stale: bool,
}

impl FakeAdapter {
    pub fn aim(&mut self, id: VolumeId) {
        self.next_hit = Some(id);
    }
}

impl SceneAdapter for FakeAdapter {
    fn intersect(&self, _ray: &Ray) -> Option<VolumeId> {
        let id = self.next_hit?;
        (self.stale || self.registered.contains(&id)).then_some(id)
    }

    fn sync(&mut self, added: &[Volume], removed: &[VolumeId]) {
        for id in removed {
            self.registered.remove(id);
        }
        for v in added {
            self.registered.insert(v.id);
        }
        self.syncs.push((added.len(), removed.to_vec()));
    }

    fn project_pointer(&self, screen_x: f32, screen_y: f32) -> Ray {
        Ray::new(Vec3::new(screen_x, screen_y, 100.0), Vec3::NEG_Z)
    }

    fn apply_poses(&mut self, _poses: &[VolumePose]) {
        self.pose_batches += 1;
    }
}
