use glam::Vec3;
use serde::{Deserialize, Serialize};
use splitcube_common::{Aabb, Timestamp, VolumeId};
use std::collections::BTreeMap;

use crate::config::EngineConfig;

/// Saturation and lightness every volume is drawn with.
const SATURATION: f32 = 0.8;
const LIGHTNESS: f32 = 0.5;
/// Lightness offset for the emissive tint.
const EMISSIVE_SHIFT: f32 = -0.3;

/// Cosmetic animation state. Never consulted by hit-testing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// Cumulative Euler rotation in radians.
    pub rotation: Vec3,
    /// Vertical offset applied on top of the logical center when drawn.
    pub bob_offset: f32,
}

/// One cube tracked by the engine.
///
/// Everything except `pose` is fixed at creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Volume {
    pub id: VolumeId,
    pub center: Vec3,
    /// Edge length, always positive.
    pub size: f32,
    /// Number of splits separating this volume from the seed.
    pub generation: u32,
    /// Radians per tick on each axis.
    pub rotation_velocity: Vec3,
    pub created_at: Timestamp,
    /// Hue in `[0, 1)`.
    pub hue: f32,
    pub pose: Pose,
}

impl Volume {
    pub fn bounds(&self) -> Aabb {
        Aabb::cube(self.center, self.size)
    }

    pub fn is_terminal(&self, config: &EngineConfig) -> bool {
        config.is_terminal(self.size, self.generation)
    }

    /// Center the renderer should draw at, including the bob offset.
    pub fn rendered_center(&self) -> Vec3 {
        self.center + Vec3::Y * self.pose.bob_offset
    }

    /// Linear RGB from the volume's hue.
    pub fn color(&self) -> [f32; 3] {
        hsl_to_rgb(self.hue, SATURATION, LIGHTNESS)
    }

    pub fn emissive(&self) -> [f32; 3] {
        hsl_to_rgb(self.hue, SATURATION, LIGHTNESS + EMISSIVE_SHIFT)
    }

    /// Centers of the eight octants, x-major then y then z, negative first.
    pub fn child_centers(&self) -> [Vec3; 8] {
        let offset = self.size * 0.25;
        let mut out = [Vec3::ZERO; 8];
        let mut i = 0;
        for sx in [-1.0, 1.0] {
            for sy in [-1.0, 1.0] {
                for sz in [-1.0, 1.0] {
                    out[i] = self.center + Vec3::new(sx, sy, sz) * offset;
                    i += 1;
                }
            }
        }
        out
    }
}

/// Standard HSL to RGB conversion, all channels in `[0, 1]`.
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> [f32; 3] {
    let l = l.clamp(0.0, 1.0);
    if s <= 0.0 {
        return [l, l, l];
    }
    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    let channel = |t: f32| {
        let t = t.rem_euclid(1.0);
        if t < 1.0 / 6.0 {
            p + (q - p) * 6.0 * t
        } else if t < 0.5 {
            q
        } else if t < 2.0 / 3.0 {
            p + (q - p) * (2.0 / 3.0 - t) * 6.0
        } else {
            p
        }
    };
    [channel(h + 1.0 / 3.0), channel(h), channel(h - 1.0 / 3.0)]
}

/// The active volume set.
///
/// Keyed by id in a BTreeMap. Ids are allocated monotonically, so iteration
/// order is creation order, which the animator uses as the bob phase index.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VolumeSet {
    volumes: BTreeMap<VolumeId, Volume>,
}

impl VolumeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.volumes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.volumes.is_empty()
    }

    pub fn contains(&self, id: VolumeId) -> bool {
        self.volumes.contains_key(&id)
    }

    pub fn get(&self, id: VolumeId) -> Option<&Volume> {
        self.volumes.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Volume> {
        self.volumes.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = VolumeId> + '_ {
        self.volumes.keys().copied()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Volume> {
        self.volumes.values_mut()
    }

    /// Insert a volume. Returns false if its id is already present.
    pub(crate) fn insert(&mut self, volume: Volume) -> bool {
        if self.volumes.contains_key(&volume.id) {
            return false;
        }
        self.volumes.insert(volume.id, volume);
        true
    }

    pub(crate) fn remove(&mut self, id: VolumeId) -> Option<Volume> {
        self.volumes.remove(&id)
    }

    /// Remove everything, returning the ids that were active.
    pub(crate) fn clear(&mut self) -> Vec<VolumeId> {
        let ids = self.volumes.keys().copied().collect();
        self.volumes.clear();
        ids
    }

    /// Count of active volumes per generation, index = generation.
    pub fn generation_histogram(&self) -> Vec<usize> {
        let mut hist = Vec::new();
        for v in self.volumes.values() {
            let g = v.generation as usize;
            if hist.len() <= g {
                hist.resize(g + 1, 0);
            }
            hist[g] += 1;
        }
        hist
    }

    pub fn terminal_count(&self, config: &EngineConfig) -> usize {
        self.volumes
            .values()
            .filter(|v| v.is_terminal(config))
            .count()
    }

    /// Ids of every volume that may still split.
    pub fn splittable_ids(&self, config: &EngineConfig) -> Vec<VolumeId> {
        self.volumes
            .values()
            .filter(|v| !v.is_terminal(config))
            .map(|v| v.id)
            .collect()
    }
}
