use rand::Rng;
use serde::{Deserialize, Serialize};
use splitcube_common::{Timestamp, VolumeId};

use crate::engine::SubdivisionEngine;
use crate::volume::Pose;

/// Pose of one volume after an animation tick, for the scene adapter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumePose {
    pub id: VolumeId,
    pub pose: Pose,
}

/// Per-frame rotation and bob.
///
/// Rotation advances by each volume's velocity once per tick, so spin speed
/// follows the frame rate. The bob is recomputed from `now` every tick and
/// never accumulates. Neither touches `Volume::center`.
#[derive(Debug, Clone, Default)]
pub struct Animator {
    ticks: u64,
}

impl Animator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of ticks applied so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn step<R: Rng>(
        &mut self,
        engine: &mut SubdivisionEngine<R>,
        now: Timestamp,
    ) -> Vec<VolumePose> {
        let _span = tracing::trace_span!("animate", tick = self.ticks).entered();
        self.ticks += 1;

        let amplitude = engine.config().bob_amplitude;
        let phase = now.as_secs_f64() * f64::from(engine.config().bob_frequency);

        engine
            .volumes_mut()
            .iter_mut()
            .enumerate()
            .map(|(index, volume)| {
                volume.pose.rotation += volume.rotation_velocity;
                volume.pose.bob_offset = amplitude * (phase + index as f64).sin() as f32;
                VolumePose {
                    id: volume.id,
                    pose: volume.pose,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use glam::Vec3;

    fn engine() -> SubdivisionEngine {
        SubdivisionEngine::with_seed(EngineConfig::default(), 11).unwrap()
    }

    #[test]
    fn rotation_accumulates_per_tick() {
        let mut e = engine();
        let id = e.volumes().ids().next().unwrap();
        let velocity = e.get(id).unwrap().rotation_velocity;
        let mut animator = Animator::new();
        for i in 0..10 {
            animator.step(&mut e, Timestamp(i * 16));
        }
        let rotation = e.get(id).unwrap().pose.rotation;
        assert!((rotation - velocity * 10.0).abs().max_element() < 1e-5);
        assert_eq!(animator.ticks(), 10);
    }

    #[test]
    fn bob_follows_phase_index_and_leaves_center_alone() {
        let mut e = engine();
        let seed = e.volumes().ids().next().unwrap();
        e.split(seed, Timestamp(0));
        let centers: Vec<Vec3> = e.volumes().iter().map(|v| v.center).collect();

        let now = Timestamp(1_500);
        let poses = Animator::new().step(&mut e, now);
        assert_eq!(poses.len(), 8);

        let amplitude = e.config().bob_amplitude;
        for (index, pose) in poses.iter().enumerate() {
            let expected = amplitude * (1.5 + index as f32).sin();
            assert!((pose.pose.bob_offset - expected).abs() < 1e-6);
        }
        let after: Vec<Vec3> = e.volumes().iter().map(|v| v.center).collect();
        assert_eq!(centers, after);
    }

    #[test]
    fn bob_does_not_drift() {
        let mut e = engine();
        let id = e.volumes().ids().next().unwrap();
        let mut animator = Animator::new();
        animator.step(&mut e, Timestamp(2_000));
        let first = e.get(id).unwrap().pose.bob_offset;
        for _ in 0..100 {
            animator.step(&mut e, Timestamp(5_000));
        }
        animator.step(&mut e, Timestamp(2_000));
        assert_eq!(e.get(id).unwrap().pose.bob_offset, first);
    }

    #[test]
    fn bob_keeps_moving_with_epoch_clock() {
        let mut e = engine();
        let id = e.volumes().ids().next().unwrap();
        let mut animator = Animator::new();
        let start = 1_700_000_000_000u64;

        animator.step(&mut e, Timestamp(start));
        let b0 = e.get(id).unwrap().pose.bob_offset;
        animator.step(&mut e, Timestamp(start + 500));
        let b1 = e.get(id).unwrap().pose.bob_offset;

        let amplitude = e.config().bob_amplitude;
        let expected = |ms: u64| amplitude * ((ms as f64 * 0.001).sin() as f32);
        assert!((b0 - expected(start)).abs() < 1e-4, "{b0}");
        assert!((b1 - expected(start + 500)).abs() < 1e-4, "{b1}");
        assert_ne!(b0, b1);
    }

    #[test]
    fn seed_has_no_bob_at_time_zero() {
        let mut e = engine();
        let poses = Animator::new().step(&mut e, Timestamp(0));
        assert_eq!(poses.len(), e.volume_count());
        assert_eq!(poses[0].pose.bob_offset, 0.0);
    }
}
