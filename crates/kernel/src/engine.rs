use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use splitcube_common::{Timestamp, VolumeId};
use std::collections::HashSet;

use crate::config::{self, ConfigError, EngineConfig};
use crate::cooldown::CooldownLedger;
use crate::volume::{Pose, Volume, VolumeSet};

/// Hue of the seed volume (`#00ff88`, 152 degrees).
const SEED_HUE: f32 = 152.0 / 360.0;

/// An event record produced by every mutation of the volume set.
///
/// The log is how the scene adapter learns what changed; see
/// [`SubdivisionEngine::drain_scene_delta`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EngineEvent {
    /// A seed volume was created by `reset`.
    Seeded { volume: Volume },
    /// `parent` was replaced by `children`.
    Split {
        parent: VolumeId,
        children: Vec<Volume>,
    },
    /// The whole set was destroyed by `reset`.
    Cleared { removed: Vec<VolumeId> },
}

/// Incremental change set for a scene adapter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneDelta {
    pub added: Vec<Volume>,
    pub removed: Vec<VolumeId>,
}

impl SceneDelta {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Result of a split request. Only `Split` mutates anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitOutcome {
    Split {
        parent: VolumeId,
        children: [VolumeId; 8],
    },
    /// The volume is too small or too deep to split.
    Terminal,
    /// No active volume has this id.
    NotActive,
}

impl SplitOutcome {
    pub fn is_split(&self) -> bool {
        matches!(self, Self::Split { .. })
    }
}

/// Owner of the active volume set.
///
/// All mutations go through `reset` and `split`, each of which is atomic
/// with respect to the set: guards run before anything is touched, and the
/// children are fully built before the parent is removed.
///
/// Randomness (rotation velocity, hue jitter) comes from an injected `Rng`
/// so that a seeded engine is fully reproducible.
#[derive(Debug)]
pub struct SubdivisionEngine<R: Rng = StdRng> {
    config: EngineConfig,
    volumes: VolumeSet,
    cooldowns: CooldownLedger,
    next_id: u64,
    rng: R,
    /// Append-only until drained.
    event_log: Vec<EngineEvent>,
}

impl SubdivisionEngine<StdRng> {
    /// Engine seeded from the OS entropy source.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Engine with a fixed seed for reproducible runs.
    pub fn with_seed(config: EngineConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> SubdivisionEngine<R> {
    /// Validate `config` and create the seed volume at time zero.
    pub fn with_rng(config: EngineConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut engine = Self {
            config,
            volumes: VolumeSet::new(),
            cooldowns: CooldownLedger::new(),
            next_id: 0,
            rng,
            event_log: Vec::new(),
        };
        engine.reset(Timestamp::ZERO);
        Ok(engine)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn volumes(&self) -> &VolumeSet {
        &self.volumes
    }

    pub(crate) fn volumes_mut(&mut self) -> &mut VolumeSet {
        &mut self.volumes
    }

    pub fn volume_count(&self) -> usize {
        self.volumes.len()
    }

    pub fn get(&self, id: VolumeId) -> Option<&Volume> {
        self.volumes.get(id)
    }

    pub fn cooldowns(&self) -> &CooldownLedger {
        &self.cooldowns
    }

    pub fn cooldowns_mut(&mut self) -> &mut CooldownLedger {
        &mut self.cooldowns
    }

    /// Change the seed size used by future resets. The live set is untouched.
    pub fn set_base_size(&mut self, value: f32) -> Result<(), ConfigError> {
        config::check_base_size(value)?;
        self.config.base_size = value;
        Ok(())
    }

    pub fn set_sensitivity(&mut self, value: f32) -> Result<(), ConfigError> {
        config::check_sensitivity(value)?;
        self.config.sensitivity = value;
        Ok(())
    }

    /// Destroy every volume, forget all cooldowns and create a fresh seed
    /// at the origin with the configured base size.
    pub fn reset(&mut self, now: Timestamp) -> VolumeId {
        let removed = self.volumes.clear();
        self.cooldowns.clear();
        if !removed.is_empty() {
            self.event_log.push(EngineEvent::Cleared { removed });
        }

        let velocity = self.random_velocity(self.config.seed_spin);
        let seed = Volume {
            id: self.allocate_id(),
            center: Vec3::ZERO,
            size: self.config.base_size,
            generation: 0,
            rotation_velocity: velocity,
            created_at: now,
            hue: SEED_HUE,
            pose: Pose::default(),
        };
        let id = seed.id;
        tracing::debug!(%id, size = seed.size, "reset");
        self.volumes.insert(seed.clone());
        self.event_log.push(EngineEvent::Seeded { volume: seed });
        id
    }

    /// Replace `id` with its eight octant children.
    ///
    /// Unknown and terminal ids are ignored and leave the set unchanged.
    pub fn split(&mut self, id: VolumeId, now: Timestamp) -> SplitOutcome {
        let Some(parent) = self.volumes.get(id) else {
            tracing::debug!(%id, "split ignored: not active");
            return SplitOutcome::NotActive;
        };
        if parent.is_terminal(&self.config) {
            tracing::debug!(
                %id,
                size = parent.size,
                generation = parent.generation,
                "split ignored: terminal"
            );
            return SplitOutcome::Terminal;
        }

        let centers = parent.child_centers();
        let size = parent.size * 0.5;
        let generation = parent.generation + 1;

        let children: Vec<Volume> = centers
            .into_iter()
            .map(|center| self.make_child(center, size, generation, now))
            .collect();
        let ids: [VolumeId; 8] = std::array::from_fn(|i| children[i].id);

        self.volumes.remove(id);
        for child in &children {
            self.volumes.insert(child.clone());
        }
        tracing::debug!(%id, generation, size, count = self.volumes.len(), "split");
        self.event_log.push(EngineEvent::Split {
            parent: id,
            children,
        });

        SplitOutcome::Split {
            parent: id,
            children: ids,
        }
    }

    /// Split every non-terminal volume once. Returns the number of splits.
    pub fn split_all(&mut self, now: Timestamp) -> usize {
        let ids = self.volumes.splittable_ids(&self.config);
        ids.into_iter()
            .filter(|&id| self.split(id, now).is_split())
            .count()
    }

    /// Read-only access to pending events.
    pub fn events(&self) -> &[EngineEvent] {
        &self.event_log
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.event_log)
    }

    /// Drain the log into a single delta. A volume created and destroyed
    /// within the same delta appears in neither list.
    pub fn drain_scene_delta(&mut self) -> SceneDelta {
        let mut delta = SceneDelta::default();
        for event in self.drain_events() {
            match event {
                EngineEvent::Seeded { volume } => delta.added.push(volume),
                EngineEvent::Split { parent, children } => {
                    delta.removed.push(parent);
                    delta.added.extend(children);
                }
                EngineEvent::Cleared { removed } => delta.removed.extend(removed),
            }
        }

        let added: HashSet<VolumeId> = delta.added.iter().map(|v| v.id).collect();
        let transient: HashSet<VolumeId> = delta
            .removed
            .iter()
            .copied()
            .filter(|id| added.contains(id))
            .collect();
        if !transient.is_empty() {
            delta.added.retain(|v| !transient.contains(&v.id));
            delta.removed.retain(|id| !transient.contains(id));
        }
        delta
    }

    fn make_child(&mut self, center: Vec3, size: f32, generation: u32, now: Timestamp) -> Volume {
        let rotation_velocity = self.random_velocity(self.config.child_spin);
        let jitter: f32 = self.rng.random();
        let hue = (generation as f32 * self.config.hue_step + jitter * self.config.hue_jitter)
            .rem_euclid(1.0);
        Volume {
            id: self.allocate_id(),
            center,
            size,
            generation,
            rotation_velocity,
            created_at: now,
            hue,
            pose: Pose::default(),
        }
    }

    /// Each axis uniform in `[-spin / 2, spin / 2)`.
    fn random_velocity(&mut self, spin: f32) -> Vec3 {
        let mut axis = || (self.rng.random::<f32>() - 0.5) * spin;
        Vec3::new(axis(), axis(), axis())
    }

    fn allocate_id(&mut self) -> VolumeId {
        self.next_id += 1;
        VolumeId(self.next_id)
    }
}
