use rand::Rng;
use rand::rngs::StdRng;
use splitcube_common::Timestamp;
use splitcube_kernel::{Animator, ConfigError, SubdivisionEngine};
use splitcube_render::SceneAdapter;

use crate::mode::InteractionMode;
use crate::pointer::PointerEvent;
use crate::resolver::{HitOutcome, InteractionResolver};

/// Host-facing surface: owns the engine, the resolver, the animator and the
/// scene adapter, and keeps the adapter in step with the engine.
///
/// Every method runs to completion before returning, so pointer handling,
/// animation ticks and resets never interleave mid-mutation.
pub struct Controller<A: SceneAdapter, R: Rng = StdRng> {
    engine: SubdivisionEngine<R>,
    resolver: InteractionResolver,
    animator: Animator,
    adapter: A,
}

impl<A: SceneAdapter, R: Rng> Controller<A, R> {
    /// Wrap an engine and push its current volumes to `adapter`.
    pub fn new(engine: SubdivisionEngine<R>, adapter: A) -> Self {
        let mut controller = Self {
            engine,
            resolver: InteractionResolver::default(),
            animator: Animator::new(),
            adapter,
        };
        controller.flush();
        controller
    }

    pub fn engine(&self) -> &SubdivisionEngine<R> {
        &self.engine
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub fn adapter_mut(&mut self) -> &mut A {
        &mut self.adapter
    }

    pub fn resolver(&self) -> &InteractionResolver {
        &self.resolver
    }

    pub fn animator(&self) -> &Animator {
        &self.animator
    }

    pub fn mode(&self) -> InteractionMode {
        self.resolver.mode()
    }

    /// Set the mode by name. Unknown names are rejected and the current mode
    /// is kept.
    pub fn set_mode(&mut self, mode: &str) -> Result<(), ConfigError> {
        let mode = mode
            .parse::<InteractionMode>()
            .inspect_err(|e| tracing::warn!(%e, "rejected interaction mode"))?;
        self.set_mode_kind(mode);
        Ok(())
    }

    pub fn set_mode_kind(&mut self, mode: InteractionMode) {
        self.resolver.set_mode(mode);
    }

    pub fn set_sensitivity(&mut self, value: f32) -> Result<(), ConfigError> {
        self.engine
            .set_sensitivity(value)
            .inspect_err(|e| tracing::warn!(%e, "rejected sensitivity"))
    }

    /// Takes effect on the next `reset`.
    pub fn set_base_size(&mut self, value: f32) -> Result<(), ConfigError> {
        self.engine
            .set_base_size(value)
            .inspect_err(|e| tracing::warn!(%e, "rejected base size"))
    }

    pub fn reset(&mut self, now: Timestamp) {
        self.engine.reset(now);
        self.flush();
    }

    pub fn handle_pointer(&mut self, event: PointerEvent, now: Timestamp) -> HitOutcome {
        let _span = tracing::trace_span!("pointer", mode = %self.resolver.mode()).entered();
        let outcome = self
            .resolver
            .handle(event, &mut self.engine, &self.adapter, now);
        if outcome.is_split() {
            self.flush();
        }
        outcome
    }

    /// Advance animation by one frame and hand the poses to the adapter.
    pub fn tick(&mut self, now: Timestamp) {
        let poses = self.animator.step(&mut self.engine, now);
        self.adapter.apply_poses(&poses);
    }

    fn flush(&mut self) {
        let delta = self.engine.drain_scene_delta();
        if !delta.is_empty() {
            self.adapter.sync(&delta.added, &delta.removed);
        }
    }
}
