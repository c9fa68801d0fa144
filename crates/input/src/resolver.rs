use glam::Vec2;
use rand::Rng;
use splitcube_common::{Timestamp, VolumeId};
use splitcube_kernel::{SplitOutcome, SubdivisionEngine};
use splitcube_render::SceneAdapter;

use crate::mode::InteractionMode;
use crate::pointer::PointerEvent;

/// What a forwarded pointer event amounted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// The current mode does not resolve this kind of event.
    Ignored,
    /// The ray hit nothing.
    Miss,
    /// The hit volume is inside its debounce window.
    Debounced(VolumeId),
    Split {
        parent: VolumeId,
        children: [VolumeId; 8],
    },
    /// The hit volume can no longer split.
    Terminal(VolumeId),
    /// The adapter reported an id the engine no longer holds.
    NotActive(VolumeId),
}

impl HitOutcome {
    pub fn is_split(&self) -> bool {
        matches!(self, Self::Split { .. })
    }
}

/// Turns pointer events into split requests.
///
/// Hits are debounced per volume id through the engine's cooldown ledger, so
/// many distinct volumes can split in quick succession while repeated events
/// over one volume collapse into a single split.
///
/// Children inherit their parent's accepted interaction time, which keeps
/// the volume that appears under a stationary pointer from splitting on the
/// very next event. This departs from a ledger that only stamps the hit id:
/// after a split, all eight children stay debounced for one window.
#[derive(Debug, Clone, Default)]
pub struct InteractionResolver {
    mode: InteractionMode,
    pressed: bool,
    last_position: Option<Vec2>,
    velocity: Vec2,
}

impl InteractionResolver {
    pub fn new(mode: InteractionMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    /// Switch modes. Any half-finished click is dropped.
    pub fn set_mode(&mut self, mode: InteractionMode) {
        if mode != self.mode {
            tracing::debug!(from = %self.mode, to = %mode, "interaction mode changed");
        }
        self.mode = mode;
        self.pressed = false;
    }

    /// Pointer displacement between the last two events, in pixels.
    pub fn pointer_velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn handle<A, R>(
        &mut self,
        event: PointerEvent,
        engine: &mut SubdivisionEngine<R>,
        adapter: &A,
        now: Timestamp,
    ) -> HitOutcome
    where
        A: SceneAdapter + ?Sized,
        R: Rng,
    {
        let position = event.position();
        if let Some(last) = self.last_position {
            self.velocity = position - last;
        }
        self.last_position = Some(position);

        if !self.triggers(event) {
            return HitOutcome::Ignored;
        }

        let ray = adapter.project_pointer(position.x, position.y);
        let Some(id) = adapter.intersect(&ray) else {
            return HitOutcome::Miss;
        };

        let window = engine.config().debounce_window();
        if engine.cooldowns().is_on_cooldown(id, now, window) {
            tracing::trace!(%id, "hit debounced");
            return HitOutcome::Debounced(id);
        }
        engine.cooldowns_mut().record_interaction(id, now);

        match engine.split(id, now) {
            SplitOutcome::Split { parent, children } => {
                let ledger = engine.cooldowns_mut();
                for child in children {
                    ledger.record_interaction(child, now);
                }
                HitOutcome::Split { parent, children }
            }
            SplitOutcome::Terminal => HitOutcome::Terminal(id),
            SplitOutcome::NotActive => HitOutcome::NotActive(id),
        }
    }

    /// Whether `event` should be hit-tested in the current mode.
    fn triggers(&mut self, event: PointerEvent) -> bool {
        match (self.mode, event) {
            (InteractionMode::Click, PointerEvent::Down { .. }) => {
                self.pressed = true;
                false
            }
            (InteractionMode::Click, PointerEvent::Up { .. }) => std::mem::take(&mut self.pressed),
            (InteractionMode::Click, PointerEvent::Move { .. }) => false,
            (InteractionMode::Hover | InteractionMode::Motion, PointerEvent::Move { .. }) => true,
            (InteractionMode::Hover | InteractionMode::Motion, _) => {
                self.pressed = false;
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeAdapter;
    use splitcube_kernel::{EngineConfig, SubdivisionEngine};

    fn setup() -> (SubdivisionEngine, FakeAdapter, VolumeId) {
        let mut engine = SubdivisionEngine::with_seed(EngineConfig::default(), 9).unwrap();
        let mut adapter = FakeAdapter::default();
        let delta = engine.drain_scene_delta();
        adapter.sync(&delta.added, &delta.removed);
        let seed = engine.volumes().ids().next().unwrap();
        (engine, adapter, seed)
    }

    fn sync(engine: &mut SubdivisionEngine, adapter: &mut FakeAdapter) {
        let delta = engine.drain_scene_delta();
        adapter.sync(&delta.added, &delta.removed);
    }

    fn click(
        r: &mut InteractionResolver,
        e: &mut SubdivisionEngine,
        a: &FakeAdapter,
        ms: u64,
    ) -> HitOutcome {
        let t = Timestamp(ms);
        assert_eq!(r.handle(PointerEvent::Down { x: 1.0, y: 1.0 }, e, a, t), HitOutcome::Ignored);
        r.handle(PointerEvent::Up { x: 1.0, y: 1.0 }, e, a, t)
    }

    const MOVE: PointerEvent = PointerEvent::Move { x: 2.0, y: 2.0 };

    #[test]
    fn click_requires_press_and_release() {
        let (mut e, mut a, seed) = setup();
        a.aim(seed);
        let mut r = InteractionResolver::new(InteractionMode::Click);

        let up = PointerEvent::Up { x: 0.0, y: 0.0 };
        assert_eq!(r.handle(up, &mut e, &a, Timestamp(0)), HitOutcome::Ignored);
        assert_eq!(r.handle(MOVE, &mut e, &a, Timestamp(0)), HitOutcome::Ignored);
        assert!(e.cooldowns().is_empty());

        assert!(click(&mut r, &mut e, &a, 0).is_split());
        assert_eq!(e.volume_count(), 8);
    }

    #[test]
    fn hover_resolves_moves_only() {
        let (mut e, mut a, seed) = setup();
        a.aim(seed);
        let mut r = InteractionResolver::new(InteractionMode::Hover);
        let down = PointerEvent::Down { x: 0.0, y: 0.0 };
        assert_eq!(r.handle(down, &mut e, &a, Timestamp(0)), HitOutcome::Ignored);
        assert!(r.handle(MOVE, &mut e, &a, Timestamp(0)).is_split());
    }

    #[test]
    fn motion_and_hover_resolve_identically() {
        let mut outcomes = Vec::new();
        for mode in [InteractionMode::Hover, InteractionMode::Motion] {
            let (mut e, mut a, seed) = setup();
            a.aim(seed);
            let mut r = InteractionResolver::new(mode);
            let mut run = Vec::new();
            for ms in [0, 50, 400] {
                run.push(r.handle(MOVE, &mut e, &a, Timestamp(ms)));
                sync(&mut e, &mut a);
            }
            outcomes.push((run, e.volume_count()));
        }
        assert_eq!(outcomes[0], outcomes[1]);
    }

    #[test]
    fn miss_leaves_ledger_untouched() {
        let (mut e, a, _) = setup();
        let mut r = InteractionResolver::new(InteractionMode::Hover);
        assert_eq!(r.handle(MOVE, &mut e, &a, Timestamp(0)), HitOutcome::Miss);
        assert!(e.cooldowns().is_empty());
    }

    #[test]
    fn repeated_hits_on_one_volume_debounce() {
        let config = EngineConfig {
            max_generation: 0,
            ..EngineConfig::default()
        };
        let mut e = SubdivisionEngine::with_seed(config, 1).unwrap();
        let mut a = FakeAdapter::default();
        sync(&mut e, &mut a);
        let seed = e.volumes().ids().next().unwrap();
        a.aim(seed);
        let mut r = InteractionResolver::new(InteractionMode::Motion);

        assert_eq!(r.handle(MOVE, &mut e, &a, Timestamp(1_000)), HitOutcome::Terminal(seed));
        assert_eq!(r.handle(MOVE, &mut e, &a, Timestamp(1_100)), HitOutcome::Debounced(seed));
        // A suppressed hit does not extend the window.
        assert_eq!(e.cooldowns().last_interaction(seed), Some(Timestamp(1_000)));
        assert_eq!(r.handle(MOVE, &mut e, &a, Timestamp(1_200)), HitOutcome::Terminal(seed));
        assert_eq!(e.volume_count(), 1);
    }

    #[test]
    fn distinct_volumes_split_in_quick_succession() {
        let (mut e, mut a, seed) = setup();
        a.aim(seed);
        let mut r = InteractionResolver::new(InteractionMode::Hover);
        r.handle(MOVE, &mut e, &a, Timestamp(0));
        sync(&mut e, &mut a);

        // Fresh children carry the parent's stamp; once it expires they are
        // independent of each other.
        let children: Vec<VolumeId> = e.volumes().ids().collect();
        for (i, child) in children.iter().take(3).enumerate() {
            a.aim(*child);
            let outcome = r.handle(MOVE, &mut e, &a, Timestamp(300 + i as u64));
            assert!(outcome.is_split(), "{outcome:?}");
            sync(&mut e, &mut a);
        }
        assert_eq!(e.volume_count(), 8 - 3 + 3 * 8);
    }

    #[test]
    fn children_share_parent_stamp() {
        let (mut e, mut a, seed) = setup();
        a.aim(seed);
        let mut r = InteractionResolver::new(InteractionMode::Hover);
        let HitOutcome::Split { children, .. } = r.handle(MOVE, &mut e, &a, Timestamp(40)) else {
            panic!("seed should split");
        };
        sync(&mut e, &mut a);
        for id in children {
            assert_eq!(e.cooldowns().last_interaction(id), Some(Timestamp(40)));
        }
        a.aim(children[7]);
        assert_eq!(
            r.handle(MOVE, &mut e, &a, Timestamp(239)),
            HitOutcome::Debounced(children[7])
        );
        assert!(r.handle(MOVE, &mut e, &a, Timestamp(240)).is_split());
    }

    #[test]
    fn stale_hit_is_not_active() {
        let (mut e, mut a, seed) = setup();
        a.aim(seed);
        a.stale = true;
        let mut r = InteractionResolver::new(InteractionMode::Click);
        assert!(click(&mut r, &mut e, &a, 0).is_split());
        // The adapter was never re-synced and still reports the old seed.
        assert_eq!(click(&mut r, &mut e, &a, 1_000), HitOutcome::NotActive(seed));
        assert_eq!(e.volume_count(), 8);
    }

    #[test]
    fn scripted_click_scenario() {
        let (mut e, mut a, seed) = setup();
        let mut r = InteractionResolver::new(InteractionMode::Click);

        a.aim(seed);
        let HitOutcome::Split { children, .. } = click(&mut r, &mut e, &a, 0) else {
            panic!("seed should split");
        };
        sync(&mut e, &mut a);
        for id in children {
            let v = e.get(id).unwrap();
            assert_eq!((v.size, v.generation), (10.0, 1));
        }

        a.aim(children[0]);
        assert_eq!(
            click(&mut r, &mut e, &a, 150),
            HitOutcome::Debounced(children[0])
        );
        assert_eq!(e.volume_count(), 8);

        a.aim(children[5]);
        let HitOutcome::Split { children: grand, .. } = click(&mut r, &mut e, &a, 250) else {
            panic!("second child should split");
        };
        sync(&mut e, &mut a);
        for id in grand {
            let v = e.get(id).unwrap();
            assert_eq!((v.size, v.generation), (5.0, 2));
        }
        assert_eq!(e.volume_count(), 15);
    }

    #[test]
    fn hitting_every_leaf_saturates_at_max_generation() {
        let (mut e, mut a, _) = setup();
        let mut r = InteractionResolver::new(InteractionMode::Hover);
        let mut now = 0;
        loop {
            let targets: Vec<VolumeId> = e.volumes().ids().collect();
            let mut splits = 0;
            for id in targets {
                a.aim(id);
                now += 1_000;
                if r.handle(MOVE, &mut e, &a, Timestamp(now)).is_split() {
                    splits += 1;
                }
                sync(&mut e, &mut a);
            }
            if splits == 0 {
                break;
            }
        }
        assert_eq!(e.volume_count(), 8usize.pow(4));
        assert!(e.volumes().iter().all(|v| v.generation == 4));
    }

    #[test]
    fn mode_switch_drops_pending_press() {
        let (mut e, mut a, seed) = setup();
        a.aim(seed);
        let mut r = InteractionResolver::new(InteractionMode::Click);
        let at = Timestamp(0);
        r.handle(PointerEvent::Down { x: 0.0, y: 0.0 }, &mut e, &a, at);
        r.set_mode(InteractionMode::Hover);
        r.set_mode(InteractionMode::Click);
        let up = PointerEvent::Up { x: 0.0, y: 0.0 };
        assert_eq!(r.handle(up, &mut e, &a, at), HitOutcome::Ignored);
    }

    #[test]
    fn tracks_pointer_velocity() {
        let (mut e, a, _) = setup();
        let mut r = InteractionResolver::new(InteractionMode::Click);
        let at = Timestamp(0);
        r.handle(PointerEvent::Move { x: 10.0, y: 10.0 }, &mut e, &a, at);
        r.handle(PointerEvent::Move { x: 13.0, y: 6.0 }, &mut e, &a, at);
        assert_eq!(r.pointer_velocity(), Vec2::new(3.0, -4.0));
    }
}
