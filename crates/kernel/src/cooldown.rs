use splitcube_common::{Timestamp, VolumeId};
use std::collections::HashMap;
use std::time::Duration;

/// Last accepted interaction time per volume id.
///
/// Entries for destroyed volumes are never read again because ids are not
/// reused; `retain` exists for hosts that want to bound memory anyway.
#[derive(Debug, Clone, Default)]
pub struct CooldownLedger {
    last: HashMap<VolumeId, Timestamp>,
}

impl CooldownLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_interaction(&mut self, id: VolumeId, now: Timestamp) {
        self.last.insert(id, now);
    }

    /// True if `id` was recorded less than `window` before `now`.
    pub fn is_on_cooldown(&self, id: VolumeId, now: Timestamp, window: Duration) -> bool {
        match self.last.get(&id) {
            Some(&at) => now.saturating_since(at) < window,
            None => false,
        }
    }

    pub fn last_interaction(&self, id: VolumeId) -> Option<Timestamp> {
        self.last.get(&id).copied()
    }

    pub fn retain(&mut self, mut keep: impl FnMut(VolumeId) -> bool) {
        self.last.retain(|id, _| keep(*id));
    }

    pub fn clear(&mut self) {
        self.last.clear();
    }

    pub fn len(&self) -> usize {
        self.last.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last.is_empty()
    }
}
