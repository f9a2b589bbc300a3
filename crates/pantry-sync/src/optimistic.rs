use std::hash::Hash;

use crate::counters::CounterMap;

/// Handle for one pending optimistic adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdjustmentId(u64);

#[derive(Debug)]
struct Pending<K> {
    id: AdjustmentId,
    key: K,
    delta: i32,
}

/// Pending-delta ledger over a [`CounterMap`].
///
/// `begin` applies the delta immediately, so the UI reflects it before the
/// backend answers. Every adjustment must then end in exactly one `commit`
/// (keep it) or `rollback` (undo exactly what was applied).
#[derive(Debug)]
pub struct Adjustments<K> {
    pending: Vec<Pending<K>>,
    next_id: u64,
}

impl<K: Eq + Hash + Clone> Default for Adjustments<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash + Clone> Adjustments<K> {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            next_id: 0,
        }
    }

    /// Apply `delta` to `key` now and remember it as pending.
    pub fn begin(&mut self, counters: &mut CounterMap<K>, key: K, delta: i32) -> AdjustmentId {
        let id = AdjustmentId(self.next_id);
        self.next_id += 1;
        counters.add(key.clone(), delta);
        self.pending.push(Pending { id, key, delta });
        id
    }

    /// Backend confirmed: the applied delta stays, the pending record goes.
    pub fn commit(&mut self, id: AdjustmentId) -> bool {
        self.take(id).is_some()
    }

    /// Backend refused: undo exactly the recorded delta (the zero floor
    /// still holds if something else drained the counter meanwhile).
    pub fn rollback(&mut self, counters: &mut CounterMap<K>, id: AdjustmentId) -> bool {
        match self.take(id) {
            Some(p) => {
                counters.add(p.key, -p.delta);
                true
            }
            None => false,
        }
    }

    /// Adjustments still waiting on a verdict.
    pub fn in_flight(&self) -> usize {
        self.pending.len()
    }

    fn take(&mut self, id: AdjustmentId) -> Option<Pending<K>> {
        let pos = self.pending.iter().position(|p| p.id == id)?;
        Some(self.pending.remove(pos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_keeps_the_delta() {
        let mut counts: CounterMap<&str> = CounterMap::new();
        let mut ledger = Adjustments::new();
        counts.set("post-1", 4);

        let id = ledger.begin(&mut counts, "post-1", 1);
        assert_eq!(counts.get(&"post-1"), 5);
        assert!(ledger.commit(id));
        assert_eq!(counts.get(&"post-1"), 5);
        assert_eq!(ledger.in_flight(), 0);
    }

    #[test]
    fn rollback_restores_the_count() {
        let mut counts: CounterMap<&str> = CounterMap::new();
        let mut ledger = Adjustments::new();
        counts.set("post-1", 4);

        let id = ledger.begin(&mut counts, "post-1", 1);
        assert!(ledger.rollback(&mut counts, id));
        assert_eq!(counts.get(&"post-1"), 4);
    }

    #[test]
    fn each_adjustment_settles_once() {
        let mut counts: CounterMap<&str> = CounterMap::new();
        let mut ledger = Adjustments::new();

        let id = ledger.begin(&mut counts, "p", 1);
        assert!(ledger.commit(id));
        assert!(!ledger.commit(id));
        assert!(!ledger.rollback(&mut counts, id));
        assert_eq!(counts.get(&"p"), 1);
    }

    #[test]
    fn interleaved_adjustments_roll_back_independently() {
        let mut counts: CounterMap<&str> = CounterMap::new();
        let mut ledger = Adjustments::new();

        let a = ledger.begin(&mut counts, "p", 1);
        let b = ledger.begin(&mut counts, "p", 1);
        assert_eq!(counts.get(&"p"), 2);

        assert!(ledger.rollback(&mut counts, a));
        assert_eq!(counts.get(&"p"), 1);
        assert!(ledger.commit(b));
        assert_eq!(counts.get(&"p"), 1);
    }
}
