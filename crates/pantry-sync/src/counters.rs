use std::collections::HashMap;
use std::hash::Hash;

/// Single scalar badge (the global unread-notification count).
#[derive(Debug, Default, Clone, Copy)]
pub struct Counter(u32);

impl Counter {
    pub fn new() -> Self {
        Self(0)
    }

    pub fn get(&self) -> u32 {
        self.0
    }

    pub fn increment(&mut self) -> u32 {
        self.0 += 1;
        self.0
    }

    /// Saturating: never goes below zero.
    pub fn decrement(&mut self) -> u32 {
        self.0 = self.0.saturating_sub(1);
        self.0
    }

    /// Authoritative server value — overrides whatever accumulated locally.
    pub fn set(&mut self, value: u32) {
        self.0 = value;
    }

    pub fn clear(&mut self) {
        self.0 = 0;
    }
}

/// Integer badges keyed by entity id (per-group unread, per-post comments),
/// held apart from the entity payloads so a badge tick never rewrites a list.
#[derive(Debug)]
pub struct CounterMap<K> {
    counts: HashMap<K, u32>,
}

impl<K: Eq + Hash> Default for CounterMap<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash> CounterMap<K> {
    pub fn new() -> Self {
        Self { counts: HashMap::new() }
    }

    /// Missing keys read as zero.
    pub fn get(&self, key: &K) -> u32 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    pub fn increment(&mut self, key: K) -> u32 {
        let slot = self.counts.entry(key).or_insert(0);
        *slot += 1;
        *slot
    }

    /// Saturating: decrementing a zero (or absent) key stays at zero.
    pub fn decrement(&mut self, key: &K) -> u32 {
        match self.counts.get_mut(key) {
            Some(slot) if *slot > 1 => {
                *slot -= 1;
                *slot
            }
            Some(_) => {
                self.counts.remove(key);
                0
            }
            None => 0,
        }
    }

    /// Apply a signed delta, clamped at zero on the way down.
    pub fn add(&mut self, key: K, delta: i32) -> u32 {
        let current = self.get(&key);
        let next = current.saturating_add_signed(delta);
        self.set(key, next);
        next
    }

    /// Authoritative server value for one key.
    pub fn set(&mut self, key: K, value: u32) {
        if value == 0 {
            self.counts.remove(&key);
        } else {
            self.counts.insert(key, value);
        }
    }

    pub fn clear(&mut self, key: &K) {
        self.counts.remove(key);
    }

    /// Drop every key, for pairing with a cleared collection.
    pub fn clear_all(&mut self) {
        self.counts.clear();
    }

    /// Sum across keys, for aggregate badges ("all chats" dot).
    pub fn total(&self) -> u64 {
        self.counts.values().map(|v| u64::from(*v)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decrement_floors_at_zero() {
        let mut c = Counter::new();
        c.increment();
        c.decrement();
        c.decrement();
        c.decrement();
        assert_eq!(c.get(), 0);
    }

    #[test]
    fn map_decrement_floors_at_zero() {
        let mut m: CounterMap<&str> = CounterMap::new();
        m.increment("g1");
        m.increment("g1");
        for _ in 0..5 {
            m.decrement(&"g1");
        }
        assert_eq!(m.get(&"g1"), 0);
        assert_eq!(m.decrement(&"never-seen"), 0);
    }

    #[test]
    fn set_overrides_local_drift() {
        let mut m: CounterMap<&str> = CounterMap::new();
        m.increment("n");
        m.increment("n");
        m.set("n", 7);
        assert_eq!(m.get(&"n"), 7);
        m.set("n", 0);
        assert_eq!(m.get(&"n"), 0);
        assert_eq!(m.total(), 0);
    }

    #[test]
    fn add_clamps_signed_deltas() {
        let mut m: CounterMap<&str> = CounterMap::new();
        m.add("p", 3);
        assert_eq!(m.get(&"p"), 3);
        m.add("p", -5);
        assert_eq!(m.get(&"p"), 0);
    }

    #[test]
    fn total_sums_all_keys() {
        let mut m: CounterMap<&str> = CounterMap::new();
        m.set("a", 2);
        m.set("b", 3);
        assert_eq!(m.total(), 5);
    }

    #[test]
    fn clear_all_empties_the_map() {
        let mut m: CounterMap<&str> = CounterMap::new();
        m.set("a", 2);
        m.set("b", 3);
        m.clear_all();
        assert_eq!(m.get(&"a"), 0);
        assert_eq!(m.total(), 0);
    }
}
