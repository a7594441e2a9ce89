//! Cancellable one-shot timers
//!
//! Every timer has a key. Arming a key that is already armed replaces the
//! pending timer; timers never stack. Due timers fire in due order, and
//! timers due at the same instant fire in the order they were armed.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

#[derive(Debug)]
struct Entry<A> {
    seq: u64,
    due_ms: u64,
    action: A,
}

/// Millisecond-clock timer wheel driven by [`advance`](Self::advance)
#[derive(Debug)]
pub struct Scheduler<K, A> {
    now_ms: u64,
    next_seq: u64,
    entries: HashMap<K, Entry<A>>,
    queue: BTreeMap<(u64, u64), K>,
}

#[inline]
fn to_ms(seconds: f32) -> u64 {
    if seconds.is_finite() && seconds > 0.0 {
        (seconds * 1000.0).round() as u64
    } else {
        0
    }
}

impl<K: Clone + Eq + Hash, A> Scheduler<K, A> {
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            next_seq: 0,
            entries: HashMap::new(),
            queue: BTreeMap::new(),
        }
    }

    /// Current clock in seconds
    pub fn now(&self) -> f32 {
        self.now_ms as f32 / 1000.0
    }

    /// Arm `key` to fire after `delay` seconds, replacing any pending timer
    pub fn arm(&mut self, key: K, delay: f32, action: A) {
        self.cancel(&key);
        let seq = self.next_seq;
        self.next_seq += 1;
        let due_ms = self.now_ms + to_ms(delay);
        self.queue.insert((due_ms, seq), key.clone());
        self.entries.insert(key, Entry { seq, due_ms, action });
    }

    /// Cancel a pending timer, returning its action
    pub fn cancel(&mut self, key: &K) -> Option<A> {
        let entry = self.entries.remove(key)?;
        self.queue.remove(&(entry.due_ms, entry.seq));
        Some(entry.action)
    }

    pub fn is_armed(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Pending action for `key`
    pub fn action(&self, key: &K) -> Option<&A> {
        self.entries.get(key).map(|e| &e.action)
    }

    /// Seconds until `key` fires
    pub fn remaining(&self, key: &K) -> Option<f32> {
        self.entries
            .get(key)
            .map(|e| e.due_ms.saturating_sub(self.now_ms) as f32 / 1000.0)
    }

    /// Move the clock forward
    pub fn advance(&mut self, dt: f32) {
        self.now_ms += to_ms(dt);
    }

    /// Remove and return the next due timer, if any
    pub fn pop_due(&mut self) -> Option<(K, A)> {
        let (&(due_ms, seq), _) = self.queue.iter().next()?;
        if due_ms > self.now_ms {
            return None;
        }
        let key = self.queue.remove(&(due_ms, seq))?;
        let entry = self.entries.remove(&key)?;
        Some((key, entry.action))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every pending timer
    pub fn clear(&mut self) {
        self.entries.clear();
        self.queue.clear();
    }
}

impl<K: Clone + Eq + Hash, A> Default for Scheduler<K, A> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(scheduler: &mut Scheduler<&'static str, u32>) -> Vec<u32> {
        let mut fired = Vec::new();
        while let Some((_, action)) = scheduler.pop_due() {
            fired.push(action);
        }
        fired
    }

    #[test]
    fn test_rearm_replaces() {
        let mut scheduler = Scheduler::new();
        scheduler.arm("zone", 5.0, 1);
        scheduler.arm("zone", 10.0, 2);
        assert_eq!(scheduler.len(), 1);

        scheduler.advance(5.0);
        assert!(drain(&mut scheduler).is_empty());

        scheduler.advance(5.0);
        assert_eq!(drain(&mut scheduler), vec![2]);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_firing_order() {
        let mut scheduler = Scheduler::new();
        scheduler.arm("late", 3.0, 3);
        scheduler.arm("first", 1.0, 1);
        scheduler.arm("second", 1.0, 2);

        scheduler.advance(5.0);
        assert_eq!(drain(&mut scheduler), vec![1, 2, 3]);
    }

    #[test]
    fn test_cancel_and_remaining() {
        let mut scheduler = Scheduler::new();
        scheduler.arm("a", 2.5, 7);
        scheduler.advance(1.0);
        assert_eq!(scheduler.remaining(&"a"), Some(1.5));
        assert_eq!(scheduler.cancel(&"a"), Some(7));
        assert_eq!(scheduler.cancel(&"a"), None);

        scheduler.advance(10.0);
        assert!(drain(&mut scheduler).is_empty());
    }

    #[test]
    fn test_clear() {
        let mut scheduler = Scheduler::new();
        scheduler.arm("a", 1.0, 1);
        scheduler.arm("b", 2.0, 2);
        scheduler.clear();
        scheduler.advance(5.0);
        assert!(drain(&mut scheduler).is_empty());
    }
}
