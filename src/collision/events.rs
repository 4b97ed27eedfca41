use rustc_hash::FxHashSet;

use super::{ColliderPair, ColliderRef};

/// Receives overlap transitions from [`World::update`](crate::World::update).
///
/// Hooks run synchronously in the middle of a step and must not reach back
/// into the world. Every hook defaults to doing nothing.
pub trait ContactListener {
    fn on_collision_enter(&mut self, _a: ColliderRef, _b: ColliderRef) {}

    fn on_collision_exit(&mut self, _a: ColliderRef, _b: ColliderRef) {}

    fn on_trigger_enter(&mut self, _a: ColliderRef, _b: ColliderRef) {}

    fn on_trigger_exit(&mut self, _a: ColliderRef, _b: ColliderRef) {}
}

/// Kind of overlap tracked between two colliders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactKind {
    /// Both colliders are solid and were pushed apart
    Collision,
    /// At least one collider is a trigger
    Trigger,
}

#[derive(Debug, Clone, Default)]
struct PairSets {
    previous: FxHashSet<ColliderPair>,
    current: FxHashSet<ColliderPair>,
}

impl PairSets {
    fn record(&mut self, pair: ColliderPair) -> bool {
        self.current.insert(pair) && !self.previous.contains(&pair)
    }

    fn ended(&self, out: &mut Vec<ColliderPair>) {
        out.extend(self.previous.difference(&self.current).copied());
    }

    fn advance(&mut self) {
        std::mem::swap(&mut self.previous, &mut self.current);
        self.current.clear();
    }

    fn clear(&mut self) {
        self.previous.clear();
        self.current.clear();
    }
}

/// Turns per-step overlaps into enter and exit transitions.
///
/// During a step every overlapping pair is [recorded](Self::record); a pair
/// that did not overlap on the previous step is an onset. [`Self::finish`]
/// then reports each pair of the previous step that was not seen again, and
/// starts the next step.
#[derive(Debug, Clone, Default)]
pub struct ContactTracker {
    collisions: PairSets,
    triggers: PairSets,
    ended: Vec<ColliderPair>,
}

impl ContactTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn sets(&mut self, kind: ContactKind) -> &mut PairSets {
        match kind {
            ContactKind::Collision => &mut self.collisions,
            ContactKind::Trigger => &mut self.triggers,
        }
    }

    /// Marks `pair` as overlapping this step; returns true on overlap onset
    pub fn record(&mut self, kind: ContactKind, pair: ColliderPair) -> bool {
        self.sets(kind).record(pair)
    }

    /// Returns true if `pair` overlapped during the last finished step
    pub fn is_active(&self, kind: ContactKind, pair: ColliderPair) -> bool {
        match kind {
            ContactKind::Collision => self.collisions.previous.contains(&pair),
            ContactKind::Trigger => self.triggers.previous.contains(&pair),
        }
    }

    /// Reports every pair that stopped overlapping, in handle order, and
    /// rolls the current step over into the previous one.
    pub fn finish(&mut self, mut on_exit: impl FnMut(ContactKind, ColliderPair)) {
        for kind in [ContactKind::Collision, ContactKind::Trigger] {
            let mut ended = std::mem::take(&mut self.ended);
            let sets = self.sets(kind);
            sets.ended(&mut ended);
            sets.advance();

            ended.sort_unstable();
            for pair in ended.drain(..) {
                on_exit(kind, pair);
            }
            self.ended = ended;
        }
    }

    /// Number of pairs overlapping as of the last finished step
    pub fn active_count(&self, kind: ContactKind) -> usize {
        match kind {
            ContactKind::Collision => self.collisions.previous.len(),
            ContactKind::Trigger => self.triggers.previous.len(),
        }
    }

    pub fn clear(&mut self) {
        self.collisions.clear();
        self.triggers.clear();
        self.ended.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Handle;

    fn pair(a: u32, b: u32) -> ColliderPair {
        ColliderPair::new(Handle::new(a, 0), Handle::new(b, 0))
    }

    fn exits(tracker: &mut ContactTracker) -> Vec<(ContactKind, ColliderPair)> {
        let mut out = Vec::new();
        tracker.finish(|kind, pair| out.push((kind, pair)));
        out
    }

    #[test]
    fn test_enter_once_while_overlapping() {
        let mut tracker = ContactTracker::new();

        assert!(tracker.record(ContactKind::Trigger, pair(0, 1)));
        // Seen again in another leaf during the same step
        assert!(!tracker.record(ContactKind::Trigger, pair(1, 0)));
        assert!(exits(&mut tracker).is_empty());

        for _ in 0..3 {
            assert!(!tracker.record(ContactKind::Trigger, pair(0, 1)));
            assert!(exits(&mut tracker).is_empty());
        }
        assert!(tracker.is_active(ContactKind::Trigger, pair(0, 1)));
    }

    #[test]
    fn test_exit_once_when_overlap_ends() {
        let mut tracker = ContactTracker::new();
        tracker.record(ContactKind::Collision, pair(2, 3));
        exits(&mut tracker);

        assert_eq!(exits(&mut tracker), vec![(ContactKind::Collision, pair(2, 3))]);
        assert!(exits(&mut tracker).is_empty());
        assert_eq!(tracker.active_count(ContactKind::Collision), 0);

        // A new overlap is a new onset
        assert!(tracker.record(ContactKind::Collision, pair(2, 3)));
    }

    #[test]
    fn test_kinds_are_independent() {
        let mut tracker = ContactTracker::new();
        tracker.record(ContactKind::Collision, pair(0, 1));
        assert!(tracker.record(ContactKind::Trigger, pair(0, 1)));
        exits(&mut tracker);

        tracker.record(ContactKind::Trigger, pair(0, 1));
        assert_eq!(exits(&mut tracker), vec![(ContactKind::Collision, pair(0, 1))]);
    }

    #[test]
    fn test_exits_in_handle_order() {
        let mut tracker = ContactTracker::new();
        tracker.record(ContactKind::Trigger, pair(5, 6));
        tracker.record(ContactKind::Trigger, pair(0, 9));
        tracker.record(ContactKind::Trigger, pair(1, 2));
        exits(&mut tracker);

        let ended: Vec<_> = exits(&mut tracker).into_iter().map(|(_, p)| p).collect();
        assert_eq!(ended, vec![pair(0, 9), pair(1, 2), pair(5, 6)]);
    }
}
