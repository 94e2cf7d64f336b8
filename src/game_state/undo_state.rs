//! Fixed-capacity ring stack used for played moves and detail snapshots.
//!
//! Pushing onto a full ring overwrites the oldest entry; the overwrite is
//! logged and counted so callers can tell that look-back was truncated.
//! Popping past the oldest retained entry yields `None` instead of stale data.

use tracing::warn;

use crate::game_state::chess_rules::HISTORY_CAPACITY;

#[derive(Debug, Clone)]
pub struct RingStack<T: Copy> {
    slots: Box<[Option<T>; HISTORY_CAPACITY]>,
    top: usize,
    len: usize,
    overwritten: u64,
    label: &'static str,
}

impl<T: Copy> RingStack<T> {
    pub fn new(label: &'static str) -> Self {
        Self {
            slots: Box::new([None; HISTORY_CAPACITY]),
            top: 0,
            len: 0,
            overwritten: 0,
            label,
        }
    }

    pub fn push(&mut self, item: T) {
        if self.len == HISTORY_CAPACITY {
            self.overwritten += 1;
            warn!(ring = self.label, capacity = HISTORY_CAPACITY, "ring full, oldest entry overwritten");
        } else {
            self.len += 1;
        }
        self.slots[self.top] = Some(item);
        self.top = (self.top + 1) % HISTORY_CAPACITY;
    }

    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.top = (self.top + HISTORY_CAPACITY - 1) % HISTORY_CAPACITY;
        self.len -= 1;
        self.slots[self.top]
    }

    /// Entry `depth` places below the top (`0` is the most recent).
    pub fn peek(&self, depth: usize) -> Option<T> {
        if depth >= self.len {
            return None;
        }
        let index = (self.top + HISTORY_CAPACITY - 1 - depth) % HISTORY_CAPACITY;
        self.slots[index]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Entries lost to wraparound since creation.
    pub fn overwritten(&self) -> u64 {
        self.overwritten
    }

    pub fn clear(&mut self) {
        self.top = 0;
        self.len = 0;
    }

    /// Cursor state, for restoring after a series of pops.
    pub(crate) fn mark(&self) -> (usize, usize) {
        (self.top, self.len)
    }

    /// Return to a [`RingStack::mark`]. Only valid while no push happened
    /// since the mark, so the popped slots still hold their entries.
    pub(crate) fn restore(&mut self, mark: (usize, usize)) {
        self.top = mark.0;
        self.len = mark.1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_reverse_order() {
        let mut ring = RingStack::new("test");
        ring.push(1u32);
        ring.push(2);
        ring.push(3);

        assert_eq!(ring.peek(0), Some(3));
        assert_eq!(ring.peek(2), Some(1));
        assert_eq!(ring.peek(3), None);
        assert_eq!(ring.pop(), Some(3));
        assert_eq!(ring.pop(), Some(2));
        assert_eq!(ring.pop(), Some(1));
        assert_eq!(ring.pop(), None);
    }

    #[test]
    fn overflow_keeps_newest_entries_and_counts_losses() {
        let mut ring = RingStack::new("test");
        for i in 0..(HISTORY_CAPACITY as u32 + 10) {
            ring.push(i);
        }

        assert_eq!(ring.len(), HISTORY_CAPACITY);
        assert_eq!(ring.overwritten(), 10);
        assert_eq!(ring.peek(0), Some(HISTORY_CAPACITY as u32 + 9));
        assert_eq!(ring.peek(HISTORY_CAPACITY - 1), Some(10));

        let mut drained = 0;
        while ring.pop().is_some() {
            drained += 1;
        }
        assert_eq!(drained, HISTORY_CAPACITY);
    }

    #[test]
    fn restore_returns_to_mark_after_pops() {
        let mut ring = RingStack::new("test");
        ring.push('a');
        ring.push('b');
        let mark = ring.mark();

        ring.pop();
        ring.pop();
        ring.restore(mark);

        assert_eq!(ring.peek(0), Some('b'));
        assert_eq!(ring.len(), 2);
    }
}
