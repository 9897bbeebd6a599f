//! Bounded FIFO of encoded frames, shared between a Site's render thread and
//! a strip's send worker thread.
//!
//! A plain mutex-protected deque plus a condition variable, per the source's
//! queue design — no channel crate, since the policy here (bounded, drop on
//! full, discard-on-reconnect) doesn't map cleanly onto `mpsc`/`flume`'s
//! unbounded-or-blocking send semantics.

use std::collections::VecDeque;
use std::time::Duration;

use parking_lot::{Condvar, Mutex};

/// ≈1 s of frames at 22 fps.
pub const QUEUE_CAPACITY: usize = 21;

pub struct FrameQueue {
    inner: Mutex<VecDeque<Vec<u8>>>,
    not_empty: Condvar,
}

impl FrameQueue {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(VecDeque::with_capacity(QUEUE_CAPACITY)),
            not_empty: Condvar::new(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn has_room(&self) -> bool {
        self.len() < QUEUE_CAPACITY
    }

    /// Pushes `frame` iff there is room. Returns whether it was accepted.
    pub fn push_if_room(&self, frame: Vec<u8>) -> bool {
        let mut guard = self.inner.lock();
        if guard.len() >= QUEUE_CAPACITY {
            return false;
        }
        guard.push_back(frame);
        self.not_empty.notify_one();
        true
    }

    /// Pops the oldest frame, blocking up to `timeout` for one to arrive.
    pub fn pop_blocking(&self, timeout: Duration) -> Option<Vec<u8>> {
        let mut guard = self.inner.lock();
        if guard.is_empty() {
            let result = self.not_empty.wait_for(&mut guard, timeout);
            if result.timed_out() && guard.is_empty() {
                return None;
            }
        }
        guard.pop_front()
    }

    /// Discards the front frame without returning it, if one exists. Used on
    /// reconnect: the frame that was mid-write when the socket failed may be
    /// partially sent and is never retried.
    pub fn discard_front(&self) {
        self.inner.lock().pop_front();
    }
}

impl Default for FrameQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_fills_to_capacity_then_rejects() {
        let q = FrameQueue::new();
        for _ in 0..QUEUE_CAPACITY {
            assert!(q.push_if_room(vec![0]));
        }
        assert!(!q.push_if_room(vec![0]));
        assert_eq!(q.len(), QUEUE_CAPACITY);
    }

    #[test]
    fn pop_blocking_returns_fifo_order() {
        let q = FrameQueue::new();
        q.push_if_room(vec![1]);
        q.push_if_room(vec![2]);
        assert_eq!(q.pop_blocking(Duration::from_millis(10)), Some(vec![1]));
        assert_eq!(q.pop_blocking(Duration::from_millis(10)), Some(vec![2]));
    }

    #[test]
    fn pop_blocking_times_out_on_empty_queue() {
        let q = FrameQueue::new();
        assert_eq!(q.pop_blocking(Duration::from_millis(10)), None);
    }

    #[test]
    fn discard_front_drops_oldest_without_returning_it() {
        let q = FrameQueue::new();
        q.push_if_room(vec![1]);
        q.push_if_room(vec![2]);
        q.discard_front();
        assert_eq!(q.pop_blocking(Duration::from_millis(10)), Some(vec![2]));
    }

    #[test]
    fn has_room_reflects_capacity() {
        let q = FrameQueue::new();
        assert!(q.has_room());
        for _ in 0..QUEUE_CAPACITY {
            q.push_if_room(vec![0]);
        }
        assert!(!q.has_room());
    }
}
