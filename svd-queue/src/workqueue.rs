use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet, VecDeque};
use std::sync::{Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use crate::QueueKey;

#[derive(Debug, Default)]
struct State {
    ready: VecDeque<QueueKey>,
    delayed: BinaryHeap<Reverse<(Instant, QueueKey)>>,
    processing: HashSet<QueueKey>,
    dirty: HashSet<QueueKey>,
    shutting_down: bool,
}

/// A rate-limited, per-key-serialized delay queue, per `spec.md` §5.
///
/// Follows the same dirty/processing/queue algorithm as client-go's
/// `workqueue.Type`: a key already queued or in flight is never duplicated
/// ([`Queue::add`] is idempotent while the key is "dirty"), and a key
/// re-added while it is being processed is redelivered exactly once after
/// [`Queue::done`], guaranteeing no two workers ever process the same key
/// concurrently.
pub struct Queue {
    state: Mutex<State>,
    cond: Condvar,
}

impl std::fmt::Debug for Queue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Queue").field("len", &self.len()).finish()
    }
}

impl Default for Queue {
    fn default() -> Self {
        Self::new()
    }
}

impl Queue {
    /// Builds an empty queue.
    pub fn new() -> Self {
        Self { state: Mutex::new(State::default()), cond: Condvar::new() }
    }

    /// Enqueues `key` immediately, deduplicating against anything already
    /// queued or in flight.
    pub fn add(&self, key: QueueKey) {
        let mut state = self.state.lock().expect("queue mutex poisoned");
        Self::add_locked(&mut state, key);
        drop(state);
        self.cond.notify_one();
    }

    /// Schedules `key` to become eligible after `delay`, used for backoff
    /// retries and deferred polling. A zero delay is equivalent to [`Queue::add`].
    pub fn add_after(&self, key: QueueKey, delay: Duration) {
        if delay.is_zero() {
            return self.add(key);
        }
        let mut state = self.state.lock().expect("queue mutex poisoned");
        state.delayed.push(Reverse((Instant::now() + delay, key)));
        drop(state);
        self.cond.notify_one();
    }

    /// Pops the next ready key, blocking until one is available or the
    /// queue is shut down.
    pub fn get(&self) -> Option<QueueKey> {
        let mut state = self.state.lock().expect("queue mutex poisoned");
        loop {
            Self::promote_ready_delayed(&mut state);
            if let Some(key) = state.ready.pop_front() {
                state.processing.insert(key.clone());
                state.dirty.remove(&key);
                return Some(key);
            }
            if state.shutting_down {
                return None;
            }
            let wait = state
                .delayed
                .peek()
                .map(|Reverse((ready_at, _))| ready_at.saturating_duration_since(Instant::now()));
            state = match wait {
                Some(duration) if !duration.is_zero() => {
                    self.cond.wait_timeout(state, duration).expect("queue mutex poisoned").0
                }
                // Either already due (loop again to promote it) or no delayed
                // entries at all (block until something is added).
                Some(_) => state,
                None => self.cond.wait(state).expect("queue mutex poisoned"),
            };
        }
    }

    /// Pops the next ready key without blocking, returning `None` if
    /// nothing is currently ready (distinct from [`Queue::get`]'s `None`,
    /// which also means "shut down").
    pub fn try_get(&self) -> Option<QueueKey> {
        let mut state = self.state.lock().expect("queue mutex poisoned");
        Self::promote_ready_delayed(&mut state);
        let key = state.ready.pop_front()?;
        state.processing.insert(key.clone());
        state.dirty.remove(&key);
        Some(key)
    }

    /// Marks `key` as no longer being processed, redelivering it if it was
    /// re-added while in flight.
    pub fn done(&self, key: &QueueKey) {
        let mut state = self.state.lock().expect("queue mutex poisoned");
        state.processing.remove(key);
        if state.dirty.contains(key) {
            state.ready.push_back(key.clone());
            drop(state);
            self.cond.notify_one();
        }
    }

    /// Shuts the queue down, waking every blocked [`Queue::get`] caller.
    pub fn shutdown(&self) {
        let mut state = self.state.lock().expect("queue mutex poisoned");
        state.shutting_down = true;
        drop(state);
        self.cond.notify_all();
    }

    /// The number of keys currently ready to be popped (excludes in-flight
    /// and not-yet-due delayed keys).
    pub fn len(&self) -> usize {
        self.state.lock().expect("queue mutex poisoned").ready.len()
    }

    /// Whether [`Queue::len`] is zero.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn add_locked(state: &mut MutexGuard<'_, State>, key: QueueKey) {
        if state.dirty.contains(&key) {
            return;
        }
        state.dirty.insert(key.clone());
        if state.processing.contains(&key) {
            return;
        }
        state.ready.push_back(key);
    }

    fn promote_ready_delayed(state: &mut MutexGuard<'_, State>) {
        let now = Instant::now();
        while let Some(Reverse((ready_at, _))) = state.delayed.peek() {
            if *ready_at > now {
                break;
            }
            let Reverse((_, key)) = state.delayed.pop().expect("peeked entry must pop");
            Self::add_locked(state, key);
        }
    }
}
