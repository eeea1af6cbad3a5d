//! The rate-limited work queue and dispatcher that drive `svd-reconcile`
//! against a live cluster, per `spec.md` §5/§6.
//!
//! `svd-reconcile::reconcile` is a pure function of one SVD snapshot; this
//! crate is what actually calls it on a schedule: a [`workqueue::Queue`]
//! deduplicates and rate-limits in-flight keys the way client-go's
//! `workqueue.RateLimitingInterface` does, and [`Dispatcher`] is the loop
//! that pops a key, fetches the current object, reconciles it, writes the
//! result back, and decides whether (and when) to requeue.
#![forbid(unsafe_code)]

use svd_types::Name;

mod backoff;
pub use backoff::Backoff;

mod dispatcher;
pub use dispatcher::Dispatcher;

mod error;
pub use error::Error;

mod workqueue;
pub use workqueue::Queue;

pub use svd_common::Config;

/// The queue's unit of work: an SVD's `(namespace, name)` identity. The
/// queue carries only identity, never a snapshot, so a key re-added while
/// its prior snapshot is mid-reconcile always picks up the latest object on
/// its next pop.
pub type QueueKey = (Name, Name);
