use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use log::{debug, warn};
use svd_common::{ClusterApi, Config, InstallerFactory, StrategyParser};
use svd_reconcile::{reconcile, Collaborators};
use svd_types::Name;

use crate::{Backoff, Error, Queue, QueueKey};

/// The fixed delay between re-checks of an `Installing` SVD whose status
/// did not change on the last tick — i.e. nothing new happened, we are
/// purely polling the installer for external progress. Using a delay here
/// (rather than an immediate requeue) is what keeps such polling from
/// becoming a busy loop.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Drives the reconciler against a [`ClusterApi`], per `spec.md` §4.7.
///
/// Event handlers call [`Dispatcher::enqueue`]; a periodic caller invokes
/// [`Dispatcher::resync`]; worker threads (or, for bounded/test-friendly
/// driving, direct calls to [`Dispatcher::process_ready`]) drain the
/// underlying [`Queue`].
#[derive(Debug)]
pub struct Dispatcher {
    cluster: Arc<dyn ClusterApi>,
    strategy_parser: Arc<dyn StrategyParser>,
    installer_factory: Arc<dyn InstallerFactory>,
    queue: Queue,
    backoff: Backoff,
    known_keys: Mutex<HashSet<QueueKey>>,
    config: Config,
}

impl Dispatcher {
    /// Builds a dispatcher over the given collaborators and configuration.
    pub fn new(
        cluster: Arc<dyn ClusterApi>,
        strategy_parser: Arc<dyn StrategyParser>,
        installer_factory: Arc<dyn InstallerFactory>,
        config: Config,
    ) -> Self {
        Self {
            cluster,
            strategy_parser,
            installer_factory,
            queue: Queue::new(),
            backoff: Backoff::default(),
            known_keys: Mutex::new(HashSet::new()),
            config,
        }
    }

    /// Enqueues `(namespace, name)`, as an event handler would on an
    /// add/update/delete notification. A no-op if `namespace` is not
    /// watched under this dispatcher's [`Config`].
    pub fn enqueue(&self, namespace: Name, name: Name) {
        if !self.config.watches(&namespace) {
            return;
        }
        let key = (namespace, name);
        self.known_keys.lock().expect("dispatcher mutex poisoned").insert(key.clone());
        self.queue.add(key);
    }

    /// Re-enqueues every key this dispatcher has ever seen via
    /// [`Dispatcher::enqueue`], per the periodic resync `spec.md` §6
    /// describes (interval from [`Config::wakeup_interval`]).
    pub fn resync(&self) {
        let keys: Vec<QueueKey> =
            self.known_keys.lock().expect("dispatcher mutex poisoned").iter().cloned().collect();
        debug!("resync: re-enqueuing {} known key(s)", keys.len());
        for key in keys {
            self.queue.add(key);
        }
    }

    /// Shuts the dispatcher's queue down, causing blocked [`Dispatcher::run_worker_loop`]
    /// calls to return.
    pub fn shutdown(&self) {
        self.queue.shutdown();
    }

    /// Spawns `worker_count` OS threads, each draining the queue until it
    /// shuts down, per `spec.md` §5's "parallel worker threads".
    pub fn spawn_workers(self: &Arc<Self>, worker_count: usize) -> Vec<JoinHandle<()>> {
        (0..worker_count)
            .map(|_| {
                let dispatcher = Arc::clone(self);
                std::thread::spawn(move || dispatcher.run_worker_loop())
            })
            .collect()
    }

    /// Processes queue items until the queue shuts down, blocking between
    /// items. Intended to run on a dedicated worker thread; see
    /// [`Dispatcher::spawn_workers`].
    pub fn run_worker_loop(&self) {
        while let Some(result) = self.process_one() {
            if let Err(error) = result {
                warn!("dispatch tick failed: {error}");
            }
        }
    }

    /// Processes exactly one queue item, blocking until one is ready or the
    /// queue shuts down. Returns `None` only on shutdown.
    pub fn process_one(&self) -> Option<Result<(), Error>> {
        let key = self.queue.get()?;
        let result = self.process(&key);
        self.queue.done(&key);
        Some(result)
    }

    /// Drains every currently-ready queue item without blocking, returning
    /// how many were processed. Used by the CLI's bounded tick loop and by
    /// tests that want deterministic, non-blocking control over dispatch.
    pub fn process_ready(&self) -> usize {
        let mut processed = 0;
        while let Some(key) = self.queue.try_get() {
            let result = self.process(&key);
            self.queue.done(&key);
            if let Err(error) = result {
                warn!("dispatch tick failed: {error}");
            }
            processed += 1;
        }
        processed
    }

    fn process(&self, key: &QueueKey) -> Result<(), Error> {
        let (namespace, name) = key;
        let svd = match self.cluster.get_svd(namespace, name) {
            Ok(Some(svd)) => svd,
            Ok(None) => {
                debug!("{namespace}/{name} no longer exists, dropping");
                self.backoff.forget(key);
                return Ok(());
            }
            Err(error) => return Err(Error::write_back(error)),
        };

        let collaborators = Collaborators {
            cluster: self.cluster.as_ref(),
            strategy_parser: self.strategy_parser.as_ref(),
            installer_factory: self.installer_factory.as_ref(),
        };
        let outcome = reconcile(&svd, &collaborators);

        let mut write_back_error = None;
        if outcome.svd.status.differs_for_write_back(&svd.status) {
            if let Err(error) = self.cluster.update_svd_status(&outcome.svd) {
                write_back_error = Some(error);
            }
        }
        for side_effect in &outcome.side_effects {
            if let Err(error) = self.cluster.update_svd_status(side_effect) {
                write_back_error = Some(error);
            }
        }

        let status_changed = outcome.svd.status.differs_for_write_back(&svd.status);
        let is_sentinel = outcome.error.as_ref().is_some_and(svd_reconcile::Error::is_sentinel);
        let is_transient = outcome.error.as_ref().is_some_and(svd_reconcile::Error::is_transient);

        if is_transient {
            let delay = self.backoff.next_backoff(key);
            debug!("{namespace}/{name} transient error, retrying in {delay:?}");
            self.queue.add_after(key.clone(), delay);
        } else if is_sentinel {
            self.backoff.forget(key);
            self.queue.add(key.clone());
        } else {
            self.backoff.forget(key);
            if outcome.error.is_none() {
                if status_changed {
                    self.queue.add(key.clone());
                } else if outcome.requeue {
                    self.queue.add_after(key.clone(), POLL_INTERVAL);
                }
            }
            // A permanent (non-transient, non-sentinel) error leaves the SVD
            // parked in `Failed` until a spec change produces a new event.
        }

        let reconcile_error = if is_sentinel { None } else { outcome.error };
        match (reconcile_error, write_back_error) {
            (None, None) => Ok(()),
            (Some(reconcile), None) => Err(Error::reconcile(reconcile)),
            (None, Some(write_back)) => Err(Error::write_back(write_back)),
            (Some(reconcile), Some(write_back)) => Err(Error::reconcile(reconcile).with_write_back(write_back)),
        }
    }
}
