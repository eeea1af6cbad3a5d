use std::{collections::BTreeMap, time::Duration};

use serde::{Deserialize, Serialize};
use svd_types::Name;

/// The default resync interval, applied whenever a configured interval is
/// missing, zero or negative (`spec.md` §6).
pub const DEFAULT_WAKEUP_INTERVAL: Duration = Duration::from_secs(30);

/// Controller-wide configuration, per `spec.md` §6's "Configuration" table.
///
/// `wakeup_interval_secs` is stored as a signed integer because it is
/// typically sourced from external configuration (CLI flags, files) where a
/// negative value is a valid-but-nonsensical input to be clamped, not a
/// parse error — see [`Config::wakeup_interval`].
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Config {
    /// The configured resync interval in seconds, before clamping.
    #[serde(default = "default_wakeup_interval_secs")]
    pub wakeup_interval_secs: i64,
    /// The namespaces to watch; empty means "all namespaces".
    #[serde(default)]
    pub watched_namespaces: Vec<Name>,
    /// Annotations applied to managed namespaces (out of the core's scope to
    /// apply, but carried here as configuration per `spec.md` §6).
    #[serde(default)]
    pub annotations: BTreeMap<String, String>,
}

fn default_wakeup_interval_secs() -> i64 {
    DEFAULT_WAKEUP_INTERVAL.as_secs() as i64
}

impl Default for Config {
    fn default() -> Self {
        Self {
            wakeup_interval_secs: default_wakeup_interval_secs(),
            watched_namespaces: Vec::new(),
            annotations: BTreeMap::new(),
        }
    }
}

impl Config {
    /// The effective resync interval: `wakeup_interval_secs` if positive,
    /// else [`DEFAULT_WAKEUP_INTERVAL`].
    pub fn wakeup_interval(&self) -> Duration {
        if self.wakeup_interval_secs > 0 {
            Duration::from_secs(self.wakeup_interval_secs as u64)
        } else {
            DEFAULT_WAKEUP_INTERVAL
        }
    }

    /// Whether `namespace` should be watched under this configuration: an
    /// empty `watched_namespaces` list watches everything.
    pub fn watches(&self, namespace: &Name) -> bool {
        self.watched_namespaces.is_empty() || self.watched_namespaces.contains(namespace)
    }
}
