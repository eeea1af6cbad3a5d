use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// The lifecycle phase of a service version descriptor, per `spec.md` §3/§4.6.
///
/// Transitions between phases form the DAG described in `spec.md` §4.6; no
/// other transitions are legal. `None` is the implicit phase of a freshly
/// created descriptor that has not yet been reconciled.
#[derive(
    Clone, Copy, Debug, Default, Deserialize, Display, EnumString, Eq, Hash, PartialEq, Serialize,
)]
pub enum Phase {
    /// Not yet reconciled.
    #[default]
    None,
    /// Requirements are being checked.
    Pending,
    /// Requirements are met and ownership is uncontested; ready to install.
    InstallReady,
    /// The installer has been invoked and is being polled for completion.
    Installing,
    /// The install strategy reports healthy.
    Succeeded,
    /// A permanent failure was recorded; requires a spec change to retry.
    Failed,
    /// A newer descriptor in the namespace has replaced this one.
    Replacing,
    /// Terminal: the descriptor is being removed from the cluster.
    Deleting,
}

impl Phase {
    /// Whether this phase is terminal for the current reconcile cycle.
    ///
    /// `spec.md` §3 calls out `Failed` and `Deleting` as "terminal-for-this-
    /// cycle" — neither requeues itself on its own account (though external
    /// events, like a new replacement appearing, can still move them).
    pub fn is_terminal_for_cycle(self) -> bool {
        matches!(self, Phase::Failed | Phase::Deleting)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn default_is_none() {
        assert_eq!(Phase::default(), Phase::None);
    }

    #[test]
    fn display_and_parse_roundtrip() {
        for phase in [
            Phase::None,
            Phase::Pending,
            Phase::InstallReady,
            Phase::Installing,
            Phase::Succeeded,
            Phase::Failed,
            Phase::Replacing,
            Phase::Deleting,
        ] {
            let rendered = phase.to_string();
            assert_eq!(Phase::from_str(&rendered).unwrap(), phase);
        }
    }

    #[test]
    fn terminal_phases() {
        assert!(Phase::Failed.is_terminal_for_cycle());
        assert!(Phase::Deleting.is_terminal_for_cycle());
        assert!(!Phase::Succeeded.is_terminal_for_cycle());
    }
}
