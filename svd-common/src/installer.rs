use std::fmt::Debug;

use svd_types::Svd;

use crate::{InstallError, StrategyError};

/// A parsed, installer-specific install strategy.
///
/// The contents are opaque to the reconciler: it is produced by
/// [`StrategyParser::unmarshal`] and consumed only by the [`Installer`]
/// that produced it, per `spec.md` §6.
pub trait Strategy: Debug {
    /// The strategy kind's name, used to select an [`Installer`]
    /// implementation via [`InstallerFactory::installer`].
    fn strategy_name(&self) -> &str;
}

/// Parses an SVD's opaque `installStrategy` blob into a [`Strategy`].
pub trait StrategyParser: Debug {
    /// Parses `blob` into a [`Strategy`].
    ///
    /// # Errors
    ///
    /// Returns [`StrategyError`] if `blob` does not describe a strategy this
    /// parser recognizes.
    fn unmarshal(&self, blob: &serde_json::Value) -> Result<Box<dyn Strategy>, StrategyError>;
}

/// Builds an [`Installer`] for a named strategy kind.
pub trait InstallerFactory: Debug {
    /// Builds an installer for `strategy_name`, scoped to `svd`.
    ///
    /// `previous_strategy` is the predecessor's strategy, if `svd` replaces
    /// another SVD, so the installer can diff owned resources during an
    /// upgrade.
    fn installer(
        &self,
        strategy_name: &str,
        svd: &Svd,
        previous_strategy: Option<&dyn Strategy>,
    ) -> Box<dyn Installer>;
}

/// Applies and polls a parsed [`Strategy`] against the cluster.
pub trait Installer: Debug {
    /// Applies `strategy` to the cluster.
    ///
    /// # Errors
    ///
    /// Returns [`InstallError`] on failure; see [`InstallError::unrecoverable`]
    /// for the transient/permanent distinction.
    fn install(&self, strategy: &dyn Strategy) -> Result<(), InstallError>;

    /// Reports whether `strategy`'s components are currently healthy.
    ///
    /// # Errors
    ///
    /// Returns [`InstallError`] if health could not be determined; an
    /// unrecoverable error here is a permanent install failure
    /// (`spec.md` §4.6).
    fn check_installed(&self, strategy: &dyn Strategy) -> Result<bool, InstallError>;
}
