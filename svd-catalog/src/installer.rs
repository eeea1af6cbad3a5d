//! Reference collaborator implementations for the install-strategy side of
//! `spec.md` §6: a [`StrategyParser`] that reads the `strategyName` field of
//! an SVD's opaque `installStrategy` blob, and two [`Installer`]
//! implementations driven by that parsed strategy.
//!
//! `SPEC_FULL.md` §4.9 calls these out by name (`NoopInstaller`,
//! `ScriptedInstaller`) as the reference body needed to make the
//! reconciliation loop runnable end-to-end without a real installer.

use std::sync::atomic::{AtomicU32, Ordering};

use svd_common::{InstallError, Installer, InstallerFactory, Strategy, StrategyError, StrategyParser};
use svd_types::Svd;

/// A parsed strategy carrying only the `strategyName` field; everything
/// else in the blob is opaque and ignored by these reference installers.
#[derive(Clone, Debug)]
pub struct JsonStrategy {
    strategy_name: String,
}

impl Strategy for JsonStrategy {
    fn strategy_name(&self) -> &str {
        &self.strategy_name
    }
}

/// Parses an `installStrategy` blob shaped like `{"strategyName": "..."}`.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonStrategyParser;

impl StrategyParser for JsonStrategyParser {
    fn unmarshal(&self, blob: &serde_json::Value) -> Result<Box<dyn Strategy>, StrategyError> {
        let strategy_name = blob
            .get("strategyName")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| StrategyError("missing \"strategyName\" field".to_string()))?;
        Ok(Box::new(JsonStrategy { strategy_name: strategy_name.to_string() }))
    }
}

/// An installer that applies instantly and always reports healthy.
///
/// Useful as the default for catalog fixtures that want to exercise the
/// reconciler's phase transitions without simulating a slow rollout.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopInstaller;

impl Installer for NoopInstaller {
    fn install(&self, _strategy: &dyn Strategy) -> Result<(), InstallError> {
        Ok(())
    }

    fn check_installed(&self, _strategy: &dyn Strategy) -> Result<bool, InstallError> {
        Ok(true)
    }
}

/// Builds [`NoopInstaller`]s, ignoring strategy name and predecessor.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopInstallerFactory;

impl InstallerFactory for NoopInstallerFactory {
    fn installer(&self, _strategy_name: &str, _svd: &Svd, _previous_strategy: Option<&dyn Strategy>) -> Box<dyn Installer> {
        Box::new(NoopInstaller)
    }
}

/// An installer that takes a fixed number of `check_installed` polls before
/// reporting healthy, to demonstrate the `Installing` phase actually
/// requeuing over several dispatcher ticks.
#[derive(Debug)]
pub struct ScriptedInstaller {
    polls_until_ready: AtomicU32,
}

impl ScriptedInstaller {
    /// Builds an installer that reports unhealthy for `polls_until_ready`
    /// calls to [`Installer::check_installed`], then healthy forever after.
    pub fn new(polls_until_ready: u32) -> Self {
        Self { polls_until_ready: AtomicU32::new(polls_until_ready) }
    }
}

impl Installer for ScriptedInstaller {
    fn install(&self, _strategy: &dyn Strategy) -> Result<(), InstallError> {
        Ok(())
    }

    fn check_installed(&self, _strategy: &dyn Strategy) -> Result<bool, InstallError> {
        let remaining = self.polls_until_ready.load(Ordering::SeqCst);
        if remaining == 0 {
            return Ok(true);
        }
        self.polls_until_ready.store(remaining - 1, Ordering::SeqCst);
        Ok(false)
    }
}

/// Builds a [`ScriptedInstaller`] per call, each starting from the same
/// configured poll count.
#[derive(Clone, Copy, Debug)]
pub struct ScriptedInstallerFactory {
    polls_until_ready: u32,
}

impl ScriptedInstallerFactory {
    /// Builds a factory whose installers take `polls_until_ready` polls to
    /// report healthy.
    pub fn new(polls_until_ready: u32) -> Self {
        Self { polls_until_ready }
    }
}

impl InstallerFactory for ScriptedInstallerFactory {
    fn installer(&self, _strategy_name: &str, _svd: &Svd, _previous_strategy: Option<&dyn Strategy>) -> Box<dyn Installer> {
        Box::new(ScriptedInstaller::new(self.polls_until_ready))
    }
}
