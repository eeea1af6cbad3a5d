//! Error handling for svd-reconcile.

use svd_common::ClusterError;

/// The error taxonomy of `spec.md` §7, as a typed enum rather than raw
/// strings.
#[derive(Clone, Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// At least one required schema is not yet present on the cluster.
    /// Transient: the dispatcher retries with backoff.
    #[error("requirements not met")]
    RequirementsNotMet,

    /// Two SVDs in the namespace claim the same owned schema with no
    /// `replaces` chain linking them. Permanent: surfaced on status, no
    /// retry until the spec changes.
    #[error("{0}")]
    OwnerConflict(String),

    /// The install strategy blob could not be parsed. Permanent.
    #[error("invalid install strategy: {0}")]
    InvalidStrategy(String),

    /// `Installer::install` failed. Permanent — `spec.md` §4.6 moves
    /// straight to `Failed` rather than retrying the installer.
    #[error("component failed: {0}")]
    ComponentFailed(String),

    /// `Installer::check_installed` failed with an unrecoverable error.
    /// Permanent.
    #[error("install check failed: {0}")]
    InstallCheckFailed(String),

    /// `Installer::check_installed` failed with a recoverable error.
    /// Transient — distinct from [`Error::InstallCheckFailed`] so the
    /// dispatcher can retry with backoff instead of parking the SVD in
    /// `Failed`, per `spec.md` §7's "install-check errors that are not
    /// flagged unrecoverable" transient class.
    #[error("install check pending: {0}")]
    InstallCheckPending(String),

    /// A cluster API call failed. Transient.
    #[error(transparent)]
    ClusterApi(#[from] ClusterError),

    /// Sentinel: the cross-cutting "being replaced" precondition fired.
    /// Not a reconciliation failure; the dispatcher treats this tick as a
    /// successful no-op, since status has already been set by the
    /// precondition itself (`spec.md` §4.6, §7).
    #[error("replacing")]
    Replacing,
}

impl Error {
    /// Whether this error is the `Replacing` sentinel, per `spec.md` §7.
    pub fn is_sentinel(&self) -> bool {
        matches!(self, Error::Replacing)
    }

    /// Whether this error is transient: worth retrying with backoff rather
    /// than parking the SVD until its spec changes.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Error::RequirementsNotMet | Error::InstallCheckPending(_) | Error::ClusterApi(_)
        )
    }
}
