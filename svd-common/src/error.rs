//! Errors surfaced by the collaborator traits in this crate.

/// A lookup that found nothing, returned by [`crate::CatalogSource`] and
/// [`crate::ClusterApi`] accessors, which `spec.md` §4.1/§6 describe as
/// "total and side-effect-free".
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, thiserror::Error)]
#[error("not found")]
pub struct NotFound;

/// An error raised while parsing an opaque install strategy blob.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("invalid install strategy: {0}")]
pub struct StrategyError(pub String);

/// An error raised by an [`crate::Installer`] while installing or checking
/// strategy health.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("install error: {message}")]
pub struct InstallError {
    /// A human-readable description of the failure.
    pub message: String,
    /// Whether retrying this operation can ever succeed without a spec
    /// change — mirrors the installer's `isUnrecoverable` predicate
    /// (`spec.md` §6).
    pub unrecoverable: bool,
}

impl InstallError {
    /// Builds a transient (retryable) install error.
    pub fn transient(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            unrecoverable: false,
        }
    }

    /// Builds a permanent (non-retryable) install error.
    pub fn unrecoverable(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            unrecoverable: true,
        }
    }
}

/// An error raised by the [`crate::ClusterApi`] collaborator.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("cluster api error: {0}")]
pub struct ClusterError(pub String);
