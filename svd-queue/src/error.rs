//! Error handling for svd-queue.

use svd_common::ClusterError;

/// A composite dispatch-tick error, per `spec.md` §7's rule that a
/// reconcile error and a write-back error can occur in the same tick and
/// neither should be dropped in favor of the other.
#[derive(Clone, Debug, thiserror::Error)]
#[error("{}", self.render())]
pub struct Error {
    /// The reconciler error for this tick, if reconciliation itself failed.
    pub reconcile: Option<svd_reconcile::Error>,
    /// A write-back failure, if the reconciled status could not be persisted.
    pub write_back: Option<ClusterError>,
}

impl Error {
    /// Builds an error from a reconciler failure alone.
    pub fn reconcile(error: svd_reconcile::Error) -> Self {
        Self { reconcile: Some(error), write_back: None }
    }

    /// Builds an error from a write-back failure alone.
    pub fn write_back(error: ClusterError) -> Self {
        Self { reconcile: None, write_back: Some(error) }
    }

    /// Attaches a write-back failure to an existing error, preserving the
    /// reconcile half.
    pub fn with_write_back(mut self, error: ClusterError) -> Self {
        self.write_back = Some(error);
        self
    }

    fn render(&self) -> String {
        match (&self.reconcile, &self.write_back) {
            (Some(reconcile), Some(write_back)) => format!("{reconcile}; write-back failed: {write_back}"),
            (Some(reconcile), None) => reconcile.to_string(),
            (None, Some(write_back)) => format!("write-back failed: {write_back}"),
            (None, None) => "dispatch failed with no recorded cause".to_string(),
        }
    }
}
