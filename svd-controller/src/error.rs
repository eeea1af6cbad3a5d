//! Error handling for the `svd-controller` binary.

use svd_catalog::FixtureError;

/// The error type returned by `svd-controller`'s subcommand handlers.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A catalog fixture could not be loaded.
    #[error(transparent)]
    Fixture(#[from] FixtureError),

    /// The resolver failed to produce an install plan.
    #[error(transparent)]
    Resolve(#[from] svd_resolve::Error),

    /// A requested SVD or catalog name was not a valid [`svd_types::Name`].
    #[error("invalid name {name:?}: {source}")]
    InvalidName {
        /// The offending raw name.
        name: String,
        /// The underlying validation error.
        #[source]
        source: svd_types::Error,
    },

    /// The output could not be serialized to JSON.
    #[error("rendering output: {0}")]
    Render(#[from] serde_json::Error),

    /// A cluster API call made while driving the dispatcher failed.
    #[error(transparent)]
    Cluster(#[from] svd_common::ClusterError),
}
