//! Error handling for svd-resolve.

/// An error produced while resolving an install plan.
///
/// The two variants render to the exact literal strings `spec.md` §4.2/§6
/// mandates — they are part of the contract and are asserted byte-for-byte
/// in `tests/scenarios.rs`.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A requested root or transitively-required owner SVD is absent from
    /// every source that was scanned.
    #[error("not found: ClusterServiceVersion {0}")]
    NotFoundSvd(String),

    /// An owned or required schema is absent from every source that was
    /// scanned, or no source that has the schema also has an SVD that owns
    /// it.
    #[error("not found: CRD {0}/{0}/v1")]
    NotFoundSchema(String),
}
