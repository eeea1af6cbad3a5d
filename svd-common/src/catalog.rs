use std::sync::Arc;

use svd_types::{Name, SchemaDef, SourceKey, Svd};

use crate::NotFound;

/// A read-only, side-effect-free view over one catalog source, per
/// `spec.md` §4.1/§6.
///
/// Lookups are total: every method returns [`NotFound`] rather than
/// panicking when the catalog does not contain a match. Implementations
/// must be cheap to call repeatedly, since the resolver (`svd-resolve`)
/// scans every source in precedence order for every requested name.
pub trait CatalogSource: std::fmt::Debug {
    /// Looks up an SVD by name.
    fn find_svd(&self, name: &Name) -> Result<Svd, NotFound>;

    /// Looks up a schema definition by name.
    fn find_schema(&self, name: &Name) -> Result<SchemaDef, NotFound>;

    /// Looks up the SVD that owns the schema identified by
    /// `(group, version, kind)`.
    fn find_owner_of_schema(&self, group: &str, version: &str, kind: &str) -> Result<Svd, NotFound>;
}

/// One entry of the ordered source list the resolver scans, per `spec.md` §3.
///
/// Order within the list defines precedence: the resolver (`svd-resolve`)
/// scans `SourceRef`s in list order and the first source containing a match
/// wins (`spec.md` §4.2).
#[derive(Clone, Debug)]
pub struct SourceRef {
    /// The catalog source's identity.
    pub key: SourceKey,
    /// The catalog source itself.
    pub source: Arc<dyn CatalogSource>,
}

impl SourceRef {
    /// Builds a new [`SourceRef`].
    pub fn new(key: SourceKey, source: Arc<dyn CatalogSource>) -> Self {
        Self { key, source }
    }
}
