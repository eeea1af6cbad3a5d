//! In-memory reference implementations of every external collaborator in
//! `spec.md` §6: a [`CatalogSource`], a [`svd_common::ClusterApi`], and the
//! install-strategy parser/installer pair.
//!
//! `spec.md` §4.1 notes "an in-memory implementation suffices for testing";
//! `SPEC_FULL.md` §4.8/§4.9 promotes that to first-class, documented types,
//! since they are also what the CLI front-end loads catalog fixtures into
//! and reconciles against without a real cluster.
#![forbid(unsafe_code)]

mod cluster;
pub use cluster::MemoryClusterClient;

mod fixture;
pub use fixture::{CatalogFixture, FixtureError};

mod installer;
pub use installer::{
    JsonStrategy, JsonStrategyParser, NoopInstaller, NoopInstallerFactory, ScriptedInstaller,
    ScriptedInstallerFactory,
};

use std::collections::HashMap;

use svd_common::{CatalogSource, NotFound};
use svd_types::{Name, SchemaDef, Svd};

/// A read-only, in-memory bag of SVDs and schemas, implementing the
/// [`CatalogSource`] contract of `spec.md` §4.1.
#[derive(Clone, Debug, Default)]
pub struct MemoryCatalogSource {
    svds: HashMap<String, Svd>,
    schemas: HashMap<String, SchemaDef>,
}

impl MemoryCatalogSource {
    /// Builds an empty catalog source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `svd` to the catalog, keyed by its name, returning `self` for
    /// chaining.
    pub fn with_svd(mut self, svd: Svd) -> Self {
        self.svds.insert(svd.name.as_str().to_string(), svd);
        self
    }

    /// Adds `schema` to the catalog, keyed by its name, returning `self` for
    /// chaining.
    pub fn with_schema(mut self, schema: SchemaDef) -> Self {
        self.schemas
            .insert(schema.schema.name.as_str().to_string(), schema);
        self
    }
}

impl CatalogSource for MemoryCatalogSource {
    fn find_svd(&self, name: &Name) -> Result<Svd, NotFound> {
        self.svds.get(name.as_str()).cloned().ok_or(NotFound)
    }

    fn find_schema(&self, name: &Name) -> Result<SchemaDef, NotFound> {
        self.schemas.get(name.as_str()).cloned().ok_or(NotFound)
    }

    fn find_owner_of_schema(&self, group: &str, version: &str, kind: &str) -> Result<Svd, NotFound> {
        self.svds
            .values()
            .find(|svd| {
                svd.owned_schemas
                    .iter()
                    .any(|s| s.group == group && s.version == version && s.kind == kind)
            })
            .cloned()
            .ok_or(NotFound)
    }
}
