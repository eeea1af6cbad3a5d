//! Loading [`MemoryCatalogSource`]/[`MemoryClusterClient`] seed data from
//! JSON fixture files.
//!
//! `SPEC_FULL.md` §10 has the `svd-controller` CLI load catalog fixtures
//! from disk for both its `resolve` and `run` subcommands; this module is
//! the shared deserialization/seeding logic so neither subcommand
//! hand-rolls its own JSON shape.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use svd_types::{Name, SchemaDef, Svd};

use crate::{MemoryCatalogSource, MemoryClusterClient};

/// An error raised while loading a catalog fixture file.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum FixtureError {
    /// The fixture file could not be read.
    #[error("reading catalog fixture {path}: {source}")]
    Read {
        /// The path that could not be read.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The fixture file's contents were not valid JSON for the expected shape.
    #[error("parsing catalog fixture {path}: {source}")]
    Parse {
        /// The path that failed to parse.
        path: String,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

/// The on-disk shape of a catalog fixture: a named source's SVDs and
/// schema definitions, per `spec.md` §3's "Catalog source" data model.
#[derive(Clone, Debug, Deserialize)]
pub struct CatalogFixture {
    /// The catalog source's namespace, half of its [`svd_types::SourceKey`].
    pub namespace: Name,
    /// The catalog source's name, half of its [`svd_types::SourceKey`].
    pub name: Name,
    /// The SVDs this source carries.
    #[serde(default)]
    pub svds: Vec<Svd>,
    /// The schema definitions this source carries.
    #[serde(default)]
    pub schemas: Vec<SchemaDef>,
}

impl CatalogFixture {
    /// Loads a fixture from the JSON file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::Read`] if `path` cannot be read, or
    /// [`FixtureError::Parse`] if its contents do not match the fixture
    /// shape.
    pub fn load(path: &Path) -> Result<Self, FixtureError> {
        let contents = fs::read_to_string(path).map_err(|source| FixtureError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| FixtureError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Builds a [`MemoryCatalogSource`] seeded with this fixture's SVDs and
    /// schemas.
    pub fn to_catalog_source(&self) -> MemoryCatalogSource {
        let mut catalog = MemoryCatalogSource::new();
        for svd in &self.svds {
            catalog = catalog.with_svd(svd.clone());
        }
        for schema in &self.schemas {
            catalog = catalog.with_schema(schema.clone());
        }
        catalog
    }

    /// Builds a [`MemoryClusterClient`] seeded with this fixture's SVDs and
    /// schemas, for driving the dispatcher against fixture data.
    pub fn to_cluster_client(&self) -> MemoryClusterClient {
        let mut cluster = MemoryClusterClient::new();
        for svd in &self.svds {
            cluster = cluster.with_svd(svd.clone());
        }
        for schema in &self.schemas {
            cluster = cluster.with_schema(schema.clone());
        }
        cluster
    }
}
