//! An in-memory [`ClusterApi`] implementation.
//!
//! `spec.md` §9 treats an in-memory double as sufficient for testing the
//! catalog side of this system; `SPEC_FULL.md` §4.9 extends the same
//! treatment to the cluster API collaborator, since the CLI's `run`
//! subcommand and `svd-queue`'s integration tests both need a cluster to
//! reconcile against without a real Kubernetes-like API server.

use std::collections::HashMap;
use std::sync::Mutex;

use svd_common::{ClusterApi, ClusterError, CustomResource};
use svd_types::{Name, SchemaDef, Svd};

type CustomResourceKey = (String, String, String, String, String);

#[derive(Debug, Default)]
struct State {
    svds: HashMap<(String, String), Svd>,
    schemas: HashMap<String, SchemaDef>,
    custom_resources: HashMap<CustomResourceKey, CustomResource>,
}

/// A thread-safe, in-memory [`ClusterApi`], backing the reference CLI's
/// `run` subcommand and `svd-queue`'s dispatcher tests.
///
/// Interior mutability is a single [`Mutex`] rather than one per map: the
/// dispatcher (`svd-queue`) calls into this from multiple worker threads,
/// and none of its operations are hot enough to need finer-grained locking.
#[derive(Debug, Default)]
pub struct MemoryClusterClient {
    state: Mutex<State>,
}

impl MemoryClusterClient {
    /// Builds an empty cluster client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds `svd` into the client, returning `self` for chaining.
    pub fn with_svd(self, svd: Svd) -> Self {
        self.state
            .lock()
            .expect("cluster state mutex poisoned")
            .svds
            .insert((svd.namespace.as_str().to_string(), svd.name.as_str().to_string()), svd);
        self
    }

    /// Seeds `schema` into the client, returning `self` for chaining.
    pub fn with_schema(self, schema: SchemaDef) -> Self {
        self.state
            .lock()
            .expect("cluster state mutex poisoned")
            .schemas
            .insert(schema.schema.name.as_str().to_string(), schema);
        self
    }

    /// Seeds a custom resource into the client, returning `self` for chaining.
    #[allow(clippy::too_many_arguments)]
    pub fn with_custom_resource(
        self,
        group: impl Into<String>,
        version: impl Into<String>,
        namespace: &Name,
        kind: impl Into<String>,
        name: &Name,
        resource: CustomResource,
    ) -> Self {
        let key = (
            group.into(),
            version.into(),
            namespace.as_str().to_string(),
            kind.into(),
            name.as_str().to_string(),
        );
        self.state.lock().expect("cluster state mutex poisoned").custom_resources.insert(key, resource);
        self
    }
}

impl ClusterApi for MemoryClusterClient {
    fn get_custom_resource(
        &self,
        group: &str,
        version: &str,
        namespace: &Name,
        kind: &str,
        name: &Name,
    ) -> Result<Option<CustomResource>, ClusterError> {
        let key = (
            group.to_string(),
            version.to_string(),
            namespace.as_str().to_string(),
            kind.to_string(),
            name.as_str().to_string(),
        );
        Ok(self.state.lock().expect("cluster state mutex poisoned").custom_resources.get(&key).cloned())
    }

    fn list_custom_resources(
        &self,
        group: &str,
        version: &str,
        namespace: &Name,
        kind: &str,
    ) -> Result<Vec<CustomResource>, ClusterError> {
        Ok(self
            .state
            .lock()
            .expect("cluster state mutex poisoned")
            .custom_resources
            .iter()
            .filter(|((g, v, ns, k, _), _)| g == group && v == version && ns == namespace.as_str() && k == kind)
            .map(|(_, resource)| resource.clone())
            .collect())
    }

    fn delete_custom_resource(
        &self,
        group: &str,
        version: &str,
        namespace: &Name,
        kind: &str,
        name: &Name,
    ) -> Result<(), ClusterError> {
        let key = (
            group.to_string(),
            version.to_string(),
            namespace.as_str().to_string(),
            kind.to_string(),
            name.as_str().to_string(),
        );
        self.state.lock().expect("cluster state mutex poisoned").custom_resources.remove(&key);
        Ok(())
    }

    fn get_schema(&self, name: &Name) -> Result<Option<SchemaDef>, ClusterError> {
        Ok(self.state.lock().expect("cluster state mutex poisoned").schemas.get(name.as_str()).cloned())
    }

    fn list_svds(&self, namespace: &Name) -> Result<Vec<Svd>, ClusterError> {
        Ok(self
            .state
            .lock()
            .expect("cluster state mutex poisoned")
            .svds
            .values()
            .filter(|svd| &svd.namespace == namespace)
            .cloned()
            .collect())
    }

    fn get_svd(&self, namespace: &Name, name: &Name) -> Result<Option<Svd>, ClusterError> {
        Ok(self
            .state
            .lock()
            .expect("cluster state mutex poisoned")
            .svds
            .get(&(namespace.as_str().to_string(), name.as_str().to_string()))
            .cloned())
    }

    fn update_svd_status(&self, svd: &Svd) -> Result<(), ClusterError> {
        self.state
            .lock()
            .expect("cluster state mutex poisoned")
            .svds
            .insert((svd.namespace.as_str().to_string(), svd.name.as_str().to_string()), svd.clone());
        Ok(())
    }

    fn delete_svd(&self, namespace: &Name, name: &Name) -> Result<(), ClusterError> {
        self.state
            .lock()
            .expect("cluster state mutex poisoned")
            .svds
            .remove(&(namespace.as_str().to_string(), name.as_str().to_string()));
        Ok(())
    }
}
