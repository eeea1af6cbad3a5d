use std::fmt::Debug;

use svd_types::{Name, SchemaDef, Svd};

use crate::ClusterError;

/// An untyped custom resource instance as observed on the cluster.
///
/// `spec.md` §9 notes that "cluster objects arrive as untyped structured
/// data"; [`CustomResource`] models that and carries the identifying UUID
/// the requirement checker reports in [`svd_types::RequirementStatus`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CustomResource {
    /// The object's cluster-assigned UUID.
    pub uuid: String,
    /// The object's raw, untyped body.
    pub data: serde_json::Value,
}

/// Typed accessors onto the cluster API, per `spec.md` §6.
///
/// Every accessor that lists objects treats a single malformed entry as
/// non-fatal: `spec.md` §9 says decode failures "are non-fatal for list
/// operations (skip the malformed object)" — implementations should skip
/// rather than fail the whole call, which is why list methods return a
/// plain `Vec` rather than a `Result` per item.
pub trait ClusterApi: Debug {
    /// Gets a single custom resource by `(group, version, namespace, kind, name)`.
    fn get_custom_resource(
        &self,
        group: &str,
        version: &str,
        namespace: &Name,
        kind: &str,
        name: &Name,
    ) -> Result<Option<CustomResource>, ClusterError>;

    /// Lists custom resources of `(group, version, kind)` in `namespace`.
    fn list_custom_resources(
        &self,
        group: &str,
        version: &str,
        namespace: &Name,
        kind: &str,
    ) -> Result<Vec<CustomResource>, ClusterError>;

    /// Deletes a custom resource by `(group, version, namespace, kind, name)`.
    fn delete_custom_resource(
        &self,
        group: &str,
        version: &str,
        namespace: &Name,
        kind: &str,
        name: &Name,
    ) -> Result<(), ClusterError>;

    /// Gets a custom schema definition by name.
    fn get_schema(&self, name: &Name) -> Result<Option<SchemaDef>, ClusterError>;

    /// Lists the SVDs currently present in `namespace`.
    ///
    /// Used by the ownership arbitrator (`spec.md` §4.5) and the
    /// replacement graph (`spec.md` §4.3), both of which reason over the
    /// full same-namespace SVD set.
    fn list_svds(&self, namespace: &Name) -> Result<Vec<Svd>, ClusterError>;

    /// Gets a single SVD by `(namespace, name)`.
    ///
    /// The dispatcher (`svd-queue`) uses this to fetch the current object
    /// a queue key refers to, since the queue itself only carries identity.
    fn get_svd(&self, namespace: &Name, name: &Name) -> Result<Option<Svd>, ClusterError>;

    /// Writes `svd`'s status back to the cluster.
    ///
    /// Implementations must replace the stored status wholesale; the
    /// dispatcher only calls this when
    /// [`svd_types::Status::differs_for_write_back`] says the reconciled
    /// status actually changed.
    fn update_svd_status(&self, svd: &Svd) -> Result<(), ClusterError>;

    /// Deletes the SVD cluster object identified by `(namespace, name)`.
    fn delete_svd(&self, namespace: &Name, name: &Name) -> Result<(), ClusterError>;
}
