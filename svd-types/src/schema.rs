use serde::{Deserialize, Serialize};

use crate::Name;

/// The well-known `kind` used for service version descriptor resolver steps.
pub const SVD_KIND: &str = "ClusterServiceVersion";

/// The well-known `kind` used for custom-resource schema resolver steps.
pub const SCHEMA_KIND: &str = "CustomResourceDefinition";

/// A reference to a custom-resource schema, identified by the
/// `(group, version, kind, name)` tuple described in the data model.
///
/// [`SchemaRef`] is used both for an SVD's `ownedSchemas`/`requiredSchemas`
/// (where `group` is conventionally empty for the purposes of this core) and
/// as the argument to ownership lookups.
#[derive(Clone, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct SchemaRef {
    /// The API group the schema belongs to.
    #[serde(default)]
    pub group: String,
    /// The schema's version, e.g. `v1`.
    pub version: String,
    /// The schema's kind, e.g. `CustomResourceDefinition`.
    pub kind: String,
    /// The schema's plural resource name.
    pub name: Name,
}

impl SchemaRef {
    /// Builds a [`SchemaRef`] with the default [`SCHEMA_KIND`] and `v1` version,
    /// which is the shape every literal scenario in the specification uses.
    pub fn crd(name: Name) -> Self {
        Self {
            group: String::new(),
            version: "v1".to_string(),
            kind: SCHEMA_KIND.to_string(),
            name,
        }
    }

    /// The resolver's duplicate-detection key: `(kind, name)`.
    ///
    /// This is deliberately coarser than the ownership identity (which also
    /// considers `group`/`version`) — see the design notes in `spec.md` §9.
    pub fn dedup_key(&self) -> (String, String) {
        (self.kind.clone(), self.name.as_str().to_string())
    }

    /// The ownership arbitrator's identity key: `(name, version, kind)`.
    ///
    /// Deliberately distinct from [`SchemaRef::dedup_key`] — `spec.md` §9
    /// warns that mixing the resolver's dedup key with the ownership
    /// identity "will cause subtle mis-attribution".
    pub fn ownership_key(&self) -> (String, String, String) {
        (self.name.as_str().to_string(), self.version.clone(), self.kind.clone())
    }
}

/// A concrete custom-resource schema definition as found in a catalog source.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct SchemaDef {
    /// The schema's identity.
    #[serde(flatten)]
    pub schema: SchemaRef,
    /// The raw manifest contributed by the catalog, opaque to this core.
    #[serde(default)]
    pub manifest: serde_json::Value,
}

impl SchemaDef {
    /// Creates a schema definition with an empty manifest.
    pub fn new(schema: SchemaRef) -> Self {
        Self {
            schema,
            manifest: serde_json::Value::Null,
        }
    }
}
