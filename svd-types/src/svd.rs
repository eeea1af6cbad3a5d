use serde::{Deserialize, Serialize};

use crate::{Name, Phase, SchemaRef};

/// The observed presence of one of an SVD's required schemas, per `spec.md` §3.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct RequirementStatus {
    /// The API group of the required schema.
    pub group: String,
    /// The version of the required schema.
    pub version: String,
    /// The kind of the required schema.
    pub kind: String,
    /// The plural resource name of the required schema.
    pub name: Name,
    /// Whether a matching custom schema was found on the cluster.
    pub present: bool,
    /// The UUID of the matching cluster object, if `present`.
    pub uuid: Option<String>,
}

impl RequirementStatus {
    /// Builds an absent requirement status for `schema`.
    pub fn absent(schema: &SchemaRef) -> Self {
        Self {
            group: schema.group.clone(),
            version: schema.version.clone(),
            kind: schema.kind.clone(),
            name: schema.name.clone(),
            present: false,
            uuid: None,
        }
    }

    /// Builds a present requirement status for `schema`, observed with `uuid`.
    pub fn present(schema: &SchemaRef, uuid: impl Into<String>) -> Self {
        Self {
            group: schema.group.clone(),
            version: schema.version.clone(),
            kind: schema.kind.clone(),
            name: schema.name.clone(),
            present: true,
            uuid: Some(uuid.into()),
        }
    }
}

/// The mutable, reconciler-owned half of an SVD, per `spec.md` §3.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Status {
    /// The current lifecycle phase.
    pub phase: Phase,
    /// A short, machine-stable reason code for the current phase.
    pub reason: String,
    /// A human-readable message elaborating on `reason`.
    pub message: String,
    /// The per-requirement presence report, one entry per required schema.
    #[serde(default)]
    pub requirement_statuses: Vec<RequirementStatus>,
}

impl Status {
    /// Builds a status with `phase`, `reason` and `message`, carrying no
    /// requirement statuses.
    pub fn new(phase: Phase, reason: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            phase,
            reason: reason.into(),
            message: message.into(),
            requirement_statuses: Vec::new(),
        }
    }

    /// Whether `(phase, reason, message)` differs from `other`'s, which is
    /// the dispatcher's write-back predicate (`spec.md` §4.6).
    pub fn differs_for_write_back(&self, other: &Status) -> bool {
        self.phase != other.phase || self.reason != other.reason || self.message != other.message
    }
}

/// A service version descriptor (SVD): the declarative object the controller
/// drives through its lifecycle, per `spec.md` §3.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Svd {
    /// The namespace the SVD lives in.
    pub namespace: Name,
    /// The SVD's name; unique within `namespace`.
    pub name: Name,
    /// The name of the SVD this one supersedes, if any, in the same namespace.
    #[serde(default)]
    pub replaces: Option<Name>,
    /// Schemas this SVD canonically owns.
    #[serde(default)]
    pub owned_schemas: Vec<SchemaRef>,
    /// Schemas this SVD cannot run without.
    #[serde(default)]
    pub required_schemas: Vec<SchemaRef>,
    /// An opaque, installer-interpreted encoding of the install strategy.
    #[serde(default)]
    pub install_strategy: serde_json::Value,
    /// The reconciler-owned status.
    #[serde(default)]
    pub status: Status,
}

impl Svd {
    /// Creates a new SVD in `None` phase, owning and requiring nothing.
    pub fn new(namespace: Name, name: Name) -> Self {
        Self {
            namespace,
            name,
            replaces: None,
            owned_schemas: Vec::new(),
            required_schemas: Vec::new(),
            install_strategy: serde_json::Value::Null,
            status: Status::default(),
        }
    }

    /// The `(namespace, name)` identity of this SVD.
    pub fn key(&self) -> (Name, Name) {
        (self.namespace.clone(), self.name.clone())
    }

    /// Whether this SVD is itself obsolete: derivable from its own status
    /// without consulting the namespace's replacement graph.
    ///
    /// `spec.md` §3 describes `obsolete` as "a boolean-valued predicate
    /// derivable from the descriptor" that "the reconciler only reads" — an
    /// SVD already mid-replacement or mid-deletion is, by definition, no
    /// longer the namespace's canonical install target.
    pub fn obsolete(&self) -> bool {
        matches!(self.status.phase, Phase::Replacing | Phase::Deleting)
    }

    /// Whether this SVD's install strategy currently reports healthy, i.e.
    /// whether it has reached `Succeeded`.
    pub fn installed(&self) -> bool {
        self.status.phase == Phase::Succeeded
    }
}
