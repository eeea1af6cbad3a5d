use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::Name;

/// The identity of a catalog source: `(namespace, name)`, per `spec.md` §3.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct SourceKey {
    /// The namespace the catalog source lives in.
    pub namespace: Name,
    /// The catalog source's name.
    pub name: Name,
}

impl SourceKey {
    /// Builds a new [`SourceKey`].
    pub fn new(namespace: Name, name: Name) -> Self {
        Self { namespace, name }
    }
}

impl Display for SourceKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}
