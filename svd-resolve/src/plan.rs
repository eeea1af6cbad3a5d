use svd_types::Name;

/// A request to resolve an install plan: the roots the caller wants
/// installed, per `spec.md` §3's "Install plan" input.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Plan {
    /// The requested SVD names, resolved in list order.
    pub svd_names: Vec<Name>,
}

impl Plan {
    /// Builds a plan requesting `svd_names`.
    pub fn new(svd_names: Vec<Name>) -> Self {
        Self { svd_names }
    }
}
