use std::collections::{BTreeSet, HashMap, HashSet};

use log::{debug, trace};
use svd_common::SourceRef;
use svd_types::{Name, SchemaDef, SchemaRef, SourceKey, Svd, SVD_KIND};

use crate::{Error, Plan};


/// A concrete resource produced by the resolver: `(group, version, kind,
/// name, manifest)`, per `spec.md` §3's "Install plan" output.
#[derive(Clone, Debug, PartialEq)]
pub struct Resource {
    /// The resource's API group.
    pub group: String,
    /// The resource's version.
    pub version: String,
    /// The resource's kind.
    pub kind: String,
    /// The resource's name.
    pub name: Name,
    /// The raw manifest contributed by the catalog, opaque to the resolver.
    pub manifest: serde_json::Value,
}

impl Resource {
    fn from_svd(svd: &Svd) -> Self {
        Self {
            group: String::new(),
            version: "v1".to_string(),
            kind: SVD_KIND.to_string(),
            name: svd.name.clone(),
            manifest: serde_json::to_value(svd).unwrap_or(serde_json::Value::Null),
        }
    }

    fn from_schema(schema: &SchemaRef, manifest: serde_json::Value) -> Self {
        Self {
            group: schema.group.clone(),
            version: schema.version.clone(),
            kind: schema.kind.clone(),
            name: schema.name.clone(),
            manifest,
        }
    }

    fn dedup_key(&self) -> (String, String) {
        (self.kind.clone(), self.name.as_str().to_string())
    }
}

/// One step of a resolved install plan: a [`Resource`] attributed to the
/// [`SourceKey`] of the catalog that supplied it.
#[derive(Clone, Debug, PartialEq)]
pub struct Step {
    /// The resource to install.
    pub resource: Resource,
    /// The catalog source that supplied `resource`.
    pub source: SourceKey,
}

/// The result of a successful [`resolve`] call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Resolution {
    /// The ordered, deduplicated install steps.
    pub steps: Vec<Step>,
    /// Every catalog source that contributed at least one step.
    pub used_sources: BTreeSet<SourceKey>,
}

/// Resolves `plan` against `sources`, scanned in precedence order, per
/// `spec.md` §4.2.
///
/// Source precedence is argument order: for any lookup, the first source in
/// `sources` that contains a match wins. The returned step order is the
/// traversal order described in `spec.md` §4.2's "Determinism" paragraph:
/// every SVD the transitive closure touches, in discovery order, followed
/// by every owned schema, grouped by the SVD that owns it, also in
/// discovery order. A required schema never contributes a separate step: by
/// construction it is always also an owned schema of the owner this
/// function recurses into, so it is emitted (and deduplicated) there — but
/// attributed to the source `find_required_owner` selected (the one with
/// both the definition and the owning SVD), not re-derived by a bare
/// definition-only scan, per `spec.md` §4.2 step 4.
///
/// # Errors
///
/// Returns [`Error::NotFoundSvd`] if a requested root or a transitively
/// required owner SVD cannot be found in any source, or
/// [`Error::NotFoundSchema`] if an owned schema has no definition in any
/// source, or if no single source has both a definition and an owning SVD
/// for a required schema. On error, no partial steps are returned.
pub fn resolve(sources: &[SourceRef], plan: &Plan) -> Result<Resolution, Error> {
    debug!(
        "resolving plan with {} root(s) against {} source(s)",
        plan.svd_names.len(),
        sources.len()
    );
    let mut walker = Walker::new(sources);
    for root in &plan.svd_names {
        walker.visit_svd(root)?;
    }
    walker.visit_owned_schemas()?;
    debug!(
        "resolved {} step(s) from {} source(s)",
        walker.steps.len(),
        walker.used_sources.len()
    );
    Ok(Resolution {
        steps: walker.steps,
        used_sources: walker.used_sources,
    })
}

struct Walker<'a> {
    sources: &'a [SourceRef],
    visited_svds: HashSet<String>,
    seen_schemas: HashSet<(String, String)>,
    /// Source attributions pinned by a required-dependency resolution
    /// (`find_required_owner`), keyed by `dedup_key()`. Consulted by
    /// `visit_owned_schemas` so a schema that is both required by one SVD
    /// and owned by another is attributed to the source that supplied
    /// *both* the definition and the owner, per `spec.md` §4.2 step 4,
    /// rather than re-derived by a bare definition-only scan.
    pinned_schema_sources: HashMap<(String, String), (SourceKey, SchemaDef)>,
    node_order: Vec<Svd>,
    steps: Vec<Step>,
    used_sources: BTreeSet<SourceKey>,
}

impl<'a> Walker<'a> {
    fn new(sources: &'a [SourceRef]) -> Self {
        Self {
            sources,
            visited_svds: HashSet::new(),
            seen_schemas: HashSet::new(),
            pinned_schema_sources: HashMap::new(),
            node_order: Vec::new(),
            steps: Vec::new(),
            used_sources: BTreeSet::new(),
        }
    }

    fn find_svd(&self, name: &Name) -> Option<(SourceKey, Svd)> {
        self.sources
            .iter()
            .find_map(|r| r.source.find_svd(name).ok().map(|svd| (r.key.clone(), svd)))
    }

    /// Scans `self.sources` in order for the first source that has both a
    /// definition of `schema` and an SVD owning it, per `spec.md` §4.2 step 4.
    fn find_required_owner(&self, schema: &SchemaRef) -> Option<(SourceKey, SchemaDef, Svd)> {
        self.sources.iter().find_map(|r| {
            let def = r.source.find_schema(&schema.name).ok()?;
            let owner = r.source.find_owner_of_schema(&schema.group, &schema.version, &schema.kind).ok()?;
            Some((r.key.clone(), def, owner))
        })
    }

    fn visit_svd(&mut self, name: &Name) -> Result<(), Error> {
        if self.visited_svds.contains(name.as_str()) {
            trace!("{name} already visited, skipping");
            return Ok(());
        }
        let (source_key, svd) = self
            .find_svd(name)
            .ok_or_else(|| Error::NotFoundSvd(name.as_str().to_string()))?;
        trace!("resolved {name} from {source_key}");
        self.visited_svds.insert(name.as_str().to_string());
        self.used_sources.insert(source_key.clone());
        self.steps.push(Step {
            resource: Resource::from_svd(&svd),
            source: source_key,
        });
        // Recorded in discovery (pre-)order so the owned-schema pass below
        // groups CRD steps the same way the scenarios in spec.md §8 expect:
        // every SVD step first, then every owned-schema step.
        self.node_order.push(svd.clone());

        for required in &svd.required_schemas {
            let (source_key, def, owner) = self
                .find_required_owner(required)
                .ok_or_else(|| Error::NotFoundSchema(required.name.as_str().to_string()))?;
            self.pinned_schema_sources.insert(required.dedup_key(), (source_key, def));
            self.visit_svd(&owner.name)?;
        }

        Ok(())
    }

    fn visit_owned_schemas(&mut self) -> Result<(), Error> {
        let nodes = std::mem::take(&mut self.node_order);
        for svd in &nodes {
            for schema in &svd.owned_schemas {
                let key = schema.dedup_key();
                if self.seen_schemas.contains(&key) {
                    continue;
                }
                let found = match self.pinned_schema_sources.get(&key) {
                    Some(pinned) => Some(pinned.clone()),
                    None => self
                        .sources
                        .iter()
                        .find_map(|r| r.source.find_schema(&schema.name).ok().map(|def| (r.key.clone(), def))),
                };
                let (source_key, def) = found.ok_or_else(|| Error::NotFoundSchema(schema.name.as_str().to_string()))?;
                self.seen_schemas.insert(key);
                self.used_sources.insert(source_key.clone());
                self.steps.push(Step {
                    resource: Resource::from_schema(&def.schema, def.manifest),
                    source: source_key,
                });
            }
        }
        Ok(())
    }
}
