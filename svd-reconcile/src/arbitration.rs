use svd_types::Svd;

use crate::replacement::ReplacementGraph;

/// Checks `candidate` against every other SVD in `namespace_svds` for an
/// unresolved ownership conflict, per `spec.md` §4.5.
///
/// For each schema `candidate` owns, every *other* same-namespace SVD that
/// also owns the same schema (identified by its full ownership key —
/// `(name, version, kind)`, via [`SchemaRef::ownership_key`](svd_types::SchemaRef::ownership_key))
/// must be linked to `candidate` by a `replaces` chain — `candidate` is
/// upstream of `other`, `other` is upstream of `candidate`, or the two are
/// the same SVD. An owner with no such link in either direction is a
/// conflict.
///
/// # Errors
///
/// Returns the exact literal string `spec.md` §4.5 mandates:
/// `"<candidate> and <other> both own <schema>, but there is no
/// replacement chain linking them"`.
pub fn check_ownership<'a>(candidate: &'a Svd, namespace_svds: &'a [Svd]) -> Result<(), String> {
    let graph = ReplacementGraph::new(namespace_svds);
    for schema in &candidate.owned_schemas {
        let ownership_key = schema.ownership_key();
        for other in namespace_svds {
            if other.name == candidate.name {
                continue;
            }
            if !owns(other, &ownership_key) {
                continue;
            }
            if !graph.chain_starts_at(candidate, other) && !graph.chain_starts_at(other, candidate) {
                return Err(format!(
                    "{} and {} both own {}, but there is no replacement chain linking them",
                    candidate.name, other.name, schema.name
                ));
            }
        }
    }
    Ok(())
}

fn owns(svd: &Svd, ownership_key: &(String, String, String)) -> bool {
    svd.owned_schemas.iter().any(|s| &s.ownership_key() == ownership_key)
}
