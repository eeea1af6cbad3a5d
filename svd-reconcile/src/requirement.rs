use svd_common::ClusterApi;
use svd_types::{RequirementStatus, Svd};

/// Checks `svd`'s required schemas against the cluster, per `spec.md` §4.4.
///
/// Produces one [`RequirementStatus`] per required schema, in the order
/// `svd.required_schemas` lists them. A schema is `present` if a matching
/// custom schema definition was found; the UUID carried on a present status
/// is read from the schema definition's manifest `uid` field when the
/// catalog supplies one, per `spec.md` §9's note that cluster objects
/// (including CRDs themselves) carry an identifying UUID.
///
/// # Errors
///
/// Propagates any [`svd_common::ClusterError`] raised while consulting the
/// cluster API.
pub fn check_requirements(
    svd: &Svd,
    cluster: &dyn ClusterApi,
) -> Result<Vec<RequirementStatus>, svd_common::ClusterError> {
    let mut statuses = Vec::with_capacity(svd.required_schemas.len());
    for schema in &svd.required_schemas {
        let found = cluster.get_schema(&schema.name)?;
        let status = match found {
            Some(def) => {
                let uuid = def
                    .manifest
                    .get("uid")
                    .and_then(|v| v.as_str())
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("{}-crd", schema.name));
                RequirementStatus::present(schema, uuid)
            }
            None => RequirementStatus::absent(schema),
        };
        statuses.push(status);
    }
    Ok(statuses)
}

/// Whether every requirement status reports `present`, i.e. the SVD's
/// `met` flag per `spec.md` §3.
pub fn all_met(statuses: &[RequirementStatus]) -> bool {
    statuses.iter().all(|status| status.present)
}
