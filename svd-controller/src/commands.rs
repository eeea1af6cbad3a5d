//! Implementations of `svd-controller`'s subcommands.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use log::info;
use svd_catalog::{CatalogFixture, JsonStrategyParser, NoopInstallerFactory};
use svd_common::{CatalogSource, ClusterApi, Config, SourceRef};
use svd_queue::Dispatcher;
use svd_resolve::Plan;
use svd_types::Name;

use crate::cli::OutputFormat;
use crate::error::Error;

fn to_name(raw: &str) -> Result<Name, Error> {
    Name::new(raw).map_err(|source| Error::InvalidName { name: raw.to_string(), source })
}

/// Resolves an install plan from `catalogs` (scanned in the given order,
/// per `spec.md` §4.2) against the requested `names`, printing the result
/// in `format`.
pub fn resolve(catalogs: Vec<PathBuf>, names: Vec<String>, format: OutputFormat) -> Result<(), Error> {
    let mut sources = Vec::with_capacity(catalogs.len());
    for path in &catalogs {
        let fixture = CatalogFixture::load(path)?;
        info!(
            "loaded catalog {}/{} from {} ({} svd(s), {} schema(s))",
            fixture.namespace,
            fixture.name,
            path.display(),
            fixture.svds.len(),
            fixture.schemas.len()
        );
        let key = svd_types::SourceKey::new(fixture.namespace.clone(), fixture.name.clone());
        let source = Arc::new(fixture.to_catalog_source()) as Arc<dyn CatalogSource>;
        sources.push(SourceRef::new(key, source));
    }

    let svd_names = names.iter().map(|raw| to_name(raw)).collect::<Result<Vec<_>, _>>()?;
    let plan = Plan::new(svd_names);

    let resolution = svd_resolve::resolve(&sources, &plan)?;
    render_resolution(&resolution, format)?;
    Ok(())
}

fn render_resolution(resolution: &svd_resolve::Resolution, format: OutputFormat) -> Result<(), Error> {
    match format {
        OutputFormat::Text => {
            for step in &resolution.steps {
                println!(
                    "{:<28} {:<24} from {}",
                    step.resource.kind, step.resource.name, step.source
                );
            }
            println!(
                "{} step(s) from {} source(s)",
                resolution.steps.len(),
                resolution.used_sources.len()
            );
        }
        OutputFormat::Json => {
            let steps: Vec<serde_json::Value> = resolution
                .steps
                .iter()
                .map(|step| {
                    serde_json::json!({
                        "group": step.resource.group,
                        "version": step.resource.version,
                        "kind": step.resource.kind,
                        "name": step.resource.name,
                        "manifest": step.resource.manifest,
                        "source": {
                            "namespace": step.source.namespace,
                            "name": step.source.name,
                        },
                    })
                })
                .collect();
            let used_sources: Vec<serde_json::Value> = resolution
                .used_sources
                .iter()
                .map(|key| serde_json::json!({"namespace": key.namespace, "name": key.name}))
                .collect();
            let rendered = serde_json::to_string_pretty(&serde_json::json!({
                "steps": steps,
                "usedSources": used_sources,
            }))?;
            println!("{rendered}");
        }
    }
    Ok(())
}

/// Runs the dispatcher against a single catalog fixture's SVDs, seeded
/// directly onto an in-memory cluster, for at most `ticks` dispatch ticks.
/// Prints the final phase of every reconciled SVD.
pub fn run(catalog: PathBuf, namespace: Option<String>, ticks: usize) -> Result<(), Error> {
    let fixture = CatalogFixture::load(&catalog)?;
    let namespace = namespace.as_deref().map(to_name).transpose()?;

    let cluster: Arc<dyn ClusterApi> = Arc::new(fixture.to_cluster_client());
    let dispatcher = Arc::new(Dispatcher::new(
        Arc::clone(&cluster),
        Arc::new(JsonStrategyParser),
        Arc::new(NoopInstallerFactory),
        Config::default(),
    ));

    let mut namespaces: BTreeSet<Name> = BTreeSet::new();
    for svd in &fixture.svds {
        if namespace.as_ref().is_none_or(|ns| *ns == svd.namespace) {
            namespaces.insert(svd.namespace.clone());
            dispatcher.enqueue(svd.namespace.clone(), svd.name.clone());
        }
    }

    for tick in 0..ticks {
        let processed = dispatcher.process_ready();
        if processed == 0 {
            info!("queue drained after {tick} tick(s)");
            break;
        }
    }

    for ns in &namespaces {
        for svd in cluster.list_svds(ns)? {
            println!(
                "{}/{}: {} ({}) {}",
                svd.namespace, svd.name, svd.status.phase, svd.status.reason, svd.status.message
            );
        }
    }
    Ok(())
}
