use log::{debug, warn};
use svd_common::{ClusterApi, Installer, InstallerFactory, Strategy, StrategyParser};
use svd_types::{Name, Phase, Status, Svd};

use crate::{
    arbitration::check_ownership,
    error::Error,
    replacement::ReplacementGraph,
    requirement::{all_met, check_requirements},
};

/// The external collaborators the reconciler consults, per `spec.md` §6.
///
/// Bundled into one struct (rather than three parameters threaded through
/// every helper) the way `alpm-solve`'s `ALPMDependencyProvider` bundles its
/// own collaborators.
#[derive(Debug)]
pub struct Collaborators<'a> {
    /// The cluster API client.
    pub cluster: &'a dyn ClusterApi,
    /// Parses an SVD's opaque install strategy blob.
    pub strategy_parser: &'a dyn StrategyParser,
    /// Builds installers for a parsed strategy.
    pub installer_factory: &'a dyn InstallerFactory,
}

/// The result of one [`reconcile`] call.
///
/// `spec.md` §4.6 describes the entry point as `reconcile(in: SVD) → (out:
/// SVD, error?)`; this additionally carries `requeue` (an explicit signal
/// that the dispatcher should re-enqueue the key immediately rather than
/// waiting for the next status-driven event or periodic resync — the
/// "cleaner design" `spec.md` §9 allows in place of error-as-control-flow)
/// and `side_effects` (other same-namespace SVDs whose status must also be
/// written back this tick). `side_effects` exists because `spec.md` §4.6's
/// `Replacing` handler can collapse an entire replacement chain — multiple
/// SVDs, not just `in` — in one pass; see `DESIGN.md` for the rationale.
#[derive(Debug)]
pub struct Outcome {
    /// The updated copy of the SVD that was reconciled.
    pub svd: Svd,
    /// An error, if one occurred; see [`Error::is_sentinel`] and
    /// [`Error::is_transient`] for how the dispatcher should react.
    pub error: Option<Error>,
    /// Whether the dispatcher should re-enqueue `svd`'s key immediately.
    pub requeue: bool,
    /// Other same-namespace SVDs whose status must also be written back.
    pub side_effects: Vec<Svd>,
}

impl Outcome {
    fn settled(svd: Svd) -> Self {
        Self { svd, error: None, requeue: false, side_effects: Vec::new() }
    }

    fn requeued(svd: Svd) -> Self {
        Self { svd, error: None, requeue: true, side_effects: Vec::new() }
    }

    fn failed(svd: Svd, error: Error) -> Self {
        Self { svd, error: Some(error), requeue: false, side_effects: Vec::new() }
    }
}

/// Drives `input` through one step of the lifecycle state machine, per
/// `spec.md` §4.6. Never mutates `input`; always returns a fresh copy.
pub fn reconcile(input: &Svd, collaborators: &Collaborators<'_>) -> Outcome {
    let siblings = match collaborators.cluster.list_svds(&input.namespace) {
        Ok(siblings) => siblings,
        Err(error) => return Outcome::failed(input.clone(), Error::ClusterApi(error)),
    };

    if !matches!(input.status.phase, Phase::Replacing | Phase::Deleting) {
        let graph = ReplacementGraph::new(&siblings);
        if let Some(replacer) = graph.successor(input) {
            debug!("{}/{} is being replaced by {}", input.namespace, input.name, replacer.name);
            let mut out = input.clone();
            out.status = Status::new(
                Phase::Replacing,
                "BeingReplaced",
                format!("being replaced by csv: {}", replacer.name),
            );
            return Outcome { svd: out, error: Some(Error::Replacing), requeue: true, side_effects: Vec::new() };
        }
    }

    match input.status.phase {
        Phase::None => {
            let mut out = input.clone();
            out.status = Status::new(Phase::Pending, "RequirementsUnknown", "");
            Outcome::settled(out)
        }
        Phase::Pending => reconcile_pending(input, collaborators.cluster, &siblings),
        Phase::InstallReady => reconcile_install_ready(input, collaborators, &siblings),
        Phase::Installing => reconcile_installing(input, collaborators, &siblings),
        Phase::Succeeded => reconcile_succeeded(input, collaborators, &siblings),
        Phase::Replacing => reconcile_replacing(input, &siblings),
        Phase::Deleting => reconcile_deleting(input, collaborators.cluster),
        // `spec.md` §4.6 defines no transition for an incoming `Failed`
        // phase beyond the cross-cutting precondition already run above:
        // a failed SVD only moves again if something starts replacing it.
        Phase::Failed => Outcome::settled(input.clone()),
    }
}

fn reconcile_pending(input: &Svd, cluster: &dyn ClusterApi, siblings: &[Svd]) -> Outcome {
    let statuses = match check_requirements(input, cluster) {
        Ok(statuses) => statuses,
        Err(error) => return Outcome::failed(input.clone(), Error::ClusterApi(error)),
    };

    let mut out = input.clone();
    if !all_met(&statuses) {
        out.status = Status { phase: Phase::Pending, reason: "RequirementsNotMet".to_string(), message: String::new(), requirement_statuses: statuses };
        return Outcome::failed(out, Error::RequirementsNotMet);
    }

    if let Err(message) = check_ownership(input, siblings) {
        out.status = Status { phase: Phase::Failed, reason: "OwnerConflict".to_string(), message: message.clone(), requirement_statuses: statuses };
        return Outcome::failed(out, Error::OwnerConflict(message));
    }

    out.status = Status { phase: Phase::InstallReady, reason: "RequirementsMet".to_string(), message: String::new(), requirement_statuses: statuses };
    Outcome::settled(out)
}

/// The predecessor's parsed strategy, if `input` replaces an SVD in
/// `siblings` with a valid strategy — passed to [`InstallerFactory::installer`]
/// so the installer can diff owned resources during an upgrade, per
/// `spec.md` §6. A predecessor with no valid strategy contributes `None`:
/// this is best-effort context for the installer, not a correctness
/// requirement of this reconcile step.
fn predecessor_strategy(
    input: &Svd,
    siblings: &[Svd],
    parser: &dyn StrategyParser,
) -> Option<Box<dyn Strategy>> {
    let predecessor_name = input.replaces.as_ref()?;
    let predecessor = siblings.iter().find(|s| &s.name == predecessor_name)?;
    parser.unmarshal(&predecessor.install_strategy).ok()
}

fn reconcile_install_ready(input: &Svd, collaborators: &Collaborators<'_>, siblings: &[Svd]) -> Outcome {
    let mut out = input.clone();
    let strategy = match collaborators.strategy_parser.unmarshal(&input.install_strategy) {
        Ok(strategy) => strategy,
        Err(error) => {
            out.status = Status::new(Phase::Failed, "InvalidStrategy", error.0.clone());
            return Outcome::failed(out, Error::InvalidStrategy(error.0));
        }
    };

    let previous = predecessor_strategy(input, siblings, collaborators.strategy_parser);
    let installer = collaborators
        .installer_factory
        .installer(strategy.strategy_name(), input, previous.as_deref());

    match installer.install(strategy.as_ref()) {
        Ok(()) => {
            out.status = Status::new(Phase::Installing, "InstallSuccessful", "");
            Outcome::requeued(out)
        }
        Err(error) => {
            out.status = Status::new(Phase::Failed, "ComponentFailed", error.message.clone());
            Outcome::failed(out, Error::ComponentFailed(error.message))
        }
    }
}

fn reconcile_installing(input: &Svd, collaborators: &Collaborators<'_>, siblings: &[Svd]) -> Outcome {
    let mut out = input.clone();
    let strategy = match collaborators.strategy_parser.unmarshal(&input.install_strategy) {
        Ok(strategy) => strategy,
        Err(error) => {
            out.status = Status::new(Phase::Failed, "InvalidStrategy", error.0.clone());
            return Outcome::failed(out, Error::InvalidStrategy(error.0));
        }
    };

    let previous = predecessor_strategy(input, siblings, collaborators.strategy_parser);
    let installer = collaborators
        .installer_factory
        .installer(strategy.strategy_name(), input, previous.as_deref());

    match installer.check_installed(strategy.as_ref()) {
        Ok(true) => {
            out.status = Status::new(Phase::Succeeded, "InstallSuccessful", "");
            Outcome::settled(out)
        }
        Ok(false) => {
            out.status = Status::new(Phase::Installing, "Waiting", "");
            Outcome::requeued(out)
        }
        Err(error) if error.unrecoverable => {
            out.status = Status::new(Phase::Failed, "InstallCheckFailed", error.message.clone());
            Outcome::failed(out, Error::InstallCheckFailed(error.message))
        }
        Err(error) => {
            out.status = Status::new(Phase::Installing, "Waiting", "");
            Outcome::failed(out, Error::InstallCheckPending(error.message))
        }
    }
}

fn reconcile_succeeded(input: &Svd, collaborators: &Collaborators<'_>, siblings: &[Svd]) -> Outcome {
    let mut out = input.clone();
    let healthy = (|| {
        let strategy = collaborators.strategy_parser.unmarshal(&input.install_strategy).ok()?;
        let previous = predecessor_strategy(input, siblings, collaborators.strategy_parser);
        let installer = collaborators
            .installer_factory
            .installer(strategy.strategy_name(), input, previous.as_deref());
        installer.check_installed(strategy.as_ref()).ok()
    })();

    match healthy {
        Some(true) => Outcome::settled(out),
        _ => {
            warn!("{}/{} regressed from Succeeded, re-installing", input.namespace, input.name);
            out.status = Status::new(Phase::Installing, "ComponentUnhealthy", "");
            Outcome::settled(out)
        }
    }
}

fn reconcile_replacing<'a>(input: &'a Svd, siblings: &'a [Svd]) -> Outcome {
    let has_predecessor_in_set = input
        .replaces
        .as_ref()
        .is_some_and(|predecessor| siblings.iter().any(|s| &s.name == predecessor));
    if has_predecessor_in_set {
        // Only the head of a replacement chain (the SVD with no observed
        // predecessor) performs the chain-wide collapse below; every other
        // link defers to it, so the sweep runs exactly once per chain and
        // never flaps between two SVDs both trying to garbage-collect the
        // same lineage. This is the `spec.md` §9 open question's resolution
        // for this implementation — see `DESIGN.md`.
        return Outcome::requeued(input.clone());
    }

    let graph = ReplacementGraph::new(siblings);
    let mut chain_names = vec![input.name.clone()];
    let mut seen: std::collections::HashSet<Name> = std::collections::HashSet::new();
    seen.insert(input.name.clone());
    let mut current = input;
    loop {
        match graph.successor(current) {
            Some(next) if seen.insert(next.name.clone()) => {
                chain_names.push(next.name.clone());
                current = next;
            }
            _ => break,
        }
    }

    let leaf = current;
    if !leaf.installed() || leaf.obsolete() {
        return Outcome::requeued(input.clone());
    }

    let mut out = input.clone();
    let mut side_effects = Vec::new();
    for intermediate_name in &chain_names[..chain_names.len() - 1] {
        let svd = siblings.iter().find(|s| &s.name == intermediate_name).unwrap_or(input);
        let mut updated = svd.clone();
        updated.status = Status::new(Phase::Deleting, "Replaced", format!("replaced by csv: {}", leaf.name));
        if *intermediate_name == input.name {
            out = updated;
        } else {
            side_effects.push(updated);
        }
    }

    Outcome { svd: out, error: None, requeue: false, side_effects }
}

fn reconcile_deleting(input: &Svd, cluster: &dyn ClusterApi) -> Outcome {
    match cluster.delete_svd(&input.namespace, &input.name) {
        Ok(()) => Outcome::settled(input.clone()),
        Err(error) => Outcome::failed(input.clone(), Error::ClusterApi(error)),
    }
}
