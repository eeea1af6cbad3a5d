//! Literal-input scenarios and property tests from `spec.md` §8.

use std::cell::RefCell;
use std::collections::HashMap;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;
use svd_common::{
    ClusterApi, ClusterError, CustomResource, InstallError, Installer, InstallerFactory, Strategy,
    StrategyError, StrategyParser,
};
use svd_reconcile::{reconcile, Collaborators};
use svd_types::{Name, Phase, SchemaDef, SchemaRef, Status, Svd};

fn name(s: &str) -> Name {
    Name::new(s).unwrap()
}

#[derive(Debug, Default)]
struct StubCluster {
    svds: RefCell<HashMap<(String, String), Svd>>,
    schemas: HashMap<String, SchemaDef>,
    deleted: RefCell<Vec<(String, String)>>,
    fail_list: bool,
}

impl StubCluster {
    fn with_svds(svds: Vec<Svd>) -> Self {
        let mut map = HashMap::new();
        for svd in svds {
            map.insert((svd.namespace.as_str().to_string(), svd.name.as_str().to_string()), svd);
        }
        Self { svds: RefCell::new(map), ..Default::default() }
    }

    fn with_schemas(mut self, schemas: Vec<SchemaDef>) -> Self {
        self.schemas = schemas.into_iter().map(|s| (s.schema.name.as_str().to_string(), s)).collect();
        self
    }
}

impl ClusterApi for StubCluster {
    fn get_custom_resource(
        &self,
        _group: &str,
        _version: &str,
        _namespace: &Name,
        _kind: &str,
        _name: &Name,
    ) -> Result<Option<CustomResource>, ClusterError> {
        Ok(None)
    }

    fn list_custom_resources(
        &self,
        _group: &str,
        _version: &str,
        _namespace: &Name,
        _kind: &str,
    ) -> Result<Vec<CustomResource>, ClusterError> {
        Ok(Vec::new())
    }

    fn delete_custom_resource(
        &self,
        _group: &str,
        _version: &str,
        _namespace: &Name,
        _kind: &str,
        _name: &Name,
    ) -> Result<(), ClusterError> {
        Ok(())
    }

    fn get_schema(&self, name: &Name) -> Result<Option<SchemaDef>, ClusterError> {
        Ok(self.schemas.get(name.as_str()).cloned())
    }

    fn list_svds(&self, namespace: &Name) -> Result<Vec<Svd>, ClusterError> {
        if self.fail_list {
            return Err(ClusterError("listing failed".to_string()));
        }
        Ok(self
            .svds
            .borrow()
            .values()
            .filter(|svd| &svd.namespace == namespace)
            .cloned()
            .collect())
    }

    fn get_svd(&self, namespace: &Name, name: &Name) -> Result<Option<Svd>, ClusterError> {
        Ok(self.svds.borrow().get(&(namespace.as_str().to_string(), name.as_str().to_string())).cloned())
    }

    fn update_svd_status(&self, svd: &Svd) -> Result<(), ClusterError> {
        self.svds
            .borrow_mut()
            .insert((svd.namespace.as_str().to_string(), svd.name.as_str().to_string()), svd.clone());
        Ok(())
    }

    fn delete_svd(&self, namespace: &Name, name: &Name) -> Result<(), ClusterError> {
        self.deleted.borrow_mut().push((namespace.as_str().to_string(), name.as_str().to_string()));
        Ok(())
    }
}

#[derive(Debug)]
struct NoopStrategy;

impl Strategy for NoopStrategy {
    fn strategy_name(&self) -> &str {
        "noop"
    }
}

#[derive(Debug)]
struct AlwaysParses;

impl StrategyParser for AlwaysParses {
    fn unmarshal(&self, _blob: &serde_json::Value) -> Result<Box<dyn Strategy>, StrategyError> {
        Ok(Box::new(NoopStrategy))
    }
}

#[derive(Debug)]
struct NeverParses;

impl StrategyParser for NeverParses {
    fn unmarshal(&self, _blob: &serde_json::Value) -> Result<Box<dyn Strategy>, StrategyError> {
        Err(StrategyError("unrecognized strategy kind".to_string()))
    }
}

#[derive(Debug, Clone, Copy)]
enum InstallBehavior {
    Succeeds,
    Fails,
}

#[derive(Debug, Clone, Copy)]
enum CheckBehavior {
    Installed,
    Waiting,
    UnrecoverableError,
    RecoverableError,
}

#[derive(Debug)]
struct ScriptedInstaller {
    install: InstallBehavior,
    check: CheckBehavior,
}

impl Installer for ScriptedInstaller {
    fn install(&self, _strategy: &dyn Strategy) -> Result<(), InstallError> {
        match self.install {
            InstallBehavior::Succeeds => Ok(()),
            InstallBehavior::Fails => Err(InstallError::unrecoverable("component install failed")),
        }
    }

    fn check_installed(&self, _strategy: &dyn Strategy) -> Result<bool, InstallError> {
        match self.check {
            CheckBehavior::Installed => Ok(true),
            CheckBehavior::Waiting => Ok(false),
            CheckBehavior::UnrecoverableError => Err(InstallError::unrecoverable("component crashed")),
            CheckBehavior::RecoverableError => Err(InstallError::transient("component still starting")),
        }
    }
}

#[derive(Debug)]
struct ScriptedFactory {
    install: InstallBehavior,
    check: CheckBehavior,
}

impl InstallerFactory for ScriptedFactory {
    fn installer(&self, _strategy_name: &str, _svd: &Svd, _previous: Option<&dyn Strategy>) -> Box<dyn Installer> {
        Box::new(ScriptedInstaller { install: self.install, check: self.check })
    }
}

fn healthy_collaborators() -> (AlwaysParses, ScriptedFactory) {
    (AlwaysParses, ScriptedFactory { install: InstallBehavior::Succeeds, check: CheckBehavior::Installed })
}

fn owning(namespace: &str, svd_name: &str, schema: &str) -> Svd {
    let mut svd = Svd::new(name(namespace), name(svd_name));
    svd.owned_schemas.push(SchemaRef::crd(name(schema)));
    svd
}

#[test]
fn ownership_conflict_fails_pending_svd() {
    let mut alpha = owning("ns", "alpha", "S");
    alpha.status.phase = Phase::Pending;
    let beta = owning("ns", "beta", "S");

    let cluster = StubCluster::with_svds(vec![alpha.clone(), beta]);
    let (parser, factory) = healthy_collaborators();
    let collaborators = Collaborators { cluster: &cluster, strategy_parser: &parser, installer_factory: &factory };

    let outcome = reconcile(&alpha, &collaborators);
    assert_eq!(outcome.svd.status.phase, Phase::Failed);
    assert_eq!(outcome.svd.status.reason, "OwnerConflict");
    assert!(outcome.error.is_some());
}

fn replacement_chain(v3_phase: Phase) -> (Svd, Svd, Svd) {
    let v1 = Svd::new(name("ns"), name("v1"));
    let mut v2 = Svd::new(name("ns"), name("v2"));
    v2.replaces = Some(name("v1"));
    let mut v3 = Svd::new(name("ns"), name("v3"));
    v3.replaces = Some(name("v2"));
    v3.status.phase = v3_phase;
    (v1, v2, v3)
}

#[test]
fn replacement_chain_gc_collapses_from_the_head() {
    let (mut v1, v2, v3) = replacement_chain(Phase::Succeeded);
    v1.status.phase = Phase::Replacing;

    let cluster = StubCluster::with_svds(vec![v1.clone(), v2.clone(), v3.clone()]);
    let (parser, factory) = healthy_collaborators();
    let collaborators = Collaborators { cluster: &cluster, strategy_parser: &parser, installer_factory: &factory };

    let outcome = reconcile(&v1, &collaborators);
    assert_eq!(outcome.svd.status.phase, Phase::Deleting);
    assert_eq!(outcome.svd.status.reason, "Replaced");
    assert_eq!(outcome.side_effects.len(), 1);
    assert_eq!(outcome.side_effects[0].name, name("v2"));
    assert_eq!(outcome.side_effects[0].status.phase, Phase::Deleting);
}

#[test]
fn replacement_chain_gc_is_a_no_op_from_a_non_head_link() {
    let (v1, mut v2, v3) = replacement_chain(Phase::Succeeded);
    v2.status.phase = Phase::Replacing;

    let cluster = StubCluster::with_svds(vec![v1, v2.clone(), v3]);
    let (parser, factory) = healthy_collaborators();
    let collaborators = Collaborators { cluster: &cluster, strategy_parser: &parser, installer_factory: &factory };

    let outcome = reconcile(&v2, &collaborators);
    assert_eq!(outcome.svd.status.phase, Phase::Replacing);
    assert!(outcome.requeue);
    assert!(outcome.side_effects.is_empty());
}

#[test]
fn replacement_chain_waits_while_leaf_not_installed() {
    let (mut v1, v2, v3) = replacement_chain(Phase::Installing);
    v1.status.phase = Phase::Replacing;

    let cluster = StubCluster::with_svds(vec![v1.clone(), v2, v3]);
    let (parser, factory) = healthy_collaborators();
    let collaborators = Collaborators { cluster: &cluster, strategy_parser: &parser, installer_factory: &factory };

    let outcome = reconcile(&v1, &collaborators);
    assert_eq!(outcome.svd.status.phase, Phase::Replacing);
    assert!(outcome.requeue);
}

#[rstest]
#[case(Phase::None, Phase::Pending)]
fn none_always_moves_to_pending(#[case] start: Phase, #[case] expected: Phase) {
    let mut svd = Svd::new(name("ns"), name("a"));
    svd.status.phase = start;
    let cluster = StubCluster::with_svds(vec![svd.clone()]);
    let (parser, factory) = healthy_collaborators();
    let collaborators = Collaborators { cluster: &cluster, strategy_parser: &parser, installer_factory: &factory };
    let outcome = reconcile(&svd, &collaborators);
    assert_eq!(outcome.svd.status.phase, expected);
}

#[test]
fn pending_with_unmet_requirement_stays_pending() {
    let mut svd = Svd::new(name("ns"), name("a"));
    svd.status.phase = Phase::Pending;
    svd.required_schemas.push(SchemaRef::crd(name("widgets")));

    let cluster = StubCluster::with_svds(vec![svd.clone()]);
    let (parser, factory) = healthy_collaborators();
    let collaborators = Collaborators { cluster: &cluster, strategy_parser: &parser, installer_factory: &factory };

    let outcome = reconcile(&svd, &collaborators);
    assert_eq!(outcome.svd.status.phase, Phase::Pending);
    assert_eq!(outcome.svd.status.reason, "RequirementsNotMet");
    assert!(outcome.error.is_some());
    assert!(outcome.error.unwrap().is_transient());
}

#[test]
fn pending_with_met_requirements_and_no_conflict_becomes_install_ready() {
    let mut svd = Svd::new(name("ns"), name("a"));
    svd.status.phase = Phase::Pending;
    svd.required_schemas.push(SchemaRef::crd(name("widgets")));

    let cluster = StubCluster::with_svds(vec![svd.clone()])
        .with_schemas(vec![SchemaDef::new(SchemaRef::crd(name("widgets")))]);
    let (parser, factory) = healthy_collaborators();
    let collaborators = Collaborators { cluster: &cluster, strategy_parser: &parser, installer_factory: &factory };

    let outcome = reconcile(&svd, &collaborators);
    assert_eq!(outcome.svd.status.phase, Phase::InstallReady);
    assert_eq!(outcome.svd.status.reason, "RequirementsMet");
    assert!(outcome.error.is_none());
}

#[test]
fn install_ready_invalid_strategy_fails() {
    let mut svd = Svd::new(name("ns"), name("a"));
    svd.status.phase = Phase::InstallReady;

    let cluster = StubCluster::with_svds(vec![svd.clone()]);
    let parser = NeverParses;
    let factory = ScriptedFactory { install: InstallBehavior::Succeeds, check: CheckBehavior::Installed };
    let collaborators = Collaborators { cluster: &cluster, strategy_parser: &parser, installer_factory: &factory };

    let outcome = reconcile(&svd, &collaborators);
    assert_eq!(outcome.svd.status.phase, Phase::Failed);
    assert_eq!(outcome.svd.status.reason, "InvalidStrategy");
}

#[test]
fn install_ready_install_failure_fails() {
    let mut svd = Svd::new(name("ns"), name("a"));
    svd.status.phase = Phase::InstallReady;

    let cluster = StubCluster::with_svds(vec![svd.clone()]);
    let parser = AlwaysParses;
    let factory = ScriptedFactory { install: InstallBehavior::Fails, check: CheckBehavior::Installed };
    let collaborators = Collaborators { cluster: &cluster, strategy_parser: &parser, installer_factory: &factory };

    let outcome = reconcile(&svd, &collaborators);
    assert_eq!(outcome.svd.status.phase, Phase::Failed);
    assert_eq!(outcome.svd.status.reason, "ComponentFailed");
}

#[test]
fn install_ready_success_moves_to_installing_and_requeues() {
    let mut svd = Svd::new(name("ns"), name("a"));
    svd.status.phase = Phase::InstallReady;

    let cluster = StubCluster::with_svds(vec![svd.clone()]);
    let (parser, factory) = healthy_collaborators();
    let collaborators = Collaborators { cluster: &cluster, strategy_parser: &parser, installer_factory: &factory };

    let outcome = reconcile(&svd, &collaborators);
    assert_eq!(outcome.svd.status.phase, Phase::Installing);
    assert!(outcome.requeue);
}

#[test]
fn installing_waits_until_check_reports_installed() {
    let mut svd = Svd::new(name("ns"), name("a"));
    svd.status.phase = Phase::Installing;

    let cluster = StubCluster::with_svds(vec![svd.clone()]);
    let parser = AlwaysParses;
    let factory = ScriptedFactory { install: InstallBehavior::Succeeds, check: CheckBehavior::Waiting };
    let collaborators = Collaborators { cluster: &cluster, strategy_parser: &parser, installer_factory: &factory };

    let outcome = reconcile(&svd, &collaborators);
    assert_eq!(outcome.svd.status.phase, Phase::Installing);
    assert_eq!(outcome.svd.status.reason, "Waiting");
    assert!(outcome.requeue);
    assert!(outcome.error.is_none());
}

#[test]
fn installing_unrecoverable_check_error_fails() {
    let mut svd = Svd::new(name("ns"), name("a"));
    svd.status.phase = Phase::Installing;

    let cluster = StubCluster::with_svds(vec![svd.clone()]);
    let parser = AlwaysParses;
    let factory = ScriptedFactory { install: InstallBehavior::Succeeds, check: CheckBehavior::UnrecoverableError };
    let collaborators = Collaborators { cluster: &cluster, strategy_parser: &parser, installer_factory: &factory };

    let outcome = reconcile(&svd, &collaborators);
    assert_eq!(outcome.svd.status.phase, Phase::Failed);
    assert_eq!(outcome.svd.status.reason, "InstallCheckFailed");
}

#[test]
fn installing_succeeds_when_check_reports_installed() {
    let mut svd = Svd::new(name("ns"), name("a"));
    svd.status.phase = Phase::Installing;

    let cluster = StubCluster::with_svds(vec![svd.clone()]);
    let (parser, factory) = healthy_collaborators();
    let collaborators = Collaborators { cluster: &cluster, strategy_parser: &parser, installer_factory: &factory };

    let outcome = reconcile(&svd, &collaborators);
    assert_eq!(outcome.svd.status.phase, Phase::Succeeded);
}

#[test]
fn succeeded_stays_succeeded_while_healthy() {
    let mut svd = Svd::new(name("ns"), name("a"));
    svd.status = Status::new(Phase::Succeeded, "InstallSuccessful", "");

    let cluster = StubCluster::with_svds(vec![svd.clone()]);
    let (parser, factory) = healthy_collaborators();
    let collaborators = Collaborators { cluster: &cluster, strategy_parser: &parser, installer_factory: &factory };

    let outcome = reconcile(&svd, &collaborators);
    assert_eq!(outcome.svd.status, svd.status);
    assert!(outcome.error.is_none());
}

#[test]
fn succeeded_regresses_to_installing_when_unhealthy() {
    let mut svd = Svd::new(name("ns"), name("a"));
    svd.status = Status::new(Phase::Succeeded, "InstallSuccessful", "");

    let cluster = StubCluster::with_svds(vec![svd.clone()]);
    let parser = AlwaysParses;
    let factory = ScriptedFactory { install: InstallBehavior::Succeeds, check: CheckBehavior::Waiting };
    let collaborators = Collaborators { cluster: &cluster, strategy_parser: &parser, installer_factory: &factory };

    let outcome = reconcile(&svd, &collaborators);
    assert_eq!(outcome.svd.status.phase, Phase::Installing);
    assert_eq!(outcome.svd.status.reason, "ComponentUnhealthy");
}

#[test]
fn deleting_issues_a_cluster_delete_and_does_not_requeue() {
    let mut svd = Svd::new(name("ns"), name("a"));
    svd.status.phase = Phase::Deleting;

    let cluster = StubCluster::with_svds(vec![svd.clone()]);
    let (parser, factory) = healthy_collaborators();
    let collaborators = Collaborators { cluster: &cluster, strategy_parser: &parser, installer_factory: &factory };

    let outcome = reconcile(&svd, &collaborators);
    assert_eq!(outcome.svd.status.phase, Phase::Deleting);
    assert!(!outcome.requeue);
    assert_eq!(cluster.deleted.borrow().as_slice(), &[("ns".to_string(), "a".to_string())]);
}

#[test]
fn cross_cutting_precondition_fires_even_from_failed() {
    let mut failed = Svd::new(name("ns"), name("a"));
    failed.status.phase = Phase::Failed;
    let mut replacement = Svd::new(name("ns"), name("b"));
    replacement.replaces = Some(name("a"));

    let cluster = StubCluster::with_svds(vec![failed.clone(), replacement]);
    let (parser, factory) = healthy_collaborators();
    let collaborators = Collaborators { cluster: &cluster, strategy_parser: &parser, installer_factory: &factory };

    let outcome = reconcile(&failed, &collaborators);
    assert_eq!(outcome.svd.status.phase, Phase::Replacing);
    assert_eq!(outcome.svd.status.reason, "BeingReplaced");
    assert!(outcome.error.unwrap().is_sentinel());
    assert!(outcome.requeue);
}

proptest! {
    /// Invariant 3 (`spec.md` §8): the reconciler is idempotent on a
    /// healthy `Succeeded`, on `Failed`, and on `Deleting` — repeated
    /// invocation without external change yields an equal `(phase, reason,
    /// message)`.
    #[test]
    fn idempotent_on_settled_phases(message in "[a-zA-Z0-9 ]{0,20}") {
        for phase in [Phase::Succeeded, Phase::Failed, Phase::Deleting] {
            let mut svd = Svd::new(name("ns"), name("a"));
            svd.status = Status::new(phase, "StableReason", message.clone());

            let cluster = StubCluster::with_svds(vec![svd.clone()]);
            let (parser, factory) = healthy_collaborators();
            let collaborators = Collaborators { cluster: &cluster, strategy_parser: &parser, installer_factory: &factory };

            let first = reconcile(&svd, &collaborators);
            let second = reconcile(&first.svd, &collaborators);
            prop_assert_eq!(first.svd.status.phase, second.svd.status.phase);
            prop_assert_eq!(first.svd.status.reason, second.svd.status.reason);
            prop_assert_eq!(first.svd.status.message, second.svd.status.message);
        }
    }
}
