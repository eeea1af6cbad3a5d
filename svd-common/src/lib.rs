//! Collaborator traits and configuration shared across the SVD lifecycle
//! controller, per `spec.md` §6.
//!
//! Every trait here is object-safe so the dispatcher (`svd-queue`) and the
//! reconciler (`svd-reconcile`) can be wired up over trait objects without a
//! generic-parameter explosion, and so test doubles can stand in for real
//! cluster/installer collaborators.
#![forbid(unsafe_code)]

mod catalog;
pub use catalog::{CatalogSource, SourceRef};

mod cluster;
pub use cluster::{ClusterApi, CustomResource};

mod config;
pub use config::{Config, DEFAULT_WAKEUP_INTERVAL};

mod error;
pub use error::{ClusterError, InstallError, NotFound, StrategyError};

mod installer;
pub use installer::{Installer, InstallerFactory, Strategy, StrategyParser};
