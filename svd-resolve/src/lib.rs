//! Multi-source transitive dependency resolver for service version
//! descriptors, per `spec.md` §4.2.
//!
//! Given one or more catalog sources and a list of requested SVD names,
//! [`resolve`] produces a deterministic, duplicate-free install plan,
//! attributing every produced step to the catalog that supplied it. The
//! resolver is fully in-memory given a [`svd_common::CatalogSource`] view —
//! it never touches the cluster.
#![forbid(unsafe_code)]

mod error;
pub use error::Error;

mod plan;
pub use plan::Plan;

mod resolver;
pub use resolver::{resolve, Resolution, Resource, Step};
