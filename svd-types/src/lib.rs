//! Core data model for the SVD lifecycle controller.
//!
//! This crate defines the value types shared by the resolver, the
//! reconciler and their collaborators: validated [`Name`]s, schema
//! references, the lifecycle [`Phase`] and the [`Svd`] descriptor itself.
//! It owns no behavior beyond what is derivable from a value in isolation —
//! the catalog lookup, resolver and reconciler algorithms live in their own
//! crates (`svd-catalog`, `svd-resolve`, `svd-reconcile`).
#![forbid(unsafe_code)]

mod error;
pub use error::Error;

mod name;
pub use name::Name;

mod phase;
pub use phase::Phase;

mod schema;
pub use schema::{SchemaDef, SchemaRef, SCHEMA_KIND, SVD_KIND};

mod svd;
pub use svd::{RequirementStatus, Status, Svd};

mod source_key;
pub use source_key::SourceKey;
