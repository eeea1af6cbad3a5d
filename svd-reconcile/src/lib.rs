//! The per-SVD lifecycle state machine, per `spec.md` §4.6.
//!
//! [`reconcile`] drives a single service version descriptor through its
//! phases (requirement verification → install-ready → installing →
//! succeeded | failed | replacing → deleting), consulting the replacement
//! graph (§4.3), requirement checker (§4.4) and ownership arbitrator (§4.5)
//! along the way, and invoking the installer collaborator (§6) for the
//! install-ready/installing phases. It never streams or watches anything —
//! it is a pure function of an SVD plus its collaborators, called once per
//! dispatch tick by `svd-queue`.
#![forbid(unsafe_code)]

mod arbitration;
pub use arbitration::check_ownership;

mod error;
pub use error::Error;

mod reconciler;
pub use reconciler::{reconcile, Collaborators, Outcome};

mod replacement;
pub use replacement::ReplacementGraph;

mod requirement;
pub use requirement::{all_met, check_requirements};
