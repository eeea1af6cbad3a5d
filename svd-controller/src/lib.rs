//! Library half of the `svd-controller` binary, split out so integration
//! tests can exercise the subcommand implementations directly as well as
//! through the compiled binary.
#![forbid(unsafe_code)]

pub mod cli;
pub mod commands;
pub mod error;

pub use error::Error;
