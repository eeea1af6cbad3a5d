//! Command-line argument handling for `svd-controller`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use strum::Display;

/// Output format for the `resolve` subcommand.
#[derive(Clone, Debug, Default, Display, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable, one step per line.
    #[default]
    #[strum(to_string = "text")]
    Text,
    /// The JSON output format.
    #[strum(to_string = "json")]
    Json,
}

/// The command-line interface for `svd-controller`.
#[derive(Debug, Parser)]
#[clap(
    about = "Reference CLI for the SVD lifecycle controller: resolves install plans and runs the reconciler against fixture data.",
    author,
    name = "svd-controller",
    version
)]
pub struct Cli {
    /// Log verbosity level.
    #[command(flatten)]
    pub verbose: clap_verbosity_flag::Verbosity,

    /// The `svd-controller` commands.
    #[clap(subcommand)]
    pub command: Command,
}

/// The `svd-controller` subcommands.
#[derive(Debug, Parser)]
pub enum Command {
    /// Resolve an install plan from one or more catalog fixtures.
    ///
    /// Sources are scanned in the order given on the command line; the
    /// first source containing a requested name wins, per `spec.md` §4.2.
    Resolve {
        /// A catalog fixture JSON file. May be repeated; order is precedence.
        #[arg(short, long = "catalog", value_name = "FILE", required = true)]
        catalogs: Vec<PathBuf>,

        /// A requested SVD name. May be repeated.
        #[arg(short, long = "name", value_name = "SVD", required = true)]
        names: Vec<String>,

        /// The output format to use.
        #[arg(short, long, value_name = "FORMAT", default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Run the reconciler's dispatcher loop against a catalog fixture's
    /// SVDs, seeded directly onto an in-memory cluster.
    ///
    /// This is a bounded demonstration run, not a daemon: it drains the
    /// queue for at most `--ticks` dispatch ticks (or until the queue goes
    /// idle, whichever comes first) and prints the final phase of every
    /// reconciled SVD.
    Run {
        /// A catalog fixture JSON file to seed the cluster with.
        #[arg(short, long, value_name = "FILE")]
        catalog: PathBuf,

        /// Restrict reconciliation to this namespace; defaults to every
        /// namespace present in the fixture.
        #[arg(short, long, value_name = "NAMESPACE")]
        namespace: Option<String>,

        /// The maximum number of dispatch ticks to run.
        #[arg(short, long, value_name = "COUNT", default_value_t = 64)]
        ticks: usize,
    },
}
