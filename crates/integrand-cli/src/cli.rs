use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "integrand",
    about = "Integrand: sumcheck stage listings, degree checks and claim resolution",
    version
)]
pub struct Cli {
    /// Path to integrand.toml (defaults to ./integrand.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List stages and their specifications in plain text
    Show {
        /// Only show these stage indices (repeatable)
        #[arg(long = "stage")]
        stages: Vec<u32>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Replay the produce/consume ledger over every stage
    Resolve {
        /// Exit non-zero when derived claims remain unresolved
        #[arg(long)]
        strict: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a standalone LaTeX document of the selected stages
    Latex {
        /// Only include these stage indices (repeatable)
        #[arg(long = "stage")]
        stages: Vec<u32>,

        /// Output path (overrides [latex].out)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// List registered polynomials and parameters
    Registry {
        /// Filter by provenance: committed, derived, computable (repeatable)
        #[arg(long = "kind")]
        kinds: Vec<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compare declared integrand degrees with the inferred ones
    DegreeCheck {
        /// Exit non-zero on any mismatch
        #[arg(long)]
        strict: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
