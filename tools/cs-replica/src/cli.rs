use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CS-Replica: committee sync replica tool
#[derive(Parser, Debug)]
#[command(name = "cs-replica")]
#[command(about = "Create, inspect and advance a committee sync replica")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Write Prometheus text metrics to this file after the command
    #[arg(long, global = true)]
    pub metrics_out: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a fresh state file whose committee is a single seed member
    Genesis {
        /// State file to create
        #[arg(long)]
        state: PathBuf,

        /// Seed member address (hex, `0x` optional)
        #[arg(long)]
        seed: String,

        /// Overwrite an existing state file
        #[arg(long)]
        force: bool,
    },

    /// Print committee, nonce, updated and config as JSON
    Show {
        #[arg(long)]
        state: PathBuf,
    },

    /// Print the digest committee members must sign for a proposal
    Hash {
        #[arg(long)]
        state: PathBuf,

        /// Proposal file (one step; signatures are ignored)
        #[arg(long)]
        proposal: PathBuf,

        /// Nonce to hash for (default: current nonce + 1)
        #[arg(long)]
        nonce: Option<u64>,
    },

    /// Apply a batch of signed steps, all or nothing
    Apply {
        #[arg(long)]
        state: PathBuf,

        /// JSON array of steps, or a single step object
        #[arg(long)]
        batch: PathBuf,
    },

    /// Bootstrap nonce jump by the seed member
    ///
    /// The caller identity is asserted by the operator running the tool; no
    /// signature is checked. Restrict access to the state file accordingly.
    Init {
        #[arg(long)]
        state: PathBuf,

        /// Caller address (hex), asserted by the operator; must be the sole committee member
        #[arg(long)]
        caller: String,

        #[arg(long)]
        nonce: u64,
    },
}
