//! CS-Replica: command-line host for one committee sync replica.
//!
//! Each invocation opens the replica's JSON state file, runs one operation
//! through `CommitteeSyncService`, and prints the result as JSON on stdout.
//! Logs go to stderr.

pub mod cli;
pub mod commands;

pub use cli::{Cli, Command};
pub use commands::{run, write_metrics};
