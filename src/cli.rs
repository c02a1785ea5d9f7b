//! Command line interface for the `stepwise` demo binary.
//!
//! Selects which sample units run and how.

use std::num::NonZeroUsize;

use clap::Parser;

/// Command line arguments for the `stepwise` binary.
#[derive(Debug, Parser)]
#[command(name = "stepwise", version, about = "Run the bundled stepwise sample features")]
pub struct Cli {
    /// Only run units whose qualified name contains this text.
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Number of units run at once.
    #[arg(short, long, default_value = "1")]
    pub concurrency: NonZeroUsize,

    /// Timeout in milliseconds for steps that set none of their own.
    #[arg(long, value_name = "MS")]
    pub step_timeout_ms: Option<u64>,

    /// Print the qualified unit names instead of running them.
    #[arg(short, long)]
    pub list: bool,
}
