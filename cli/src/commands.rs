pub mod probe;
pub mod registry;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "fleetprobe")]
#[command(about = "Server-fleet inventory and health probing.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Show per-stage diagnostics
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Probe a list of hosts and collect inventory facts
    #[command(alias = "p")]
    Probe(ProbeArgs),
    /// Probe hosts and apply a registry change, capturing rollback data
    #[command(alias = "r")]
    Registry(RegistryArgs),
}

#[derive(Args)]
pub struct ProbeArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Emit minimal, uninherited rows for volumes past the first
    #[arg(long)]
    pub report: bool,
}

#[derive(Args)]
pub struct RegistryArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Registry path, e.g. HKLM\SOFTWARE\Contoso\Agent
    #[arg(long)]
    pub path: String,

    /// Value name under the path
    #[arg(long)]
    pub name: String,

    /// Value kind: string, expandstring, binary, dword, multistring, qword
    #[arg(long)]
    pub kind: String,

    /// New value (binary as hex, multistring `;`-separated)
    #[arg(long)]
    pub value: String,
}

#[derive(Args)]
pub struct CommonArgs {
    /// Host list file: one host per line, optional `,role,location` columns
    pub list: PathBuf,

    /// Verify remote execution per call instead of keeping one session per host
    #[arg(long)]
    pub no_sessions: bool,

    /// Attempt every stage even when a host's gate is unmet
    #[arg(long)]
    pub no_error_check: bool,

    /// Drop the trailing blank rows after volume expansion
    #[arg(long)]
    pub no_separators: bool,

    /// Hosts probed concurrently
    #[arg(long, default_value_t = 8)]
    pub parallel: usize,

    /// Per-call timeout in seconds
    #[arg(long, default_value_t = 15)]
    pub timeout: u64,

    /// Write the full record set as tab-separated rows
    #[arg(long)]
    pub output: Option<PathBuf>,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
