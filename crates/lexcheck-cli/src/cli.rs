//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Lexcheck CLI - Extract statute references from documents and verify they are in force.
#[derive(Debug, Parser)]
#[command(name = "lexcheck")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Database file, overriding the configuration
    #[arg(short, long, global = true)]
    pub database: Option<PathBuf>,

    /// API key for the legal database
    #[arg(long, env = "LEXCHECK_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Log progress to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (IDs only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract and verify the statute references of a text file
    Extract(ExtractArgs),

    /// List statute records
    List(ListArgs),

    /// Show one statute record
    Show(ShowArgs),

    /// Verify one statute record again, bypassing cached answers
    Verify(VerifyArgs),

    /// Re-verify stale records
    Sweep(SweepArgs),

    /// Forget (delete) a document and its statute records
    Forget(ForgetArgs),
}

/// Arguments for the extract command.
#[derive(Debug, Parser)]
pub struct ExtractArgs {
    /// Plain text file to scan
    pub file: PathBuf,

    /// Document identifier the records belong to
    #[arg(short = 'D', long)]
    pub document: i64,

    /// Document label (defaults to the file name)
    #[arg(short, long)]
    pub label: Option<String>,
}

/// Arguments for the list command.
#[derive(Debug, Parser)]
pub struct ListArgs {
    /// Only records of this document
    #[arg(short = 'D', long)]
    pub document: Option<i64>,

    /// Only records verified as no longer in force
    #[arg(long, conflicts_with = "status")]
    pub outdated: bool,

    /// Only records with this status
    #[arg(short, long, value_enum)]
    pub status: Option<StatusArg>,

    /// Page number (1-based)
    #[arg(long)]
    pub page: Option<usize>,

    /// Records per page (at most 100)
    #[arg(long)]
    pub per_page: Option<usize>,
}

/// Arguments for the show command.
#[derive(Debug, Parser)]
pub struct ShowArgs {
    /// Statute record ID
    pub id: i64,
}

/// Arguments for the verify command.
#[derive(Debug, Parser)]
pub struct VerifyArgs {
    /// Statute record ID
    pub id: i64,
}

/// Arguments for the sweep command.
#[derive(Debug, Parser)]
pub struct SweepArgs {
    /// Keep sweeping on the configured interval until Ctrl+C
    #[arg(short, long, conflicts_with = "cycles")]
    pub watch: bool,

    /// Run this many sweeps on the configured interval
    #[arg(short = 'n', long)]
    pub cycles: Option<usize>,

    /// Only report what would be re-verified
    #[arg(long)]
    pub dry_run: bool,

    /// Re-verify records verified more than this many hours ago
    #[arg(long)]
    pub stale_after_hours: Option<u64>,

    /// Maximum records per sweep
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Arguments for the forget command.
#[derive(Debug, Parser)]
pub struct ForgetArgs {
    /// Document identifier
    pub document: i64,

    /// Skip confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,
}

/// Status argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum StatusArg {
    /// Never verified
    Unverified,
    /// Verified as in force
    Current,
    /// Verified as no longer in force
    Outdated,
    /// Verification failed
    Unresolved,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

impl From<StatusArg> for lexcheck_domain::VerificationStatus {
    fn from(status: StatusArg) -> Self {
        match status {
            StatusArg::Unverified => lexcheck_domain::VerificationStatus::Unverified,
            StatusArg::Current => lexcheck_domain::VerificationStatus::Current,
            StatusArg::Outdated => lexcheck_domain::VerificationStatus::Outdated,
            StatusArg::Unresolved => lexcheck_domain::VerificationStatus::Unresolved,
        }
    }
}
