use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "backpack")]
#[command(version)]
#[command(about = "Declarative GitHub organization management", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true, default_value = "backpack.toml")]
    pub config: String,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Converge remote GitHub state to match the configuration
    Converge(ConvergeArgs),

    /// Load the configuration and report what it declares
    Validate,

    /// Print the desired-state graph
    Show,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser)]
pub struct ConvergeArgs {
    /// GitHub API token
    #[arg(long, env = "GITHUB_TOKEN")]
    pub token: Option<String>,

    /// Only converge the named organization
    #[arg(short, long)]
    pub org: Option<String>,

    /// Show what would change without issuing mutating calls
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Delete unmanaged remote teams instead of warning about them
    #[arg(long)]
    pub delete_unmanaged_teams: bool,

    /// API base URL (for GitHub Enterprise installations)
    #[arg(long)]
    pub api_base: Option<String>,
}
