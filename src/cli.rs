use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "dpos-restaker")]
#[command(version = "0.1.0")]
#[command(
    about = "Claim DPOS delegation and commission rewards, then re-delegate the balance",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config directory (default.toml, <RESTAKER_ENV>.toml)
    #[arg(short, long, default_value = "config", global = true)]
    pub config: String,

    /// JSON-RPC endpoint (overrides chain.rpc_url)
    #[arg(long, env = "RESTAKER_RPC_URL", global = true)]
    pub rpc_url: Option<String>,

    /// Print the final report as JSON on stdout
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Claim all rewards, wait for settlement and delegate the balance (default)
    Run {
        /// Discover and plan only; submit nothing
        #[arg(long)]
        dry_run: bool,
        /// Validator to delegate to (overrides delegation.target_validator)
        #[arg(long)]
        target: Option<String>,
    },
    /// List delegations and validator roles with their claimable rewards
    Positions,
    /// Show the balance and the whole units a run would delegate
    Balance,
}

impl Cli {
    pub fn resolved_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Run {
            dry_run: false,
            target: None,
        })
    }
}
