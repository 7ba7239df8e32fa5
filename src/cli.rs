use crate::commands;
use clap::{Parser, Subcommand};
use std::fmt::{self, Display};

/// CLI tool for the NEYXT discovery and claim flow
#[derive(Parser)]
#[command(name = "cli-neyxt")]
#[command(version = "1.0")]
#[command(about = "A CLI for NEYXT genesis balances and vested-token claims", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check an address against the genesis allowlist and its vesting wallet.
    #[command(
        name = "check",
        about = "Check an address for genesis membership and an attached vesting wallet"
    )]
    Check {
        #[arg(long, help = "The address to check. Example: 0x1134Bb07cb7F35946E7e02f58cA7fcC64698B59b")]
        address: String,
    },

    /// Retrieve the native and token balances of an address.
    #[command(
        name = "balance",
        about = "Retrieve the ETH and NEYXT balances for a specific address"
    )]
    Balance {
        #[arg(long, help = "The address to retrieve the balances for")]
        address: String,
    },

    /// Connect through the wallet bridge and show the active account.
    #[command(
        name = "connect",
        about = "Request wallet access and show balances for the authorized account"
    )]
    Connect,

    /// Re-request permissions so a different wallet account can be picked.
    #[command(
        name = "switch-account",
        about = "Re-request wallet permissions and adopt the newly selected account"
    )]
    SwitchAccount,

    /// Ask the wallet to switch to the expected network.
    #[command(
        name = "switch-network",
        about = "Switch the wallet to the expected chain, registering it if unknown"
    )]
    SwitchNetwork,

    /// Check the vesting status of a beneficiary.
    #[command(
        name = "status",
        about = "Show the vesting schedule and claimable amount for a beneficiary"
    )]
    VestingStatus {
        #[arg(long, help = "The beneficiary address to check the vesting status for")]
        beneficiary: String,
    },

    /// Release vested tokens through the connected wallet.
    #[command(
        name = "claim",
        about = "Release the claimable vested tokens for the connected account"
    )]
    Claim,

    /// List genesis addresses stored in the configuration.
    #[command(
        name = "list-genesis",
        about = "List all genesis addresses from current config"
    )]
    ListGenesis,

    /// Print the mobile wallet deep link for this flow.
    #[command(
        name = "deep-link",
        about = "Print the mobile wallet deep link to open the claim flow"
    )]
    DeepLink,
}

pub async fn run() {
    let cli = Cli::parse();

    log::info!("Command executed: {}", cli.command);

    let result = match cli.command {
        Commands::Check { ref address } => commands::check::print_check(address).await,
        Commands::Balance { ref address } => commands::balance::print_balance(address).await,
        Commands::Connect => commands::connect::print_connect().await,
        Commands::SwitchAccount => commands::switch_account::print_switch_account().await,
        Commands::SwitchNetwork => commands::switch_network::print_switch_network().await,
        Commands::VestingStatus { ref beneficiary } => {
            commands::status::print_vesting_status(beneficiary).await
        }
        Commands::Claim => commands::claim::print_claim().await,
        Commands::ListGenesis => commands::genesis::print_genesis_addresses(),
        Commands::DeepLink => commands::deep_link::print_deep_link(),
    };

    if let Err(e) = result {
        log::error!("Error executing command: {}", e);
        eprintln!("{e}");
        std::process::exit(1);
    }
}

impl Display for Commands {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Commands::Check { address } => write!(f, "Check {address}"),
            Commands::Balance { address } => write!(f, "Balance for {address}"),
            Commands::Connect => write!(f, "Connect Wallet"),
            Commands::SwitchAccount => write!(f, "Switch Account"),
            Commands::SwitchNetwork => write!(f, "Switch Network"),
            Commands::VestingStatus { beneficiary } => {
                write!(f, "Vesting Status for {beneficiary}")
            }
            Commands::Claim => write!(f, "Claim Vested Tokens"),
            Commands::ListGenesis => write!(f, "List Genesis Addresses"),
            Commands::DeepLink => write!(f, "Mobile Deep Link"),
        }
    }
}
