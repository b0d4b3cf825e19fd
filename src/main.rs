use clap::Parser;
use dpos_restaker::cli::{Cli, Commands};
use dpos_restaker::config::AppConfig;
use dpos_restaker::error::{RestakerError, Result};
use dpos_restaker::strategy::{discover, DelegationPolicy, Positions, Restaker, RunReport};
use dpos_restaker::units::{to_display_amount, to_whole_units, NATIVE_DECIMALS};
use dpos_restaker::{DposClient, StakingChain, Wallet};
use std::future::Future;
use std::process::ExitCode;
use tracing::error;

mod main_runtime;

use main_runtime::{init_logging, init_logging_simple, shutdown_signal};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match AppConfig::load_from(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            init_logging_simple();
            error!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    apply_cli_overrides(&mut config, &cli);

    let _log_guard = init_logging(&config.logging);

    if let Err(errors) = config.validate() {
        for e in errors {
            error!("Invalid configuration: {}", e);
        }
        return ExitCode::FAILURE;
    }

    let result = until_shutdown(execute(&cli, &config), shutdown_signal()).await;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.step() {
                Some(step) => error!(step, "Restake failed: {}", e),
                None => error!("Restake failed: {}", e),
            }
            ExitCode::FAILURE
        }
    }
}

/// Run `work` to completion unless `shutdown` resolves first
async fn until_shutdown<W, S>(work: W, shutdown: S) -> Result<()>
where
    W: Future<Output = Result<()>>,
    S: Future<Output = ()>,
{
    tokio::select! {
        result = work => result,
        _ = shutdown => Err(RestakerError::Cancelled),
    }
}

fn apply_cli_overrides(config: &mut AppConfig, cli: &Cli) {
    if let Some(rpc_url) = &cli.rpc_url {
        config.chain.rpc_url = rpc_url.clone();
    }
    if let Commands::Run { dry_run, target } = cli.resolved_command() {
        config.dry_run |= dry_run;
        if let Some(target) = target {
            config.delegation.target_validator = target;
        }
    }
}

async fn execute(cli: &Cli, config: &AppConfig) -> Result<()> {
    let wallet = Wallet::from_env()?;
    let client = DposClient::connect(&config.chain.rpc_url, config.staking_contract()?, &wallet)?;

    match cli.resolved_command() {
        Commands::Run { .. } => {
            let report = Restaker::new(&client, config.restake_config()?)
                .run(&wallet)
                .await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
        }
        Commands::Positions => {
            let positions = discover(&client, wallet.address()).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&positions)?);
            } else {
                print_positions(&positions)?;
            }
        }
        Commands::Balance => {
            let restake = config.restake_config()?;
            let balance = client.balance(wallet.address()).await?;
            let planned = DelegationPolicy::new(restake.target_validator)
                .with_min_whole_units(restake.min_delegation_whole_units)
                .delegation_amount(balance)?;

            println!("Account:       {}", wallet.address());
            println!("Balance:       {}", to_display_amount(balance, NATIVE_DECIMALS));
            println!("Whole units:   {}", to_whole_units(balance));
            match planned {
                Some(amount) => println!(
                    "Would delegate {} to {}",
                    to_display_amount(amount, NATIVE_DECIMALS),
                    restake.target_validator
                ),
                None => println!("Nothing to delegate"),
            }
        }
    }

    Ok(())
}

fn print_positions(positions: &Positions) -> Result<()> {
    println!("Delegations ({}):", positions.delegations.len());
    for d in &positions.delegations {
        println!(
            "  {}  stake {:>24}  reward {:>24}",
            d.validator,
            d.stake_display(),
            d.rewards_display()
        );
    }
    println!("Validators ({}):", positions.validators.len());
    for v in &positions.validators {
        println!(
            "  {}  stake {:>24}  commission {:>20}",
            v.validator,
            v.total_stake_display(),
            v.commission_display()
        );
    }
    println!(
        "Total claimable: {}",
        to_display_amount(positions.total_rewards()?, NATIVE_DECIMALS)
    );
    Ok(())
}

fn print_report(report: &RunReport) {
    let mode = if report.dry_run { " (dry run)" } else { "" };
    println!("Restake run{}", mode);
    println!("  Account:   {}", report.account);
    println!("  Chain ID:  {}  block {}", report.chain_id, report.block_number);
    println!("  Nonces:    {} -> {}", report.start_nonce, report.final_nonce);
    for claim in &report.claims {
        println!("  Claimed    {} nonce {} tx {}", claim.call, claim.nonce, claim.tx_hash);
    }
    println!("  Balance:   {}", report.balance);
    match (&report.delegation.delegated, report.delegation.planned) {
        (Some(d), _) => println!(
            "  Delegated: {} to {} nonce {} tx {}",
            to_display_amount(d.amount, NATIVE_DECIMALS),
            d.validator,
            d.nonce,
            d.tx_hash
        ),
        (None, Some(amount)) => println!(
            "  Would delegate: {}",
            to_display_amount(amount, NATIVE_DECIMALS)
        ),
        (None, None) => println!("  Delegated: nothing"),
    }
}
