//! One-shot restake run: discover → claim → settle → delegate

use alloy::primitives::Address;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;
use tracing::{info, instrument};

use super::claimer::{claim_all, ClaimRecord};
use super::delegation::{DelegationOutcome, DelegationPolicy, DEFAULT_MIN_WHOLE_UNITS};
use super::discovery::{discover, Positions};
use super::session::{AccountSession, DEFAULT_GAS_LIMIT};
use super::settlement::{SettlementBarrier, DEFAULT_POLL_INTERVAL};
use crate::chain::StakingChain;
use crate::error::Result;
use crate::signing::Wallet;
use crate::units::{to_display_amount, DisplayAmount, NATIVE_DECIMALS};

/// Everything a run needs besides the key and the chain connection
#[derive(Debug, Clone)]
pub struct RestakeConfig {
    pub target_validator: Address,
    pub min_delegation_whole_units: u64,
    pub poll_interval: Duration,
    /// `None` waits for settlement indefinitely
    pub settlement_timeout: Option<Duration>,
    pub gas_limit: u64,
    pub dry_run: bool,
}

impl RestakeConfig {
    pub fn new(target_validator: Address) -> Self {
        Self {
            target_validator,
            min_delegation_whole_units: DEFAULT_MIN_WHOLE_UNITS,
            poll_interval: DEFAULT_POLL_INTERVAL,
            settlement_timeout: None,
            gas_limit: DEFAULT_GAS_LIMIT,
            dry_run: false,
        }
    }
}

/// Summary of a finished run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub account: Address,
    pub chain_id: u64,
    pub block_number: u64,
    pub dry_run: bool,
    pub start_nonce: u64,
    pub final_nonce: u64,
    pub positions: Positions,
    pub claims: Vec<ClaimRecord>,
    pub balance: DisplayAmount,
    pub delegation: DelegationOutcome,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

pub struct Restaker<'a, C: ?Sized> {
    chain: &'a C,
    config: RestakeConfig,
}

impl<'a, C> Restaker<'a, C>
where
    C: StakingChain + ?Sized,
{
    pub fn new(chain: &'a C, config: RestakeConfig) -> Self {
        Self { chain, config }
    }

    pub fn config(&self) -> &RestakeConfig {
        &self.config
    }

    /// Run every step once. The first error ends the run; transactions
    /// accepted before it are left as they are.
    #[instrument(skip_all, fields(account = %wallet.address(), dry_run = self.config.dry_run))]
    pub async fn run(&self, wallet: &Wallet) -> Result<RunReport> {
        let started_at = Utc::now();
        info!("Account address: {}", wallet.address());

        let mut session = AccountSession::open(self.chain, wallet, self.config.gas_limit).await?;
        info!("Chain ID {}", session.chain_id());

        let block_number = self.chain.block_number().await?;
        info!("Block number {}", block_number);

        let positions = discover(self.chain, session.account()).await?;

        let claims = if self.config.dry_run {
            for call in positions.claim_plan() {
                info!("[DRY RUN] Would submit {}", call);
            }
            Vec::new()
        } else {
            claim_all(self.chain, &mut session, &positions).await?
        };

        // Nothing was submitted in dry-run, so there is nothing to wait for.
        if session.submitted() > 0 {
            SettlementBarrier::new(self.config.poll_interval)
                .with_timeout(self.config.settlement_timeout)
                .await_settlement(self.chain, session.account(), session.next_nonce())
                .await?;
        }

        let policy = DelegationPolicy::new(self.config.target_validator)
            .with_min_whole_units(self.config.min_delegation_whole_units);
        let delegation = policy
            .delegate_balance(self.chain, &mut session, self.config.dry_run)
            .await?;

        let report = RunReport {
            account: session.account(),
            chain_id: session.chain_id(),
            block_number,
            dry_run: self.config.dry_run,
            start_nonce: session.start_nonce(),
            final_nonce: session.next_nonce(),
            positions,
            claims,
            balance: to_display_amount(delegation.balance, NATIVE_DECIMALS),
            delegation,
            started_at,
            finished_at: Utc::now(),
        };

        info!(
            "Restake run complete: {} claim(s), delegated {}",
            report.claims.len(),
            report
                .delegation
                .delegated
                .as_ref()
                .map(|d| to_display_amount(d.amount, NATIVE_DECIMALS).to_string())
                .unwrap_or_else(|| "nothing".to_string())
        );

        Ok(report)
    }
}
