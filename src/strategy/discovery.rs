//! Position discovery: every delegation and validator role held by the account

use alloy::primitives::Address;
use serde::Serialize;
use std::future::Future;
use tracing::info;

use crate::chain::StakingChain;
use crate::domain::{DelegationPosition, Page, StakingCall, ValidatorPosition};
use crate::error::Result;
use crate::units::{to_display_amount, MinimalUnits, NATIVE_DECIMALS};

/// Snapshot of the account's reward-bearing positions, in chain order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Positions {
    pub delegations: Vec<DelegationPosition>,
    pub validators: Vec<ValidatorPosition>,
}

impl Positions {
    pub fn is_empty(&self) -> bool {
        self.delegations.is_empty() && self.validators.is_empty()
    }

    /// One claim per position: delegations first, then validators
    pub fn claim_plan(&self) -> Vec<StakingCall> {
        self.delegations
            .iter()
            .map(|d| StakingCall::ClaimRewards(d.validator))
            .chain(
                self.validators
                    .iter()
                    .map(|v| StakingCall::ClaimCommissionRewards(v.validator)),
            )
            .collect()
    }

    pub fn total_stake(&self) -> Result<MinimalUnits> {
        self.delegations
            .iter()
            .map(|d| d.stake)
            .try_fold(MinimalUnits::ZERO, MinimalUnits::checked_add)
    }

    /// Delegation rewards plus validator commissions
    pub fn total_rewards(&self) -> Result<MinimalUnits> {
        self.delegations
            .iter()
            .map(|d| d.rewards)
            .chain(self.validators.iter().map(|v| v.commission_reward))
            .try_fold(MinimalUnits::ZERO, MinimalUnits::checked_add)
    }
}

/// Read batch 0, 1, … until the contract flags the last one
async fn collect_pages<T, F, Fut>(mut fetch: F) -> Result<Vec<T>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    let mut items = Vec::new();
    let mut batch = 0u32;
    loop {
        let page = fetch(batch).await?;
        let exhausted = page.end || page.items.is_empty();
        items.extend(page.items);
        if exhausted {
            return Ok(items);
        }
        batch += 1;
    }
}

pub async fn list_delegations<C>(chain: &C, account: Address) -> Result<Vec<DelegationPosition>>
where
    C: StakingChain + ?Sized,
{
    collect_pages(move |batch| chain.delegations(account, batch)).await
}

pub async fn list_validator_positions<C>(
    chain: &C,
    account: Address,
) -> Result<Vec<ValidatorPosition>>
where
    C: StakingChain + ?Sized,
{
    collect_pages(move |batch| chain.validators_for(account, batch)).await
}

/// Read both position kinds. Any failure aborts discovery as a whole.
pub async fn discover<C>(chain: &C, account: Address) -> Result<Positions>
where
    C: StakingChain + ?Sized,
{
    let delegations = list_delegations(chain, account).await?;
    info!("Your current delegations are: {}", delegations.len());
    for d in &delegations {
        info!(
            "Validator account: {} Stake: {} Reward: {}",
            d.validator,
            d.stake_display(),
            d.rewards_display()
        );
    }

    let validators = list_validator_positions(chain, account).await?;
    info!("Your current validators are: {}", validators.len());
    for v in &validators {
        info!(
            "Validator account: {} Stake: {} Commission reward: {}",
            v.validator,
            v.total_stake_display(),
            v.commission_display()
        );
    }

    let positions = Positions {
        delegations,
        validators,
    };
    info!(
        "Total delegated: {}, claimable: {}",
        to_display_amount(positions.total_stake()?, NATIVE_DECIMALS),
        to_display_amount(positions.total_rewards()?, NATIVE_DECIMALS)
    );
    Ok(positions)
}
