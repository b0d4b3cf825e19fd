use alloy::primitives::{Address, U256};
use serde::Serialize;

use crate::units::{to_display_amount, DisplayAmount, MinimalUnits, NATIVE_DECIMALS};

/// Stake held by the account with one validator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DelegationPosition {
    pub validator: Address,
    pub stake: MinimalUnits,
    pub rewards: MinimalUnits,
}

impl DelegationPosition {
    pub fn stake_display(&self) -> DisplayAmount {
        to_display_amount(self.stake, NATIVE_DECIMALS)
    }

    pub fn rewards_display(&self) -> DisplayAmount {
        to_display_amount(self.rewards, NATIVE_DECIMALS)
    }
}

/// Validator operated by the account, earning commission
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidatorPosition {
    pub validator: Address,
    pub total_stake: MinimalUnits,
    pub commission_reward: MinimalUnits,
}

impl ValidatorPosition {
    pub fn total_stake_display(&self) -> DisplayAmount {
        to_display_amount(self.total_stake, NATIVE_DECIMALS)
    }

    pub fn commission_display(&self) -> DisplayAmount {
        to_display_amount(self.commission_reward, NATIVE_DECIMALS)
    }
}

/// One batch of a paged contract read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Set on the last batch
    pub end: bool,
}

/// State-changing call on the staking contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "method", content = "validator", rename_all = "camelCase")]
pub enum StakingCall {
    ClaimRewards(Address),
    ClaimCommissionRewards(Address),
    Delegate(Address),
}

impl StakingCall {
    pub fn method(&self) -> &'static str {
        match self {
            Self::ClaimRewards(_) => "claimRewards",
            Self::ClaimCommissionRewards(_) => "claimCommissionRewards",
            Self::Delegate(_) => "delegate",
        }
    }

    pub fn validator(&self) -> Address {
        match self {
            Self::ClaimRewards(v) | Self::ClaimCommissionRewards(v) | Self::Delegate(v) => *v,
        }
    }

    pub fn is_claim(&self) -> bool {
        !matches!(self, Self::Delegate(_))
    }
}

impl std::fmt::Display for StakingCall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.method(), self.validator())
    }
}

/// Fully specified transaction, ready for signing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StakingTx {
    pub call: StakingCall,
    pub chain_id: u64,
    pub nonce: u64,
    pub gas_limit: u64,
    pub gas_price: u128,
    pub value: U256,
}
