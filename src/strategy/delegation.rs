//! Delegation step: re-stake the settled balance in whole units

use alloy::primitives::{Address, TxHash, U256};
use serde::Serialize;
use tracing::info;

use super::session::AccountSession;
use crate::chain::StakingChain;
use crate::domain::StakingCall;
use crate::error::Result;
use crate::units::{
    to_display_amount, to_minimal_unit, to_whole_units, DisplayAmount, MinimalUnits,
    NATIVE_DECIMALS,
};

/// Default strict lower bound on whole units before delegating
pub const DEFAULT_MIN_WHOLE_UNITS: u64 = 1;

/// Delegation accepted by the node
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DelegationRecord {
    pub validator: Address,
    pub amount: MinimalUnits,
    pub nonce: u64,
    pub tx_hash: TxHash,
}

/// What the step observed and did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DelegationOutcome {
    pub balance: MinimalUnits,
    pub whole_units: U256,
    /// Amount that was (or in dry-run would be) delegated
    pub planned: Option<MinimalUnits>,
    pub delegated: Option<DelegationRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelegationPolicy {
    pub target: Address,
    /// Delegate only when whole units are strictly greater than this
    pub min_whole_units: u64,
}

impl DelegationPolicy {
    pub fn new(target: Address) -> Self {
        Self {
            target,
            min_whole_units: DEFAULT_MIN_WHOLE_UNITS,
        }
    }

    pub fn with_min_whole_units(mut self, min_whole_units: u64) -> Self {
        self.min_whole_units = min_whole_units;
        self
    }

    /// Truncated whole-unit amount to delegate, `None` below the threshold.
    /// The fractional remainder stays in the account for gas.
    pub fn delegation_amount(&self, balance: MinimalUnits) -> Result<Option<MinimalUnits>> {
        let whole_units = to_whole_units(balance);
        if whole_units <= U256::from(self.min_whole_units) {
            return Ok(None);
        }
        to_minimal_unit(&DisplayAmount::from_integer(whole_units), NATIVE_DECIMALS).map(Some)
    }

    /// Read the settled balance and delegate it if above the threshold.
    /// With `dry_run` nothing is submitted.
    pub async fn delegate_balance<C>(
        &self,
        chain: &C,
        session: &mut AccountSession,
        dry_run: bool,
    ) -> Result<DelegationOutcome>
    where
        C: StakingChain + ?Sized,
    {
        let balance = chain.balance(session.account()).await?;
        let whole_units = to_whole_units(balance);
        info!(
            "Current balance: {}",
            to_display_amount(balance, NATIVE_DECIMALS)
        );

        let Some(amount) = self.delegation_amount(balance)? else {
            info!(
                "Balance of {} whole unit(s) is not above {}; nothing to delegate",
                whole_units, self.min_whole_units
            );
            return Ok(DelegationOutcome {
                balance,
                whole_units,
                planned: None,
                delegated: None,
            });
        };

        let call = StakingCall::Delegate(self.target);
        if dry_run {
            info!(
                "[DRY RUN] Would delegate {} to {} at nonce {}",
                to_display_amount(amount, NATIVE_DECIMALS),
                self.target,
                session.next_nonce()
            );
            return Ok(DelegationOutcome {
                balance,
                whole_units,
                planned: Some(amount),
                delegated: None,
            });
        }

        session.set_value(amount.as_u256());
        let (nonce, tx_hash) = session.submit(chain, call).await?;
        info!(
            "Delegated {} to {} (nonce {}, tx {})",
            to_display_amount(amount, NATIVE_DECIMALS),
            self.target,
            nonce,
            tx_hash
        );

        Ok(DelegationOutcome {
            balance,
            whole_units,
            planned: Some(amount),
            delegated: Some(DelegationRecord {
                validator: self.target,
                amount,
                nonce,
                tx_hash,
            }),
        })
    }
}
