//! Scripted in-memory chain for workflow tests

use alloy::primitives::{Address, TxHash, B256};
use async_trait::async_trait;
use std::sync::Mutex;

use crate::chain::StakingChain;
use crate::domain::{DelegationPosition, Page, StakingTx, ValidatorPosition};
use crate::error::{RestakerError, Result};
use crate::signing::Wallet;
use crate::units::MinimalUnits;

pub const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

pub fn test_wallet() -> Wallet {
    Wallet::from_private_key(TEST_KEY).unwrap()
}

pub fn validator(n: u8) -> Address {
    Address::with_last_byte(n)
}

pub fn units(s: &str) -> MinimalUnits {
    s.parse().unwrap()
}

#[derive(Default)]
struct FakeState {
    submitted: Vec<StakingTx>,
    confirmed: u64,
    nonce_polls: Vec<u64>,
}

/// Confirms one submitted transaction per pending-nonce poll, so the
/// settlement barrier observes every intermediate nonce.
pub struct FakeChain {
    pub chain_id: u64,
    pub block_number: u64,
    pub start_nonce: u64,
    pub gas_price: u128,
    pub balance: MinimalUnits,
    pub delegations: Vec<DelegationPosition>,
    pub validators: Vec<ValidatorPosition>,
    pub page_size: usize,
    pub fail_submission_at: Option<usize>,
    state: Mutex<FakeState>,
}

impl FakeChain {
    pub fn new(chain_id: u64, start_nonce: u64) -> Self {
        Self {
            chain_id,
            block_number: 1_000,
            start_nonce,
            gas_price: 1_000_000_000,
            balance: MinimalUnits::ZERO,
            delegations: Vec::new(),
            validators: Vec::new(),
            page_size: 100,
            fail_submission_at: None,
            state: Mutex::new(FakeState::default()),
        }
    }

    pub fn with_delegations(mut self, delegations: Vec<DelegationPosition>) -> Self {
        self.delegations = delegations;
        self
    }

    pub fn with_validators(mut self, validators: Vec<ValidatorPosition>) -> Self {
        self.validators = validators;
        self
    }

    pub fn with_balance(mut self, balance: MinimalUnits) -> Self {
        self.balance = balance;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Reject the submission with this zero-based index
    pub fn fail_submission_at(mut self, index: usize) -> Self {
        self.fail_submission_at = Some(index);
        self
    }

    pub fn submitted(&self) -> Vec<StakingTx> {
        self.state.lock().unwrap().submitted.clone()
    }

    pub fn nonce_polls(&self) -> Vec<u64> {
        self.state.lock().unwrap().nonce_polls.clone()
    }

    fn page<T: Clone>(&self, items: &[T], batch: u32) -> Page<T> {
        let start = (batch as usize * self.page_size).min(items.len());
        let stop = (start + self.page_size).min(items.len());
        Page {
            items: items[start..stop].to_vec(),
            end: stop >= items.len(),
        }
    }
}

pub fn delegation(n: u8, stake: &str, rewards: &str) -> DelegationPosition {
    DelegationPosition {
        validator: validator(n),
        stake: units(stake),
        rewards: units(rewards),
    }
}

pub fn validator_position(n: u8, total_stake: &str, commission: &str) -> ValidatorPosition {
    ValidatorPosition {
        validator: validator(n),
        total_stake: units(total_stake),
        commission_reward: units(commission),
    }
}

#[async_trait]
impl StakingChain for FakeChain {
    async fn chain_id(&self) -> Result<u64> {
        Ok(self.chain_id)
    }

    async fn block_number(&self) -> Result<u64> {
        Ok(self.block_number)
    }

    async fn pending_nonce(&self, _account: Address) -> Result<u64> {
        let mut state = self.state.lock().unwrap();
        if state.confirmed < state.submitted.len() as u64 {
            state.confirmed += 1;
        }
        let nonce = self.start_nonce + state.confirmed;
        state.nonce_polls.push(nonce);
        Ok(nonce)
    }

    async fn gas_price(&self) -> Result<u128> {
        Ok(self.gas_price)
    }

    async fn balance(&self, _account: Address) -> Result<MinimalUnits> {
        Ok(self.balance)
    }

    async fn delegations(
        &self,
        _delegator: Address,
        batch: u32,
    ) -> Result<Page<DelegationPosition>> {
        Ok(self.page(&self.delegations, batch))
    }

    async fn validators_for(&self, _owner: Address, batch: u32) -> Result<Page<ValidatorPosition>> {
        Ok(self.page(&self.validators, batch))
    }

    async fn submit(&self, tx: StakingTx) -> Result<TxHash> {
        let mut state = self.state.lock().unwrap();
        if self.fail_submission_at == Some(state.submitted.len()) {
            return Err(RestakerError::submission(
                tx.call.to_string(),
                "execution reverted",
            ));
        }
        let expected = self.start_nonce + state.submitted.len() as u64;
        if tx.nonce != expected {
            return Err(RestakerError::submission(
                tx.call.to_string(),
                format!("nonce {} does not match expected {}", tx.nonce, expected),
            ));
        }
        let hash = B256::with_last_byte(tx.nonce as u8);
        state.submitted.push(tx);
        Ok(hash)
    }
}
