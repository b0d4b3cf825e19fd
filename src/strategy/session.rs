//! Account session: identity, chain id and the locally advanced nonce

use alloy::primitives::{Address, TxHash, U256};
use tracing::{debug, info, instrument};

use crate::chain::StakingChain;
use crate::domain::{StakingCall, StakingTx};
use crate::error::Result;
use crate::signing::Wallet;

/// Gas limit applied to every transaction of a run
pub const DEFAULT_GAS_LIMIT: u64 = 300_000;

/// Transaction context for one account over one run.
///
/// The nonce is read from the chain once, in [`AccountSession::open`], and
/// afterwards only advanced locally after each accepted submission. The
/// session is the single writer of the counter.
#[derive(Debug)]
pub struct AccountSession {
    account: Address,
    chain_id: u64,
    start_nonce: u64,
    nonce: u64,
    gas_limit: u64,
    gas_price: u128,
    value: U256,
}

impl AccountSession {
    /// Query chain id, pending nonce and a gas price snapshot for `wallet`
    #[instrument(skip_all, fields(account = %wallet.address()))]
    pub async fn open<C>(chain: &C, wallet: &Wallet, gas_limit: u64) -> Result<Self>
    where
        C: StakingChain + ?Sized,
    {
        let account = wallet.address();
        let chain_id = chain.chain_id().await?;
        let nonce = chain.pending_nonce(account).await?;
        let gas_price = chain.gas_price().await?;

        info!(
            "Session opened: chain_id={}, nonce={}, gas_price={} wei, gas_limit={}",
            chain_id, nonce, gas_price, gas_limit
        );

        Ok(Self {
            account,
            chain_id,
            start_nonce: nonce,
            nonce,
            gas_limit,
            gas_price,
            value: U256::ZERO,
        })
    }

    pub fn account(&self) -> Address {
        self.account
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn gas_price(&self) -> u128 {
        self.gas_price
    }

    pub fn gas_limit(&self) -> u64 {
        self.gas_limit
    }

    /// Chain nonce observed when the session was opened
    pub fn start_nonce(&self) -> u64 {
        self.start_nonce
    }

    /// Nonce the next submission will use
    pub fn next_nonce(&self) -> u64 {
        self.nonce
    }

    /// Transactions accepted through this session so far
    pub fn submitted(&self) -> u64 {
        self.nonce - self.start_nonce
    }

    /// Value attached to the next transaction only
    pub fn set_value(&mut self, value: U256) {
        self.value = value;
    }

    pub fn build_tx(&self, call: StakingCall) -> StakingTx {
        StakingTx {
            call,
            chain_id: self.chain_id,
            nonce: self.nonce,
            gas_limit: self.gas_limit,
            gas_price: self.gas_price,
            value: self.value,
        }
    }

    /// Submit `call` at the current nonce. The nonce advances only if the
    /// node accepted the transaction. The attached value is consumed either
    /// way.
    pub async fn submit<C>(&mut self, chain: &C, call: StakingCall) -> Result<(u64, TxHash)>
    where
        C: StakingChain + ?Sized,
    {
        let tx = StakingTx {
            value: std::mem::take(&mut self.value),
            ..self.build_tx(call)
        };
        let nonce = tx.nonce;
        let tx_hash = chain.submit(tx).await?;

        debug!("{} accepted at nonce {}: {}", call, nonce, tx_hash);

        self.nonce += 1;
        Ok((nonce, tx_hash))
    }
}
