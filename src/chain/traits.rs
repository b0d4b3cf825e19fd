use alloy::primitives::{Address, TxHash};
use async_trait::async_trait;

use crate::domain::{DelegationPosition, Page, StakingTx, ValidatorPosition};
use crate::error::Result;
use crate::units::MinimalUnits;

/// Everything the restake workflow needs from the chain.
///
/// Implementations classify failures: node-level queries (chain id, nonce,
/// gas price, balance, block number) fail with `Connection`, contract reads
/// with `Query` and sends with `Submission`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StakingChain: Send + Sync {
    async fn chain_id(&self) -> Result<u64>;

    async fn block_number(&self) -> Result<u64>;

    /// Nonce including transactions still in the pool
    async fn pending_nonce(&self, account: Address) -> Result<u64>;

    async fn gas_price(&self) -> Result<u128>;

    async fn balance(&self, account: Address) -> Result<MinimalUnits>;

    async fn delegations(&self, delegator: Address, batch: u32)
        -> Result<Page<DelegationPosition>>;

    async fn validators_for(&self, owner: Address, batch: u32) -> Result<Page<ValidatorPosition>>;

    /// Sign and broadcast; returns once the node accepted the transaction
    async fn submit(&self, tx: StakingTx) -> Result<TxHash>;
}
