//! Taraxa DPOS precompile client
//!
//! Reads delegations/validators and sends claim and delegate transactions
//! against the staking contract over a single HTTP JSON-RPC endpoint.

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, TxHash};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::sol;
use alloy::sol_types::SolCall;
use async_trait::async_trait;
use tracing::debug;
use url::Url;

use crate::chain::StakingChain;
use crate::domain::{DelegationPosition, Page, StakingCall, StakingTx, ValidatorPosition};
use crate::error::{RestakerError, Result};
use crate::signing::Wallet;
use crate::units::MinimalUnits;

/// DPOS precompile address on Taraxa networks
pub const DPOS_CONTRACT_ADDRESS: &str = "0x00000000000000000000000000000000000000FE";
pub const TARAXA_MAINNET_RPC: &str = "https://rpc.mainnet.taraxa.io";

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    interface IDposContract {
        struct DelegatorInfo {
            uint256 stake;
            uint256 rewards;
        }

        struct DelegationData {
            address account;
            DelegatorInfo delegation;
        }

        struct ValidatorBasicInfo {
            uint256 total_stake;
            uint256 commission_reward;
            uint16 commission;
            uint64 last_commission_change;
            uint16 undelegations_count;
            address owner;
            string description;
            string endpoint;
        }

        struct ValidatorData {
            address account;
            ValidatorBasicInfo info;
        }

        function getDelegations(address delegator, uint32 batch)
            external
            view
            returns (DelegationData[] memory delegations, bool end);

        function getValidatorsFor(address owner, uint32 batch)
            external
            view
            returns (ValidatorData[] memory validators, bool end);

        function claimRewards(address validator) external;

        function claimCommissionRewards(address validator) external;

        function delegate(address validator) external payable;
    }
}

fn encode_call(call: &StakingCall) -> Vec<u8> {
    match *call {
        StakingCall::ClaimRewards(validator) => {
            IDposContract::claimRewardsCall { validator }.abi_encode()
        }
        StakingCall::ClaimCommissionRewards(validator) => {
            IDposContract::claimCommissionRewardsCall { validator }.abi_encode()
        }
        StakingCall::Delegate(validator) => IDposContract::delegateCall { validator }.abi_encode(),
    }
}

/// alloy-backed [`StakingChain`]
pub struct DposClient {
    provider: DynProvider,
    contract: Address,
    from: Address,
}

impl DposClient {
    /// Build a signing client. No request is made until the first call.
    pub fn connect(rpc_url: &str, contract: Address, wallet: &Wallet) -> Result<Self> {
        let url: Url = rpc_url.parse().map_err(|e| {
            RestakerError::connection("connect", format!("invalid RPC URL {}: {}", rpc_url, e))
        })?;

        let provider = ProviderBuilder::new()
            .wallet(wallet.ethereum_wallet())
            .connect_http(url)
            .erased();

        Ok(Self {
            provider,
            contract,
            from: wallet.address(),
        })
    }

    pub fn contract(&self) -> Address {
        self.contract
    }

    fn to_request(&self, tx: &StakingTx) -> TransactionRequest {
        TransactionRequest::default()
            .with_from(self.from)
            .with_to(self.contract)
            .with_input(encode_call(&tx.call))
            .with_chain_id(tx.chain_id)
            .with_nonce(tx.nonce)
            .with_gas_limit(tx.gas_limit)
            .with_gas_price(tx.gas_price)
            .with_value(tx.value)
    }
}

#[async_trait]
impl StakingChain for DposClient {
    async fn chain_id(&self) -> Result<u64> {
        self.provider
            .get_chain_id()
            .await
            .map_err(|e| RestakerError::connection("eth_chainId", e))
    }

    async fn block_number(&self) -> Result<u64> {
        self.provider
            .get_block_number()
            .await
            .map_err(|e| RestakerError::connection("eth_blockNumber", e))
    }

    async fn pending_nonce(&self, account: Address) -> Result<u64> {
        self.provider
            .get_transaction_count(account)
            .pending()
            .await
            .map_err(|e| RestakerError::connection("eth_getTransactionCount(pending)", e))
    }

    async fn gas_price(&self) -> Result<u128> {
        self.provider
            .get_gas_price()
            .await
            .map_err(|e| RestakerError::connection("eth_gasPrice", e))
    }

    async fn balance(&self, account: Address) -> Result<MinimalUnits> {
        self.provider
            .get_balance(account)
            .await
            .map(MinimalUnits::from)
            .map_err(|e| RestakerError::connection("eth_getBalance", e))
    }

    async fn delegations(
        &self,
        delegator: Address,
        batch: u32,
    ) -> Result<Page<DelegationPosition>> {
        let dpos = IDposContract::new(self.contract, self.provider.clone());
        let page = dpos
            .getDelegations(delegator, batch)
            .call()
            .await
            .map_err(|e| RestakerError::query(format!("getDelegations(batch {})", batch), e))?;

        debug!(
            "getDelegations batch {}: {} item(s), end={}",
            batch,
            page.delegations.len(),
            page.end
        );

        Ok(Page {
            items: page
                .delegations
                .into_iter()
                .map(|d| DelegationPosition {
                    validator: d.account,
                    stake: d.delegation.stake.into(),
                    rewards: d.delegation.rewards.into(),
                })
                .collect(),
            end: page.end,
        })
    }

    async fn validators_for(&self, owner: Address, batch: u32) -> Result<Page<ValidatorPosition>> {
        let dpos = IDposContract::new(self.contract, self.provider.clone());
        let page = dpos
            .getValidatorsFor(owner, batch)
            .call()
            .await
            .map_err(|e| RestakerError::query(format!("getValidatorsFor(batch {})", batch), e))?;

        debug!(
            "getValidatorsFor batch {}: {} item(s), end={}",
            batch,
            page.validators.len(),
            page.end
        );

        Ok(Page {
            items: page
                .validators
                .into_iter()
                .map(|v| ValidatorPosition {
                    validator: v.account,
                    total_stake: v.info.total_stake.into(),
                    commission_reward: v.info.commission_reward.into(),
                })
                .collect(),
            end: page.end,
        })
    }

    async fn submit(&self, tx: StakingTx) -> Result<TxHash> {
        let request = self.to_request(&tx);
        let pending = self
            .provider
            .send_transaction(request)
            .await
            .map_err(|e| RestakerError::submission(tx.call.to_string(), e))?;

        Ok(*pending.tx_hash())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{address, U256};

    const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn client() -> DposClient {
        let wallet = Wallet::from_private_key(TEST_KEY).unwrap();
        DposClient::connect(
            TARAXA_MAINNET_RPC,
            DPOS_CONTRACT_ADDRESS.parse().unwrap(),
            &wallet,
        )
        .unwrap()
    }

    #[test]
    fn test_call_encoding_uses_contract_selectors() {
        let validator = address!("e50b5452b2e8435404dbe06e6a05410c47b7583d");

        let claim = encode_call(&StakingCall::ClaimRewards(validator));
        assert_eq!(&claim[..4], IDposContract::claimRewardsCall::SELECTOR.as_slice());
        assert_eq!(claim.len(), 4 + 32);
        assert_eq!(&claim[16..], validator.as_slice());

        let commission = encode_call(&StakingCall::ClaimCommissionRewards(validator));
        assert_eq!(
            &commission[..4],
            IDposContract::claimCommissionRewardsCall::SELECTOR.as_slice()
        );

        let delegate = encode_call(&StakingCall::Delegate(validator));
        assert_eq!(&delegate[..4], IDposContract::delegateCall::SELECTOR.as_slice());
    }

    #[test]
    fn test_request_carries_session_fields() {
        let client = client();
        let validator = address!("e50b5452b2e8435404dbe06e6a05410c47b7583d");
        let tx = StakingTx {
            call: StakingCall::Delegate(validator),
            chain_id: 841,
            nonce: 8,
            gas_limit: 300_000,
            gas_price: 1_000_000_000,
            value: U256::from(10u64) * crate::units::WEI_PER_UNIT,
        };

        let request = client.to_request(&tx);
        assert_eq!(request.nonce, Some(8));
        assert_eq!(request.gas, Some(300_000));
        assert_eq!(request.gas_price, Some(1_000_000_000));
        assert_eq!(request.chain_id, Some(841));
        assert_eq!(request.value, Some(tx.value));
        assert_eq!(request.from, Some(address!("f39fd6e51aad88f6f4ce6ab8827279cfffb92266")));
        assert_eq!(request.to, Some(client.contract().into()));
    }

    #[test]
    fn test_invalid_rpc_url_is_connection_error() {
        let wallet = Wallet::from_private_key(TEST_KEY).unwrap();
        let result = DposClient::connect("not a url", Address::ZERO, &wallet);
        assert!(matches!(result, Err(RestakerError::Connection { .. })));
    }
}
