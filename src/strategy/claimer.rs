//! Claim orchestrator for discovered staking positions
//!
//! Submits one claim per position back to back, each at the next local
//! nonce, without waiting for earlier claims to confirm. The first rejected
//! submission aborts the sequence: claims already accepted stay on chain and
//! nothing after the failure is attempted.

use alloy::primitives::{Address, TxHash};
use serde::Serialize;
use tracing::{error, info};

use super::discovery::Positions;
use super::session::AccountSession;
use crate::chain::StakingChain;
use crate::domain::StakingCall;
use crate::error::Result;

/// Claim accepted by the node
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClaimRecord {
    pub call: StakingCall,
    pub nonce: u64,
    pub tx_hash: TxHash,
}

impl ClaimRecord {
    pub fn validator(&self) -> Address {
        self.call.validator()
    }
}

/// Submit every claim in `positions.claim_plan()` order
pub async fn claim_all<C>(
    chain: &C,
    session: &mut AccountSession,
    positions: &Positions,
) -> Result<Vec<ClaimRecord>>
where
    C: StakingChain + ?Sized,
{
    let plan = positions.claim_plan();
    if plan.is_empty() {
        info!("No positions to claim");
        return Ok(vec![]);
    }

    info!(
        "Submitting {} claim(s) starting at nonce {}",
        plan.len(),
        session.next_nonce()
    );

    let mut records = Vec::with_capacity(plan.len());
    for call in plan {
        let (nonce, tx_hash) = match session.submit(chain, call).await {
            Ok(accepted) => accepted,
            Err(e) => {
                error!(
                    "{} failed at nonce {} after {} accepted claim(s); aborting",
                    call,
                    session.next_nonce(),
                    records.len()
                );
                return Err(e);
            }
        };
        info!("Claimed {} (nonce {}, tx {})", call, nonce, tx_hash);
        records.push(ClaimRecord {
            call,
            nonce,
            tx_hash,
        });
    }

    Ok(records)
}
