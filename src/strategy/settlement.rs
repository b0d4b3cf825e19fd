//! Settlement barrier: wait until the chain has caught up with the
//! transactions submitted in this run.

use alloy::primitives::Address;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::chain::StakingChain;
use crate::error::{RestakerError, Result};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Fixed-interval poll of the account's pending nonce.
///
/// Without a timeout the wait is unbounded; callers that need to cancel it
/// drop the future (e.g. from a `tokio::select!` arm).
#[derive(Debug, Clone, Copy)]
pub struct SettlementBarrier {
    poll_interval: Duration,
    timeout: Option<Duration>,
}

impl Default for SettlementBarrier {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL)
    }
}

impl SettlementBarrier {
    pub fn new(poll_interval: Duration) -> Self {
        Self {
            poll_interval,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Return once the polled nonce equals `expected_nonce`, never on an
    /// intermediate value. A failed poll is logged and retried.
    pub async fn await_settlement<C>(
        &self,
        chain: &C,
        account: Address,
        expected_nonce: u64,
    ) -> Result<()>
    where
        C: StakingChain + ?Sized,
    {
        let started = Instant::now();
        let deadline = self.timeout.map(|t| started + t);
        let mut observed = None;
        let mut polls = 0u64;

        loop {
            polls += 1;
            match chain.pending_nonce(account).await {
                Ok(nonce) if nonce == expected_nonce => {
                    info!(
                        "All transactions settled at nonce {} ({} poll(s), {:?})",
                        nonce,
                        polls,
                        started.elapsed()
                    );
                    return Ok(());
                }
                Ok(nonce) => {
                    debug!("Pending nonce {} (waiting for {})", nonce, expected_nonce);
                    observed = Some(nonce);
                }
                Err(e) => warn!("Pending nonce poll failed: {}", e),
            }

            if let Some(deadline) = deadline {
                if Instant::now() >= deadline {
                    return Err(RestakerError::SettlementTimeout {
                        expected: expected_nonce,
                        observed,
                        waited_ms: started.elapsed().as_millis() as u64,
                    });
                }
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }
}
