//! Restake strategy
//!
//! The run goes strictly top to bottom:
//! - `discovery` - delegations and validator roles held by the account
//! - `claimer` - one claim per position, back to back, nonce-ordered
//! - `settlement` - wait for the chain nonce to catch up
//! - `delegation` - delegate the settled balance in whole units
//!
//! `restaker` ties the steps together around one `session`.

pub mod claimer;
pub mod delegation;
pub mod discovery;
pub mod restaker;
pub mod session;
pub mod settlement;

#[cfg(test)]
pub(crate) mod testing;

pub use claimer::{claim_all, ClaimRecord};
pub use delegation::{
    DelegationOutcome, DelegationPolicy, DelegationRecord, DEFAULT_MIN_WHOLE_UNITS,
};
pub use discovery::{discover, list_delegations, list_validator_positions, Positions};
pub use restaker::{RestakeConfig, Restaker, RunReport};
pub use session::{AccountSession, DEFAULT_GAS_LIMIT};
pub use settlement::{SettlementBarrier, DEFAULT_POLL_INTERVAL};
