pub mod adapters;
pub mod chain;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod signing;
pub mod strategy;
pub mod units;

pub use adapters::DposClient;
pub use chain::StakingChain;
pub use config::AppConfig;
pub use domain::{DelegationPosition, Page, StakingCall, StakingTx, ValidatorPosition};
pub use error::{RestakerError, Result};
pub use signing::Wallet;
pub use strategy::{
    AccountSession, DelegationPolicy, Positions, RestakeConfig, Restaker, RunReport,
    SettlementBarrier,
};
pub use units::{to_display_amount, to_minimal_unit, to_whole_units, DisplayAmount, MinimalUnits};
