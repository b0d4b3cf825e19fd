pub mod dpos_client;

pub use dpos_client::{DposClient, DPOS_CONTRACT_ADDRESS, TARAXA_MAINNET_RPC};
