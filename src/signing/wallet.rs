use crate::error::{RestakerError, Result};
use alloy::network::EthereumWallet;
use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use tracing::info;
use zeroize::Zeroize;

/// Environment variables checked for the signing key, in order
pub const PRIVATE_KEY_ENV_VARS: [&str; 2] = ["RESTAKER_PRIVATE_KEY", "PRIVATE_KEY"];

/// Signing identity of the restaked account
///
/// # Security
/// The hex key is zeroized right after the signer is built and is never
/// stored in this struct.
#[derive(Clone)]
pub struct Wallet {
    signer: PrivateKeySigner,
}

impl Wallet {
    /// Create a wallet from a private key hex string (with or without `0x`)
    pub fn from_private_key(private_key: &str) -> Result<Self> {
        let mut secure_key = private_key.trim().trim_start_matches("0x").to_string();

        if secure_key.is_empty() {
            return Err(RestakerError::Key("private key is empty".to_string()));
        }

        let parsed = secure_key.parse::<PrivateKeySigner>();
        secure_key.zeroize();

        let signer = parsed.map_err(|e| RestakerError::Key(format!("Invalid private key: {}", e)))?;

        info!("Wallet initialized: {} (private key zeroized from memory)", signer.address());

        Ok(Self { signer })
    }

    /// Create a wallet from `RESTAKER_PRIVATE_KEY`, falling back to `PRIVATE_KEY`
    pub fn from_env() -> Result<Self> {
        let mut private_key = PRIVATE_KEY_ENV_VARS
            .iter()
            .find_map(|name| std::env::var(name).ok().filter(|v| !v.trim().is_empty()))
            .ok_or_else(|| {
                RestakerError::Key(format!(
                    "{} environment variable not set",
                    PRIVATE_KEY_ENV_VARS.join(" or ")
                ))
            })?;

        let result = Self::from_private_key(&private_key);

        private_key.zeroize();

        result
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Network wallet used by the provider to sign outgoing transactions
    pub fn ethereum_wallet(&self) -> EthereumWallet {
        EthereumWallet::from(self.signer.clone())
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address())
            .finish()
    }
}
