use thiserror::Error;

/// Main error type for the restaker
#[derive(Error, Debug)]
pub enum RestakerError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Network errors
    #[error("Connection error during {step}: {reason}")]
    Connection { step: String, reason: String },

    // Crypto/signing errors
    #[error("Key error: {0}")]
    Key(String),

    // Contract read errors
    #[error("Query failed during {step}: {reason}")]
    Query { step: String, reason: String },

    // Transaction submission errors
    #[error("Submission failed during {step}: {reason}")]
    Submission { step: String, reason: String },

    #[error(
        "Settlement timed out after {waited_ms}ms: expected nonce {expected}, last observed {observed:?}"
    )]
    SettlementTimeout {
        expected: u64,
        observed: Option<u64>,
        waited_ms: u64,
    },

    // Amount conversion errors
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Amount overflow: {0}")]
    AmountOverflow(String),

    // Serialization errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Operation cancelled")]
    Cancelled,
}

impl RestakerError {
    pub fn connection(step: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::Connection {
            step: step.into(),
            reason: reason.to_string(),
        }
    }

    pub fn query(step: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::Query {
            step: step.into(),
            reason: reason.to_string(),
        }
    }

    pub fn submission(step: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::Submission {
            step: step.into(),
            reason: reason.to_string(),
        }
    }

    /// The failing step, for errors raised by a chain interaction
    pub fn step(&self) -> Option<&str> {
        match self {
            Self::Connection { step, .. }
            | Self::Query { step, .. }
            | Self::Submission { step, .. } => Some(step),
            Self::SettlementTimeout { .. } => Some("awaitSettlement"),
            _ => None,
        }
    }
}

/// Result type alias for RestakerError
pub type Result<T> = std::result::Result<T, RestakerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_is_named_in_message() {
        let err = RestakerError::submission("claimRewards(0xabc)", "nonce too low");
        assert_eq!(err.step(), Some("claimRewards(0xabc)"));
        assert_eq!(
            err.to_string(),
            "Submission failed during claimRewards(0xabc): nonce too low"
        );
    }

    #[test]
    fn test_timeout_reports_barrier_step() {
        let err = RestakerError::SettlementTimeout {
            expected: 8,
            observed: Some(7),
            waited_ms: 1500,
        };
        assert_eq!(err.step(), Some("awaitSettlement"));
        assert!(err.to_string().contains("expected nonce 8"));
        assert!(RestakerError::Cancelled.step().is_none());
    }

    #[test]
    fn test_report_encoding_failure_converts() {
        fn encode(raw: &str) -> Result<serde_json::Value> {
            Ok(serde_json::from_str(raw)?)
        }

        let err = encode("{not json").unwrap_err();
        assert!(matches!(err, RestakerError::Json(_)));
        assert!(err.step().is_none());
    }
}
