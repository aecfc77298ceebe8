use thiserror::Error;

/// Every failure the client reports. The display string is the message shown to the user.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StakingError {
    #[error("Failed to load contract ABI")]
    AbiLoad,

    #[error("Failed to initialize wallet")]
    WalletInit,

    #[error("Failed to load pool stats")]
    Stats,

    #[error("Switch to Polygon")]
    WrongNetwork { expected: u64, actual: u64 },

    #[error("Failed to refresh balances")]
    Refresh,

    #[error("Invalid amount: {0:?}")]
    InvalidAmount(String),

    #[error("Connect a wallet first")]
    NotConnected,

    #[error("Another transaction is in progress")]
    Busy,

    /// Provider or contract failure, passed through verbatim.
    #[error("{0}")]
    Transaction(String),
}

impl StakingError {
    pub fn transaction(err: impl std::fmt::Display) -> Self {
        Self::Transaction(err.to_string())
    }
}
