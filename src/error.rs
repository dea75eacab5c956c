use rust_decimal::Decimal;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PaymentError>;

/// Failure categories surfaced by the engines.
///
/// Domain failures (`JobNotFound`, `InsufficientBalance`, `InvalidUserType`,
/// `DepositLimitExceeded`) are decisions of the core; `Storage` wraps any
/// underlying persistence error and always implies the transaction was rolled
/// back.
#[derive(Error, Debug)]
pub enum PaymentError {
    /// The job is absent, already paid, or not owned by the requesting
    /// client. The three cases are deliberately indistinguishable.
    #[error("job not found or already paid")]
    JobNotFound,

    #[error("insufficient balance")]
    InsufficientBalance,

    /// Deposit target is not a client profile, or does not exist.
    #[error("invalid user type")]
    InvalidUserType,

    /// Deposit exceeds 25% of the client's total unpaid job price.
    #[error("deposit exceeds 25% of total unpaid jobs ({max_deposit})")]
    DepositLimitExceeded { max_deposit: Decimal },

    #[error("amount must be positive")]
    NonPositiveAmount,

    #[error("storage failure: {0}")]
    Storage(Box<dyn std::error::Error + Send + Sync>),
}

impl PaymentError {
    /// Shorthand for storage-level failures that carry only a message,
    /// e.g. broken referential integrity observed mid-transaction.
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into().into())
    }
}

impl From<std::io::Error> for PaymentError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(Box::new(err))
    }
}

impl From<serde_json::Error> for PaymentError {
    fn from(err: serde_json::Error) -> Self {
        Self::Storage(Box::new(err))
    }
}
