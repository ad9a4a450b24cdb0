use thiserror::Error;

use crate::domain::Address;

/// Local precondition failures. Never the result of a network call, and never
/// followed by one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no wallet signer is connected")]
    MissingSigner,
    #[error("no listing is active for this session")]
    NoActiveListing,
    #[error("required field is empty: {0}")]
    EmptyField(&'static str),
    #[error("operation not valid in the current session phase")]
    InvalidPhase,
}

/// Failures while building, signing, or submitting a chain operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransactionError {
    #[error("another chain operation is already in flight")]
    Busy,
    #[error("listing {0} does not exist")]
    NotFound(Address),
    #[error("listing {0} has already been sold")]
    AlreadySold(Address),
    #[error("listing price {actual} does not match expected price {expected}")]
    PriceMismatch { expected: u64, actual: u64 },
    #[error("wallet refused to sign: {0}")]
    SigningRejected(String),
    #[error("network failure: {0}")]
    Network(String),
    #[error("on-chain execution failed: {0}")]
    Execution(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Address derivation only fails on malformed input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressDeriveError {
    #[error("invalid derivation input: {0}")]
    InvalidInput(String),
}

impl From<AddressDeriveError> for TransactionError {
    fn from(err: AddressDeriveError) -> Self {
        match err {
            AddressDeriveError::InvalidInput(msg) => TransactionError::InvalidInput(msg),
        }
    }
}

/// Error surface of the session API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Transaction(#[from] TransactionError),
}

impl SessionError {
    /// True when the listing is gone or taken, so retrying the same purchase
    /// cannot succeed and the user should generate a new drop instead.
    pub fn requires_new_drop(&self) -> bool {
        matches!(
            self,
            SessionError::Transaction(TransactionError::NotFound(_))
                | SessionError::Transaction(TransactionError::AlreadySold(_))
        )
    }
}
