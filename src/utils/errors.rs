use thiserror::Error;

use crate::store::StoreError;

/// Errors surfaced by the exchange conversation.
///
/// `InvalidAmount` and `UnknownPair` are recoverable: the user is re-prompted
/// and the conversation continues. `MissingAccount` is recovered by re-running
/// the welcome flow. Store failures propagate and are logged by the dispatcher.
#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error("amount must be a positive number")]
    InvalidAmount,
    #[error("no rate defined for {from}/{to}")]
    UnknownPair { from: String, to: String },
    #[error("no account for user {0}")]
    MissingAccount(i64),
    #[error(transparent)]
    Store(#[from] StoreError),
}
