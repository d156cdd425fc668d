//! Balance store: per-user accounts, balances and the transaction log.
//!
//! Two interchangeable backends: a volatile in-process map and a MySQL
//! database. The conversation logic only ever sees the [`BalanceStore`]
//! trait, so swapping backends is a startup decision, not a code change.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

pub mod memory;
pub mod mysql;

/// Seed balances for accounts created on first contact when running on the
/// in-memory backend. Demo funds so the flow can be exercised immediately.
pub const DEMO_SEED: &[(&str, f64)] = &[("BTC", 0.1), ("ETH", 0.5), ("USDT", 50.0)];

/// Seed balances for the persistent backend: every currency starts at zero.
pub const EMPTY_SEED: &[(&str, f64)] = &[("BTC", 0.0), ("ETH", 0.0), ("USDT", 0.0)];

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no account for user {0}")]
    MissingAccount(i64),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// One completed simulated exchange. Immutable once appended.
#[derive(Debug, Clone)]
pub struct TransactionRecord {
    pub id: String,
    pub from_currency: String,
    pub to_currency: String,
    pub amount: f64,
    pub to_amount: f64,
    pub created_at: DateTime<Utc>,
}

/// A user's account: balances per currency code plus the ordered transaction
/// log. Created on first contact, never deleted.
#[derive(Debug, Clone)]
pub struct UserAccount {
    pub user_id: i64,
    pub username: Option<String>,
    pub balances: HashMap<String, f64>,
    pub transactions: Vec<TransactionRecord>,
}

/// Contract both backends satisfy.
///
/// `apply_delta` carries no sufficiency check: balances are allowed to go
/// negative, matching the simulated-exchange behavior this bot reproduces.
/// `commit_exchange` applies both balance legs and the log append as a single
/// per-user unit so a trade is never half-applied.
#[async_trait]
pub trait BalanceStore: Send + Sync {
    async fn get(&self, user_id: i64) -> Result<Option<UserAccount>, StoreError>;

    async fn create(
        &self,
        user_id: i64,
        username: Option<&str>,
        seed: &[(&str, f64)],
    ) -> Result<UserAccount, StoreError>;

    /// Adds `delta` to the user's balance for `currency`, creating the
    /// currency entry at zero if absent.
    async fn apply_delta(&self, user_id: i64, currency: &str, delta: f64)
        -> Result<(), StoreError>;

    async fn append_transaction(
        &self,
        user_id: i64,
        record: TransactionRecord,
    ) -> Result<(), StoreError>;

    /// Debits `record.amount` of the source currency, credits
    /// `record.to_amount` of the destination currency and appends the record,
    /// atomically for this user.
    async fn commit_exchange(&self, user_id: i64, record: TransactionRecord)
        -> Result<(), StoreError>;
}
