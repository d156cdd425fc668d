//! Volatile in-process backend. Everything is lost on restart.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{BalanceStore, StoreError, TransactionRecord, UserAccount};

#[derive(Default)]
pub struct MemoryStore {
    accounts: Mutex<HashMap<i64, UserAccount>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BalanceStore for MemoryStore {
    async fn get(&self, user_id: i64) -> Result<Option<UserAccount>, StoreError> {
        Ok(self.accounts.lock().await.get(&user_id).cloned())
    }

    async fn create(
        &self,
        user_id: i64,
        username: Option<&str>,
        seed: &[(&str, f64)],
    ) -> Result<UserAccount, StoreError> {
        let account = UserAccount {
            user_id,
            username: username.map(str::to_owned),
            balances: seed.iter().map(|(c, b)| (c.to_string(), *b)).collect(),
            transactions: Vec::new(),
        };
        self.accounts.lock().await.insert(user_id, account.clone());
        Ok(account)
    }

    async fn apply_delta(
        &self,
        user_id: i64,
        currency: &str,
        delta: f64,
    ) -> Result<(), StoreError> {
        let mut accounts = self.accounts.lock().await;
        let account = accounts
            .get_mut(&user_id)
            .ok_or(StoreError::MissingAccount(user_id))?;
        *account.balances.entry(currency.to_string()).or_insert(0.0) += delta;
        Ok(())
    }

    async fn append_transaction(
        &self,
        user_id: i64,
        record: TransactionRecord,
    ) -> Result<(), StoreError> {
        let mut accounts = self.accounts.lock().await;
        let account = accounts
            .get_mut(&user_id)
            .ok_or(StoreError::MissingAccount(user_id))?;
        account.transactions.push(record);
        Ok(())
    }

    async fn commit_exchange(
        &self,
        user_id: i64,
        record: TransactionRecord,
    ) -> Result<(), StoreError> {
        // One lock hold covers both balance legs and the log append.
        let mut accounts = self.accounts.lock().await;
        let account = accounts
            .get_mut(&user_id)
            .ok_or(StoreError::MissingAccount(user_id))?;
        *account
            .balances
            .entry(record.from_currency.clone())
            .or_insert(0.0) -= record.amount;
        *account
            .balances
            .entry(record.to_currency.clone())
            .or_insert(0.0) += record.to_amount;
        account.transactions.push(record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::DEMO_SEED;
    use chrono::Utc;

    fn record(from: &str, to: &str, amount: f64, to_amount: f64) -> TransactionRecord {
        TransactionRecord {
            id: "ABCD1234".to_string(),
            from_currency: from.to_string(),
            to_currency: to.to_string(),
            amount,
            to_amount,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let store = MemoryStore::new();
        assert!(store.get(1).await.unwrap().is_none());

        store.create(1, Some("alice"), DEMO_SEED).await.unwrap();
        let account = store.get(1).await.unwrap().unwrap();
        assert_eq!(account.username.as_deref(), Some("alice"));
        assert_eq!(account.balances["BTC"], 0.1);
        assert_eq!(account.balances["ETH"], 0.5);
        assert_eq!(account.balances["USDT"], 50.0);
        assert!(account.transactions.is_empty());
    }

    #[tokio::test]
    async fn test_apply_delta_creates_missing_currency() {
        let store = MemoryStore::new();
        store.create(1, None, &[("BTC", 1.0)]).await.unwrap();

        store.apply_delta(1, "USDT", 25.0).await.unwrap();
        let account = store.get(1).await.unwrap().unwrap();
        assert_eq!(account.balances["USDT"], 25.0);
    }

    #[tokio::test]
    async fn test_apply_delta_allows_negative_balance() {
        let store = MemoryStore::new();
        store.create(1, None, &[("BTC", 0.1)]).await.unwrap();

        store.apply_delta(1, "BTC", -2.0).await.unwrap();
        let account = store.get(1).await.unwrap().unwrap();
        assert!((account.balances["BTC"] - (-1.9)).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_missing_account_errors() {
        let store = MemoryStore::new();
        let err = store.apply_delta(7, "BTC", 1.0).await.unwrap_err();
        assert!(matches!(err, StoreError::MissingAccount(7)));
    }

    #[tokio::test]
    async fn test_commit_exchange_applies_both_legs_and_log() {
        let store = MemoryStore::new();
        store.create(1, None, DEMO_SEED).await.unwrap();

        store
            .commit_exchange(1, record("BTC", "USDT", 2.0, 120_000.0))
            .await
            .unwrap();

        let account = store.get(1).await.unwrap().unwrap();
        assert!((account.balances["BTC"] - (-1.9)).abs() < 1e-9);
        assert_eq!(account.balances["USDT"], 120_050.0);
        assert_eq!(account.transactions.len(), 1);
        assert_eq!(account.transactions[0].id, "ABCD1234");
    }
}
