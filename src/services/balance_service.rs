use crate::store::BalanceStore;
use crate::utils::errors::ExchangeError;

/// A user's balances, sorted by currency code for stable display.
#[derive(Debug)]
pub struct BalanceResult {
    pub entries: Vec<(String, f64)>,
}

pub async fn get_balance(
    store: &dyn BalanceStore,
    user_id: i64,
) -> Result<BalanceResult, ExchangeError> {
    let account = store
        .get(user_id)
        .await?
        .ok_or(ExchangeError::MissingAccount(user_id))?;

    let mut entries: Vec<(String, f64)> = account.balances.into_iter().collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(BalanceResult { entries })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use crate::store::DEMO_SEED;

    #[tokio::test]
    async fn test_balances_sorted_by_currency() {
        let store = MemoryStore::new();
        store.create(1, None, DEMO_SEED).await.unwrap();

        let result = get_balance(&store, 1).await.unwrap();
        let codes: Vec<&str> = result.entries.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(codes, vec!["BTC", "ETH", "USDT"]);
    }

    #[tokio::test]
    async fn test_missing_account_surfaces() {
        let store = MemoryStore::new();
        let err = get_balance(&store, 42).await.unwrap_err();
        assert!(matches!(err, ExchangeError::MissingAccount(42)));
    }
}
