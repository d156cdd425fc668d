//! MySQL-backed store. Tables are created on startup if absent.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlPool;
use sqlx::Row;

use super::{BalanceStore, StoreError, TransactionRecord, UserAccount};

const UPSERT_BALANCE: &str = "INSERT INTO account (user_id, currency, balance) VALUES (?, ?, ?) \
     ON DUPLICATE KEY UPDATE balance = balance + VALUES(balance)";

const INSERT_TRANSACTION: &str = "INSERT INTO transaction \
     (uuid, user_id, from_currency, to_currency, amount, to_amount, date_created) \
     VALUES (?, ?, ?, ?, ?, ?, ?)";

pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    /// Connect and make sure the schema exists.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = MySqlPool::connect(database_url).await?;
        create_tables(&pool).await?;
        Ok(Self { pool })
    }
}

async fn create_tables(pool: &MySqlPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS user (
            user_id BIGINT PRIMARY KEY,
            username VARCHAR(64) NULL
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS account (
            user_id BIGINT NOT NULL,
            currency VARCHAR(16) NOT NULL,
            balance DOUBLE NOT NULL DEFAULT 0,
            PRIMARY KEY (user_id, currency)
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS transaction (
            uuid VARCHAR(8) NOT NULL,
            user_id BIGINT NOT NULL,
            from_currency VARCHAR(16) NOT NULL,
            to_currency VARCHAR(16) NOT NULL,
            amount DOUBLE NOT NULL,
            to_amount DOUBLE NOT NULL,
            date_created TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            INDEX idx_transaction_user (user_id)
        )",
    )
    .execute(pool)
    .await?;

    Ok(())
}

#[async_trait]
impl BalanceStore for MySqlStore {
    async fn get(&self, user_id: i64) -> Result<Option<UserAccount>, StoreError> {
        let row = sqlx::query("SELECT username FROM user WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        let username: Option<String> = row.get("username");

        let balances = sqlx::query_as::<_, (String, f64)>(
            "SELECT currency, CAST(balance AS DOUBLE) FROM account WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let transactions = sqlx::query_as::<_, (String, String, String, f64, f64, DateTime<Utc>)>(
            "SELECT uuid, from_currency, to_currency, \
             CAST(amount AS DOUBLE), CAST(to_amount AS DOUBLE), date_created \
             FROM transaction WHERE user_id = ? ORDER BY date_created",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(
            |(id, from_currency, to_currency, amount, to_amount, created_at)| TransactionRecord {
                id,
                from_currency,
                to_currency,
                amount,
                to_amount,
                created_at,
            },
        )
        .collect();

        Ok(Some(UserAccount {
            user_id,
            username,
            balances: balances.into_iter().collect(),
            transactions,
        }))
    }

    async fn create(
        &self,
        user_id: i64,
        username: Option<&str>,
        seed: &[(&str, f64)],
    ) -> Result<UserAccount, StoreError> {
        sqlx::query(
            "INSERT INTO user (user_id, username) VALUES (?, ?) \
             ON DUPLICATE KEY UPDATE username = VALUES(username)",
        )
        .bind(user_id)
        .bind(username)
        .execute(&self.pool)
        .await?;

        for (currency, balance) in seed {
            sqlx::query("INSERT IGNORE INTO account (user_id, currency, balance) VALUES (?, ?, ?)")
                .bind(user_id)
                .bind(currency)
                .bind(balance)
                .execute(&self.pool)
                .await?;
        }

        Ok(UserAccount {
            user_id,
            username: username.map(str::to_owned),
            balances: seed.iter().map(|(c, b)| (c.to_string(), *b)).collect(),
            transactions: Vec::new(),
        })
    }

    async fn apply_delta(
        &self,
        user_id: i64,
        currency: &str,
        delta: f64,
    ) -> Result<(), StoreError> {
        sqlx::query(UPSERT_BALANCE)
            .bind(user_id)
            .bind(currency)
            .bind(delta)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn append_transaction(
        &self,
        user_id: i64,
        record: TransactionRecord,
    ) -> Result<(), StoreError> {
        sqlx::query(INSERT_TRANSACTION)
            .bind(&record.id)
            .bind(user_id)
            .bind(&record.from_currency)
            .bind(&record.to_currency)
            .bind(record.amount)
            .bind(record.to_amount)
            .bind(record.created_at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn commit_exchange(
        &self,
        user_id: i64,
        record: TransactionRecord,
    ) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(UPSERT_BALANCE)
            .bind(user_id)
            .bind(&record.from_currency)
            .bind(-record.amount)
            .execute(&mut *tx)
            .await?;

        sqlx::query(UPSERT_BALANCE)
            .bind(user_id)
            .bind(&record.to_currency)
            .bind(record.to_amount)
            .execute(&mut *tx)
            .await?;

        sqlx::query(INSERT_TRANSACTION)
            .bind(&record.id)
            .bind(user_id)
            .bind(&record.from_currency)
            .bind(&record.to_currency)
            .bind(record.amount)
            .bind(record.to_amount)
            .bind(record.created_at)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}
