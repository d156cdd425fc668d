//! The exchange conversation state machine.
//!
//! Drives `Idle → ChoosingPair → EnteringAmount → Confirming → Idle` for each
//! user. The service owns no Telegram types: handlers translate updates into
//! [`ExchangeEvent`]s and render the returned [`Reply`]s, which keeps every
//! transition testable against the in-memory store.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use crate::notify::AdminNotifier;
use crate::rates::{round_amount, RateSource};
use crate::session::{ConversationStep, PendingTrade, SessionMap};
use crate::store::{BalanceStore, TransactionRecord};
use crate::utils::errors::ExchangeError;
use crate::utils::format::format_amount;
use crate::utils::ids;

/// What the user did, as seen by the state machine.
#[derive(Debug, Clone)]
pub enum ExchangeEvent {
    /// `/start`: ensure the account exists and reset the conversation.
    Start,
    /// The "Exchange" menu button.
    BeginExchange,
    /// A pair button from the inline menu.
    SelectPair { from: String, to: String },
    /// Free text while an amount is expected.
    EnterAmount(String),
    ConfirmYes,
    ConfirmNo,
}

/// What to tell the user. Rendering (text, keyboards) lives in the handlers.
#[derive(Debug, Clone)]
pub enum Reply {
    Welcome { created: bool },
    PairMenu,
    AmountPrompt { from: String },
    Quote {
        from: String,
        to: String,
        amount: f64,
        to_amount: f64,
        rate: f64,
    },
    Completed {
        tx_id: String,
        to: String,
        to_amount: f64,
    },
    Cancelled,
    /// Event arrived in a state that does not accept it; say nothing.
    Ignored,
}

pub struct ExchangeService {
    store: Arc<dyn BalanceStore>,
    rates: Arc<dyn RateSource>,
    notifier: Arc<dyn AdminNotifier>,
    sessions: Arc<SessionMap>,
    seed: &'static [(&'static str, f64)],
}

impl ExchangeService {
    pub fn new(
        store: Arc<dyn BalanceStore>,
        rates: Arc<dyn RateSource>,
        notifier: Arc<dyn AdminNotifier>,
        sessions: Arc<SessionMap>,
        seed: &'static [(&'static str, f64)],
    ) -> Self {
        Self {
            store,
            rates,
            notifier,
            sessions,
            seed,
        }
    }

    pub fn store(&self) -> &dyn BalanceStore {
        self.store.as_ref()
    }

    /// Apply one event to the user's conversation.
    ///
    /// Recoverable user mistakes come back as `Err(InvalidAmount)` or
    /// `Err(UnknownPair)` with the session already moved to the right step;
    /// events that the current state does not accept return `Reply::Ignored`.
    pub async fn handle(
        &self,
        user_id: i64,
        username: Option<&str>,
        event: ExchangeEvent,
    ) -> Result<Reply, ExchangeError> {
        match event {
            ExchangeEvent::Start => self.start(user_id, username).await,
            ExchangeEvent::BeginExchange => {
                self.sessions
                    .set_step(user_id, ConversationStep::ChoosingPair)
                    .await;
                Ok(Reply::PairMenu)
            }
            ExchangeEvent::SelectPair { from, to } => self.select_pair(user_id, from, to).await,
            ExchangeEvent::EnterAmount(text) => self.enter_amount(user_id, &text).await,
            ExchangeEvent::ConfirmYes => self.confirm(user_id, username).await,
            ExchangeEvent::ConfirmNo => self.cancel(user_id).await,
        }
    }

    async fn start(&self, user_id: i64, username: Option<&str>) -> Result<Reply, ExchangeError> {
        let created = match self.store.get(user_id).await? {
            Some(_) => false,
            None => {
                self.store.create(user_id, username, self.seed).await?;
                info!("Created account for user {user_id}");
                true
            }
        };
        self.sessions.reset(user_id).await;
        Ok(Reply::Welcome { created })
    }

    async fn select_pair(
        &self,
        user_id: i64,
        from: String,
        to: String,
    ) -> Result<Reply, ExchangeError> {
        if self.sessions.step(user_id).await != ConversationStep::ChoosingPair {
            debug!("Pair selection from user {user_id} outside ChoosingPair");
            return Ok(Reply::Ignored);
        }
        self.sessions
            .set_step(
                user_id,
                ConversationStep::EnteringAmount {
                    from: from.clone(),
                    to,
                },
            )
            .await;
        Ok(Reply::AmountPrompt { from })
    }

    async fn enter_amount(&self, user_id: i64, text: &str) -> Result<Reply, ExchangeError> {
        let (from, to) = match self.sessions.step(user_id).await {
            ConversationStep::EnteringAmount { from, to } => (from, to),
            _ => return Ok(Reply::Ignored),
        };

        // Non-numeric or non-positive input leaves the session where it is.
        let amount: f64 = text
            .trim()
            .parse()
            .map_err(|_| ExchangeError::InvalidAmount)?;
        if !amount.is_finite() || amount <= 0.0 {
            return Err(ExchangeError::InvalidAmount);
        }

        let Some(rate) = self.rates.rate(&from, &to) else {
            // An unquoted pair sends the user back to pair selection rather
            // than stranding them on the amount prompt.
            self.sessions
                .set_step(user_id, ConversationStep::ChoosingPair)
                .await;
            return Err(ExchangeError::UnknownPair { from, to });
        };

        let to_amount = round_amount(amount * rate);
        self.sessions
            .set_step(
                user_id,
                ConversationStep::Confirming(PendingTrade {
                    from: from.clone(),
                    to: to.clone(),
                    amount,
                    rate,
                    to_amount,
                }),
            )
            .await;

        Ok(Reply::Quote {
            from,
            to,
            amount,
            to_amount,
            rate,
        })
    }

    async fn confirm(&self, user_id: i64, username: Option<&str>) -> Result<Reply, ExchangeError> {
        // take_pending resets the session atomically, so a double-tapped
        // confirm finds nothing the second time.
        let Some(trade) = self.sessions.take_pending(user_id).await else {
            debug!("Confirm from user {user_id} with no pending trade");
            return Ok(Reply::Ignored);
        };

        let record = TransactionRecord {
            id: ids::transaction_id(),
            from_currency: trade.from.clone(),
            to_currency: trade.to.clone(),
            amount: trade.amount,
            to_amount: trade.to_amount,
            created_at: Utc::now(),
        };
        let tx_id = record.id.clone();
        self.store.commit_exchange(user_id, record).await?;

        info!(
            "User {user_id} exchanged {} {} for {} {} (tx {tx_id})",
            trade.amount, trade.from, trade.to_amount, trade.to
        );

        let who = username
            .map(|u| format!("@{u}"))
            .unwrap_or_else(|| user_id.to_string());
        self.notifier
            .notify(&format!(
                "🔔 New exchange!\nUser: {who}\nTrade: {} {} → {} {}\nID: {tx_id}",
                format_amount(trade.amount),
                trade.from,
                format_amount(trade.to_amount),
                trade.to,
            ))
            .await;

        Ok(Reply::Completed {
            tx_id,
            to: trade.to,
            to_amount: trade.to_amount,
        })
    }

    async fn cancel(&self, user_id: i64) -> Result<Reply, ExchangeError> {
        match self.sessions.take_pending(user_id).await {
            Some(_) => Ok(Reply::Cancelled),
            None => Ok(Reply::Ignored),
        }
    }
}
