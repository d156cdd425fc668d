//! Per-user conversation sessions.
//!
//! One session per user id, holding the current step of the exchange dialogue
//! and the transient trade parameters. Sessions live in process memory only
//! and expire after a period of inactivity so abandoned conversations do not
//! accumulate forever.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tracing::debug;

/// Parameters of a quoted exchange awaiting confirmation.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingTrade {
    pub from: String,
    pub to: String,
    pub amount: f64,
    pub rate: f64,
    pub to_amount: f64,
}

/// Where a user currently is in the exchange dialogue.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ConversationStep {
    #[default]
    Idle,
    ChoosingPair,
    EnteringAmount {
        from: String,
        to: String,
    },
    Confirming(PendingTrade),
}

struct Session {
    step: ConversationStep,
    last_activity: Instant,
}

/// All live sessions, keyed by user id.
///
/// Every transition takes the map lock, so conflicting events from the same
/// user are applied one at a time; users never contend with each other beyond
/// the brief lock hold.
pub struct SessionMap {
    inner: Mutex<HashMap<i64, Session>>,
    ttl: Duration,
}

impl SessionMap {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Current step for a user; `Idle` when no session exists. Reading a
    /// session counts as activity for expiry purposes.
    pub async fn step(&self, user_id: i64) -> ConversationStep {
        let mut map = self.inner.lock().await;
        match map.get_mut(&user_id) {
            Some(session) => {
                session.last_activity = Instant::now();
                session.step.clone()
            }
            None => ConversationStep::Idle,
        }
    }

    pub async fn set_step(&self, user_id: i64, step: ConversationStep) {
        let mut map = self.inner.lock().await;
        map.insert(
            user_id,
            Session {
                step,
                last_activity: Instant::now(),
            },
        );
    }

    /// Drops the session entirely, returning the user to `Idle`.
    pub async fn reset(&self, user_id: i64) {
        self.inner.lock().await.remove(&user_id);
    }

    /// Takes the pending trade if, and only if, the user is in `Confirming`,
    /// resetting the session within the same critical section. A second
    /// confirm from the same user finds nothing to take, which is what keeps
    /// a double-tapped confirm button from applying a trade twice.
    pub async fn take_pending(&self, user_id: i64) -> Option<PendingTrade> {
        let mut map = self.inner.lock().await;
        if !matches!(
            map.get(&user_id),
            Some(Session {
                step: ConversationStep::Confirming(_),
                ..
            })
        ) {
            return None;
        }
        match map.remove(&user_id) {
            Some(Session {
                step: ConversationStep::Confirming(trade),
                ..
            }) => Some(trade),
            _ => None,
        }
    }

    /// Removes sessions idle longer than the TTL. Returns how many were
    /// expired.
    pub async fn sweep(&self) -> usize {
        let mut map = self.inner.lock().await;
        let before = map.len();
        let ttl = self.ttl;
        map.retain(|_, session| session.last_activity.elapsed() < ttl);
        before - map.len()
    }
}

/// Periodically expires abandoned conversations.
pub fn spawn_sweeper(sessions: Arc<SessionMap>, every: Duration) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            let removed = sessions.sweep().await;
            if removed > 0 {
                debug!("Expired {} abandoned conversation(s)", removed);
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trade() -> PendingTrade {
        PendingTrade {
            from: "BTC".to_string(),
            to: "USDT".to_string(),
            amount: 2.0,
            rate: 60_000.0,
            to_amount: 120_000.0,
        }
    }

    #[tokio::test]
    async fn test_unknown_user_is_idle() {
        let sessions = SessionMap::new(Duration::from_secs(1800));
        assert_eq!(sessions.step(1).await, ConversationStep::Idle);
    }

    #[tokio::test]
    async fn test_take_pending_only_once() {
        let sessions = SessionMap::new(Duration::from_secs(1800));
        sessions
            .set_step(1, ConversationStep::Confirming(trade()))
            .await;

        assert_eq!(sessions.take_pending(1).await, Some(trade()));
        assert_eq!(sessions.take_pending(1).await, None);
        assert_eq!(sessions.step(1).await, ConversationStep::Idle);
    }

    #[tokio::test]
    async fn test_take_pending_requires_confirming() {
        let sessions = SessionMap::new(Duration::from_secs(1800));
        sessions.set_step(1, ConversationStep::ChoosingPair).await;
        assert_eq!(sessions.take_pending(1).await, None);
        // The non-confirming session is left alone.
        assert_eq!(sessions.step(1).await, ConversationStep::ChoosingPair);
    }

    #[tokio::test]
    async fn test_sweep_expires_idle_sessions() {
        let sessions = SessionMap::new(Duration::ZERO);
        sessions.set_step(1, ConversationStep::ChoosingPair).await;
        sessions.set_step(2, ConversationStep::ChoosingPair).await;

        assert_eq!(sessions.sweep().await, 2);
        assert_eq!(sessions.step(1).await, ConversationStep::Idle);
    }

    #[tokio::test]
    async fn test_sweep_keeps_active_sessions() {
        let sessions = SessionMap::new(Duration::from_secs(1800));
        sessions.set_step(1, ConversationStep::ChoosingPair).await;

        assert_eq!(sessions.sweep().await, 0);
        assert_eq!(sessions.step(1).await, ConversationStep::ChoosingPair);
    }
}
