//! Admin-facing side channel: a short summary of every completed exchange.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::ChatId;
use tracing::warn;

/// Receives exchange notifications. Injected into the exchange service so
/// structured alerting could replace chat messages without touching the
/// conversation logic.
#[async_trait]
pub trait AdminNotifier: Send + Sync {
    /// Fire-and-forget; implementations must not block the conversation on
    /// delivery and must swallow (but log) delivery failures.
    async fn notify(&self, text: &str);
}

/// Sends notifications to a fixed admin chat.
pub struct TelegramNotifier {
    bot: Bot,
    admin_chat: ChatId,
}

impl TelegramNotifier {
    pub fn new(bot: Bot, admin_id: i64) -> Self {
        Self {
            bot,
            admin_chat: ChatId(admin_id),
        }
    }
}

#[async_trait]
impl AdminNotifier for TelegramNotifier {
    async fn notify(&self, text: &str) {
        let bot = self.bot.clone();
        let chat = self.admin_chat;
        let text = text.to_owned();
        tokio::spawn(async move {
            if let Err(e) = bot.send_message(chat, text).await {
                warn!("Admin notification failed: {e}");
            }
        });
    }
}

/// Used when no admin id is configured.
pub struct NoopNotifier;

#[async_trait]
impl AdminNotifier for NoopNotifier {
    async fn notify(&self, _text: &str) {}
}
