//! Telegram update handlers.
//!
//! Translate inbound messages and callback button presses into
//! [`ExchangeEvent`](crate::services::exchange_service::ExchangeEvent)s and
//! render the replies. A handler failure is logged by the dispatcher and
//! never takes down other users' conversations.

pub mod balance;
pub mod exchange;
pub mod help;
pub mod keyboards;
pub mod start;

use std::sync::Arc;

use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::types::ChatId;
use thiserror::Error;
use tracing::debug;

use crate::services::exchange_service::ExchangeService;
use crate::utils::errors::ExchangeError;

pub const MENU_EXCHANGE: &str = "💰 Exchange";
pub const MENU_BALANCE: &str = "💼 Balance";
pub const MENU_HELP: &str = "ℹ️ Help";

/// Errors that escape a handler.
#[derive(Debug, Error)]
pub enum BotError {
    #[error("telegram request failed: {0}")]
    Telegram(#[from] teloxide::RequestError),
    #[error(transparent)]
    Exchange(#[from] ExchangeError),
}

pub type HandlerResult = Result<(), BotError>;

pub fn schema() -> UpdateHandler<BotError> {
    dptree::entry()
        .branch(Update::filter_message().endpoint(message_handler))
        .branch(Update::filter_callback_query().endpoint(callback_handler))
}

async fn message_handler(
    bot: Bot,
    msg: Message,
    service: Arc<ExchangeService>,
) -> HandlerResult {
    let Some(user) = msg.from.clone() else {
        return Ok(());
    };
    let user_id = user.id.0 as i64;
    let username = user.username.as_deref();
    let text = msg.text().unwrap_or("");

    match text {
        "/start" => start::show_welcome(&bot, msg.chat.id, &service, user_id, username).await,
        "/help" | MENU_HELP => help::show_help(&bot, msg.chat.id).await,
        MENU_EXCHANGE => exchange::begin(&bot, msg.chat.id, &service, user_id).await,
        MENU_BALANCE => balance::show_balance(&bot, msg.chat.id, &service, user_id, username).await,
        // Anything else is only meaningful while an amount is expected.
        _ => exchange::amount_entered(&bot, msg.chat.id, &service, user_id, text).await,
    }
}

async fn callback_handler(
    bot: Bot,
    q: CallbackQuery,
    service: Arc<ExchangeService>,
) -> HandlerResult {
    bot.answer_callback_query(q.id.clone()).await?;

    let Some(data) = q.data.as_deref() else {
        return Ok(());
    };
    let user_id = q.from.id.0 as i64;
    let username = q.from.username.as_deref();
    // Exchanges run in the private chat with the user.
    let chat_id = ChatId(user_id);

    if let Some(pair) = data.strip_prefix("pair_") {
        exchange::pair_selected(&bot, chat_id, &service, user_id, pair).await
    } else if data == "confirm_yes" {
        exchange::confirm(&bot, chat_id, &service, user_id, username).await
    } else if data == "confirm_no" {
        exchange::cancel(&bot, chat_id, &service, user_id, username).await
    } else {
        debug!("Unhandled callback data: {data}");
        Ok(())
    }
}
