use std::sync::Arc;

use teloxide::prelude::*;

use super::{keyboards, HandlerResult};
use crate::services::exchange_service::{ExchangeEvent, ExchangeService};

const WELCOME: &str = "🔐 Welcome to CryptoSwap!\n\
    Fast simulated crypto exchange\n\n\
    Choose an action:";

/// `/start`: make sure the account exists, reset the conversation and show
/// the main menu.
pub async fn show_welcome(
    bot: &Bot,
    chat_id: ChatId,
    service: &Arc<ExchangeService>,
    user_id: i64,
    username: Option<&str>,
) -> HandlerResult {
    service
        .handle(user_id, username, ExchangeEvent::Start)
        .await?;
    bot.send_message(chat_id, WELCOME)
        .reply_markup(keyboards::main_menu())
        .await?;
    Ok(())
}
