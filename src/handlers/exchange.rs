use std::sync::Arc;

use teloxide::prelude::*;
use tracing::{debug, warn};

use super::{keyboards, start, HandlerResult};
use crate::services::exchange_service::{ExchangeEvent, ExchangeService, Reply};
use crate::utils::errors::ExchangeError;
use crate::utils::format::format_amount;

/// Generic reply for store failures; details go to the log, not the chat.
const FAILURE_REPLY: &str = "⚠️ Something went wrong. Please try again.";

/// The "Exchange" menu button: open pair selection.
pub async fn begin(
    bot: &Bot,
    chat_id: ChatId,
    service: &Arc<ExchangeService>,
    user_id: i64,
) -> HandlerResult {
    service
        .handle(user_id, None, ExchangeEvent::BeginExchange)
        .await?;
    bot.send_message(chat_id, "Choose a currency pair:")
        .reply_markup(keyboards::pair_menu())
        .await?;
    Ok(())
}

/// A `pair_{FROM}_{TO}` callback.
pub async fn pair_selected(
    bot: &Bot,
    chat_id: ChatId,
    service: &Arc<ExchangeService>,
    user_id: i64,
    pair: &str,
) -> HandlerResult {
    let Some((from, to)) = pair.split_once('_') else {
        debug!("Malformed pair payload: {pair}");
        return Ok(());
    };
    let reply = service
        .handle(
            user_id,
            None,
            ExchangeEvent::SelectPair {
                from: from.to_string(),
                to: to.to_string(),
            },
        )
        .await?;
    if let Reply::AmountPrompt { from } = reply {
        bot.send_message(chat_id, format!("Enter the amount of {from} to exchange:"))
            .await?;
    }
    Ok(())
}

/// Free text from a user; only meaningful while an amount is expected.
pub async fn amount_entered(
    bot: &Bot,
    chat_id: ChatId,
    service: &Arc<ExchangeService>,
    user_id: i64,
    text: &str,
) -> HandlerResult {
    match service
        .handle(user_id, None, ExchangeEvent::EnterAmount(text.to_string()))
        .await
    {
        Ok(Reply::Quote {
            from,
            to,
            amount,
            to_amount,
            rate,
        }) => {
            let quote = format!(
                "🔁 Exchange: {} {} → {} {}\n\
                 📈 Rate: 1 {} = {} {}\n\n\
                 Confirm the exchange?",
                format_amount(amount),
                from,
                format_amount(to_amount),
                to,
                from,
                format_amount(rate),
                to,
            );
            bot.send_message(chat_id, quote)
                .reply_markup(keyboards::confirm_menu())
                .await?;
        }
        Ok(_) => {
            // Text that is not part of a flow: point at the menu.
            bot.send_message(chat_id, "Use the menu below 👇")
                .reply_markup(keyboards::main_menu())
                .await?;
        }
        Err(ExchangeError::InvalidAmount) => {
            bot.send_message(chat_id, "❌ Enter a positive number!")
                .await?;
        }
        Err(ExchangeError::UnknownPair { .. }) => {
            bot.send_message(chat_id, "⚠️ No rate for that pair. Choose another:")
                .reply_markup(keyboards::pair_menu())
                .await?;
        }
        Err(e) => {
            warn!("Amount handling failed for user {user_id}: {e}");
            bot.send_message(chat_id, FAILURE_REPLY).await?;
        }
    }
    Ok(())
}

/// The `confirm_yes` callback: commit the trade and return to the menu.
pub async fn confirm(
    bot: &Bot,
    chat_id: ChatId,
    service: &Arc<ExchangeService>,
    user_id: i64,
    username: Option<&str>,
) -> HandlerResult {
    match service
        .handle(user_id, username, ExchangeEvent::ConfirmYes)
        .await
    {
        Ok(Reply::Completed {
            tx_id,
            to,
            to_amount,
        }) => {
            bot.send_message(
                chat_id,
                format!(
                    "✅ Exchange complete!\n\
                     Transaction ID: {tx_id}\n\
                     Credited: {} {to}",
                    format_amount(to_amount),
                ),
            )
            .await?;
            start::show_welcome(bot, chat_id, service, user_id, username).await
        }
        Ok(_) => {
            debug!("Confirm with no pending trade from user {user_id}");
            Ok(())
        }
        Err(e) => {
            // The pending trade is already consumed here. Reply generically
            // and restart from the menu, which also creates the account for a
            // user who skipped /start.
            warn!("Exchange failed for user {user_id}: {e}");
            bot.send_message(chat_id, FAILURE_REPLY).await?;
            start::show_welcome(bot, chat_id, service, user_id, username).await
        }
    }
}

/// The `confirm_no` callback: drop the trade and return to the menu.
pub async fn cancel(
    bot: &Bot,
    chat_id: ChatId,
    service: &Arc<ExchangeService>,
    user_id: i64,
    username: Option<&str>,
) -> HandlerResult {
    match service
        .handle(user_id, username, ExchangeEvent::ConfirmNo)
        .await?
    {
        Reply::Cancelled => {
            bot.send_message(chat_id, "❌ Exchange cancelled").await?;
            start::show_welcome(bot, chat_id, service, user_id, username).await
        }
        _ => Ok(()),
    }
}
