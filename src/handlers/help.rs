use teloxide::prelude::*;

use super::HandlerResult;

const HELP: &str = "❓ How to use the bot:\n\n\
    1. Tap '💰 Exchange'\n\
    2. Pick a currency pair\n\
    3. Enter an amount\n\
    4. Confirm the trade\n\n\
    All rates are fixed demo values; no real funds move.";

pub async fn show_help(bot: &Bot, chat_id: ChatId) -> HandlerResult {
    bot.send_message(chat_id, HELP).await?;
    Ok(())
}
