use std::sync::Arc;

use teloxide::prelude::*;

use super::{start, HandlerResult};
use crate::services::balance_service::{self, BalanceResult};
use crate::services::exchange_service::ExchangeService;
use crate::utils::errors::ExchangeError;

pub async fn show_balance(
    bot: &Bot,
    chat_id: ChatId,
    service: &Arc<ExchangeService>,
    user_id: i64,
    username: Option<&str>,
) -> HandlerResult {
    match balance_service::get_balance(service.store(), user_id).await {
        Ok(result) => {
            bot.send_message(chat_id, render(&result)).await?;
            Ok(())
        }
        // A never-seen user gets the welcome flow instead of an error.
        Err(ExchangeError::MissingAccount(_)) => {
            start::show_welcome(bot, chat_id, service, user_id, username).await
        }
        Err(e) => Err(e.into()),
    }
}

fn render(result: &BalanceResult) -> String {
    if result.entries.is_empty() {
        return "💰 No funds on your balance yet".to_string();
    }
    let mut text = String::from("💼 Your balance:\n");
    for (currency, amount) in &result.entries {
        text.push_str(&format!("• {currency}: {amount:.6}\n"));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_lists_currencies_with_six_decimals() {
        let result = BalanceResult {
            entries: vec![("BTC".to_string(), 0.1), ("USDT".to_string(), 120_050.0)],
        };
        let text = render(&result);
        assert!(text.contains("• BTC: 0.100000"));
        assert!(text.contains("• USDT: 120050.000000"));
    }

    #[test]
    fn test_render_empty_balance() {
        let result = BalanceResult { entries: vec![] };
        assert_eq!(render(&result), "💰 No funds on your balance yet");
    }
}
