use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup};

use super::{MENU_BALANCE, MENU_EXCHANGE, MENU_HELP};

/// Persistent reply keyboard with the three main actions.
pub fn main_menu() -> KeyboardMarkup {
    KeyboardMarkup::new(vec![
        vec![
            KeyboardButton::new(MENU_EXCHANGE),
            KeyboardButton::new(MENU_BALANCE),
        ],
        vec![KeyboardButton::new(MENU_HELP)],
    ])
    .resize_keyboard()
}

/// Inline menu of the quoted currency pairs. The callback payload encodes
/// the ordered pair as `pair_{FROM}_{TO}`.
pub fn pair_menu() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![
            InlineKeyboardButton::callback("BTC → USDT", "pair_BTC_USDT"),
            InlineKeyboardButton::callback("ETH → USDT", "pair_ETH_USDT"),
        ],
        vec![
            InlineKeyboardButton::callback("USDT → BTC", "pair_USDT_BTC"),
            InlineKeyboardButton::callback("USDT → ETH", "pair_USDT_ETH"),
        ],
    ])
}

pub fn confirm_menu() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![InlineKeyboardButton::callback("✅ Confirm", "confirm_yes")],
        vec![InlineKeyboardButton::callback("❌ Cancel", "confirm_no")],
    ])
}
