//! Conversation and balance services, independent of the Telegram transport.

pub mod balance_service;
pub mod exchange_service;
