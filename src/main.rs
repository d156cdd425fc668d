use std::sync::Arc;
use std::time::Duration;

use teloxide::prelude::*;
use teloxide::types::BotCommand;
use teloxide::update_listeners::webhooks;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod config;
mod handlers;
mod notify;
mod rates;
mod services;
mod session;
mod store;
mod utils;

use config::Config;
use notify::{AdminNotifier, NoopNotifier, TelegramNotifier};
use rates::DemoRates;
use services::exchange_service::ExchangeService;
use session::SessionMap;
use store::memory::MemoryStore;
use store::mysql::MySqlStore;
use store::BalanceStore;

/// Abandoned conversations are dropped after this much inactivity.
const SESSION_TTL: Duration = Duration::from_secs(30 * 60);
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("cryptoswap=debug".parse().unwrap())
                .add_directive("teloxide=warn".parse().unwrap()),
        )
        .with_target(true)
        .init();

    info!("Starting CryptoSwap bot...");

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Configuration error: {e}");
            return;
        }
    };

    let (store, seed): (Arc<dyn BalanceStore>, _) = match &config.database_url {
        Some(url) => {
            info!("Using MySQL balance store");
            match MySqlStore::connect(url).await {
                Ok(s) => (Arc::new(s), store::EMPTY_SEED),
                Err(e) => {
                    error!("Failed to initialize database: {e}");
                    return;
                }
            }
        }
        None => {
            info!("No DATABASE_URL set; using in-memory store with demo seed balances");
            (Arc::new(MemoryStore::new()), store::DEMO_SEED)
        }
    };

    let bot = Bot::new(config.bot_token.clone());

    let notifier: Arc<dyn AdminNotifier> = match config.admin_id {
        Some(admin_id) => {
            info!("Exchange notifications go to admin {admin_id}");
            Arc::new(TelegramNotifier::new(bot.clone(), admin_id))
        }
        None => Arc::new(NoopNotifier),
    };

    let sessions = Arc::new(SessionMap::new(SESSION_TTL));
    session::spawn_sweeper(sessions.clone(), SWEEP_INTERVAL);

    let service = Arc::new(ExchangeService::new(
        store,
        Arc::new(DemoRates),
        notifier,
        sessions,
        seed,
    ));

    let commands = vec![
        BotCommand::new("start", "Open the main menu"),
        BotCommand::new("help", "How to use the bot"),
    ];
    if let Err(e) = bot.set_my_commands(commands).await {
        error!("Failed to register bot commands: {e}");
    }

    let mut dispatcher = Dispatcher::builder(bot.clone(), handlers::schema())
        .dependencies(dptree::deps![service])
        .error_handler(LoggingErrorHandler::with_custom_text("Handler error"))
        .enable_ctrlc_handler()
        .build();

    match &config.webhook_url {
        Some(base) => {
            let addr = ([0, 0, 0, 0], config.port).into();
            let url = format!("{}/webhook", base.trim_end_matches('/'))
                .parse()
                .expect("WEBHOOK_URL is not a valid URL");
            info!("Listening for webhook updates on port {}", config.port);
            let listener = webhooks::axum(bot, webhooks::Options::new(addr, url))
                .await
                .expect("Failed to register webhook");
            dispatcher
                .dispatch_with_listener(
                    listener,
                    LoggingErrorHandler::with_custom_text("Webhook listener error"),
                )
                .await;
        }
        None => {
            info!("Polling for updates");
            dispatcher.dispatch().await;
        }
    }
}
