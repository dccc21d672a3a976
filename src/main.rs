use std::sync::Arc;

use pricewatch::alert_checker::AlertChecker;
use pricewatch::gateways::{DexScreenerGateway, TelegramNotifier};
use pricewatch::store::MemoryAlertStore;
use pricewatch::{Config, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pricewatch=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| pricewatch::AppError::Config(e.to_string()))?;

    tracing::info!(interval = ?config.check_interval, "Starting pricewatch");

    let prices = Arc::new(DexScreenerGateway::new(config.price_lookup_timeout)?);
    let notifier = Arc::new(TelegramNotifier::from_token(&config.telegram_bot_token));
    let alert_store = Arc::new(MemoryAlertStore::new());

    let checker = AlertChecker::new(
        alert_store,
        prices,
        notifier,
        config.checker_settings(),
    );

    checker.start().await;

    Ok(())
}
