use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{IdentifiedPattern, PriceAlert};

mod dexscreener;
mod telegram;

pub use dexscreener::DexScreenerGateway;
pub use telegram::TelegramNotifier;

/// Current price plus token identity, as returned by the price source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPrice {
    pub current_price: f64,
    pub name: String,
    pub symbol: String,
}

/// Upstream price source. Ok(None) means the token is unknown upstream;
/// Err means the source itself failed.
#[async_trait]
pub trait PriceLookup: Send + Sync {
    async fn get_current_price(&self, token_address: &str) -> Result<Option<TokenPrice>>;
}

/// Persistence seam for alert records.
#[async_trait]
pub trait AlertStore: Send + Sync {
    async fn create(&self, alert: PriceAlert) -> Result<PriceAlert>;

    async fn find_by_id(&self, id: Uuid, user_id: &str) -> Result<Option<PriceAlert>>;

    async fn find_all_active(&self) -> Result<Vec<PriceAlert>>;

    async fn find_by_user(&self, user_id: &str) -> Result<Vec<PriceAlert>>;

    async fn update(&self, alert: &PriceAlert) -> Result<()>;

    /// Returns the number of records removed.
    async fn delete(&self, id: Uuid, user_id: &str) -> Result<u64>;
}

/// Persistence seam for recognized formations.
#[async_trait]
pub trait PatternStore: Send + Sync {
    async fn save(&self, pattern: IdentifiedPattern) -> Result<IdentifiedPattern>;

    async fn find_by_token(
        &self,
        token_address: &str,
        timeframe: &str,
    ) -> Result<Vec<IdentifiedPattern>>;

    /// Flips is_completed/completed_at and nothing else.
    async fn mark_completed(&self, id: Uuid) -> Result<()>;
}

/// Outbound message channel. Failures are logged by callers, never
/// retried within the same trigger.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, user_id: &str, message: &str) -> Result<()>;
}
