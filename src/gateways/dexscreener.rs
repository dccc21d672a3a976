use std::collections::HashMap;
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::error::{AppError, Result};
use crate::gateways::{PriceLookup, TokenPrice};

const DEXSCREENER_API_BASE: &str = "https://api.dexscreener.com/latest/dex";
const CACHE_DURATION_SECS: u64 = 60; // Cache prices for 1 minute

/// Price lookup backed by the DexScreener token endpoint, keyed by
/// contract address.
pub struct DexScreenerGateway {
    client: reqwest::Client,
    base_url: String,
    cache: RwLock<HashMap<String, CachedPrice>>,
}

#[derive(Debug, Clone)]
struct CachedPrice {
    price: TokenPrice,
    fetched_at: SystemTime,
}

#[derive(Deserialize)]
struct TokenPairsResponse {
    pairs: Option<Vec<PairInfo>>,
}

#[derive(Deserialize)]
struct PairInfo {
    #[serde(rename = "baseToken")]
    base_token: BaseToken,
    #[serde(rename = "priceUsd")]
    price_usd: Option<String>,
}

#[derive(Deserialize)]
struct BaseToken {
    name: String,
    symbol: String,
}

impl DexScreenerGateway {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: DEXSCREENER_API_BASE.to_string(),
            cache: RwLock::new(HashMap::new()),
        })
    }

    async fn get_from_cache(&self, token_address: &str) -> Option<TokenPrice> {
        let cache = self.cache.read().await;
        if let Some(cached) = cache.get(token_address) {
            let age = SystemTime::now()
                .duration_since(cached.fetched_at)
                .unwrap_or(Duration::from_secs(999));

            if age.as_secs() < CACHE_DURATION_SECS {
                return Some(cached.price.clone());
            }
        }
        None
    }

    async fn update_cache(&self, token_address: String, price: TokenPrice) {
        let mut cache = self.cache.write().await;
        cache.insert(
            token_address,
            CachedPrice {
                price,
                fetched_at: SystemTime::now(),
            },
        );
    }
}

#[async_trait]
impl PriceLookup for DexScreenerGateway {
    async fn get_current_price(&self, token_address: &str) -> Result<Option<TokenPrice>> {
        if let Some(cached) = self.get_from_cache(token_address).await {
            return Ok(Some(cached));
        }

        let url = format!("{}/tokens/{}", self.base_url, token_address);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("DexScreener request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "DexScreener returned status: {}",
                response.status()
            )));
        }

        let body: TokenPairsResponse = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("Failed to parse DexScreener response: {}", e)))?;

        let price = match first_quoted_pair(body) {
            Some(price) => price,
            None => return Ok(None),
        };

        self.update_cache(token_address.to_string(), price.clone()).await;

        Ok(Some(price))
    }
}

/// The first pair carrying a USD quote that actually parses is the
/// reference quote for the token. A quote that does not parse is no
/// quote at all, never a zero price.
fn first_quoted_pair(body: TokenPairsResponse) -> Option<TokenPrice> {
    body.pairs.unwrap_or_default().into_iter().find_map(|p| {
        let current_price: f64 = p.price_usd.as_deref().and_then(|v| v.parse().ok())?;
        Some(TokenPrice {
            current_price,
            name: p.base_token.name,
            symbol: p.base_token.symbol,
        })
    })
}
