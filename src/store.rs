use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::gateways::{AlertStore, PatternStore};
use crate::models::{IdentifiedPattern, PriceAlert};

/// In-memory alert store. The store seam is what matters; a durable
/// backend slots in behind the same trait.
#[derive(Default)]
pub struct MemoryAlertStore {
    alerts: RwLock<HashMap<Uuid, PriceAlert>>,
}

impl MemoryAlertStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AlertStore for MemoryAlertStore {
    async fn create(&self, alert: PriceAlert) -> Result<PriceAlert> {
        let mut alerts = self.alerts.write().await;
        alerts.insert(alert.id, alert.clone());
        Ok(alert)
    }

    async fn find_by_id(&self, id: Uuid, user_id: &str) -> Result<Option<PriceAlert>> {
        let alerts = self.alerts.read().await;
        Ok(alerts.get(&id).filter(|a| a.user_id == user_id).cloned())
    }

    async fn find_all_active(&self) -> Result<Vec<PriceAlert>> {
        let alerts = self.alerts.read().await;
        let mut active: Vec<PriceAlert> =
            alerts.values().filter(|a| a.is_active).cloned().collect();
        active.sort_by_key(|a| a.created_at);
        Ok(active)
    }

    async fn find_by_user(&self, user_id: &str) -> Result<Vec<PriceAlert>> {
        let alerts = self.alerts.read().await;
        let mut found: Vec<PriceAlert> = alerts
            .values()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect();
        found.sort_by_key(|a| a.created_at);
        Ok(found)
    }

    async fn update(&self, alert: &PriceAlert) -> Result<()> {
        let mut alerts = self.alerts.write().await;
        match alerts.get_mut(&alert.id) {
            Some(existing) => {
                *existing = alert.clone();
                Ok(())
            }
            None => Err(AppError::Store(format!("No alert with id {}", alert.id))),
        }
    }

    async fn delete(&self, id: Uuid, user_id: &str) -> Result<u64> {
        let mut alerts = self.alerts.write().await;
        let matches = alerts
            .get(&id)
            .map(|a| a.user_id == user_id)
            .unwrap_or(false);

        if matches {
            alerts.remove(&id);
            Ok(1)
        } else {
            Ok(0)
        }
    }
}

/// In-memory pattern store.
#[derive(Default)]
pub struct MemoryPatternStore {
    patterns: RwLock<HashMap<Uuid, IdentifiedPattern>>,
}

impl MemoryPatternStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PatternStore for MemoryPatternStore {
    async fn save(&self, pattern: IdentifiedPattern) -> Result<IdentifiedPattern> {
        let mut patterns = self.patterns.write().await;
        patterns.insert(pattern.id, pattern.clone());
        Ok(pattern)
    }

    async fn find_by_token(
        &self,
        token_address: &str,
        timeframe: &str,
    ) -> Result<Vec<IdentifiedPattern>> {
        let patterns = self.patterns.read().await;
        let mut found: Vec<IdentifiedPattern> = patterns
            .values()
            .filter(|p| p.token_address == token_address && p.timeframe == timeframe)
            .cloned()
            .collect();
        found.sort_by_key(|p| p.identified_at);
        Ok(found)
    }

    async fn mark_completed(&self, id: Uuid) -> Result<()> {
        let mut patterns = self.patterns.write().await;
        match patterns.get_mut(&id) {
            Some(pattern) => {
                pattern.is_completed = true;
                pattern.completed_at = Some(Utc::now());
                Ok(())
            }
            None => Err(AppError::PatternNotFound),
        }
    }
}
