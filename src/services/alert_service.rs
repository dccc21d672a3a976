use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use uuid::Uuid;

use crate::enums::AlertDirection;
use crate::error::{AppError, Result};
use crate::gateways::{AlertStore, PriceLookup};
use crate::models::{AlertCondition, PriceAlert};

const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub enum NewAlertCondition {
    AbsolutePrice {
        target_price: f64,
    },
    PercentageChange {
        percentage: f64,
        direction: AlertDirection,
    },
}

#[derive(Debug, Clone)]
pub struct CreateAlertRequest {
    pub user_id: String,
    pub token_address: String,
    pub condition: NewAlertCondition,
}

/// Only fields relevant to the alert's existing type are applied.
#[derive(Debug, Clone, Default)]
pub struct UpdateAlertRequest {
    pub target_price: Option<f64>,
    pub percentage: Option<f64>,
    pub direction: Option<AlertDirection>,
}

#[derive(Clone)]
pub struct AlertService {
    store: Arc<dyn AlertStore>,
    prices: Arc<dyn PriceLookup>,
    read_timeout: Duration,
}

impl AlertService {
    pub fn new(store: Arc<dyn AlertStore>, prices: Arc<dyn PriceLookup>) -> Self {
        Self {
            store,
            prices,
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }

    pub fn with_read_timeout(mut self, read_timeout: Duration) -> Self {
        self.read_timeout = read_timeout;
        self
    }

    /// Create a new price alert. Percentage alerts snapshot the current
    /// price as their base; a failed lookup leaves the base unset and
    /// the evaluation engine heals it on the next cycle.
    pub async fn create_alert(&self, req: CreateAlertRequest) -> Result<PriceAlert> {
        let condition = match req.condition {
            NewAlertCondition::AbsolutePrice { target_price } => {
                validate_positive("target price", target_price)?;
                AlertCondition::AbsolutePrice { target_price }
            }
            NewAlertCondition::PercentageChange {
                percentage,
                direction,
            } => {
                validate_positive("percentage", percentage)?;
                AlertCondition::PercentageChange {
                    percentage,
                    direction,
                    base_price: self.snapshot_base_price(&req.token_address).await,
                }
            }
        };

        let now = Utc::now();
        let alert = PriceAlert {
            id: Uuid::new_v4(),
            user_id: req.user_id,
            token_address: req.token_address,
            condition,
            is_active: true,
            triggered_at: None,
            created_at: now,
            updated_at: now,
        };

        self.store.create(alert).await
    }

    /// Update an alert's thresholds. Percentage alerts also get their
    /// base price re-snapshotted from a fresh lookup, best-effort.
    pub async fn update_alert(
        &self,
        id: Uuid,
        user_id: &str,
        req: UpdateAlertRequest,
    ) -> Result<PriceAlert> {
        let mut alert = self
            .store
            .find_by_id(id, user_id)
            .await?
            .ok_or(AppError::AlertNotFound)?;

        match &mut alert.condition {
            AlertCondition::AbsolutePrice { target_price } => {
                if let Some(new_target) = req.target_price {
                    validate_positive("target price", new_target)?;
                    *target_price = new_target;
                }
            }
            AlertCondition::PercentageChange {
                percentage,
                direction,
                base_price,
            } => {
                if let Some(new_percentage) = req.percentage {
                    validate_positive("percentage", new_percentage)?;
                    *percentage = new_percentage;
                }
                if let Some(new_direction) = req.direction {
                    *direction = new_direction;
                }
                if let Some(price) = self.snapshot_base_price(&alert.token_address).await {
                    *base_price = Some(price);
                }
            }
        }

        alert.updated_at = Utc::now();
        self.store.update(&alert).await?;
        Ok(alert)
    }

    /// Toggle an alert on or off. Reactivating a percentage alert
    /// re-snapshots its base price so change is measured from now.
    pub async fn toggle_alert_status(
        &self,
        id: Uuid,
        user_id: &str,
        is_active: bool,
    ) -> Result<PriceAlert> {
        let mut alert = self
            .store
            .find_by_id(id, user_id)
            .await?
            .ok_or(AppError::AlertNotFound)?;

        if is_active {
            if let AlertCondition::PercentageChange { base_price, .. } = &mut alert.condition {
                if let Some(price) = self.snapshot_base_price(&alert.token_address).await {
                    *base_price = Some(price);
                }
            }
        }

        alert.is_active = is_active;
        alert.updated_at = Utc::now();
        self.store.update(&alert).await?;
        Ok(alert)
    }

    pub async fn delete_alert(&self, id: Uuid, user_id: &str) -> Result<()> {
        let affected = self.store.delete(id, user_id).await?;
        if affected == 0 {
            return Err(AppError::AlertNotFound);
        }
        Ok(())
    }

    /// List a user's alerts. Degrades to an empty list on store errors
    /// or timeout; callers must not read the result as a guarantee that
    /// no alerts exist.
    pub async fn get_user_alerts(&self, user_id: &str) -> Vec<PriceAlert> {
        match tokio::time::timeout(self.read_timeout, self.store.find_by_user(user_id)).await {
            Ok(Ok(alerts)) => alerts,
            Ok(Err(e)) => {
                tracing::warn!(user_id, error = %e, "Alert listing failed, returning empty");
                Vec::new()
            }
            Err(_) => {
                tracing::warn!(user_id, "Alert listing timed out, returning empty");
                Vec::new()
            }
        }
    }

    async fn snapshot_base_price(&self, token_address: &str) -> Option<f64> {
        match self.prices.get_current_price(token_address).await {
            Ok(Some(price)) => Some(price.current_price),
            Ok(None) => {
                tracing::warn!(token_address, "No price for base snapshot");
                None
            }
            Err(e) => {
                tracing::warn!(token_address, error = %e, "Base price snapshot failed");
                None
            }
        }
    }
}

fn validate_positive(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(AppError::InvalidInput(format!(
            "{} must be a positive number, got {}",
            field, value
        )));
    }
    Ok(())
}
