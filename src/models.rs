use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::enums::{AlertDirection, AlertKind, PatternDirection, PatternType};

// ─── PriceAlert ──────────────────────────────────────────────────────

/// Trigger condition carried by an alert. The variant selects which
/// numeric fields are authoritative; the other variant's fields do not
/// exist on the record at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AlertCondition {
    AbsolutePrice {
        target_price: f64,
    },
    PercentageChange {
        /// Magnitude threshold in percent, always positive.
        percentage: f64,
        direction: AlertDirection,
        /// Snapshot the change is measured against. None only transiently;
        /// healed to the current price on the next evaluation cycle.
        base_price: Option<f64>,
    },
}

impl AlertCondition {
    pub fn kind(&self) -> AlertKind {
        match self {
            AlertCondition::AbsolutePrice { .. } => AlertKind::AbsolutePrice,
            AlertCondition::PercentageChange { .. } => AlertKind::PercentageChange,
        }
    }
}

/// A user-owned price alert. Scoped by (id, user_id) on every mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "AlertRecord", into = "AlertRecord")]
pub struct PriceAlert {
    pub id: Uuid,
    pub user_id: String,
    pub token_address: String,
    pub condition: AlertCondition,
    pub is_active: bool,
    pub triggered_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Flat record shape alerts are stored and exchanged as. Legacy records
/// predate the alert_type column, so every field but the scoping keys is
/// optional here.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct AlertRecord {
    id: Uuid,
    user_id: String,
    token_address: String,
    #[serde(default)]
    alert_type: Option<String>,
    #[serde(default)]
    target_price: Option<f64>,
    #[serde(default)]
    percentage_change: Option<f64>,
    #[serde(default)]
    direction: Option<AlertDirection>,
    #[serde(default)]
    base_price: Option<f64>,
    is_active: bool,
    #[serde(default)]
    triggered_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<AlertRecord> for PriceAlert {
    fn from(rec: AlertRecord) -> Self {
        let kind = rec
            .alert_type
            .as_deref()
            .and_then(|s| s.parse::<AlertKind>().ok());

        // Records without a recognizable alert_type are absolute-price
        // alerts (backward compatibility with pre-percentage records).
        let condition = match kind {
            Some(AlertKind::PercentageChange) => AlertCondition::PercentageChange {
                percentage: rec.percentage_change.unwrap_or_default(),
                direction: rec.direction.unwrap_or(AlertDirection::Both),
                base_price: rec.base_price,
            },
            Some(AlertKind::AbsolutePrice) | None => AlertCondition::AbsolutePrice {
                target_price: rec.target_price.unwrap_or_default(),
            },
        };

        PriceAlert {
            id: rec.id,
            user_id: rec.user_id,
            token_address: rec.token_address,
            condition,
            is_active: rec.is_active,
            triggered_at: rec.triggered_at,
            created_at: rec.created_at,
            updated_at: rec.updated_at,
        }
    }
}

impl From<PriceAlert> for AlertRecord {
    fn from(alert: PriceAlert) -> Self {
        let kind = alert.condition.kind();
        let (target_price, percentage_change, direction, base_price) = match alert.condition {
            AlertCondition::AbsolutePrice { target_price } => (Some(target_price), None, None, None),
            AlertCondition::PercentageChange {
                percentage,
                direction,
                base_price,
            } => (None, Some(percentage), Some(direction), base_price),
        };

        AlertRecord {
            id: alert.id,
            user_id: alert.user_id,
            token_address: alert.token_address,
            alert_type: Some(kind.as_str().to_string()),
            target_price,
            percentage_change,
            direction,
            base_price,
            is_active: alert.is_active,
            triggered_at: alert.triggered_at,
            created_at: alert.created_at,
            updated_at: alert.updated_at,
        }
    }
}

// ─── Candle ──────────────────────────────────────────────────────────

/// One OHLCV bucket. Supplied by the caller, never persisted here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

// ─── IdentifiedPattern ───────────────────────────────────────────────

/// Shape details captured at detection time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternData {
    pub start_price: f64,
    pub end_price: f64,
    pub start_timestamp: i64,
    pub end_timestamp: i64,
    /// Ordered price levels significant to the shape (peaks, channel
    /// endpoints), detector-specific.
    pub key_levels: Vec<f64>,
    pub direction: PatternDirection,
}

/// A recognized formation persisted by a detection run. Only the
/// completion flags ever change after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentifiedPattern {
    pub id: Uuid,
    pub token_address: String,
    pub pattern_type: PatternType,
    pub timeframe: String,
    /// 0..=100
    pub confidence_score: f64,
    pub price_at_identification: f64,
    pub pattern_data: PatternData,
    pub identified_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub is_completed: bool,
}
