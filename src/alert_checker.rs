use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::Mutex;
use tokio::time::{interval, sleep, MissedTickBehavior};

use crate::enums::AlertDirection;
use crate::error::Result;
use crate::gateways::{AlertStore, Notifier, PriceLookup, TokenPrice};
use crate::models::{AlertCondition, PriceAlert};

/// An absolute-price alert fires on approach: within 2% of the target.
const ABSOLUTE_PROXIMITY: f64 = 0.02;

/// Throttling knobs. Deployment parameters, not correctness parameters.
#[derive(Debug, Clone)]
pub struct CheckerSettings {
    pub check_interval: Duration,
    pub group_delay: Duration,
    pub notify_delay: Duration,
}

impl Default for CheckerSettings {
    fn default() -> Self {
        Self {
            check_interval: Duration::from_secs(12 * 60 * 60),
            group_delay: Duration::from_millis(500),
            notify_delay: Duration::from_millis(100),
        }
    }
}

/// Periodic evaluation of active alerts. One pass at a time: ticks that
/// land while a pass is still running are skipped, never run alongside.
pub struct AlertChecker {
    store: Arc<dyn AlertStore>,
    prices: Arc<dyn PriceLookup>,
    notifier: Arc<dyn Notifier>,
    settings: CheckerSettings,
    pass_lock: Mutex<()>,
}

impl AlertChecker {
    pub fn new(
        store: Arc<dyn AlertStore>,
        prices: Arc<dyn PriceLookup>,
        notifier: Arc<dyn Notifier>,
        settings: CheckerSettings,
    ) -> Self {
        Self {
            store,
            prices,
            notifier,
            settings,
            pass_lock: Mutex::new(()),
        }
    }

    /// Run the checker loop until the process shuts down.
    pub async fn start(&self) {
        let mut interval = interval(self.settings.check_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;

            if let Err(e) = self.run_once().await {
                tracing::error!(error = %e, "Alert evaluation pass failed");
            }
        }
    }

    /// Run one evaluation pass now. No-op when a pass is already in
    /// flight.
    pub async fn run_once(&self) -> Result<()> {
        let _guard = match self.pass_lock.try_lock() {
            Ok(guard) => guard,
            Err(_) => {
                tracing::warn!("Evaluation pass already running, skipping this tick");
                return Ok(());
            }
        };

        self.evaluate_all().await
    }

    async fn evaluate_all(&self) -> Result<()> {
        let alerts = self.store.find_all_active().await?;
        if alerts.is_empty() {
            return Ok(());
        }

        tracing::info!(count = alerts.len(), "Evaluating active alerts");

        // One price lookup per token.
        let mut groups: HashMap<String, Vec<PriceAlert>> = HashMap::new();
        for alert in alerts {
            groups.entry(alert.token_address.clone()).or_default().push(alert);
        }

        let mut first_group = true;
        for (token_address, group) in groups {
            if !first_group {
                sleep(self.settings.group_delay).await;
            }
            first_group = false;

            let price = match self.prices.get_current_price(&token_address).await {
                Ok(Some(price)) => price,
                Ok(None) => {
                    tracing::warn!(%token_address, "No price available, skipping group");
                    continue;
                }
                Err(e) => {
                    tracing::warn!(%token_address, error = %e, "Price lookup failed, skipping group");
                    continue;
                }
            };

            for alert in group {
                let alert_id = alert.id;
                if let Err(e) = self.evaluate_alert(alert, &price).await {
                    tracing::warn!(alert_id = %alert_id, error = %e, "Alert evaluation failed");
                }
            }
        }

        Ok(())
    }

    async fn evaluate_alert(&self, mut alert: PriceAlert, price: &TokenPrice) -> Result<()> {
        let current = price.current_price;

        match alert.condition.clone() {
            AlertCondition::AbsolutePrice { target_price } => {
                if target_price <= 0.0 {
                    tracing::warn!(alert_id = %alert.id, "Alert has no usable target price");
                    return Ok(());
                }

                let proximity = (current - target_price).abs() / target_price;
                if proximity <= ABSOLUTE_PROXIMITY {
                    let message = format_absolute_message(price, current, target_price);
                    self.trigger(&mut alert, message).await?;
                }
            }
            AlertCondition::PercentageChange {
                percentage,
                direction,
                base_price,
            } => {
                let base = match base_price {
                    Some(base) => base,
                    None => {
                        // Heal the missing snapshot; the alert becomes
                        // eligible from the next cycle.
                        if let AlertCondition::PercentageChange { base_price, .. } =
                            &mut alert.condition
                        {
                            *base_price = Some(current);
                        }
                        alert.updated_at = Utc::now();
                        self.store.update(&alert).await?;
                        tracing::info!(alert_id = %alert.id, base = current, "Seeded missing base price");
                        return Ok(());
                    }
                };

                let percent_change = (current - base) / base * 100.0;
                let fired = match direction {
                    AlertDirection::Both => percent_change.abs() >= percentage,
                    AlertDirection::Increase => percent_change >= percentage,
                    AlertDirection::Decrease => percent_change <= -percentage,
                };

                if fired {
                    let message =
                        format_percentage_message(price, current, base, percent_change, percentage);
                    self.trigger(&mut alert, message).await?;
                }
            }
        }

        Ok(())
    }

    /// Notify, deactivate, throttle. A failed send is logged and the
    /// alert still deactivates; we never retry within the pass.
    async fn trigger(&self, alert: &mut PriceAlert, message: String) -> Result<()> {
        if let Err(e) = self.notifier.send(&alert.user_id, &message).await {
            tracing::warn!(alert_id = %alert.id, error = %e, "Notification failed");
        }

        alert.is_active = false;
        alert.triggered_at = Some(Utc::now());
        alert.updated_at = Utc::now();
        self.store.update(alert).await?;

        tracing::info!(
            alert_id = %alert.id,
            user_id = %alert.user_id,
            token_address = %alert.token_address,
            "Alert triggered and deactivated"
        );

        sleep(self.settings.notify_delay).await;
        Ok(())
    }
}

fn format_absolute_message(price: &TokenPrice, current: f64, target: f64) -> String {
    let glyph = if current >= target { "📈" } else { "📉" };
    format!(
        "{glyph} Price Alert Triggered!\n\n\
        Token: {name} ({symbol})\n\
        Current Price: ${current:.6}\n\
        Target Price: ${target:.6}\n\n\
        This alert has been deactivated.",
        glyph = glyph,
        name = price.name,
        symbol = price.symbol,
        current = current,
        target = target,
    )
}

fn format_percentage_message(
    price: &TokenPrice,
    current: f64,
    base: f64,
    change: f64,
    threshold: f64,
) -> String {
    format!(
        "⚡ Price Alert Triggered!\n\n\
        Token: {name} ({symbol})\n\
        Base Price: ${base:.6}\n\
        Current Price: ${current:.6}\n\
        Change: {change:+.2}% (target {threshold}%)\n\n\
        This alert has been deactivated.",
        name = price.name,
        symbol = price.symbol,
        base = base,
        current = current,
        change = change,
        threshold = threshold,
    )
}
