use std::env;
use std::time::Duration;

use crate::alert_checker::CheckerSettings;

#[derive(Debug, Clone)]
pub struct Config {
    pub telegram_bot_token: String,
    /// How often the evaluation pass runs.
    pub check_interval: Duration,
    /// Pause between token groups within a pass.
    pub group_delay: Duration,
    /// Pause after each triggered notification.
    pub notify_delay: Duration,
    /// HTTP timeout for the price source.
    pub price_lookup_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenv::dotenv().ok();

        let telegram_bot_token = env::var("TELEGRAM_BOT_TOKEN")?;

        let check_interval_secs: u64 = env::var("CHECK_INTERVAL_SECS")
            .unwrap_or_else(|_| "43200".to_string())
            .parse()?;
        let group_delay_ms: u64 = env::var("GROUP_DELAY_MS")
            .unwrap_or_else(|_| "500".to_string())
            .parse()?;
        let notify_delay_ms: u64 = env::var("NOTIFY_DELAY_MS")
            .unwrap_or_else(|_| "100".to_string())
            .parse()?;
        let price_lookup_timeout_secs: u64 = env::var("PRICE_LOOKUP_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()?;

        if check_interval_secs == 0 {
            return Err("CHECK_INTERVAL_SECS must be greater than zero".into());
        }

        Ok(Config {
            telegram_bot_token,
            check_interval: Duration::from_secs(check_interval_secs),
            group_delay: Duration::from_millis(group_delay_ms),
            notify_delay: Duration::from_millis(notify_delay_ms),
            price_lookup_timeout: Duration::from_secs(price_lookup_timeout_secs),
        })
    }

    pub fn checker_settings(&self) -> CheckerSettings {
        CheckerSettings {
            check_interval: self.check_interval,
            group_delay: self.group_delay,
            notify_delay: self.notify_delay,
        }
    }
}
