use async_trait::async_trait;
use teloxide::prelude::*;

use crate::error::{AppError, Result};
use crate::gateways::Notifier;

/// Delivers formatted alert messages over a Telegram bot. The user id is
/// the chat id the dialog layer recorded at alert creation.
pub struct TelegramNotifier {
    bot: Bot,
}

impl TelegramNotifier {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    pub fn from_token(token: &str) -> Self {
        Self { bot: Bot::new(token) }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, user_id: &str, message: &str) -> Result<()> {
        let chat_id = user_id
            .parse::<i64>()
            .map(ChatId)
            .map_err(|_| AppError::Notification(format!("Invalid chat id: {}", user_id)))?;

        self.bot
            .send_message(chat_id, message)
            .await
            .map_err(|e| AppError::Notification(format!("Telegram send failed: {}", e)))?;

        Ok(())
    }
}
