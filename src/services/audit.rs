//! Audit log emission
//!
//! Every moderation action and observed chat event produces one audit
//! record: a structured tracing entry, forwarded to the chat's configured
//! log channel when one is set. Emission is fire-and-forget; a delivery
//! failure never fails the action that produced the record.

use teloxide::prelude::*;
use teloxide::types::ChatId;
use tracing::warn;
use crate::database::DatabaseService;
use crate::utils::logging;

#[derive(Clone)]
pub struct AuditLogger {
    bot: Bot,
    db: DatabaseService,
}

impl AuditLogger {
    pub fn new(bot: Bot, db: DatabaseService) -> Self {
        Self { bot, db }
    }

    /// Record one restriction action (ban, mute, kick, warn, unban, ...)
    pub async fn log_restriction_event(
        &self,
        chat_id: ChatId,
        action: &str,
        actor: i64,
        target: i64,
        detail: &str,
    ) {
        logging::log_moderation_action(chat_id.0, action, actor, target, Some(detail));

        let text = if detail.is_empty() {
            format!("{action}\nAdmin: {actor}\nTarget: {target}")
        } else {
            format!("{action}\nAdmin: {actor}\nTarget: {target}\n{detail}")
        };
        self.forward(chat_id, text).await;
    }

    /// Record one non-restriction chat event (leaves, promotions, ...)
    pub async fn log_chat_event(&self, chat_id: ChatId, event: &str, detail: &str) {
        logging::log_chat_event(chat_id.0, event, None, Some(detail));

        let text = if detail.is_empty() {
            event.to_string()
        } else {
            format!("{event}\n{detail}")
        };
        self.forward(chat_id, text).await;
    }

    /// Best-effort delivery to the chat's log channel, if configured
    async fn forward(&self, chat_id: ChatId, text: String) {
        let log_chat_id = match self.db.settings.get(chat_id.0).await {
            Ok(settings) => settings.log_chat_id,
            Err(e) => {
                warn!(chat_id = chat_id.0, error = %e, "Failed to load log channel setting");
                return;
            }
        };

        if let Some(log_chat_id) = log_chat_id {
            if let Err(e) = self.bot.send_message(ChatId(log_chat_id), text).await {
                warn!(
                    chat_id = chat_id.0,
                    log_chat_id = log_chat_id,
                    error = %e,
                    "Failed to forward audit entry to log channel"
                );
            }
        }
    }
}
