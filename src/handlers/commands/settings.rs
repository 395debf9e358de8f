//! Chat configuration command handlers
//!
//! Log channel management (owner-only) and the admin snapshot reload.

use teloxide::prelude::*;
use teloxide::types::Message;
use crate::models::ChatSettingsPatch;
use crate::services::{Required, ServiceFactory};
use crate::utils::errors::Result;
use super::{require_rights, ANY_ADMIN};

/// Handle /logchannel — show the current log channel
pub async fn handle_logchannel(bot: Bot, msg: Message, services: ServiceFactory) -> Result<()> {
    if !msg.chat.is_supergroup() {
        return Ok(());
    }
    if require_rights(&bot, &msg, &services, Required::Owner).await?.is_none() {
        return Ok(());
    }

    let settings = services.db.settings.get(msg.chat.id.0).await?;
    match settings.log_chat_id {
        Some(log_chat_id) => {
            bot.send_message(msg.chat.id, format!("Log channel: {log_chat_id}")).await?;
        }
        None => {
            bot.send_message(msg.chat.id, "No log channel is set.").await?;
        }
    }
    Ok(())
}

/// Handle /setlogchannel — set or change the log channel
pub async fn handle_setlogchannel(bot: Bot, msg: Message, services: ServiceFactory) -> Result<()> {
    if !msg.chat.is_supergroup() {
        return Ok(());
    }
    if require_rights(&bot, &msg, &services, Required::Owner).await?.is_none() {
        return Ok(());
    }

    let arg = msg.text().unwrap_or_default().split_whitespace().nth(1);
    let log_chat_id: i64 = match arg.and_then(|v| v.parse().ok()) {
        Some(id) => id,
        None => {
            bot.send_message(msg.chat.id, "Invalid channel ID specified.").await?;
            return Ok(());
        }
    };

    let patch = ChatSettingsPatch { log_chat_id: Some(Some(log_chat_id)), ..Default::default() };
    if services.db.settings.update(msg.chat.id.0, patch).await? {
        services.audit.log_chat_event(msg.chat.id, "LOGCHANNEL", "Log channel set").await;
        bot.send_message(msg.chat.id, "Log channel changed.").await?;
    } else {
        bot.send_message(msg.chat.id, "Log channel was not changed.").await?;
    }
    Ok(())
}

/// Handle /unsetlogchannel — remove the log channel
pub async fn handle_unsetlogchannel(bot: Bot, msg: Message, services: ServiceFactory) -> Result<()> {
    if !msg.chat.is_supergroup() {
        return Ok(());
    }
    if require_rights(&bot, &msg, &services, Required::Owner).await?.is_none() {
        return Ok(());
    }

    let patch = ChatSettingsPatch { log_chat_id: Some(None), ..Default::default() };
    if services.db.settings.update(msg.chat.id.0, patch).await? {
        bot.send_message(msg.chat.id, "Log channel removed.").await?;
    } else {
        bot.send_message(msg.chat.id, "No log channel is set.").await?;
    }
    Ok(())
}

/// Handle /reload — rebuild the chat's admin snapshot
pub async fn handle_reload(bot: Bot, msg: Message, services: ServiceFactory) -> Result<()> {
    if !msg.chat.is_supergroup() {
        return Ok(());
    }
    if require_rights(&bot, &msg, &services, ANY_ADMIN).await?.is_none() {
        return Ok(());
    }

    let snapshot = services.rights.refresh(msg.chat.id).await?;
    bot.send_message(
        msg.chat.id,
        format!("Admin list reloaded ({} admins).", snapshot.len()),
    )
    .await?;
    Ok(())
}
