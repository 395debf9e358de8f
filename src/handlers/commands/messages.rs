//! Message command handlers
//!
//! Pinning works off the replied-to message; /unpin without a reply lifts
//! the most recent pin instead.

use teloxide::prelude::*;
use teloxide::types::{Message, MessageId};
use crate::services::ServiceFactory;
use crate::utils::errors::Result;
use super::{require_rights, PIN};

/// Handle /pin — pin the replied-to message
pub async fn handle_pin(bot: Bot, msg: Message, services: ServiceFactory) -> Result<()> {
    if !msg.chat.is_supergroup() {
        return Ok(());
    }
    if require_rights(&bot, &msg, &services, PIN).await?.is_none() {
        return Ok(());
    }

    let Some(target) = pin_target(&msg) else {
        bot.send_message(msg.chat.id, "Reply to the message you want to pin.").await?;
        return Ok(());
    };

    bot.pin_chat_message(msg.chat.id, target).await?;
    Ok(())
}

/// Handle /unpin — unpin the replied-to message, or the latest pin
pub async fn handle_unpin(bot: Bot, msg: Message, services: ServiceFactory) -> Result<()> {
    if !msg.chat.is_supergroup() {
        return Ok(());
    }
    if require_rights(&bot, &msg, &services, PIN).await?.is_none() {
        return Ok(());
    }

    let request = bot.unpin_chat_message(msg.chat.id);
    match pin_target(&msg) {
        Some(target) => request.message_id(target).await?,
        None => request.await?,
    };
    Ok(())
}

fn pin_target(msg: &Message) -> Option<MessageId> {
    msg.reply_to_message().map(|replied| replied.id)
}
