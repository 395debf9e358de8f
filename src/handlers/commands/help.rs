//! Help command handler
//!
//! /help works in private chat and offers per-topic help pages behind an
//! inline keyboard; pressing a button swaps the message text to the topic.

use teloxide::prelude::*;
use teloxide::types::{CallbackQuery, InlineKeyboardButton, InlineKeyboardMarkup, Message};
use crate::utils::errors::Result;

const INTRO: &str = "Hi! I can help you moderate your groups. \
Choose a topic below to learn what I can do.";

const TOPICS: &[(&str, &str)] = &[
    (
        "Restrictions",
        "Restrictions

These commands let you restrict users with an optional expiration time and reason.

Commands

/ban [user ID] [duration] [reason] - bans the target user
/dban - like /ban, also deletes the replied message
/sban - like /ban, deletes the command message and replies nothing
/unban [user ID] [reason] - unbans the target user
/mute [user ID] [duration] [reason] - mutes the target user
/dmute - like /mute, also deletes the replied message
/smute - like /mute, deletes the command message and replies nothing
/unmute [user ID] [reason] - unmutes the target user
/kick [user ID] [reason] - kicks the target user
/dkick - like /kick, also deletes the replied message

Notes

- These commands require the right to restrict members.
- /dkick also requires the right to delete messages.
- The user ID parameter is required if not replying to a message.
- The duration is in seconds, or hours/days with an h or d suffix.",
    ),
    (
        "Warns",
        "Warns

Warning users lets you keep their behavior in control without directly restricting them. \
When a user collects enough warnings, the configured warn mode is applied automatically.

Commands

/warn [user ID] [reason] - warns the target user
/dwarn - like /warn, also deletes the replied message
/swarn - like /warn, also deletes the command message
/rmwarn [user ID] [reason] - removes the target user's last warning
/resetwarn [user ID] [reason] - removes all of the target user's warnings
/warns [user ID] - shows the target user's warns
/warnlimit [limit] - changes the warn limit (2-10)
/warnmode [ban|mute|tban|tmute] [duration] - sets the action taken on reaching the limit

Notes

- These commands require the right to restrict members.
- /warnlimit and /warnmode also require the right to change group info.
- tban and tmute require a duration.",
    ),
    (
        "Messages",
        "Messages

These commands make working with messages easier.

Commands

/pin - pins the replied message
/unpin - unpins the replied message, or the latest pin

Notes

- /pin and /unpin require the right to pin messages.",
    ),
    (
        "Log Channels",
        "Log Channels

A log channel receives live records of restrictions and chat events.

Commands

/logchannel - shows the current log channel setting
/setlogchannel [channel ID] - sets or changes the log channel
/unsetlogchannel - removes the log channel

Notes

- These commands require you to be the owner of the group.
- Add and promote me in the channel you would like to use for logging.",
    ),
];

fn topic_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(
        TOPICS
            .iter()
            .map(|(name, _)| vec![InlineKeyboardButton::callback(*name, format!("help:{name}"))])
            .collect::<Vec<_>>(),
    )
}

/// Handle /help in private chat
pub async fn handle_help(bot: Bot, msg: Message) -> Result<()> {
    if !msg.chat.is_private() {
        return Ok(());
    }
    bot.send_message(msg.chat.id, INTRO)
        .reply_markup(topic_keyboard())
        .await?;
    Ok(())
}

/// Handle a help topic button press
pub async fn handle_help_callback(bot: Bot, query: CallbackQuery) -> Result<()> {
    let Some(topic) = query.data.as_deref().and_then(|data| data.strip_prefix("help:")) else {
        return Ok(());
    };

    bot.answer_callback_query(query.id.clone()).await?;

    let Some(text) = TOPICS
        .iter()
        .find(|(name, _)| *name == topic)
        .map(|(_, text)| *text)
    else {
        return Ok(());
    };

    if let Some(message) = query.message.as_ref() {
        bot.edit_message_text(message.chat().id, message.id(), text)
            .reply_markup(topic_keyboard())
            .await?;
    }
    Ok(())
}
