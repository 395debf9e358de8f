//! Warn command handlers
//!
//! Warnings escalate: once a user's count reaches the chat's warn limit the
//! counter resets and the configured warn mode is applied through the
//! restriction dispatcher. Admins and bots cannot be warned, nor can users
//! who are not currently members.

use chrono::Utc;
use teloxide::prelude::*;
use teloxide::types::{ChatMember, Message, UserId};
use tracing::warn;
use crate::models::settings::{WarnMode, MAX_WARN_LIMIT, MIN_WARN_LIMIT};
use crate::models::ChatSettingsPatch;
use crate::services::{escalation_decision, ServiceFactory};
use crate::utils::duration::is_valid_duration;
use crate::utils::errors::Result;
use crate::utils::params::{restriction_parameters, RestrictionParameters};
use super::{require_rights, RESTRICT, RESTRICT_AND_CHANGE_INFO};

/// Handle /warn, /dwarn and /swarn
pub async fn handle_warn(
    bot: Bot,
    msg: Message,
    services: ServiceFactory,
    delete_replied: bool,
    delete_trigger: bool,
) -> Result<()> {
    if !msg.chat.is_supergroup() {
        return Ok(());
    }
    let Some(actor) = require_rights(&bot, &msg, &services, RESTRICT).await? else {
        return Ok(());
    };

    let params = restriction_parameters(&msg, false);
    let Some(target) = resolve_warnable_target(&bot, &msg, &services, &params).await? else {
        return Ok(());
    };

    match bot.get_chat_member(msg.chat.id, UserId(target as u64)).await {
        Ok(member) => {
            if let Some(refusal) = warn_refusal(&member) {
                bot.send_message(msg.chat.id, refusal).await?;
                return Ok(());
            }
        }
        // Fail closed: an unprobeable user counts as not a member.
        Err(_) => {
            bot.send_message(msg.chat.id, "The target user is not a member.").await?;
            return Ok(());
        }
    }

    if delete_replied {
        if let Some(replied) = msg.reply_to_message() {
            delete_best_effort(&bot, &msg, replied.id).await;
        }
    }
    if delete_trigger {
        delete_best_effort(&bot, &msg, msg.id).await;
    }

    let settings = services.db.settings.get(msg.chat.id.0).await?;
    let warns = services
        .db
        .warns
        .increment(msg.chat.id.0, target, settings.warn_limit)
        .await?;

    services
        .audit
        .log_restriction_event(
            msg.chat.id,
            &format!("WARN {warns}/{}", settings.warn_limit),
            actor,
            target,
            &params
                .reason
                .as_ref()
                .map(|reason| format!("Reason: {reason}"))
                .unwrap_or_default(),
        )
        .await;

    let reason_text = params
        .reason
        .as_ref()
        .map(|reason| format!(" for:\n{reason}\n\n"))
        .unwrap_or_else(|| ". ".to_string());

    match escalation_decision(&settings, warns, target, Utc::now())? {
        Some(intent) => {
            let verb = if settings.warn_mode.is_ban() { "banned" } else { "muted" };
            let suffix = intent.until_display.clone();
            services
                .restrictions
                .execute(msg.chat.id, actor, &intent, None)
                .await?;
            bot.send_message(
                msg.chat.id,
                format!(
                    "{target} was warned{reason_text}This was the last warn. {target} was {verb}{suffix}."
                ),
            )
            .await?;
        }
        None => {
            bot.send_message(
                msg.chat.id,
                format!(
                    "{target} was warned{reason_text}This is the {} warn.",
                    ordinal(warns)
                ),
            )
            .await?;
        }
    }
    Ok(())
}

/// Handle /rmwarn — remove the target's last warning
pub async fn handle_rmwarn(bot: Bot, msg: Message, services: ServiceFactory) -> Result<()> {
    if !msg.chat.is_supergroup() {
        return Ok(());
    }
    let Some(actor) = require_rights(&bot, &msg, &services, RESTRICT).await? else {
        return Ok(());
    };

    let params = restriction_parameters(&msg, false);
    let Some(target) = resolve_warnable_target(&bot, &msg, &services, &params).await? else {
        return Ok(());
    };

    if services.db.warns.remove_last(msg.chat.id.0, target).await? {
        services
            .audit
            .log_restriction_event(
                msg.chat.id,
                "RMWARN",
                actor,
                target,
                &params
                    .reason
                    .as_ref()
                    .map(|reason| format!("Reason: {reason}"))
                    .unwrap_or_default(),
            )
            .await;
        bot.send_message(msg.chat.id, format!("Removed {target}'s last warning.")).await?;
    } else {
        bot.send_message(msg.chat.id, format!("{target} has no warnings.")).await?;
    }
    Ok(())
}

/// Handle /resetwarn — clear all of the target's warnings
pub async fn handle_resetwarn(bot: Bot, msg: Message, services: ServiceFactory) -> Result<()> {
    if !msg.chat.is_supergroup() {
        return Ok(());
    }
    let Some(actor) = require_rights(&bot, &msg, &services, RESTRICT).await? else {
        return Ok(());
    };

    let params = restriction_parameters(&msg, false);
    let Some(target) = resolve_warnable_target(&bot, &msg, &services, &params).await? else {
        return Ok(());
    };

    if services.db.warns.reset_all(msg.chat.id.0, target).await? {
        services
            .audit
            .log_restriction_event(
                msg.chat.id,
                "RESETWARN",
                actor,
                target,
                &params
                    .reason
                    .as_ref()
                    .map(|reason| format!("Reason: {reason}"))
                    .unwrap_or_default(),
            )
            .await;
        bot.send_message(msg.chat.id, format!("Removed {target}'s warnings.")).await?;
    } else {
        bot.send_message(msg.chat.id, format!("{target} has no warnings.")).await?;
    }
    Ok(())
}

/// Handle /warns — show the target's warn count
pub async fn handle_warns(bot: Bot, msg: Message, services: ServiceFactory) -> Result<()> {
    if !msg.chat.is_supergroup() {
        return Ok(());
    }
    if require_rights(&bot, &msg, &services, RESTRICT).await?.is_none() {
        return Ok(());
    }

    let params = restriction_parameters(&msg, false);
    let Some(target) = resolve_warnable_target(&bot, &msg, &services, &params).await? else {
        return Ok(());
    };

    let warns = services.db.warns.get(msg.chat.id.0, target).await?;
    bot.send_message(
        msg.chat.id,
        format!("{target} has {warns} warn{}.", if warns == 1 { "" } else { "s" }),
    )
    .await?;
    Ok(())
}

/// Handle /warnlimit — set the chat's warn threshold
pub async fn handle_warnlimit(bot: Bot, msg: Message, services: ServiceFactory) -> Result<()> {
    if !msg.chat.is_supergroup() {
        return Ok(());
    }
    if require_rights(&bot, &msg, &services, RESTRICT_AND_CHANGE_INFO).await?.is_none() {
        return Ok(());
    }

    let arg = msg.text().unwrap_or_default().split_whitespace().nth(1);
    let warn_limit: i32 = match arg.and_then(|v| v.parse().ok()) {
        Some(limit) => limit,
        None => {
            bot.send_message(msg.chat.id, "Invalid limit specified.").await?;
            return Ok(());
        }
    };
    if warn_limit < MIN_WARN_LIMIT {
        bot.send_message(msg.chat.id, format!("Warn limit cannot be less than {MIN_WARN_LIMIT}."))
            .await?;
        return Ok(());
    }
    if warn_limit > MAX_WARN_LIMIT {
        bot.send_message(msg.chat.id, format!("Warn limit cannot be more than {MAX_WARN_LIMIT}."))
            .await?;
        return Ok(());
    }

    let patch = ChatSettingsPatch { warn_limit: Some(warn_limit), ..Default::default() };
    if services.db.settings.update(msg.chat.id.0, patch).await? {
        bot.send_message(msg.chat.id, "Warn limit changed.").await?;
    } else {
        bot.send_message(msg.chat.id, "Warn limit was not changed.").await?;
    }
    Ok(())
}

/// Handle /warnmode — set the escalation action
pub async fn handle_warnmode(bot: Bot, msg: Message, services: ServiceFactory) -> Result<()> {
    if !msg.chat.is_supergroup() {
        return Ok(());
    }
    if require_rights(&bot, &msg, &services, RESTRICT_AND_CHANGE_INFO).await?.is_none() {
        return Ok(());
    }

    let text = msg.text().unwrap_or_default();
    let mut args = text.split_whitespace().skip(1);
    let mode_arg = args.next();
    let duration_arg = args.next();

    let Some(mode_arg) = mode_arg else {
        bot.send_message(msg.chat.id, "Warn mode not specified.").await?;
        return Ok(());
    };
    let Some(warn_mode) = WarnMode::parse(mode_arg) else {
        bot.send_message(msg.chat.id, "Invalid warn mode specified.").await?;
        return Ok(());
    };

    let mut patch = ChatSettingsPatch { warn_mode: Some(warn_mode), ..Default::default() };
    if warn_mode.is_timed() {
        let Some(duration) = duration_arg else {
            bot.send_message(msg.chat.id, "Duration not specified.").await?;
            return Ok(());
        };
        if !is_valid_duration(duration) {
            bot.send_message(msg.chat.id, "Invalid duration specified.").await?;
            return Ok(());
        }
        patch.warn_duration = Some(Some(duration.to_string()));
    }

    if services.db.settings.update(msg.chat.id.0, patch).await? {
        bot.send_message(msg.chat.id, "Warn mode changed.").await?;
    } else {
        bot.send_message(msg.chat.id, "Warn mode was not changed.").await?;
    }
    Ok(())
}

/// Shared target guard for the warn commands: a resolvable target that is
/// neither a cached admin nor a bot. Replies with the applicable refusal
/// and returns `None` when the command must not proceed.
async fn resolve_warnable_target(
    bot: &Bot,
    msg: &Message,
    services: &ServiceFactory,
    params: &RestrictionParameters,
) -> Result<Option<i64>> {
    let Some(target) = params.user else {
        bot.send_message(msg.chat.id, "Target not specified.").await?;
        return Ok(None);
    };

    let me = bot.get_me().await?;
    let target_is_bot = params.replied_author_is_bot || target == me.id.0 as i64;
    if services.rights.is_admin(msg.chat.id, target).await? || target_is_bot {
        bot.send_message(msg.chat.id, "Can't warn admins or bots.").await?;
        return Ok(None);
    }

    Ok(Some(target))
}

/// Why a probed chat member cannot be warned, `None` when they can.
///
/// Bot accounts are exempt even when targeted by bare id, and only current
/// (possibly restricted) members can collect warnings.
fn warn_refusal(member: &ChatMember) -> Option<&'static str> {
    if member.user.is_bot {
        return Some("Can't warn admins or bots.");
    }
    if !member.kind.is_member() && !member.kind.is_restricted() {
        return Some("The target user is not a member.");
    }
    None
}

async fn delete_best_effort(bot: &Bot, msg: &Message, message_id: teloxide::types::MessageId) {
    if let Err(e) = bot.delete_message(msg.chat.id, message_id).await {
        warn!(chat_id = msg.chat.id.0, message_id = message_id.0, error = %e, "Failed to delete message");
    }
}

fn ordinal(n: i32) -> String {
    let suffix = match n {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordinal() {
        assert_eq!(ordinal(1), "1st");
        assert_eq!(ordinal(2), "2nd");
        assert_eq!(ordinal(3), "3rd");
        assert_eq!(ordinal(4), "4th");
        assert_eq!(ordinal(9), "9th");
    }

    fn chat_member(value: serde_json::Value) -> ChatMember {
        serde_json::from_value(value).expect("valid chat member JSON")
    }

    fn member(is_bot: bool) -> ChatMember {
        chat_member(serde_json::json!({
            "status": "member",
            "user": {"id": 5, "is_bot": is_bot, "first_name": "Target"},
        }))
    }

    #[test]
    fn test_current_members_can_be_warned() {
        assert_eq!(warn_refusal(&member(false)), None);
    }

    #[test]
    fn test_restricted_members_can_be_warned() {
        let restricted = chat_member(serde_json::json!({
            "status": "restricted",
            "user": {"id": 5, "is_bot": false, "first_name": "Target"},
            "is_member": true,
            "until_date": 0,
            "can_send_messages": false,
            "can_send_audios": false,
            "can_send_documents": false,
            "can_send_photos": false,
            "can_send_videos": false,
            "can_send_video_notes": false,
            "can_send_voice_notes": false,
            "can_send_polls": false,
            "can_send_other_messages": false,
            "can_add_web_page_previews": false,
            "can_change_info": false,
            "can_invite_users": false,
            "can_pin_messages": false,
            "can_manage_topics": false,
        }));
        assert_eq!(warn_refusal(&restricted), None);
    }

    #[test]
    fn test_bot_members_are_exempt() {
        // Bots probed by bare id get the same refusal as replied-to bots.
        assert_eq!(warn_refusal(&member(true)), Some("Can't warn admins or bots."));
    }

    #[test]
    fn test_departed_users_cannot_be_warned() {
        let left = chat_member(serde_json::json!({
            "status": "left",
            "user": {"id": 5, "is_bot": false, "first_name": "Target"},
        }));
        assert_eq!(warn_refusal(&left), Some("The target user is not a member."));
    }
}
