//! Chat member update handling
//!
//! Membership transitions observed through `chat_member` updates are logged
//! to the audit sink. Promotions and demotions are logged but deliberately
//! do not patch the rights snapshot; the snapshot only changes on an
//! explicit reload.

use teloxide::prelude::*;
use teloxide::types::{ChatMemberKind, ChatMemberUpdated, Restricted, User};
use crate::services::ServiceFactory;
use crate::utils::errors::Result;

/// Handle a chat member status transition
pub async fn handle_chat_member_updated(
    bot: Bot,
    update: ChatMemberUpdated,
    services: ServiceFactory,
) -> Result<()> {
    let me = bot.get_me().await?;
    if update.from.id == me.id {
        // Transitions this bot caused are audited by the dispatcher already.
        return Ok(());
    }

    let chat_id = update.chat.id;
    let actor = update.from.id.0 as i64;
    let target = update.new_chat_member.user.id.0 as i64;
    let old = &update.old_chat_member.kind;
    let new = &update.new_chat_member.kind;

    if old.is_banned() && !new.is_banned() {
        services.audit.log_restriction_event(chat_id, "UNBAN", actor, target, "").await;
    } else if new.is_banned() {
        services.audit.log_restriction_event(chat_id, "BAN", actor, target, "").await;
    } else if new.is_administrator() {
        services.audit.log_restriction_event(chat_id, "PROMOTE", actor, target, "").await;
    } else if new.is_left() {
        let name = display_name(&update.new_chat_member.user);
        services
            .audit
            .log_chat_event(chat_id, "LEAVE", &format!("User: {name} [{target}]"))
            .await;
    } else if let ChatMemberKind::Restricted(restricted) = new {
        services
            .audit
            .log_restriction_event(chat_id, "RESTRICT", actor, target, &permission_list(restricted))
            .await;
    } else if old.is_restricted() && new.is_member() {
        services.audit.log_restriction_event(chat_id, "DERESTRICT", actor, target, "").await;
    }

    Ok(())
}

/// Full name plus username, e.g. "John Smith (@jsmith)"
fn display_name(user: &User) -> String {
    match &user.username {
        Some(username) => format!("{} (@{username})", user.full_name()),
        None => user.full_name(),
    }
}

/// The restricted member's remaining permissions, one per line
fn permission_list(restricted: &Restricted) -> String {
    [
        ("Can Send Messages", restricted.can_send_messages),
        ("Can Send Audios", restricted.can_send_audios),
        ("Can Send Documents", restricted.can_send_documents),
        ("Can Send Photos", restricted.can_send_photos),
        ("Can Send Videos", restricted.can_send_videos),
        ("Can Send Video Notes", restricted.can_send_video_notes),
        ("Can Send Voice Notes", restricted.can_send_voice_notes),
        ("Can Send Polls", restricted.can_send_polls),
        ("Can Send Other Messages", restricted.can_send_other_messages),
        ("Can Add Web Page Previews", restricted.can_add_web_page_previews),
        ("Can Change Info", restricted.can_change_info),
        ("Can Invite Users", restricted.can_invite_users),
        ("Can Pin Messages", restricted.can_pin_messages),
    ]
    .into_iter()
    .map(|(name, allowed)| format!("{name}: {}", if allowed { "Yes" } else { "No" }))
    .collect::<Vec<_>>()
    .join("\n")
}
