//! Restriction command handlers
//!
//! The ban and mute command families collapse into one parameterized intent:
//! the `d` variants also delete the replied-to message, the `s` variants
//! delete the command message and skip the confirmation reply.

use teloxide::prelude::*;
use teloxide::types::Message;
use crate::models::restriction::{RestrictionIntent, RestrictionKind};
use crate::services::ServiceFactory;
use crate::utils::errors::Result;
use crate::utils::params::restriction_parameters;
use super::{require_rights, RESTRICT, RESTRICT_AND_DELETE};

/// Handle /ban, /dban and /sban
pub async fn handle_ban(
    bot: Bot,
    msg: Message,
    services: ServiceFactory,
    delete_replied: bool,
    silent: bool,
) -> Result<()> {
    restrict(bot, msg, services, RestrictionKind::Ban, delete_replied, silent).await
}

/// Handle /mute, /dmute and /smute
pub async fn handle_mute(
    bot: Bot,
    msg: Message,
    services: ServiceFactory,
    delete_replied: bool,
    silent: bool,
) -> Result<()> {
    restrict(bot, msg, services, RestrictionKind::Mute, delete_replied, silent).await
}

async fn restrict(
    bot: Bot,
    msg: Message,
    services: ServiceFactory,
    kind: RestrictionKind,
    delete_replied: bool,
    silent: bool,
) -> Result<()> {
    if !msg.chat.is_supergroup() {
        return Ok(());
    }
    let Some(actor) = require_rights(&bot, &msg, &services, RESTRICT).await? else {
        return Ok(());
    };

    let params = restriction_parameters(&msg, true);
    let Some(target) = params.user else {
        bot.send_message(msg.chat.id, "Target not specified.").await?;
        return Ok(());
    };

    let intent = RestrictionIntent::permanent(kind, target)
        .with_until(params.until.until, params.until.display.clone())
        .with_reason(params.reason)
        .with_flags(silent, delete_replied, silent);
    services
        .restrictions
        .execute(msg.chat.id, actor, &intent, Some(&msg))
        .await?;

    if !silent {
        bot.send_message(
            msg.chat.id,
            format!("{} {}{}.", capitalized(kind.past_tense()), target, params.until.display),
        )
        .await?;
    }
    Ok(())
}

/// Handle /unban
pub async fn handle_unban(bot: Bot, msg: Message, services: ServiceFactory) -> Result<()> {
    if !msg.chat.is_supergroup() {
        return Ok(());
    }
    let Some(actor) = require_rights(&bot, &msg, &services, RESTRICT).await? else {
        return Ok(());
    };

    let params = restriction_parameters(&msg, false);
    let Some(target) = params.user else {
        bot.send_message(msg.chat.id, "Target not specified.").await?;
        return Ok(());
    };

    services.restrictions.unban(msg.chat.id, actor, target, params.reason).await?;
    bot.send_message(msg.chat.id, format!("Unbanned {target}.")).await?;
    Ok(())
}

/// Handle /unmute
pub async fn handle_unmute(bot: Bot, msg: Message, services: ServiceFactory) -> Result<()> {
    if !msg.chat.is_supergroup() {
        return Ok(());
    }
    let Some(actor) = require_rights(&bot, &msg, &services, RESTRICT).await? else {
        return Ok(());
    };

    let params = restriction_parameters(&msg, false);
    let Some(target) = params.user else {
        bot.send_message(msg.chat.id, "Target not specified.").await?;
        return Ok(());
    };

    services.restrictions.unmute(msg.chat.id, actor, target, params.reason).await?;
    bot.send_message(msg.chat.id, format!("Unmuted {target}.")).await?;
    Ok(())
}

/// Handle /kick and /dkick
pub async fn handle_kick(
    bot: Bot,
    msg: Message,
    services: ServiceFactory,
    delete_replied: bool,
) -> Result<()> {
    if !msg.chat.is_supergroup() {
        return Ok(());
    }
    let required = if delete_replied { RESTRICT_AND_DELETE } else { RESTRICT };
    let Some(actor) = require_rights(&bot, &msg, &services, required).await? else {
        return Ok(());
    };

    let params = restriction_parameters(&msg, false);
    let Some(target) = params.user else {
        bot.send_message(msg.chat.id, "Target not specified.").await?;
        return Ok(());
    };

    let intent = RestrictionIntent::permanent(RestrictionKind::Kick, target)
        .with_reason(params.reason)
        .with_flags(false, delete_replied, delete_replied);
    services
        .restrictions
        .execute(msg.chat.id, actor, &intent, Some(&msg))
        .await?;

    if !delete_replied {
        bot.send_message(msg.chat.id, format!("Kicked {target}.")).await?;
    }
    Ok(())
}

fn capitalized(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalized() {
        assert_eq!(capitalized("banned"), "Banned");
        assert_eq!(capitalized("muted"), "Muted");
        assert_eq!(capitalized(""), "");
    }
}
