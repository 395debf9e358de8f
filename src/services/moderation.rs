//! Restriction dispatcher and warn escalation
//!
//! Executes `RestrictionIntent` values against the Bot API. Direct commands
//! and the warn escalation share this single code path. The platform call
//! happens first and the audit record is emitted after it; audit delivery is
//! best-effort and does not undo an action already taken.

use chrono::{DateTime, Utc};
use teloxide::prelude::*;
use teloxide::types::{ChatId, ChatPermissions, Message, UserId};
use tracing::warn;
use crate::models::restriction::{RestrictionIntent, RestrictionKind};
use crate::models::settings::ChatSettings;
use crate::services::audit::AuditLogger;
use crate::utils::duration::parse_until_date;
use crate::utils::errors::{ChatWardenError, Result};

/// Delay between the ban and unban halves of a kick. Telegram reports a
/// freshly kicked user as banned for a moment; the pause keeps the unban
/// from racing that state. Callers must not rely on the exact value.
const KICK_UNBAN_DELAY: std::time::Duration = std::time::Duration::from_secs(1);

/// Permissions restored on unmute. The member's pre-restriction permissions
/// are not recomputed; everyone gets this canonical member set.
fn member_permissions() -> ChatPermissions {
    ChatPermissions::SEND_MESSAGES
        | ChatPermissions::SEND_AUDIOS
        | ChatPermissions::SEND_DOCUMENTS
        | ChatPermissions::SEND_PHOTOS
        | ChatPermissions::SEND_VIDEOS
        | ChatPermissions::SEND_VIDEO_NOTES
        | ChatPermissions::SEND_VOICE_NOTES
        | ChatPermissions::SEND_POLLS
        | ChatPermissions::SEND_OTHER_MESSAGES
        | ChatPermissions::ADD_WEB_PAGE_PREVIEWS
        | ChatPermissions::CHANGE_INFO
        | ChatPermissions::INVITE_USERS
        | ChatPermissions::PIN_MESSAGES
}

#[derive(Clone)]
pub struct RestrictionDispatcher {
    bot: Bot,
    audit: AuditLogger,
}

impl RestrictionDispatcher {
    pub fn new(bot: Bot, audit: AuditLogger) -> Self {
        Self { bot, audit }
    }

    /// Execute one restriction intent and emit exactly one audit record.
    ///
    /// `trigger` is the command message the intent's delete flags refer to;
    /// escalation intents pass `None`. Message deletions are secondary and
    /// best-effort; the restriction itself is the primary call and its
    /// failure surfaces to the caller.
    pub async fn execute(
        &self,
        chat_id: ChatId,
        actor: i64,
        intent: &RestrictionIntent,
        trigger: Option<&Message>,
    ) -> Result<()> {
        if let Some(trigger) = trigger {
            if intent.delete_replied {
                if let Some(replied) = trigger.reply_to_message() {
                    self.delete_best_effort(chat_id, replied.id.0).await;
                }
            }
            if intent.delete_trigger {
                self.delete_best_effort(chat_id, trigger.id.0).await;
            }
        }

        let user = UserId(intent.target as u64);
        match intent.kind {
            RestrictionKind::Ban => {
                let request = self.bot.ban_chat_member(chat_id, user);
                match intent.until {
                    Some(until) => request.until_date(until).await?,
                    None => request.await?,
                };
            }
            RestrictionKind::Mute => {
                let request = self
                    .bot
                    .restrict_chat_member(chat_id, user, ChatPermissions::empty());
                match intent.until {
                    Some(until) => request.until_date(until).await?,
                    None => request.await?,
                };
            }
            RestrictionKind::Kick => {
                self.bot.ban_chat_member(chat_id, user).await?;
                tokio::time::sleep(KICK_UNBAN_DELAY).await;
                self.bot.unban_chat_member(chat_id, user).await?;
            }
        }

        self.audit
            .log_restriction_event(
                chat_id,
                &intent.action_label(),
                actor,
                intent.target,
                &intent.reason_display(),
            )
            .await;

        Ok(())
    }

    /// Lift a ban
    pub async fn unban(&self, chat_id: ChatId, actor: i64, target: i64, reason: Option<String>) -> Result<()> {
        self.bot.unban_chat_member(chat_id, UserId(target as u64)).await?;
        let detail = match reason {
            Some(reason) => format!("Reason: {reason}"),
            None => "Reason: Not specified.".to_string(),
        };
        self.audit
            .log_restriction_event(chat_id, "UNBAN", actor, target, &detail)
            .await;
        Ok(())
    }

    /// Lift a mute by restoring the canonical member permission set
    pub async fn unmute(&self, chat_id: ChatId, actor: i64, target: i64, reason: Option<String>) -> Result<()> {
        self.bot
            .restrict_chat_member(chat_id, UserId(target as u64), member_permissions())
            .await?;
        let detail = match reason {
            Some(reason) => format!("Reason: {reason}"),
            None => "Reason: Not specified.".to_string(),
        };
        self.audit
            .log_restriction_event(chat_id, "UNMUTE", actor, target, &detail)
            .await;
        Ok(())
    }

    async fn delete_best_effort(&self, chat_id: ChatId, message_id: i32) {
        if let Err(e) = self
            .bot
            .delete_message(chat_id, teloxide::types::MessageId(message_id))
            .await
        {
            warn!(chat_id = chat_id.0, message_id = message_id, error = %e, "Failed to delete message");
        }
    }
}

/// Derive the restriction applied when a user's warn count reaches the
/// chat's limit.
///
/// The timed modes require a configured, parseable duration; a missing or
/// invalid one is a validation error surfaced to the caller.
/// Decide whether a post-increment warn count escalates.
///
/// Below the limit nothing happens; at or past it exactly one intent is
/// produced. The ledger resets the counter in the same transaction as the
/// increment, so one triggering count yields one intent.
pub fn escalation_decision(
    settings: &ChatSettings,
    count: i32,
    target: i64,
    now: DateTime<Utc>,
) -> Result<Option<RestrictionIntent>> {
    if count < settings.warn_limit {
        return Ok(None);
    }
    escalation_intent(settings, target, now).map(Some)
}

pub fn escalation_intent(
    settings: &ChatSettings,
    target: i64,
    now: DateTime<Utc>,
) -> Result<RestrictionIntent> {
    let kind = if settings.warn_mode.is_ban() {
        RestrictionKind::Ban
    } else {
        RestrictionKind::Mute
    };

    let mut intent = RestrictionIntent::permanent(kind, target)
        .with_reason(Some("Warn limit reached".to_string()));

    if settings.warn_mode.is_timed() {
        let duration = settings.warn_duration.as_deref().ok_or_else(|| {
            ChatWardenError::InvalidInput("Warn duration is not configured".to_string())
        })?;
        let parsed = parse_until_date(duration, now);
        if parsed.until.is_none() {
            return Err(ChatWardenError::InvalidInput(format!(
                "Invalid warn duration: {duration}"
            )));
        }
        intent = intent.with_until(parsed.until, parsed.display);
    }

    Ok(intent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::Duration;
    use crate::models::settings::WarnMode;

    fn settings(mode: WarnMode, duration: Option<&str>) -> ChatSettings {
        let mut settings = ChatSettings::default_for(-100);
        settings.warn_mode = mode;
        settings.warn_duration = duration.map(str::to_owned);
        settings
    }

    #[test]
    fn test_ban_mode_is_permanent_ban() {
        let intent = escalation_intent(&settings(WarnMode::Ban, None), 7, Utc::now()).unwrap();
        assert_eq!(intent.kind, RestrictionKind::Ban);
        assert_eq!(intent.until, None);
        assert_eq!(intent.action_label(), "BAN");
    }

    #[test]
    fn test_mute_mode_is_permanent_mute() {
        let intent = escalation_intent(&settings(WarnMode::Mute, None), 7, Utc::now()).unwrap();
        assert_eq!(intent.kind, RestrictionKind::Mute);
        assert_eq!(intent.until, None);
    }

    #[test]
    fn test_timed_modes_use_configured_duration() {
        let now = Utc::now();
        let intent = escalation_intent(&settings(WarnMode::Tmute, Some("1h")), 7, now).unwrap();
        assert_eq!(intent.kind, RestrictionKind::Mute);
        assert_eq!(intent.until, Some(now + Duration::hours(1)));
        assert_eq!(intent.action_label(), "MUTE for 1 hour");

        let intent = escalation_intent(&settings(WarnMode::Tban, Some("2d")), 7, now).unwrap();
        assert_eq!(intent.kind, RestrictionKind::Ban);
        assert_eq!(intent.until, Some(now + Duration::days(2)));
    }

    #[test]
    fn test_timed_mode_requires_valid_duration() {
        assert_matches!(
            escalation_intent(&settings(WarnMode::Tban, None), 7, Utc::now()),
            Err(ChatWardenError::InvalidInput(_))
        );
        assert_matches!(
            escalation_intent(&settings(WarnMode::Tmute, Some("abc")), 7, Utc::now()),
            Err(ChatWardenError::InvalidInput(_))
        );
    }

    #[test]
    fn test_escalation_reason() {
        let intent = escalation_intent(&settings(WarnMode::Ban, None), 7, Utc::now()).unwrap();
        assert_eq!(intent.reason_display(), "Reason: Warn limit reached");
    }

    #[test]
    fn test_counts_below_the_limit_do_not_escalate() {
        let settings = settings(WarnMode::Ban, None);
        let now = Utc::now();
        assert!(escalation_decision(&settings, 1, 7, now).unwrap().is_none());
        assert!(escalation_decision(&settings, 2, 7, now).unwrap().is_none());
    }

    #[test]
    fn test_reaching_the_limit_yields_exactly_one_intent() {
        let mut settings = settings(WarnMode::Tmute, Some("1h"));
        settings.warn_limit = 2;
        let now = Utc::now();

        let first = escalation_decision(&settings, 1, 7, now).unwrap();
        assert!(first.is_none());

        let second = escalation_decision(&settings, 2, 7, now).unwrap().expect("intent");
        assert_eq!(second.kind, RestrictionKind::Mute);
        assert_eq!(second.until, Some(now + Duration::hours(1)));
        assert_eq!(second.action_label(), "MUTE for 1 hour");
    }
}
