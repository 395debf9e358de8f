//! Restriction command parameter extraction
//!
//! Moderation commands name their target either by replying to one of the
//! target's messages or by passing a numeric user id as the first argument.
//! Commands that support timed restrictions may follow the target with a
//! duration token; everything left over is the free-form reason.

use chrono::Utc;
use teloxide::types::Message;
use crate::utils::duration::{parse_until_date, UntilDate};

/// Target, expiry and reason extracted from a restriction command
#[derive(Debug, Clone)]
pub struct RestrictionParameters {
    /// Resolved target user id, `None` when no target could be determined
    pub user: Option<i64>,
    /// Parsed expiry, permanent when the command carried no valid duration
    pub until: UntilDate,
    /// Free-form reason, `None` when omitted
    pub reason: Option<String>,
    /// Whether the replied-to message (the target source) was sent by a bot
    pub replied_author_is_bot: bool,
}

/// Extract restriction parameters from a command message
///
/// With `with_duration` set, the token following the target (or the first
/// token when replying) is consumed as a duration if it parses as one.
pub fn restriction_parameters(msg: &Message, with_duration: bool) -> RestrictionParameters {
    let text = msg.text().unwrap_or_default();
    // First token is the command itself.
    let mut tokens = text.split_whitespace().skip(1).peekable();

    let mut user = None;
    let mut replied_author_is_bot = false;
    if let Some(author) = msg.reply_to_message().and_then(|reply| reply.from()) {
        user = Some(author.id.0 as i64);
        replied_author_is_bot = author.is_bot;
    } else if let Some(first) = tokens.peek() {
        if let Ok(id) = first.parse::<i64>() {
            user = Some(id);
            tokens.next();
        }
    }

    let mut until = UntilDate::none();
    if with_duration {
        if let Some(next) = tokens.peek() {
            let parsed = parse_until_date(next, Utc::now());
            if parsed.is_some() {
                until = parsed;
                tokens.next();
            }
        }
    }

    let reason = tokens.collect::<Vec<_>>().join(" ");
    let reason = if reason.is_empty() { None } else { Some(reason) };

    RestrictionParameters { user, until, reason, replied_author_is_bot }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(value: serde_json::Value) -> Message {
        serde_json::from_value(value).expect("valid message JSON")
    }

    fn command_message(text: &str) -> Message {
        message(serde_json::json!({
            "message_id": 1,
            "date": 1_700_000_000,
            "chat": {"id": -1001234, "title": "Test Group", "type": "supergroup"},
            "from": {"id": 42, "is_bot": false, "first_name": "Admin"},
            "text": text,
        }))
    }

    fn reply_message(text: &str, author_id: u64, author_is_bot: bool) -> Message {
        message(serde_json::json!({
            "message_id": 2,
            "date": 1_700_000_100,
            "chat": {"id": -1001234, "title": "Test Group", "type": "supergroup"},
            "from": {"id": 42, "is_bot": false, "first_name": "Admin"},
            "text": text,
            "reply_to_message": {
                "message_id": 1,
                "date": 1_700_000_000,
                "chat": {"id": -1001234, "title": "Test Group", "type": "supergroup"},
                "from": {"id": author_id, "is_bot": author_is_bot, "first_name": "Target"},
                "text": "offending message",
            },
        }))
    }

    #[test]
    fn test_target_from_argument() {
        let params = restriction_parameters(&command_message("/ban 12345 2h spamming"), true);
        assert_eq!(params.user, Some(12345));
        assert!(params.until.is_some());
        assert_eq!(params.until.display, " for 2 hours");
        assert_eq!(params.reason.as_deref(), Some("spamming"));
        assert!(!params.replied_author_is_bot);
    }

    #[test]
    fn test_target_from_reply() {
        let params = restriction_parameters(&reply_message("/ban flooding", 777, false), true);
        assert_eq!(params.user, Some(777));
        assert!(!params.until.is_some());
        assert_eq!(params.reason.as_deref(), Some("flooding"));
    }

    #[test]
    fn test_reply_with_duration() {
        let params = restriction_parameters(&reply_message("/mute 1d", 777, false), true);
        assert_eq!(params.user, Some(777));
        assert_eq!(params.until.display, " for 1 day");
        assert_eq!(params.reason, None);
    }

    #[test]
    fn test_no_target() {
        let params = restriction_parameters(&command_message("/ban some reason"), true);
        assert_eq!(params.user, None);
        // Tokens that are not a user id stay part of the reason.
        assert_eq!(params.reason.as_deref(), Some("some reason"));
    }

    #[test]
    fn test_duration_ignored_when_not_supported() {
        let params = restriction_parameters(&command_message("/warn 12345 2h spam"), false);
        assert_eq!(params.user, Some(12345));
        assert!(!params.until.is_some());
        assert_eq!(params.reason.as_deref(), Some("2h spam"));
    }

    #[test]
    fn test_bot_author_flag() {
        let params = restriction_parameters(&reply_message("/warn", 999, true), false);
        assert_eq!(params.user, Some(999));
        assert!(params.replied_author_is_bot);
    }
}
